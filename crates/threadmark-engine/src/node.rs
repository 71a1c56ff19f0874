use serde::{Deserialize, Serialize};

use crate::Style;

/// A node of a parsed message.
///
/// This is the persisted and wire representation: each variant serializes
/// as an object tagged by `type`, with optional fields omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text {
        text: String,
    },
    NewLine,
    /// Styled content. Always has at least one child.
    Style {
        style: Style,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        children: Vec<Node>,
    },
    /// `>>123`. `thread_id` and `slug` are filled in by post-processing.
    RefLink {
        #[serde(rename = "postID")]
        post_id: u64,
        #[serde(rename = "threadID", default, skip_serializing_if = "Option::is_none")]
        thread_id: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },
    Link {
        text: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
    /// `##NdM##`. `result` holds `count` rolls once post-processed.
    Dice {
        count: u32,
        max: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Vec<u32>>,
    },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn style(style: Style, value: Option<String>, children: Vec<Node>) -> Self {
        Node::Style {
            style,
            value,
            children,
        }
    }

    /// Wraps `self` as the only child of a new style node.
    pub fn wrap(self, style: Style, value: Option<String>) -> Self {
        Node::style(style, value, vec![self])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wire_shapes() {
        let cases = [
            (Node::text("hi"), json!({"type": "text", "text": "hi"})),
            (Node::NewLine, json!({"type": "newline"})),
            (
                Node::style(Style::Color, Some("#f00".into()), vec![Node::text("x")]),
                json!({
                    "type": "style",
                    "style": "color",
                    "value": "#f00",
                    "children": [{"type": "text", "text": "x"}]
                }),
            ),
            (
                Node::text("x").wrap(Style::Bold, None),
                json!({
                    "type": "style",
                    "style": "bold",
                    "children": [{"type": "text", "text": "x"}]
                }),
            ),
            (
                Node::RefLink {
                    post_id: 5,
                    thread_id: Some(1),
                    slug: Some("b".into()),
                },
                json!({"type": "reflink", "postID": 5, "threadID": 1, "slug": "b"}),
            ),
            (
                Node::RefLink {
                    post_id: 5,
                    thread_id: None,
                    slug: None,
                },
                json!({"type": "reflink", "postID": 5}),
            ),
            (
                Node::Link {
                    text: "t".into(),
                    url: "https://a.b".into(),
                    icon: None,
                },
                json!({"type": "link", "text": "t", "url": "https://a.b"}),
            ),
            (
                Node::Dice {
                    count: 2,
                    max: 6,
                    result: Some(vec![3, 4]),
                },
                json!({"type": "dice", "count": 2, "max": 6, "result": [3, 4]}),
            ),
        ];

        for (node, expected) in cases {
            let value = serde_json::to_value(&node).unwrap();
            assert_eq!(value, expected);
            let back: Node = serde_json::from_value(value).unwrap();
            assert_eq!(back, node);
        }
    }

    #[test]
    fn reflink_snapshot() {
        let node = Node::RefLink {
            post_id: 83,
            thread_id: Some(80),
            slug: Some("dev".into()),
        };
        assert_json_snapshot!(node, @r###"
        {
          "type": "reflink",
          "postID": 83,
          "threadID": 80,
          "slug": "dev"
        }
        "###);
    }
}
