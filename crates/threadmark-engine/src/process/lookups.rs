use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the post-processor needs to know about a referenced post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: u64,
    /// Id of the thread root this post replies to; `None` for a thread root.
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Slug of the board the post lives on.
    pub slug: String,
}

impl PostRef {
    /// The thread containing this post: its own id for a thread root,
    /// otherwise its parent's.
    pub fn thread_id(&self) -> u64 {
        self.parent_id.unwrap_or(self.id)
    }
}

/// Metadata about an external resource a link points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedInfo {
    /// Media type of the embed, e.g. `video/x-youtube`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Title shown in place of the raw URL.
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub thumbnail_width: u32,
    #[serde(default)]
    pub thumbnail_height: u32,
}

/// External lookups used while post-processing a message.
///
/// `Ok(None)` means "not found" and selects the fallback rendering. `Err`
/// is a backend failure and aborts processing.
#[async_trait]
pub trait Lookups: Send + Sync {
    async fn find_post(&self, post_id: u64) -> anyhow::Result<Option<PostRef>>;

    async fn resolve_embed(&self, url: &str) -> anyhow::Result<Option<EmbedInfo>>;
}

/// Lookups that never find anything: every reflink degrades to text and
/// every link is left as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLookups;

#[async_trait]
impl Lookups for NoLookups {
    async fn find_post(&self, _post_id: u64) -> anyhow::Result<Option<PostRef>> {
        Ok(None)
    }

    async fn resolve_embed(&self, _url: &str) -> anyhow::Result<Option<EmbedInfo>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_root_is_its_own_thread() {
        let root = PostRef {
            id: 1,
            parent_id: None,
            slug: "b".into(),
        };
        assert_eq!(root.thread_id(), 1);
    }

    #[test]
    fn reply_belongs_to_its_parent() {
        let reply = PostRef {
            id: 7,
            parent_id: Some(1),
            slug: "b".into(),
        };
        assert_eq!(reply.thread_id(), 1);
    }
}
