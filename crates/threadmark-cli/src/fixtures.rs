//! Lookups answered from a JSON file instead of a live board.
//!
//! ```json
//! {
//!   "posts": [{"id": 2, "parent_id": 1, "slug": "b"}],
//!   "embeds": [{"type": "video/x-youtube", "name": "Title", "url": "https://youtu.be/x"}]
//! }
//! ```

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use threadmark_engine::{EmbedInfo, Lookups, PostRef};

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    posts: Vec<PostRef>,
    #[serde(default)]
    embeds: Vec<EmbedInfo>,
}

#[derive(Debug, Default)]
pub struct FixtureLookups {
    posts: HashMap<u64, PostRef>,
    embeds: HashMap<String, EmbedInfo>,
}

impl FixtureLookups {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(json)?;
        Ok(Self {
            posts: file.posts.into_iter().map(|post| (post.id, post)).collect(),
            embeds: file
                .embeds
                .into_iter()
                .map(|embed| (embed.url.clone(), embed))
                .collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures at {}", path.display()))?;
        let lookups = Self::from_json(&json)
            .with_context(|| format!("Failed to parse fixtures at {}", path.display()))?;
        debug!(
            "loaded {} posts and {} embeds from {}",
            lookups.posts.len(),
            lookups.embeds.len(),
            path.display()
        );
        Ok(lookups)
    }
}

#[async_trait]
impl Lookups for FixtureLookups {
    async fn find_post(&self, post_id: u64) -> Result<Option<PostRef>> {
        Ok(self.posts.get(&post_id).cloned())
    }

    async fn resolve_embed(&self, url: &str) -> Result<Option<EmbedInfo>> {
        Ok(self.embeds.get(url).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const FIXTURES: &str = r#"{
        "posts": [
            {"id": 1, "slug": "b"},
            {"id": 2, "parent_id": 1, "slug": "b"}
        ],
        "embeds": [
            {"type": "video/x-youtube", "name": "Title", "url": "https://youtu.be/x"}
        ]
    }"#;

    #[tokio::test]
    async fn answers_from_the_file() {
        let lookups = FixtureLookups::from_json(FIXTURES).unwrap();

        let reply = lookups.find_post(2).await.unwrap().unwrap();
        assert_eq!(reply.thread_id(), 1);
        assert_eq!(lookups.find_post(3).await.unwrap(), None);

        let embed = lookups
            .resolve_embed("https://youtu.be/x")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(embed.name, "Title");
        assert_eq!(embed.width, 0);
    }

    #[test]
    fn missing_sections_are_empty() {
        let lookups = FixtureLookups::from_json("{}").unwrap();
        assert!(lookups.posts.is_empty());
        assert!(lookups.embeds.is_empty());
    }

    #[test]
    fn load_reports_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fixtures.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FixtureLookups::load(&path).unwrap_err();
        assert!(err.to_string().contains("fixtures.json"));
    }
}
