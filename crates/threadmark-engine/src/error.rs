use thiserror::Error;

/// Fatal post-processing failures. "Not found" lookups are not errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to look up post >>{post_id}: {source}")]
    PostLookup {
        post_id: u64,
        source: anyhow::Error,
    },

    #[error("Failed to resolve embed for {url}: {source}")]
    EmbedLookup { url: String, source: anyhow::Error },

    #[error("Post-processing was cancelled")]
    Cancelled,

    #[error("Lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
