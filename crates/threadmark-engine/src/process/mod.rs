//! # Post-Processing
//!
//! Rewrites a parsed tree against external data:
//!
//! - **RefLink**: resolved through [`Lookups::find_post`]; a dead reference
//!   becomes the text `>>id`
//! - **Link**: resolved through [`Lookups::resolve_embed`]; a found embed
//!   replaces the display text with its title and may add an icon hint
//! - **Dice**: rolled with the caller's random source
//!
//! Lookups run concurrently (bounded by
//! [`PostProcessor::with_max_concurrent_lookups`]) and each distinct post id
//! or URL is looked up once. The tree is rebuilt afterwards in a single
//! synchronous pass, so sibling order is always the document order.

pub mod embed;
pub mod lookups;

use std::{
    collections::{BTreeSet, HashMap},
    future::Future,
    sync::Arc,
};

use log::{debug, trace, warn};
use rand::Rng;
use tokio::{sync::Semaphore, task::JoinSet};

pub use lookups::{EmbedInfo, Lookups, NoLookups, PostRef};

use crate::{Node, error::ProcessError, kinds::Dice};

/// Runs post-processing against a set of [`Lookups`].
#[derive(Clone)]
pub struct PostProcessor {
    lookups: Arc<dyn Lookups>,
    max_concurrent_lookups: usize,
}

impl PostProcessor {
    pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

    pub fn new(lookups: Arc<dyn Lookups>) -> Self {
        Self {
            lookups,
            max_concurrent_lookups: Self::DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Caps the number of lookups in flight at once. Zero is treated as one.
    pub fn with_max_concurrent_lookups(mut self, max: usize) -> Self {
        self.max_concurrent_lookups = max.max(1);
        self
    }

    pub fn max_concurrent_lookups(&self) -> usize {
        self.max_concurrent_lookups
    }

    /// Resolves references and embeds and rolls dice.
    pub async fn process<R>(&self, nodes: &[Node], rng: &mut R) -> Result<Vec<Node>, ProcessError>
    where
        R: Rng + ?Sized,
    {
        self.process_until(nodes, rng, std::future::pending()).await
    }

    /// Like [`process`](Self::process), but gives up with
    /// [`ProcessError::Cancelled`] as soon as `cancel` completes while
    /// lookups are still in flight. In-flight lookups are aborted and
    /// `nodes` is left untouched.
    pub async fn process_until<R, C>(
        &self,
        nodes: &[Node],
        rng: &mut R,
        cancel: C,
    ) -> Result<Vec<Node>, ProcessError>
    where
        R: Rng + ?Sized,
        C: Future<Output = ()>,
    {
        let mut wanted = Wanted::default();
        wanted.collect(nodes);

        let resolved = self.resolve(wanted, cancel).await?;
        Ok(rewrite(nodes, &resolved, rng))
    }

    async fn resolve<C>(&self, wanted: Wanted, cancel: C) -> Result<Resolved, ProcessError>
    where
        C: Future<Output = ()>,
    {
        let mut resolved = Resolved::default();
        if wanted.is_empty() {
            return Ok(resolved);
        }

        debug!(
            "dispatching {} post and {} embed lookups",
            wanted.post_ids.len(),
            wanted.urls.len()
        );

        let permits = Arc::new(Semaphore::new(self.max_concurrent_lookups));
        let mut tasks: JoinSet<Result<Outcome, ProcessError>> = JoinSet::new();

        for post_id in wanted.post_ids {
            let lookups = Arc::clone(&self.lookups);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed.
                let Ok(_permit) = permits.acquire_owned().await else {
                    return Err(ProcessError::Cancelled);
                };
                trace!("looking up post >>{post_id}");
                let post = lookups
                    .find_post(post_id)
                    .await
                    .map_err(|source| ProcessError::PostLookup { post_id, source })?;
                Ok(Outcome::Post(post_id, post))
            });
        }

        for url in wanted.urls {
            let lookups = Arc::clone(&self.lookups);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return Err(ProcessError::Cancelled);
                };
                trace!("resolving embed for {url}");
                match lookups.resolve_embed(&url).await {
                    Ok(embed) => Ok(Outcome::Embed(url, embed)),
                    Err(source) => Err(ProcessError::EmbedLookup { url, source }),
                }
            });
        }

        tokio::pin!(cancel);
        loop {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    tasks.abort_all();
                    debug!("post-processing cancelled with {} lookups in flight", tasks.len());
                    return Err(ProcessError::Cancelled);
                }
                next = tasks.join_next() => {
                    let Some(joined) = next else { break };
                    match joined?? {
                        Outcome::Post(post_id, post) => {
                            resolved.posts.insert(post_id, post);
                        }
                        Outcome::Embed(url, embed) => {
                            resolved.embeds.insert(url, embed);
                        }
                    }
                }
            }
        }

        Ok(resolved)
    }
}

/// Post-processes `nodes` with the default concurrency limit.
pub async fn post_process<R>(
    nodes: &[Node],
    lookups: Arc<dyn Lookups>,
    rng: &mut R,
) -> Result<Vec<Node>, ProcessError>
where
    R: Rng + ?Sized,
{
    PostProcessor::new(lookups).process(nodes, rng).await
}

/// Distinct lookup keys found in a tree, in a stable dispatch order.
#[derive(Debug, Default)]
struct Wanted {
    post_ids: BTreeSet<u64>,
    urls: BTreeSet<String>,
}

impl Wanted {
    fn collect(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Style { children, .. } => self.collect(children),
                Node::RefLink { post_id, .. } => {
                    self.post_ids.insert(*post_id);
                }
                Node::Link { url, .. } => {
                    self.urls.insert(url.clone());
                }
                Node::Text { .. } | Node::NewLine | Node::Dice { .. } => {}
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.post_ids.is_empty() && self.urls.is_empty()
    }
}

enum Outcome {
    Post(u64, Option<PostRef>),
    Embed(String, Option<EmbedInfo>),
}

#[derive(Debug, Default)]
struct Resolved {
    posts: HashMap<u64, Option<PostRef>>,
    embeds: HashMap<String, Option<EmbedInfo>>,
}

fn rewrite<R: Rng + ?Sized>(nodes: &[Node], resolved: &Resolved, rng: &mut R) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| rewrite_node(node, resolved, rng))
        .collect()
}

fn rewrite_node<R: Rng + ?Sized>(node: &Node, resolved: &Resolved, rng: &mut R) -> Node {
    match node {
        Node::Style {
            style,
            value,
            children,
        } => Node::Style {
            style: *style,
            value: value.clone(),
            children: rewrite(children, resolved, rng),
        },
        Node::Dice {
            count,
            max,
            result: None,
        } => match Dice::new(*count, *max) {
            Some(dice) => Node::Dice {
                count: *count,
                max: *max,
                result: Some(dice.roll(rng)),
            },
            None => {
                warn!("leaving unrollable dice {count}d{max} as is");
                node.clone()
            }
        },
        Node::RefLink { post_id, .. } => match resolved.posts.get(post_id) {
            Some(Some(post)) => Node::RefLink {
                post_id: *post_id,
                thread_id: Some(post.thread_id()),
                slug: Some(post.slug.clone()),
            },
            _ => Node::text(format!(">>{post_id}")),
        },
        Node::Link { text, url, icon } => match resolved.embeds.get(url) {
            Some(Some(info)) => Node::Link {
                text: info.name.clone(),
                url: url.clone(),
                icon: embed::icon_for(info)
                    .map(str::to_string)
                    .or_else(|| icon.clone()),
            },
            _ => Node::Link {
                text: text.clone(),
                url: url.clone(),
                icon: icon.clone(),
            },
        },
        Node::Text { .. } | Node::NewLine | Node::Dice { .. } => node.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Style;
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn collects_distinct_keys_from_nested_nodes() {
        let nodes = vec![
            Node::RefLink {
                post_id: 2,
                thread_id: None,
                slug: None,
            },
            Node::style(
                Style::Bold,
                None,
                vec![
                    Node::RefLink {
                        post_id: 2,
                        thread_id: None,
                        slug: None,
                    },
                    Node::Link {
                        text: "u".into(),
                        url: "https://a.b".into(),
                        icon: None,
                    },
                ],
            ),
        ];
        let mut wanted = Wanted::default();
        wanted.collect(&nodes);
        assert_eq!(wanted.post_ids.into_iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(
            wanted.urls.into_iter().collect::<Vec<_>>(),
            vec!["https://a.b".to_string()]
        );
    }

    #[test]
    fn rolled_dice_are_not_rerolled() {
        let node = Node::Dice {
            count: 2,
            max: 6,
            result: Some(vec![6, 6]),
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(rewrite_node(&node, &Resolved::default(), &mut rng), node);
    }

    #[test]
    fn unresolved_reflink_becomes_text() {
        let node = Node::RefLink {
            post_id: 999,
            thread_id: None,
            slug: None,
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            rewrite_node(&node, &Resolved::default(), &mut rng),
            Node::text(">>999")
        );
    }

    #[test]
    fn zero_limit_is_clamped() {
        let processor = PostProcessor::new(Arc::new(NoLookups)).with_max_concurrent_lookups(0);
        assert_eq!(processor.max_concurrent_lookups(), 1);
    }
}
