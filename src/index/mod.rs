//! # Metadata Index Contract
//!
//! The host's document store is an external collaborator. This trait is the
//! contract between it and the engine: files, resolved and unresolved links,
//! backlinks, ontology fields, tags, link resolution and the reindex flag.
//!
//! ## Implementations
//!
//! | Index | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryIndex` | `memory` | In-memory vault for testing/embedding |

pub mod memory;
pub mod builder;

use std::collections::BTreeMap;
use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::ontology::FieldValue;
use crate::render::Notifier;

pub use builder::{build_pages, BuildStats};
pub use memory::MemoryIndex;

/// source file → { target file → link count }
pub type LinkMap = HashMap<String, HashMap<String, u32>>;

/// source file → { unresolved link text }
pub type UnresolvedMap = HashMap<String, HashSet<String>>;

/// Delay between reindex polls.
pub const INDEX_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Polls between "still waiting" notices.
pub const INDEX_NOTICE_EVERY: u32 = 20;

/// The host's document metadata.
pub trait MetadataIndex {
    /// Every file path in the vault, markdown and attachments.
    fn files(&self) -> Vec<String>;

    fn resolved_links(&self) -> &LinkMap;

    fn unresolved_links(&self) -> &UnresolvedMap;

    /// Files linking to `path`.
    fn backlinks(&self, path: &str) -> Vec<String>;

    /// Named field values of a file, in document order.
    fn fields(&self, path: &str) -> Vec<(String, FieldValue)>;

    /// Tags of a file, without the leading `#`.
    fn tags(&self, path: &str) -> Vec<String>;

    /// tag → files carrying it.
    fn tag_index(&self) -> BTreeMap<String, Vec<String>>;

    /// Resolve link text as written in `source` to a file path.
    fn resolve_link(&self, link: &str, source: &str) -> Option<String>;

    /// An asynchronous reindex is running; results may be stale.
    fn is_reindexing(&self) -> bool;
}

/// Poll until the index has finished reindexing. There is no hard timeout:
/// every `notice_every` polls the user is told the view is still waiting.
/// Returns the number of polls that found the index busy.
pub async fn wait_for_index<I>(
    index: &I,
    notifier: &dyn Notifier,
    poll: Duration,
    notice_every: u32,
) -> u32
where
    I: MetadataIndex + ?Sized,
{
    let mut polls = 0u32;
    while index.is_reindexing() {
        polls += 1;
        if notice_every > 0 && polls % notice_every == 0 {
            notifier.notice("Waiting for the metadata index to finish updating...");
        }
        debug!(polls, "metadata index busy");
        tokio::time::sleep(poll).await;
    }
    polls
}
