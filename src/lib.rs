//! # pagegraph: Localized Knowledge-Base Graphs
//!
//! Given a central page, computes and lays out its parents, children,
//! friends and siblings according to a configurable relationship ontology,
//! and re-renders as the user navigates or the vault changes.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `MetadataIndex` and `CanvasRenderer` are the contracts
//!    with the host; both ship an in-memory implementation
//! 2. **Pure merges**: relation upgrades go through `merge_relation_type` and
//!    `merge_direction`; DEFINED is sticky
//! 3. **Classify late**: relations store raw observations, parent/child/friend
//!    is decided at query time
//! 4. **Deterministic layout**: same neighbourhood, same coordinates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagegraph::{build_pages, FieldValue, IndexContext, MemoryIndex, Settings};
//!
//! let mut index = MemoryIndex::new();
//! index.add_file("A.md").add_file("B.md");
//! index.add_field("A.md", "Parent", FieldValue::from("[[B]]"));
//!
//! let (mut pages, _) = build_pages(&index, IndexContext::new(Settings::default()));
//! pages.add_field_links_to_page(&index, "A.md");
//!
//! let a = pages.get("A.md").unwrap();
//! assert_eq!(a.parents()[0].page.path, "B.md");
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Index build | `index::builder` | files, folders, tags, plain links |
//! | Ontology | `ontology` | named fields → DEFINED relations |
//! | Registry | `registry` | classified neighbour queries |
//! | Scene | `scene` | bounded neighbourhood, links, drawing |
//! | Layout | `layout` | grid and compact region layout |
//! | View | `view` | event state machine, refresh timer |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod registry;
pub mod ontology;
pub mod index;
pub mod layout;
pub mod scene;
pub mod render;
pub mod settings;
pub mod context;
pub mod view;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Page, Relation, RelationType, RelationKind, LinkDirection, FriendSide,
    Node, Link, Role, Point, Size,
};

// ============================================================================
// Re-exports: Contracts and reference implementations
// ============================================================================

pub use index::{build_pages, MetadataIndex, MemoryIndex};
pub use render::{CanvasRenderer, Notifier, RecordingCanvas, RecordingNotifier};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use registry::{Neighbour, PageRef, Pages};
pub use ontology::{FieldValue, OntologyResolver};
pub use layout::{Layout, LayoutMode, LayoutSpecification, Region};
pub use scene::{assemble, render_page, Neighbourhood};
pub use settings::{Hierarchy, NavigationHistory, Settings};
pub use context::IndexContext;
pub use view::{GraphView, RefreshTimer, ViewEvent, ViewState};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Renderer not ready after {attempts} attempts")]
    RendererTimeout { attempts: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
