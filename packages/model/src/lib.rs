//! # Pagecraft Model
//!
//! The builder document: an ordered forest of nestable components stored as
//! an arena keyed by id.
//!
//! ```text
//! roots ─┬─ row ──┬─ column ── heading
//!        │        └─ column ── button
//!        └─ row ──── video
//! ```
//!
//! All structural change goes through [`ComponentTree`]; callers never splice
//! children lists or write `parent_id` themselves.

pub mod component;
pub mod error;
pub mod id_generator;
pub mod patch;
pub mod snapshot;
pub mod template;
pub mod tree;

pub use component::{
    AttributeMap, BuilderComponent, ComponentId, ComponentKind, FlowAxis, SpecificAttributes,
    StyleMap,
};
pub use error::{TreeError, TreeResult};
pub use id_generator::{get_document_seed, IdGenerator};
pub use patch::ComponentPatch;
pub use snapshot::{DocumentSnapshot, SnapshotError, SnapshotNode};
pub use template::{ComponentTemplate, Palette};
pub use tree::{ComponentTree, Removal, Violation};
