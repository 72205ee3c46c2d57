//! # Pagecraft Editor
//!
//! Document editing engine for the page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: component arena + invariants         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save JSON snapshots                 │
//! │  - Apply mutations, notify observers        │
//! │  - Drag-and-drop coordination               │
//! │  - Media library + deferred metadata        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: preview canvas / export page │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, DragCoordinator, DropEdge};
//!
//! let mut doc = Document::load("welcome.json")?;
//! let mut drag = DragCoordinator::new();
//!
//! drag.begin_template(palette.get("button").unwrap().clone());
//! drag.hover(&target, DropEdge::After, doc.tree());
//! drag.drop_current(&mut doc)?;
//!
//! doc.save()?;
//! ```

mod document;
mod drag;
mod errors;
mod media;
mod mutations;
mod session;

pub use document::{ChangeEvent, Document, DocumentObserver, MutationResult};
pub use drag::{
    CanvasLayout, DragCoordinator, DragSession, DragSource, DragState, DropDescriptor, DropEdge,
    DropOutcome, LayoutRect, Point,
};
pub use errors::EditorError;
pub use media::{
    MediaError, MediaItem, MediaLibrary, MediaMetadata, MediaType, ObjectUrlReleaser,
    ReleaseRemovedMedia,
};
pub use mutations::{Change, Mutation};
pub use session::EditSession;
