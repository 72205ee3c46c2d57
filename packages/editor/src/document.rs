//! # Document Handle
//!
//! A Document owns one component tree plus the id generator that feeds it.
//! All edits go through [`Document::apply`], which bumps the version and
//! notifies observers only when the store accepted the mutation.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Render → Save
//!   ↓      ↓       ↓       ↓
//! JSON  Mutation  HTML   JSON
//! ```

use crate::{Change, EditorError, Mutation};
use pagecraft_model::{
    BuilderComponent, ComponentId, ComponentKind, ComponentPatch, ComponentTemplate,
    ComponentTree, DocumentSnapshot, IdGenerator,
};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Notification sent to observers after each accepted mutation
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub version: u64,
    pub change: Change,
}

/// Reacts to accepted mutations (selection pruning, media cleanup, canvas
/// refresh). Observers only read the tree.
pub trait DocumentObserver: fmt::Debug {
    fn on_change(&mut self, event: &ChangeEvent, tree: &ComponentTree);
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,
    pub change: Change,
}

#[derive(Debug)]
pub struct Document {
    /// Backing file, if the document was loaded from or saved to disk
    pub path: Option<PathBuf>,

    /// Current version number (increments on each accepted mutation)
    pub version: u64,

    tree: ComponentTree,
    ids: IdGenerator,
    dirty: bool,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl Document {
    /// Empty in-memory document whose ids are seeded from `name`
    pub fn new(name: &str) -> Self {
        Self {
            path: None,
            version: 0,
            tree: ComponentTree::new(),
            ids: IdGenerator::new(name),
            dirty: false,
            observers: Vec::new(),
        }
    }

    pub fn from_snapshot(name: &str, snapshot: DocumentSnapshot) -> Result<Self, EditorError> {
        let tree = snapshot.into_tree()?;
        let mut ids = IdGenerator::new(name);
        ids.observe(tree.iter().map(|node| &node.id));

        Ok(Self {
            path: None,
            version: 0,
            tree,
            ids,
            dirty: false,
            observers: Vec::new(),
        })
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self, EditorError> {
        Self::from_snapshot(name, DocumentSnapshot::from_json(json)?)
    }

    /// Load a file-backed document. The file stem seeds new ids.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut doc = Self::from_json(name, &json)?;
        doc.path = Some(path.to_path_buf());
        info!(path = %path.display(), nodes = doc.tree.len(), "loaded document");
        Ok(doc)
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Fresh id for a node built outside a template
    pub fn new_id(&mut self) -> ComponentId {
        self.ids.new_id()
    }

    pub fn subscribe(&mut self, observer: impl DocumentObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply a mutation. On error nothing changes, including the version.
    #[instrument(skip(self, mutation), fields(version = self.version))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let change = mutation.apply(&mut self.tree, &mut self.ids)?;
        self.version += 1;
        self.dirty = true;
        debug!(version = self.version, subject = %change.subject(), "applied mutation");

        let event = ChangeEvent {
            version: self.version,
            change,
        };
        for observer in &mut self.observers {
            observer.on_change(&event, &self.tree);
        }

        Ok(MutationResult {
            version: event.version,
            change: event.change,
        })
    }

    pub fn insert_template(
        &mut self,
        template: ComponentTemplate,
        parent: Option<&ComponentId>,
        index: usize,
    ) -> Result<ComponentId, EditorError> {
        let result = self.apply(Mutation::InsertTemplate {
            parent_id: parent.cloned(),
            index,
            template,
        })?;
        Ok(result.change.subject().clone())
    }

    /// Insert an empty node of `kind` with a fresh id
    pub fn insert_kind(
        &mut self,
        kind: ComponentKind,
        parent: Option<&ComponentId>,
        index: usize,
    ) -> Result<ComponentId, EditorError> {
        self.insert_template(ComponentTemplate::new(kind), parent, index)
    }

    pub fn insert(
        &mut self,
        node: BuilderComponent,
        parent: Option<&ComponentId>,
        index: usize,
    ) -> Result<ComponentId, EditorError> {
        let result = self.apply(Mutation::Insert {
            parent_id: parent.cloned(),
            index,
            node,
        })?;
        Ok(result.change.subject().clone())
    }

    pub fn move_node(
        &mut self,
        id: &ComponentId,
        parent: Option<&ComponentId>,
        index: usize,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::Move {
            node_id: id.clone(),
            new_parent_id: parent.cloned(),
            index,
        })?;
        Ok(())
    }

    pub fn remove(&mut self, id: &ComponentId) -> Result<(), EditorError> {
        self.apply(Mutation::remove(id.clone()))?;
        Ok(())
    }

    pub fn update(&mut self, id: &ComponentId, patch: ComponentPatch) -> Result<(), EditorError> {
        self.apply(Mutation::update(id.clone(), patch))?;
        Ok(())
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::capture(&self.tree)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(self.snapshot().to_json()?)
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save to the backing file
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.clone().ok_or(EditorError::NotFileBacked)?;
        self.save_as(path)
    }

    /// Save to `path` and make it the backing file
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        let path = path.into();
        std::fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), version = self.version, "saved document");
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Recorder(Rc<RefCell<Vec<ChangeEvent>>>);

    impl DocumentObserver for Recorder {
        fn on_change(&mut self, event: &ChangeEvent, _tree: &ComponentTree) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn test_create_memory_document() {
        let doc = Document::new("welcome");
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert!(doc.tree().is_empty());
        assert!(doc.path.is_none());
    }

    #[test]
    fn test_version_only_moves_on_success() {
        let mut doc = Document::new("welcome");
        let row = doc.insert_kind(ComponentKind::Row, None, 0).unwrap();
        assert_eq!(doc.version, 1);
        assert!(doc.is_dirty());

        let err = doc.insert_kind(ComponentKind::Row, None, 5).unwrap_err();
        assert_eq!(err.tree_error().map(|e| e.kind()), Some("OutOfRange"));
        assert_eq!(doc.version, 1);

        doc.remove(&row).unwrap();
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_observers_see_accepted_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut doc = Document::new("welcome");
        doc.subscribe(Recorder(events.clone()));

        let row = doc.insert_kind(ComponentKind::Row, None, 0).unwrap();
        let _ = doc.remove(&"missing".into());
        doc.remove(&row).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].version, 2);
        assert!(matches!(&events[1].change, Change::Removed(r) if r.id == row));
    }

    #[test]
    fn test_loaded_ids_are_not_reissued() {
        let seed = pagecraft_model::get_document_seed("welcome");
        let json = format!(
            r#"{{ "components": [ {{ "id": "{}-7", "type": "row" }} ] }}"#,
            seed
        );
        let mut doc = Document::from_json("welcome", &json).unwrap();
        assert_eq!(doc.new_id().to_string(), format!("{}-8", seed));
    }
}
