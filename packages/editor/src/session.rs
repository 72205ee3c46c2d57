//! # Edit Session
//!
//! One client's view of a document: the document itself, the drag in
//! progress, the current selection and the preview device.

use crate::{
    CanvasLayout, Change, Document, DragCoordinator, DropDescriptor, DropEdge, DropOutcome,
    EditorError, Mutation, MutationResult, Point,
};
use pagecraft_compiler_html::{CompileOptions, HtmlCompiler, PreviewDevice};
use pagecraft_model::{ComponentId, Palette, TreeError};
use pagecraft_style::Theme;
use tracing::debug;

/// Edits made through the session keep the selection in step with the
/// tree, so the document is only handed out read-only.
pub struct EditSession {
    document: Document,
    drag: DragCoordinator,
    palette: Palette,
    theme: Theme,
    selected: Vec<ComponentId>,
    device: PreviewDevice,
}

impl EditSession {
    pub fn new(document: Document, theme: Theme) -> Self {
        Self {
            document,
            drag: DragCoordinator::new(),
            palette: Palette::standard(),
            theme,
            selected: Vec::new(),
            device: PreviewDevice::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Give the document back, ending the session
    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn device(&self) -> PreviewDevice {
        self.device
    }

    pub fn set_device(&mut self, device: PreviewDevice) {
        debug!(device = device.as_str(), "preview device");
        self.device = device;
    }

    pub fn selection(&self) -> &[ComponentId] {
        &self.selected
    }

    /// Replace the selection with `id`
    pub fn select(&mut self, id: &ComponentId) -> Result<(), TreeError> {
        self.document.tree().query(id)?;
        self.selected = vec![id.clone()];
        Ok(())
    }

    /// Add `id` to the selection, or drop it if already selected
    pub fn toggle_selection(&mut self, id: &ComponentId) -> Result<(), TreeError> {
        self.document.tree().query(id)?;
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.clone());
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Apply a mutation and keep the selection pointing at live nodes
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let result = self.document.apply(mutation)?;
        self.prune_selection(&result.change);
        Ok(result)
    }

    /// Start dragging the named palette entry
    pub fn begin_palette_drag(&mut self, name: &str) -> Result<(), EditorError> {
        let template = self
            .palette
            .get(name)
            .cloned()
            .ok_or_else(|| EditorError::UnknownTemplate(name.to_string()))?;
        self.drag.begin_template(template);
        Ok(())
    }

    /// Start dragging an existing node
    pub fn begin_move(&mut self, id: &ComponentId) -> Result<(), TreeError> {
        self.drag.begin_move(id, self.document.tree())
    }

    pub fn pointer_moved(&mut self, point: Point, layout: &CanvasLayout) -> Option<DropDescriptor> {
        self.drag.pointer_moved(point, layout, self.document.tree())
    }

    pub fn hover(&mut self, target: &ComponentId, edge: DropEdge) -> Option<DropDescriptor> {
        self.drag.hover(target, edge, self.document.tree())
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    /// Save the document to its backing file
    pub fn save(&mut self) -> Result<(), EditorError> {
        self.document.save()
    }

    /// Commit the drag. A dropped node becomes the selection.
    pub fn drop_current(&mut self) -> Result<DropOutcome, EditorError> {
        let outcome = self.drag.drop_current(&mut self.document)?;
        if let DropOutcome::Inserted(id) | DropOutcome::Moved(id) = &outcome {
            self.selected = vec![id.clone()];
        }
        Ok(outcome)
    }

    /// Live canvas markup at the current device width
    pub fn preview_html(&self) -> String {
        HtmlCompiler::new(self.theme.clone()).render_canvas(self.document.tree(), self.device)
    }

    /// Standalone export page
    pub fn export_html(&self, options: CompileOptions) -> String {
        HtmlCompiler::new(self.theme.clone()).compile_to_html(self.document.tree(), options)
    }

    fn prune_selection(&mut self, change: &Change) {
        if let Change::Removed(removal) = change {
            self.selected.retain(|id| !removal.removed.contains(id));
        }
    }
}
