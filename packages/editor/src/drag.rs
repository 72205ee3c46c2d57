//! # Drag-and-Drop Coordinator
//!
//! Explicit state machine for one drag at a time:
//!
//! ```text
//! Idle → Dragging → (Dropped | Cancelled) → Idle
//! ```
//!
//! While dragging, every pointer change recomputes one authoritative
//! [`DropDescriptor`] from scratch against the current tree and layout. The
//! store is read-only until [`DragCoordinator::drop_current`], which issues
//! exactly one insert or move.
//!
//! Descriptor indices address the target's children with the dragged node
//! already detached, which is what `ComponentTree::move_node` expects.

use crate::{Document, EditorError, Mutation};
use pagecraft_model::{ComponentId, ComponentTemplate, ComponentTree, FlowAxis, TreeResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEdge {
    Before,
    After,
    /// Into an empty container, or after its last child
    Inside,
}

/// Computed target of an in-progress drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDescriptor {
    pub parent: Option<ComponentId>,
    pub index: usize,
    pub edge: DropEdge,
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// New node(s) from the palette
    Template(ComponentTemplate),
    /// Existing node, with where it came from
    Existing {
        id: ComponentId,
        origin_parent: Option<ComponentId>,
        origin_index: usize,
    },
}

impl DragSource {
    fn dragged_id(&self) -> Option<&ComponentId> {
        match self {
            DragSource::Template(_) => None,
            DragSource::Existing { id, .. } => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source: DragSource,
    pub descriptor: Option<DropDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// How a drop ended
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Inserted(ComponentId),
    Moved(ComponentId),
    /// Released with no valid target
    Cancelled,
    /// No drag in progress, e.g. a second drop after commit
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    fn midpoint(&self, axis: FlowAxis) -> f64 {
        match axis {
            FlowAxis::Horizontal => self.x + self.width / 2.0,
            FlowAxis::Vertical => self.y + self.height / 2.0,
        }
    }
}

fn coordinate(point: Point, axis: FlowAxis) -> f64 {
    match axis {
        FlowAxis::Horizontal => point.x,
        FlowAxis::Vertical => point.y,
    }
}

/// Laid-out boxes of the live canvas, as last measured
#[derive(Debug, Clone, Default)]
pub struct CanvasLayout {
    /// The canvas itself; drops here that hit no node go to the root list
    pub canvas: Option<LayoutRect>,
    rects: HashMap<ComponentId, LayoutRect>,
}

impl CanvasLayout {
    pub fn new(canvas: LayoutRect) -> Self {
        Self {
            canvas: Some(canvas),
            rects: HashMap::new(),
        }
    }

    pub fn set(&mut self, id: impl Into<ComponentId>, rect: LayoutRect) {
        self.rects.insert(id.into(), rect);
    }

    pub fn with(mut self, id: impl Into<ComponentId>, rect: LayoutRect) -> Self {
        self.set(id, rect);
        self
    }

    pub fn get(&self, id: &ComponentId) -> Option<&LayoutRect> {
        self.rects.get(id)
    }
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn descriptor(&self) -> Option<&DropDescriptor> {
        match &self.state {
            DragState::Dragging(session) => session.descriptor.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Start dragging a palette template. Replaces any drag in progress.
    pub fn begin_template(&mut self, template: ComponentTemplate) {
        debug!(kind = %template.kind, "drag template");
        self.state = DragState::Dragging(DragSession {
            source: DragSource::Template(template),
            descriptor: None,
        });
    }

    /// Start dragging an existing node, recording its origin
    pub fn begin_move(&mut self, id: &ComponentId, tree: &ComponentTree) -> TreeResult<()> {
        let (origin_parent, origin_index) = tree.position(id)?;
        debug!(component = %id, "drag existing");
        self.state = DragState::Dragging(DragSession {
            source: DragSource::Existing {
                id: id.clone(),
                origin_parent,
                origin_index,
            },
            descriptor: None,
        });
        Ok(())
    }

    /// Recompute the descriptor from a pointer position
    pub fn pointer_moved(
        &mut self,
        point: Point,
        layout: &CanvasLayout,
        tree: &ComponentTree,
    ) -> Option<DropDescriptor> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let excluded = excluded_ids(&session.source, tree);
        let descriptor = hit_test(point, layout, tree, &excluded);
        debug!(x = point.x, y = point.y, descriptor = ?descriptor, "drop target");
        session.descriptor = descriptor.clone();
        descriptor
    }

    /// Recompute the descriptor from an explicit target and edge
    pub fn hover(
        &mut self,
        target: &ComponentId,
        edge: DropEdge,
        tree: &ComponentTree,
    ) -> Option<DropDescriptor> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let excluded = excluded_ids(&session.source, tree);
        let descriptor = descriptor_for(target, edge, tree, &excluded);
        debug!(target = %target, ?edge, descriptor = ?descriptor, "drop target");
        session.descriptor = descriptor.clone();
        descriptor
    }

    /// Abandon the drag without touching the store
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }

    /// Commit the current descriptor with one store call and return to
    /// `Idle`. A store failure leaves the tree untouched and is returned so
    /// the caller can log it; for the user the drag simply ends.
    #[instrument(skip(self, document))]
    pub fn drop_current(&mut self, document: &mut Document) -> Result<DropOutcome, EditorError> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Ok(DropOutcome::Ignored);
        };
        let Some(target) = session.descriptor else {
            debug!("released outside any drop zone");
            return Ok(DropOutcome::Cancelled);
        };

        let mutation = match session.source {
            DragSource::Template(template) => Mutation::InsertTemplate {
                parent_id: target.parent,
                index: target.index,
                template,
            },
            DragSource::Existing { id, .. } => Mutation::Move {
                node_id: id,
                new_parent_id: target.parent,
                index: target.index,
            },
        };
        let is_move = matches!(mutation, Mutation::Move { .. });

        match document.apply(mutation) {
            Ok(result) => {
                let id = result.change.subject().clone();
                Ok(if is_move {
                    DropOutcome::Moved(id)
                } else {
                    DropOutcome::Inserted(id)
                })
            }
            Err(err) => {
                warn!(error = %err, "drop rejected, drag cancelled");
                Err(err)
            }
        }
    }
}

/// The dragged node and its subtree never act as drop targets
fn excluded_ids(source: &DragSource, tree: &ComponentTree) -> HashSet<ComponentId> {
    let mut excluded = HashSet::new();
    if let Some(id) = source.dragged_id() {
        excluded.insert(id.clone());
        excluded.extend(tree.descendants(id).unwrap_or_default());
    }
    excluded
}

/// Children of `parent` as they will be once the dragged node is detached
fn visible_children(
    tree: &ComponentTree,
    parent: Option<&ComponentId>,
    excluded: &HashSet<ComponentId>,
) -> Vec<ComponentId> {
    tree.children(parent)
        .map(|children| {
            children
                .iter()
                .filter(|id| !excluded.contains(*id))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn flow_axis(tree: &ComponentTree, parent: Option<&ComponentId>) -> FlowAxis {
    parent
        .and_then(|id| tree.get(id))
        .map(|node| node.kind.flow_axis())
        .unwrap_or(FlowAxis::Vertical)
}

fn descriptor_for(
    target: &ComponentId,
    edge: DropEdge,
    tree: &ComponentTree,
    excluded: &HashSet<ComponentId>,
) -> Option<DropDescriptor> {
    if excluded.contains(target) {
        return None;
    }
    let node = tree.get(target)?;

    match edge {
        DropEdge::Inside => {
            if !node.is_container() {
                return None;
            }
            Some(DropDescriptor {
                parent: Some(target.clone()),
                index: visible_children(tree, Some(target), excluded).len(),
                edge,
            })
        }
        DropEdge::Before | DropEdge::After => {
            let parent = node.parent_id().cloned();
            let siblings = visible_children(tree, parent.as_ref(), excluded);
            let position = siblings.iter().position(|id| id == target)?;
            let index = if edge == DropEdge::Before {
                position
            } else {
                position + 1
            };
            Some(DropDescriptor {
                parent,
                index,
                edge,
            })
        }
    }
}

/// Deepest laid-out node under `point`, skipping excluded ones. Later
/// siblings win ties since they paint on top.
fn deepest_hit(
    point: Point,
    layout: &CanvasLayout,
    tree: &ComponentTree,
    excluded: &HashSet<ComponentId>,
) -> Option<ComponentId> {
    let mut best: Option<(usize, ComponentId)> = None;
    for node in tree.iter() {
        if excluded.contains(&node.id) {
            continue;
        }
        let Some(rect) = layout.get(&node.id) else {
            continue;
        };
        if !rect.contains(point) {
            continue;
        }
        let depth = tree.ancestors(&node.id).map(|a| a.len()).unwrap_or(0);
        if best.as_ref().map_or(true, |(d, _)| depth >= *d) {
            best = Some((depth, node.id.clone()));
        }
    }
    best.map(|(_, id)| id)
}

/// Insertion point among `parent`'s children by sibling midpoints
fn container_drop(
    parent: Option<&ComponentId>,
    point: Point,
    layout: &CanvasLayout,
    tree: &ComponentTree,
    excluded: &HashSet<ComponentId>,
) -> DropDescriptor {
    let axis = flow_axis(tree, parent);
    let children = visible_children(tree, parent, excluded);
    let pointer = coordinate(point, axis);

    // first measured sibling past the pointer; unmeasured ones keep their slot
    let index = children
        .iter()
        .position(|id| {
            layout
                .get(id)
                .map_or(false, |rect| rect.midpoint(axis) > pointer)
        })
        .unwrap_or(children.len());

    let edge = if children.is_empty() {
        DropEdge::Inside
    } else if index < children.len() {
        DropEdge::Before
    } else {
        DropEdge::After
    };
    DropDescriptor {
        parent: parent.cloned(),
        index,
        edge,
    }
}

fn hit_test(
    point: Point,
    layout: &CanvasLayout,
    tree: &ComponentTree,
    excluded: &HashSet<ComponentId>,
) -> Option<DropDescriptor> {
    let Some(hit) = deepest_hit(point, layout, tree, excluded) else {
        return layout
            .canvas
            .filter(|canvas| canvas.contains(point))
            .map(|_| container_drop(None, point, layout, tree, excluded));
    };
    let node = tree.get(&hit)?;

    if node.is_container() {
        return Some(container_drop(Some(&hit), point, layout, tree, excluded));
    }

    // leaves split at their own midpoint along the parent's axis
    let rect = layout.get(&hit)?;
    let axis = flow_axis(tree, node.parent_id());
    let edge = if coordinate(point, axis) < rect.midpoint(axis) {
        DropEdge::Before
    } else {
        DropEdge::After
    };
    descriptor_for(&hit, edge, tree, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{BuilderComponent, ComponentKind};

    /// column `col` holding paragraphs `a` and `b`, stacked vertically
    fn document() -> (Document, CanvasLayout) {
        let mut doc = Document::new("drag");
        let col: ComponentId = "col".into();
        doc.insert(BuilderComponent::new(col.clone(), ComponentKind::Column), None, 0)
            .unwrap();
        doc.insert(BuilderComponent::new("a".into(), ComponentKind::Paragraph), Some(&col), 0)
            .unwrap();
        doc.insert(BuilderComponent::new("b".into(), ComponentKind::Paragraph), Some(&col), 1)
            .unwrap();

        let layout = CanvasLayout::new(LayoutRect::new(0.0, 0.0, 600.0, 800.0))
            .with("col", LayoutRect::new(0.0, 0.0, 600.0, 300.0))
            .with("a", LayoutRect::new(0.0, 0.0, 600.0, 100.0))
            .with("b", LayoutRect::new(0.0, 100.0, 600.0, 100.0));
        (doc, layout)
    }

    fn paragraph() -> ComponentTemplate {
        ComponentTemplate::new(ComponentKind::Paragraph)
    }

    #[test]
    fn test_leaf_halves_pick_edge() {
        let (doc, layout) = document();
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());

        let top = drag.pointer_moved(Point::new(10.0, 20.0), &layout, doc.tree()).unwrap();
        assert_eq!(top.index, 0);
        assert_eq!(top.edge, DropEdge::Before);

        let bottom = drag.pointer_moved(Point::new(10.0, 180.0), &layout, doc.tree()).unwrap();
        assert_eq!(bottom.index, 2);
        assert_eq!(bottom.edge, DropEdge::After);
        assert_eq!(bottom.parent, Some("col".into()));
    }

    #[test]
    fn test_container_gap_uses_midpoints() {
        let (doc, layout) = document();
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());

        // below both children, still inside the column
        let desc = drag.pointer_moved(Point::new(10.0, 250.0), &layout, doc.tree()).unwrap();
        assert_eq!(desc.parent, Some("col".into()));
        assert_eq!(desc.index, 2);
    }

    #[test]
    fn test_container_gap_counts_unmeasured_siblings() {
        let (doc, _) = document();
        let layout = CanvasLayout::new(LayoutRect::new(0.0, 0.0, 600.0, 800.0))
            .with("col", LayoutRect::new(0.0, 0.0, 600.0, 300.0))
            .with("b", LayoutRect::new(0.0, 100.0, 600.0, 100.0));
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());

        let below = drag.pointer_moved(Point::new(10.0, 250.0), &layout, doc.tree()).unwrap();
        assert_eq!(below.index, 2);
        assert_eq!(below.edge, DropEdge::After);

        let above = drag.pointer_moved(Point::new(10.0, 50.0), &layout, doc.tree()).unwrap();
        assert_eq!(above.index, 1);
        assert_eq!(above.edge, DropEdge::Before);
    }

    #[test]
    fn test_outside_canvas_has_no_target() {
        let (doc, layout) = document();
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());
        assert!(drag.pointer_moved(Point::new(900.0, 20.0), &layout, doc.tree()).is_none());

        // empty canvas area drops at root level
        let root = drag.pointer_moved(Point::new(10.0, 700.0), &layout, doc.tree()).unwrap();
        assert_eq!(root.parent, None);
        assert_eq!(root.index, 1);
    }

    #[test]
    fn test_dragged_subtree_is_not_a_target() {
        let (mut doc, layout) = document();
        let col: ComponentId = "col".into();
        let inner = doc.insert_kind(ComponentKind::Row, Some(&col), 2).unwrap();

        let mut drag = DragCoordinator::new();
        drag.begin_move(&col, doc.tree()).unwrap();
        assert!(drag.hover(&col, DropEdge::Inside, doc.tree()).is_none());
        assert!(drag.hover(&inner, DropEdge::Inside, doc.tree()).is_none());
        assert!(drag.hover(&"a".into(), DropEdge::Before, doc.tree()).is_none());

        // pointer over the column only reaches the canvas
        let desc = drag.pointer_moved(Point::new(10.0, 20.0), &layout, doc.tree()).unwrap();
        assert_eq!(desc.parent, None);
    }

    #[test]
    fn test_move_within_parent_uses_detached_index() {
        let (mut doc, _) = document();
        let mut drag = DragCoordinator::new();
        drag.begin_move(&"a".into(), doc.tree()).unwrap();

        let desc = drag.hover(&"b".into(), DropEdge::After, doc.tree()).unwrap();
        assert_eq!(desc.index, 1);

        assert_eq!(drag.drop_current(&mut doc).unwrap(), DropOutcome::Moved("a".into()));
        assert_eq!(
            doc.tree().children(Some(&"col".into())).unwrap(),
            &[ComponentId::from("b"), ComponentId::from("a")]
        );
    }

    #[test]
    fn test_second_drop_is_ignored() {
        let (mut doc, _) = document();
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());
        drag.hover(&"a".into(), DropEdge::Before, doc.tree());

        assert!(matches!(drag.drop_current(&mut doc).unwrap(), DropOutcome::Inserted(_)));
        let version = doc.version;
        assert_eq!(drag.drop_current(&mut doc).unwrap(), DropOutcome::Ignored);
        assert_eq!(doc.version, version);
    }

    #[test]
    fn test_release_without_target_cancels() {
        let (mut doc, _) = document();
        let before = doc.tree().clone();
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());

        assert_eq!(drag.drop_current(&mut doc).unwrap(), DropOutcome::Cancelled);
        assert!(!drag.is_dragging());
        assert_eq!(doc.tree(), &before);
    }

    #[test]
    fn test_leaf_rejects_inside() {
        let (doc, _) = document();
        let mut drag = DragCoordinator::new();
        drag.begin_template(paragraph());
        assert!(drag.hover(&"a".into(), DropEdge::Inside, doc.tree()).is_none());
        assert!(drag.descriptor().is_none());
    }
}
