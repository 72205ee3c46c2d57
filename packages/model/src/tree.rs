//! # Component Tree Store
//!
//! Arena of builder components keyed by id, with explicit child-id lists.
//!
//! Every structural change goes through one of the operations below. Each
//! operation validates completely before touching the arena, so a returned
//! error means the tree is exactly as it was before the call. Containment
//! (`children`) and the back-reference (`parent_id`) are always updated
//! together.
//!
//! The root collection is addressed with `parent = None`.

use crate::component::{BuilderComponent, ComponentId};
use crate::error::{TreeError, TreeResult};
use crate::id_generator::IdGenerator;
use crate::patch::ComponentPatch;
use crate::template::ComponentTemplate;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentTree {
    nodes: HashMap<ComponentId, BuilderComponent>,
    roots: Vec<ComponentId>,
    /// Ids taken out by `remove`; they never come back
    retired: HashSet<ComponentId>,
}

/// What a `remove` took out of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub id: ComponentId,
    pub parent: Option<ComponentId>,
    pub index: usize,
    /// Every removed id, the root of the subtree first
    pub removed: Vec<ComponentId>,
    /// Media URLs referenced anywhere in the removed subtree
    pub media_urls: Vec<String>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Ids of the root collection, in order
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    /// True once `remove` has taken `id` out of the tree
    pub fn is_retired(&self, id: &ComponentId) -> bool {
        self.retired.contains(id)
    }

    pub fn get(&self, id: &ComponentId) -> Option<&BuilderComponent> {
        self.nodes.get(id)
    }

    pub fn query(&self, id: &ComponentId) -> TreeResult<&BuilderComponent> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }

    /// Children of `parent`, or the root collection for `None`
    pub fn children(&self, parent: Option<&ComponentId>) -> TreeResult<&[ComponentId]> {
        match parent {
            None => Ok(&self.roots),
            Some(id) => Ok(self.query(id)?.children()),
        }
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: &ComponentId) -> TreeResult<Vec<ComponentId>> {
        let mut result = Vec::new();
        let mut current = self.query(id)?;
        while let Some(parent_id) = current.parent_id() {
            result.push(parent_id.clone());
            current = self.query(parent_id)?;
        }
        Ok(result)
    }

    /// Other members of `id`'s children list, in order
    pub fn siblings(&self, id: &ComponentId) -> TreeResult<Vec<ComponentId>> {
        let node = self.query(id)?;
        let list = self.children(node.parent_id())?;
        Ok(list.iter().filter(|c| *c != id).cloned().collect())
    }

    /// Parent and index of `id` within its children list
    pub fn position(&self, id: &ComponentId) -> TreeResult<(Option<ComponentId>, usize)> {
        let node = self.query(id)?;
        let parent = node.parent_id().cloned();
        let index = self
            .children(parent.as_ref())?
            .iter()
            .position(|c| c == id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        Ok((parent, index))
    }

    /// Descendants of `id` in pre-order, excluding `id`
    pub fn descendants(&self, id: &ComponentId) -> TreeResult<Vec<ComponentId>> {
        let node = self.query(id)?;
        let mut out = Vec::new();
        let mut stack: Vec<&ComponentId> = node.children().iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current.clone());
            if let Some(child) = self.nodes.get(current) {
                stack.extend(child.children().iter().rev());
            }
        }
        Ok(out)
    }

    /// True when `candidate` is `ancestor` or lies inside its subtree
    pub fn is_within(&self, candidate: &ComponentId, ancestor: &ComponentId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent_id());
        }
        false
    }

    /// All nodes in document order (pre-order over the root collection)
    pub fn iter(&self) -> impl Iterator<Item = &BuilderComponent> {
        let mut stack: Vec<&ComponentId> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.nodes.get(id)?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }

    /// Insert a detached node as a child of `parent` at `index`
    pub fn insert(
        &mut self,
        mut node: BuilderComponent,
        parent: Option<&ComponentId>,
        index: usize,
    ) -> TreeResult<ComponentId> {
        let len = self.target_len(parent)?;
        if index > len {
            return Err(TreeError::OutOfRange { index, len });
        }
        self.check_unused(&node.id)?;
        if !node.children.is_empty() {
            return Err(TreeError::invalid_target(format!(
                "component {} carries children; insert it from a template",
                node.id
            )));
        }

        node.drop_empty_entries();
        node.parent_id = parent.cloned();
        let id = node.id.clone();
        debug!(component = %id, kind = %node.kind, parent = ?parent, index, "insert");
        self.children_mut(parent).insert(index, id.clone());
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Instantiate `template` with fresh ids and insert the whole subtree
    pub fn insert_template(
        &mut self,
        template: &ComponentTemplate,
        parent: Option<&ComponentId>,
        index: usize,
        ids: &mut IdGenerator,
    ) -> TreeResult<ComponentId> {
        template.validate()?;
        let len = self.target_len(parent)?;
        if index > len {
            return Err(TreeError::OutOfRange { index, len });
        }

        let mut nodes = template.instantiate(ids);
        for node in &nodes {
            self.check_unused(&node.id)?;
        }

        nodes[0].parent_id = parent.cloned();
        let root_id = nodes[0].id.clone();
        debug!(component = %root_id, nodes = nodes.len(), parent = ?parent, index, "insert template");
        self.children_mut(parent).insert(index, root_id.clone());
        for node in nodes {
            self.nodes.insert(node.id.clone(), node);
        }
        Ok(root_id)
    }

    /// Relocate `id` under `parent` at `index` in one step.
    ///
    /// `index` addresses the target's children list with `id` already
    /// detached, so it ranges over `0..=len` of that list.
    pub fn move_node(
        &mut self,
        id: &ComponentId,
        parent: Option<&ComponentId>,
        index: usize,
    ) -> TreeResult<()> {
        let node = self.query(id)?;
        let old_parent = node.parent_id().cloned();

        if let Some(target) = parent {
            if self.is_within(target, id) {
                return Err(TreeError::CyclicMove {
                    node: id.clone(),
                    target: target.clone(),
                });
            }
        }

        let mut len = self.target_len(parent)?;
        if old_parent.as_ref() == parent {
            len -= 1;
        }
        if index > len {
            return Err(TreeError::OutOfRange { index, len });
        }

        let (_, old_index) = self.position(id)?;
        debug!(component = %id, from = ?old_parent, to = ?parent, index, "move");

        self.children_mut(old_parent.as_ref()).remove(old_index);
        self.children_mut(parent).insert(index, id.clone());
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent_id = parent.cloned();
        }
        Ok(())
    }

    /// Delete `id` and its whole subtree
    pub fn remove(&mut self, id: &ComponentId) -> TreeResult<Removal> {
        let (parent, index) = self.position(id)?;
        let mut removed = vec![id.clone()];
        removed.extend(self.descendants(id)?);

        self.children_mut(parent.as_ref()).remove(index);

        let mut media_urls = Vec::new();
        for gone in &removed {
            if let Some(node) = self.nodes.remove(gone) {
                media_urls.extend(node.media_urls().into_iter().map(str::to_string));
            }
            self.retired.insert(gone.clone());
        }
        debug!(component = %id, removed = removed.len(), "remove");

        Ok(Removal {
            id: id.clone(),
            parent,
            index,
            removed,
            media_urls,
        })
    }

    /// Shallow-merge `patch` into the node's maps
    pub fn update(&mut self, id: &ComponentId, patch: &ComponentPatch) -> TreeResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        patch.apply_to(node);
        Ok(())
    }

    /// Reject ids that are live or were retired by `remove`
    fn check_unused(&self, id: &ComponentId) -> TreeResult<()> {
        if self.nodes.contains_key(id) {
            return Err(TreeError::invalid_target(format!(
                "component {} is already in the tree",
                id
            )));
        }
        if self.retired.contains(id) {
            return Err(TreeError::invalid_target(format!(
                "component {} was removed and cannot be reused",
                id
            )));
        }
        Ok(())
    }

    /// Child count of a valid drop/insert target
    fn target_len(&self, parent: Option<&ComponentId>) -> TreeResult<usize> {
        match parent {
            None => Ok(self.roots.len()),
            Some(id) => {
                let node = self
                    .nodes
                    .get(id)
                    .ok_or_else(|| TreeError::missing_target(id))?;
                if !node.is_container() {
                    return Err(TreeError::leaf_target(id, node.kind));
                }
                Ok(node.children.len())
            }
        }
    }

    /// Only called after `target_len` or `position` validated `parent`
    fn children_mut(&mut self, parent: Option<&ComponentId>) -> &mut Vec<ComponentId> {
        match parent.and_then(|id| self.nodes.get_mut(id)) {
            Some(node) => &mut node.children,
            None => &mut self.roots,
        }
    }

    /// Rebuild from raw parts. Used by snapshot loading, which validates
    /// the result.
    pub(crate) fn from_parts(
        nodes: HashMap<ComponentId, BuilderComponent>,
        roots: Vec<ComponentId>,
    ) -> Self {
        Self {
            nodes,
            roots,
            retired: HashSet::new(),
        }
    }

    /// Check every structural invariant; empty means well-formed
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen: HashSet<&ComponentId> = HashSet::new();

        for (key, node) in &self.nodes {
            if key != &node.id {
                violations.push(Violation::KeyMismatch(key.clone()));
            }
            if !node.is_container() && !node.children.is_empty() {
                violations.push(Violation::LeafWithChildren(node.id.clone()));
            }
            if node.styles.values().any(String::is_empty)
                || node.html_attributes.values().any(String::is_empty)
                || node.specific_attributes.values().any(|v| v.is_null())
            {
                violations.push(Violation::EmptyEntry(node.id.clone()));
            }
        }

        let lists = std::iter::once((None, &self.roots)).chain(
            self.nodes
                .values()
                .map(|node| (Some(&node.id), &node.children)),
        );
        for (owner, list) in lists {
            for child in list {
                match self.nodes.get(child) {
                    None => violations.push(Violation::Dangling(child.clone())),
                    Some(node) => {
                        if node.parent_id() != owner {
                            violations.push(Violation::ParentMismatch(child.clone()));
                        }
                    }
                }
                if !seen.insert(child) {
                    violations.push(Violation::Aliased(child.clone()));
                }
            }
        }

        // Anything not reachable from the root collection is orphaned or
        // sits on a cycle.
        let mut reachable: HashSet<&ComponentId> = HashSet::new();
        let mut stack: Vec<&ComponentId> = self.roots.iter().collect();
        while let Some(id) = stack.pop() {
            if reachable.insert(id) {
                if let Some(node) = self.nodes.get(id) {
                    stack.extend(node.children.iter());
                }
            }
        }
        let mut orphans: Vec<&ComponentId> = self
            .nodes
            .keys()
            .filter(|id| !reachable.contains(id))
            .collect();
        orphans.sort();
        violations.extend(orphans.into_iter().cloned().map(Violation::Orphan));

        violations
    }

    pub fn is_well_formed(&self) -> bool {
        self.validate().is_empty()
    }
}

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("node stored under a different key: {0}")]
    KeyMismatch(ComponentId),
    #[error("leaf kind has children: {0}")]
    LeafWithChildren(ComponentId),
    #[error("sparse map holds an empty entry: {0}")]
    EmptyEntry(ComponentId),
    #[error("children list references a missing node: {0}")]
    Dangling(ComponentId),
    #[error("parentId disagrees with containment: {0}")]
    ParentMismatch(ComponentId),
    #[error("node appears in more than one position: {0}")]
    Aliased(ComponentId),
    #[error("node unreachable from the root collection: {0}")]
    Orphan(ComponentId),
}
