//! # Document Mutations
//!
//! Serializable structural operations on a component tree. Every mutation
//! maps onto exactly one store operation, so a failed mutation leaves the
//! tree untouched.
//!
//! ## Mutation Semantics
//!
//! ### InsertTemplate / Insert
//! - New ids come from the document's generator, never reused
//! - Leaf targets are rejected
//!
//! ### Move
//! - Atomic relocation; the node is never observed in two places
//! - `index` addresses the target list with the node already detached
//! - Fails if it would nest a node under itself
//!
//! ### Remove
//! - Removes the node and all descendants
//!
//! ### Update
//! - Shallow merge; `null` resets a key to its inherited value

use pagecraft_model::{
    BuilderComponent, ComponentId, ComponentPatch, ComponentTemplate, ComponentTree, IdGenerator,
    Removal, TreeResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mutation {
    /// Instantiate a palette template with fresh ids
    #[serde(rename = "insertTemplate", rename_all = "camelCase")]
    InsertTemplate {
        parent_id: Option<ComponentId>,
        index: usize,
        template: ComponentTemplate,
    },

    /// Insert a single detached node that already has an id
    #[serde(rename = "insert", rename_all = "camelCase")]
    Insert {
        parent_id: Option<ComponentId>,
        index: usize,
        node: BuilderComponent,
    },

    #[serde(rename = "move", rename_all = "camelCase")]
    Move {
        node_id: ComponentId,
        new_parent_id: Option<ComponentId>,
        index: usize,
    },

    #[serde(rename = "remove", rename_all = "camelCase")]
    Remove { node_id: ComponentId },

    #[serde(rename = "update", rename_all = "camelCase")]
    Update {
        node_id: ComponentId,
        patch: ComponentPatch,
    },
}

/// What a successful mutation changed
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Inserted {
        id: ComponentId,
        parent: Option<ComponentId>,
        index: usize,
    },
    Moved {
        id: ComponentId,
        from: (Option<ComponentId>, usize),
        to: (Option<ComponentId>, usize),
    },
    Removed(Removal),
    Updated {
        id: ComponentId,
    },
}

impl Change {
    /// Id of the node the change is about
    pub fn subject(&self) -> &ComponentId {
        match self {
            Change::Inserted { id, .. } => id,
            Change::Moved { id, .. } => id,
            Change::Removed(removal) => &removal.id,
            Change::Updated { id } => id,
        }
    }
}

impl Mutation {
    pub fn remove(node_id: impl Into<ComponentId>) -> Self {
        Mutation::Remove {
            node_id: node_id.into(),
        }
    }

    pub fn update(node_id: impl Into<ComponentId>, patch: ComponentPatch) -> Self {
        Mutation::Update {
            node_id: node_id.into(),
            patch,
        }
    }

    /// Apply to `tree`, drawing new ids from `ids`
    pub fn apply(&self, tree: &mut ComponentTree, ids: &mut IdGenerator) -> TreeResult<Change> {
        match self {
            Mutation::InsertTemplate {
                parent_id,
                index,
                template,
            } => {
                let id = tree.insert_template(template, parent_id.as_ref(), *index, ids)?;
                Ok(Change::Inserted {
                    id,
                    parent: parent_id.clone(),
                    index: *index,
                })
            }

            Mutation::Insert {
                parent_id,
                index,
                node,
            } => {
                let id = tree.insert(node.clone(), parent_id.as_ref(), *index)?;
                ids.observe([&id]);
                Ok(Change::Inserted {
                    id,
                    parent: parent_id.clone(),
                    index: *index,
                })
            }

            Mutation::Move {
                node_id,
                new_parent_id,
                index,
            } => {
                let from = tree.position(node_id)?;
                tree.move_node(node_id, new_parent_id.as_ref(), *index)?;
                Ok(Change::Moved {
                    id: node_id.clone(),
                    from,
                    to: (new_parent_id.clone(), *index),
                })
            }

            Mutation::Remove { node_id } => Ok(Change::Removed(tree.remove(node_id)?)),

            Mutation::Update { node_id, patch } => {
                tree.update(node_id, patch)?;
                Ok(Change::Updated {
                    id: node_id.clone(),
                })
            }
        }
    }
}
