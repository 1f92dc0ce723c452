//! Append-only tree of executed data actions.
//!
//! The structure supports branching (`children` is a list), but appending
//! always extends the current node and loading follows first children only.
//! Keeping the tree shape preserves room for undo/redo branches later.

use serde::{Deserialize, Serialize};

use crate::action::DataAction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryNode {
    pub action: DataAction,
    pub children: Vec<HistoryNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionHistory {
    root: Option<HistoryNode>,
    /// Path of child indices from the root to the current node.
    cursor: Vec<usize>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&HistoryNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Record `action` as a child of the current node and advance onto it.
    pub fn append(&mut self, action: DataAction) {
        let node = HistoryNode {
            action,
            children: Vec::new(),
        };
        match &mut self.root {
            None => {
                self.root = Some(node);
                self.cursor.clear();
            }
            Some(root) => {
                let mut cur = root;
                for &i in &self.cursor {
                    cur = &mut cur.children[i];
                }
                cur.children.push(node);
                self.cursor.push(cur.children.len() - 1);
            }
        }
    }

    /// The linear reading of the tree: root, then first children all the way
    /// down. This is the replay order on load; branches beyond the first are
    /// ignored.
    pub fn linear_actions(&self) -> Vec<&DataAction> {
        let mut out = Vec::new();
        let mut cur = self.root.as_ref();
        while let Some(node) = cur {
            out.push(&node.action);
            cur = node.children.first();
        }
        out
    }
}
