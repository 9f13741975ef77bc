/*!
 * Id lookup over a snapshot's node collection
 */

use std::collections::HashMap;

use log::{debug, error};

use crate::error::{PageDumpError, Result};
use crate::types::{AccessibilityNode, NodeId, Snapshot};

/// Arena view of a snapshot: nodes addressed by position, ids resolved in O(1)
#[derive(Debug)]
pub struct NodeIndex<'a> {
    nodes: &'a [AccessibilityNode],
    positions: HashMap<NodeId, usize>,
    root: usize,
}

impl<'a> NodeIndex<'a> {
    /// Build the index for a snapshot
    ///
    /// Fails with [`PageDumpError::MissingRoot`] when the root id has no node,
    /// and with [`PageDumpError::MalformedTree`] when an id appears twice.
    pub fn build(snapshot: &'a Snapshot) -> Result<Self> {
        let nodes = snapshot.nodes.as_slice();
        let mut positions = HashMap::with_capacity(nodes.len());
        let mut duplicate = None;

        for (pos, node) in nodes.iter().enumerate() {
            if positions.insert(node.id, pos).is_some() && duplicate.is_none() {
                duplicate = Some(node.id);
            }
        }

        let Some(&root) = positions.get(&snapshot.root_id) else {
            error!("Root node {} not found in snapshot", snapshot.root_id);
            return Err(PageDumpError::MissingRoot(snapshot.root_id));
        };

        if let Some(id) = duplicate {
            crate::bail!(MalformedTree, "node id {} appears more than once", id);
        }

        debug!("Indexed {} nodes, root {}", nodes.len(), snapshot.root_id);

        Ok(Self {
            nodes,
            positions,
            root,
        })
    }

    /// Position of the root node
    pub fn root(&self) -> usize {
        self.root
    }

    /// Resolve an id to its arena position
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Node at an arena position
    pub fn node(&self, pos: usize) -> &'a AccessibilityNode {
        &self.nodes[pos]
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
