/*!
 * Per-node visibility decisions
 */

use crate::types::AccessibilityNode;

/// What the traversal does with a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Skip the node and its whole subtree
    Exclude,
    /// Skip the node's own text but visit its children
    PassThrough,
    /// Emit the node's text, then visit its children
    Extract,
}

impl Visibility {
    /// Decide how to treat a node
    ///
    /// Invisible nodes are excluded regardless of role. Descendants of an
    /// excluded node never reach this decision, so their own flags do not matter.
    pub fn of(node: &AccessibilityNode) -> Self {
        if node.is_invisible {
            Visibility::Exclude
        } else if node.role.is_pass_through() {
            Visibility::PassThrough
        } else {
            Visibility::Extract
        }
    }
}
