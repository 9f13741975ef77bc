/*!
 * Text extraction from an indexed accessibility snapshot
 *
 * The tree is walked depth-first with an explicit work stack, so corrupted or
 * adversarial snapshots cannot exhaust the call stack. Every node is entered
 * at most once; a child id that does not resolve, or that was already
 * scheduled, aborts the walk with `MalformedTree`. Subtrees under invisible
 * nodes emit nothing but are still walked for structure.
 */

use log::{debug, warn};

use crate::error::Result;
use crate::filter::Visibility;
use crate::index::NodeIndex;
use crate::types::AccessibilityNode;

/// Paragraph break appended around block-level content
const PARAGRAPH_BREAK: &str = "\n\n";

/// Counters collected during one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Nodes entered by the traversal
    pub nodes_visited: usize,
    /// Invisible nodes whose subtree was skipped
    pub subtrees_excluded: usize,
    /// Nodes whose children were visited without emitting their own text
    pub nodes_passed_through: usize,
    /// Nodes handled as extractable
    pub nodes_extracted: usize,
}

/// Raw text produced by a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Accumulated text with paragraph breaks
    pub text: String,
    /// Traversal counters
    pub stats: ExtractionStats,
}

/// Pending work on the traversal stack
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Decide on a node and schedule its children
    Enter(usize),
    /// Close a block-level node after its children
    Leave(usize),
    /// Walk a node inside an excluded subtree without emitting anything
    Check(usize),
}

/// Walks a snapshot and accumulates its visible text
pub struct TextExtractor<'i, 'a> {
    index: &'i NodeIndex<'a>,
    scheduled: Vec<bool>,
    stack: Vec<Step>,
    output: String,
    stats: ExtractionStats,
}

impl<'i, 'a> TextExtractor<'i, 'a> {
    /// Create an extractor over an index
    pub fn new(index: &'i NodeIndex<'a>) -> Self {
        Self {
            index,
            scheduled: vec![false; index.len()],
            stack: Vec::new(),
            output: String::new(),
            stats: ExtractionStats::default(),
        }
    }

    /// Run the traversal from the root
    pub fn extract(mut self) -> Result<Extraction> {
        let root = self.index.root();
        self.scheduled[root] = true;
        self.stack.push(Step::Enter(root));

        while let Some(step) = self.stack.pop() {
            match step {
                Step::Enter(pos) => self.enter(pos)?,
                Step::Leave(_) => self.paragraph_break(),
                Step::Check(pos) => self.check(pos)?,
            }
        }

        debug!(
            "Extracted {} chars from {} nodes ({} excluded, {} passed through)",
            self.output.len(),
            self.stats.nodes_visited,
            self.stats.subtrees_excluded,
            self.stats.nodes_passed_through
        );

        Ok(Extraction {
            text: self.output,
            stats: self.stats,
        })
    }

    fn enter(&mut self, pos: usize) -> Result<()> {
        let node = self.index.node(pos);
        self.stats.nodes_visited += 1;

        match Visibility::of(node) {
            Visibility::Exclude => {
                self.stats.subtrees_excluded += 1;
                self.schedule_children(node, Step::Check)?;
            }
            Visibility::PassThrough => {
                self.stats.nodes_passed_through += 1;
                self.schedule_children(node, Step::Enter)?;
            }
            Visibility::Extract => {
                self.stats.nodes_extracted += 1;
                let block = node.role.is_block_level();
                if block {
                    self.paragraph_break();
                }
                if let Some(text) = node.text() {
                    self.output.push_str(text);
                    self.output.push(' ');
                }
                if block {
                    self.stack.push(Step::Leave(pos));
                }
                self.schedule_children(node, Step::Enter)?;
            }
        }

        Ok(())
    }

    /// Structure-only visit: resolve and schedule children, emit nothing
    fn check(&mut self, pos: usize) -> Result<()> {
        let node = self.index.node(pos);
        self.schedule_children(node, Step::Check)
    }

    /// Push children so that they pop in stored order
    fn schedule_children(
        &mut self,
        node: &AccessibilityNode,
        step: fn(usize) -> Step,
    ) -> Result<()> {
        let first = self.stack.len();

        for &child_id in &node.child_ids {
            let Some(child) = self.index.position(child_id) else {
                warn!("Node {} references unknown child {}", node.id, child_id);
                crate::bail!(MalformedTree, "node {} references unknown child {}", node.id, child_id);
            };
            if self.scheduled[child] {
                warn!("Node {} revisits child {}", node.id, child_id);
                crate::bail!(MalformedTree, "node {} revisits child {}", node.id, child_id);
            }
            self.scheduled[child] = true;
            self.stack.push(step(child));
        }

        self.stack[first..].reverse();
        Ok(())
    }

    /// Append a paragraph break unless the buffer is empty or already ends a line
    fn paragraph_break(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push_str(PARAGRAPH_BREAK);
        }
    }
}

/// Extract the raw text of an indexed snapshot
pub fn extract_text(index: &NodeIndex<'_>) -> Result<Extraction> {
    TextExtractor::new(index).extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageDumpError;
    use crate::types::{Role, Snapshot};
    use pretty_assertions::assert_eq;

    fn node(id: i32, role: Role) -> AccessibilityNode {
        AccessibilityNode::new(id, role)
    }

    fn run(snapshot: &Snapshot) -> Result<Extraction> {
        let index = NodeIndex::build(snapshot)?;
        extract_text(&index)
    }

    #[test]
    fn test_paragraph_under_container() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2]),
                node(2, Role::Paragraph).with_name("Hello world"),
            ],
        );
        assert_eq!(run(&snapshot).unwrap().text, "Hello world \n\n");
    }

    #[test]
    fn test_script_text_is_skipped() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2, 3]),
                node(2, Role::Script).with_name("var x=1"),
                node(3, Role::Paragraph).with_name("Real text"),
            ],
        );
        assert_eq!(run(&snapshot).unwrap().text, "Real text \n\n");
    }

    #[test]
    fn test_invisible_subtree_is_skipped() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2]),
                node(2, Role::Section).with_name("hidden").invisible().with_children([3]),
                node(3, Role::Paragraph).with_name("visible child"),
            ],
        );
        let extraction = run(&snapshot).unwrap();
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.stats.subtrees_excluded, 1);
        assert_eq!(extraction.stats.nodes_visited, 2);
    }

    #[test]
    fn test_back_edge_under_invisible_node_is_malformed() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::Paragraph).with_name("x").with_children([2]),
                node(2, Role::Section).invisible().with_children([1]),
            ],
        );
        let err = run(&snapshot).unwrap_err();
        assert_eq!(err.to_string(), "Malformed tree: node 2 revisits child 1");
    }

    #[test]
    fn test_dangling_child_deep_in_excluded_subtree_is_malformed() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2, 4]),
                node(2, Role::Article).invisible().with_children([3]),
                node(3, Role::Paragraph).with_name("hidden").with_children([99]),
                node(4, Role::Paragraph).with_name("shown"),
            ],
        );
        let err = run(&snapshot).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed tree: node 3 references unknown child 99"
        );
    }

    #[test]
    fn test_well_formed_excluded_subtree_counts_once() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2, 4]),
                node(2, Role::Article).invisible().with_children([3]),
                node(3, Role::Paragraph).with_name("hidden"),
                node(4, Role::Paragraph).with_name("shown"),
            ],
        );
        let extraction = run(&snapshot).unwrap();
        assert_eq!(extraction.text, "shown \n\n");
        assert_eq!(extraction.stats.subtrees_excluded, 1);
        assert_eq!(extraction.stats.nodes_visited, 3);
    }

    #[test]
    fn test_pass_through_children_are_emitted() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::None).with_name("root name").with_children([2]),
                node(2, Role::Style).with_name("p { color: red }").with_children([3]),
                node(3, Role::StaticText).with_name("styled"),
            ],
        );
        let extraction = run(&snapshot).unwrap();
        assert_eq!(extraction.text, "styled ");
        assert_eq!(extraction.stats.nodes_passed_through, 2);
        assert_eq!(extraction.stats.nodes_extracted, 1);
    }

    #[test]
    fn test_block_breaks_surround_inline_text() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::RootWebArea).with_children([2, 3, 5]),
                node(2, Role::StaticText).with_name("Intro"),
                node(3, Role::Heading).with_name("Title").with_children([4]),
                node(4, Role::StaticText).with_name("Title text"),
                node(5, Role::Link).with_name("more"),
            ],
        );
        assert_eq!(
            run(&snapshot).unwrap().text,
            "Intro \n\nTitle Title text \n\nmore "
        );
    }

    #[test]
    fn test_nested_blocks_do_not_stack_breaks() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::Article).with_name("Story").with_children([2, 3]),
                node(2, Role::Paragraph).with_name("First"),
                node(3, Role::ListItem).with_children([4]),
                node(4, Role::Paragraph).with_name("Second"),
            ],
        );
        assert_eq!(
            run(&snapshot).unwrap().text,
            "Story \n\nFirst \n\nSecond \n\n"
        );
    }

    #[test]
    fn test_trailing_space_is_kept_before_break() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::Section).with_children([2, 3]),
                node(2, Role::StaticText).with_name("text"),
                node(3, Role::Paragraph).with_name("next"),
            ],
        );
        let text = run(&snapshot).unwrap().text;
        assert_eq!(text, "text \n\nnext \n\n");
        assert!(text.starts_with("text \n"));
    }

    #[test]
    fn test_child_order_is_preserved() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(4, Role::StaticText).with_name("c"),
                node(3, Role::StaticText).with_name("b"),
                node(2, Role::StaticText).with_name("a"),
                node(1, Role::GenericContainer).with_children([2, 3, 4]),
            ],
        );
        assert_eq!(run(&snapshot).unwrap().text, "a b c ");
    }

    #[test]
    fn test_cycle_is_malformed() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2]),
                node(2, Role::Paragraph).with_name("loop").with_children([1]),
            ],
        );
        assert!(matches!(run(&snapshot), Err(PageDumpError::MalformedTree(_))));
    }

    #[test]
    fn test_self_reference_is_malformed() {
        let snapshot = Snapshot::new(1, vec![node(1, Role::Heading).with_children([1])]);
        assert!(matches!(run(&snapshot), Err(PageDumpError::MalformedTree(_))));
    }

    #[test]
    fn test_shared_child_is_malformed() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2, 3]),
                node(2, Role::Paragraph).with_children([4]),
                node(3, Role::Paragraph).with_children([4]),
                node(4, Role::StaticText).with_name("shared"),
            ],
        );
        assert!(matches!(run(&snapshot), Err(PageDumpError::MalformedTree(_))));
    }

    #[test]
    fn test_dangling_child_is_malformed() {
        let snapshot = Snapshot::new(
            1,
            vec![
                node(1, Role::GenericContainer).with_children([2, 7]),
                node(2, Role::Paragraph).with_name("ok"),
            ],
        );
        let err = run(&snapshot).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed tree: node 1 references unknown child 7"
        );
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 200_000;
        let nodes = (0..depth)
            .map(|id| {
                let n = node(id, Role::Blockquote).with_name("q");
                if id + 1 < depth {
                    n.with_children([id + 1])
                } else {
                    n
                }
            })
            .collect();
        let extraction = run(&Snapshot::new(0, nodes)).unwrap();
        assert_eq!(extraction.stats.nodes_visited, depth as usize);
        assert!(extraction.text.ends_with("q \n\n"));
    }
}
