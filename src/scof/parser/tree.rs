//! Indexed parse tree
//!
//! Nodes live in one arena and refer to each other by [`NodeId`]. The tree is
//! built from line records with an explicit stack of open nodes: a record at
//! depth d closes everything at depth d or deeper and becomes a child of the
//! node left at depth d - 1. Serializers and the builder walk the finished tree
//! without going back to the text.

use serde::Serialize;

use super::grammar::{Keyword, Statement};
use crate::scof::error::ScofError;
use crate::scof::lexer::LineRecord;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// 1-based source line
    pub line: usize,
    pub depth: usize,
    pub statement: Statement,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn keyword(&self) -> Keyword {
        self.statement.keyword()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl ParseTree {
    /// Build a tree from line records, failing on the first bad line
    pub fn from_records<'a, I>(records: I) -> Result<ParseTree, ScofError>
    where
        I: IntoIterator<Item = Result<LineRecord<'a>, ScofError>>,
    {
        let mut tree = ParseTree::default();
        let mut open: Vec<NodeId> = Vec::new();

        for record in records {
            let record = record?;
            if record.depth > open.len() {
                return Err(ScofError::UnexpectedIndent {
                    line: record.line,
                    depth: record.depth,
                    max: open.len(),
                });
            }
            open.truncate(record.depth);

            let statement = Statement::interpret(&record)?;
            let keyword = statement.keyword();
            let parent = open.last().copied();
            let parent_keyword = parent.map(|id| tree.nodes[id].keyword());

            if !keyword.allowed_under(parent_keyword) {
                return Err(match parent_keyword {
                    None => ScofError::OrphanChild {
                        line: record.line,
                        keyword: record.keyword.to_string(),
                        expected: keyword.expected_parents().to_string(),
                    },
                    Some(parent_keyword) => ScofError::InvalidNesting {
                        line: record.line,
                        keyword: record.keyword.to_string(),
                        parent: parent_keyword.symbol().to_string(),
                    },
                });
            }

            let id = tree.nodes.len();
            tree.nodes.push(Node {
                line: record.line,
                depth: record.depth,
                statement,
                parent,
                children: Vec::new(),
            });
            match parent {
                Some(parent) => tree.nodes[parent].children.push(id),
                None => tree.roots.push(id),
            }
            open.push(id);
        }

        Ok(tree)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Top-level nodes in source order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// All nodes in source order, which is also depth-first pre-order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scof::lexer::Tokenizer;

    fn parse(source: &str) -> Result<ParseTree, ScofError> {
        ParseTree::from_records(Tokenizer::new(source))
    }

    #[test]
    fn test_builds_nested_tree() {
        let tree = parse("P Piano\n    T0 voice\n    G\n        T1 piano\n        T2 piano\nM\n").unwrap();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.roots(), &[0, 5]);
        assert_eq!(tree.children(0), &[1, 2]);
        assert_eq!(tree.children(2), &[3, 4]);
        assert_eq!(tree.node(4).parent, Some(2));
        assert_eq!(tree.node(5).keyword(), Keyword::Measure);
    }

    #[test]
    fn test_children_are_one_level_deeper() {
        let tree = parse(
            "S Strings\n    C\n    P Violin\n        T0 violin\n    P Viola\n        T1 viola\nP Piano\n    T2 piano\n",
        )
        .unwrap();
        for node in tree.nodes() {
            for &child in &node.children {
                assert_eq!(tree.node(child).depth, node.depth + 1);
            }
        }
    }

    #[test]
    fn test_dedent_closes_scopes() {
        let tree = parse("P A\n    G\n        T0 a\nP B\n    T1 b\n").unwrap();
        assert_eq!(tree.roots(), &[0, 3]);
        assert_eq!(tree.children(3), &[4]);
    }

    #[test]
    fn test_orphan_track() {
        assert!(matches!(
            parse("T0 voice\n"),
            Err(ScofError::OrphanChild { line: 1, .. })
        ));
        assert!(matches!(
            parse("P Piano\nG\n"),
            Err(ScofError::OrphanChild { line: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_nesting() {
        assert!(matches!(
            parse("S\n    T0 voice\n"),
            Err(ScofError::InvalidNesting { line: 2, .. })
        ));
        assert!(matches!(
            parse("M\n    P Piano\n"),
            Err(ScofError::InvalidNesting { line: 2, .. })
        ));
    }

    #[test]
    fn test_unexpected_indent() {
        assert!(matches!(
            parse("P Piano\n        T0 voice\n"),
            Err(ScofError::UnexpectedIndent { line: 2, depth: 2, max: 1 })
        ));
        assert!(matches!(
            parse("    P Piano\n"),
            Err(ScofError::UnexpectedIndent { line: 1, .. })
        ));
    }

    #[test]
    fn test_comments_and_blank_lines_do_not_break_nesting() {
        let tree = parse("P Piano\n\n    // the voice\n    T0 voice // Add voice track.\n").unwrap();
        assert_eq!(tree.children(0), &[1]);
    }
}
