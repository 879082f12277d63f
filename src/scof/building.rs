//! Object model builder
//!
//! Walks a [`ParseTree`] and produces a [`Movement`]. The tree already
//! guarantees that every node sits under a parent that may own it, so the
//! builder only has to assemble values and check that track ids are unique.

use std::collections::HashMap;

use crate::scof::error::ScofError;
use crate::scof::model::{
    GrandStaff, Group, Movement, Part, Section, Staff, Track, TrackId,
};
use crate::scof::parser::{NodeId, ParseTree, Statement};

/// Build a movement from a parse tree
pub fn build_movement(tree: &ParseTree) -> Result<Movement, ScofError> {
    let mut builder = MovementBuilder {
        tree,
        seen: HashMap::new(),
    };
    let mut movement = Movement::new();

    for &root in tree.roots() {
        match &tree.node(root).statement {
            Statement::Part { .. } => movement.groups.push(Group::Part(builder.part(root)?)),
            Statement::Section { .. } => {
                movement.groups.push(Group::Section(builder.section(root)?))
            }
            Statement::Measure(measure) => movement.measures.push(measure.clone()),
            other => return Err(orphan(tree, root, other)),
        }
    }

    log::debug!(
        "built movement with {} group(s), {} track(s), {} measure(s)",
        movement.groups.len(),
        builder.seen.len(),
        movement.measures.len()
    );
    Ok(movement)
}

struct MovementBuilder<'t> {
    tree: &'t ParseTree,
    /// Track id -> line of its first declaration
    seen: HashMap<u32, usize>,
}

impl<'t> MovementBuilder<'t> {
    fn part(&mut self, id: NodeId) -> Result<Part, ScofError> {
        let tree = self.tree;
        let node = tree.node(id);
        let name = match &node.statement {
            Statement::Part { name } => name.clone(),
            other => return Err(self.misplaced(id, other)),
        };
        let mut part = Part::new(name);
        for &child in tree.children(id) {
            let staff = match &tree.node(child).statement {
                Statement::Track { .. } => Staff::Track(self.track(child)?),
                Statement::GrandStaff => Staff::GrandStaff(self.grand_staff(child)?),
                Statement::Section { .. } => Staff::Section(self.section(child)?),
                other => return Err(self.misplaced(child, other)),
            };
            part.staves.push(staff);
        }
        Ok(part)
    }

    fn section(&mut self, id: NodeId) -> Result<Section, ScofError> {
        let tree = self.tree;
        let name = match &tree.node(id).statement {
            Statement::Section { name } => name.clone(),
            other => return Err(self.misplaced(id, other)),
        };
        let mut section = Section::new(name);
        for &child in tree.children(id) {
            match &tree.node(child).statement {
                Statement::Condensed => section.condensed = true,
                Statement::Part { .. } => section.parts.push(self.part(child)?),
                other => return Err(self.misplaced(child, other)),
            }
        }
        Ok(section)
    }

    fn grand_staff(&mut self, id: NodeId) -> Result<GrandStaff, ScofError> {
        let tree = self.tree;
        let mut grand = GrandStaff::default();
        for &child in tree.children(id) {
            grand.tracks.push(self.track(child)?);
        }
        Ok(grand)
    }

    fn track(&mut self, id: NodeId) -> Result<Track, ScofError> {
        let tree = self.tree;
        let node = tree.node(id);
        match &node.statement {
            Statement::Track { id: track_id, label } => {
                if let Some(&first_line) = self.seen.get(track_id) {
                    return Err(ScofError::DuplicateTrackId {
                        line: node.line,
                        id: *track_id,
                        first_line,
                    });
                }
                self.seen.insert(*track_id, node.line);
                Ok(Track {
                    id: TrackId(*track_id),
                    label: label.clone(),
                })
            }
            other => Err(self.misplaced(id, other)),
        }
    }

    fn misplaced(&self, id: NodeId, statement: &Statement) -> ScofError {
        let node = self.tree.node(id);
        ScofError::InvalidNesting {
            line: node.line,
            keyword: statement.keyword().symbol().to_string(),
            parent: node
                .parent
                .map(|p| self.tree.node(p).keyword().symbol().to_string())
                .unwrap_or_else(|| "top level".to_string()),
        }
    }
}

fn orphan(tree: &ParseTree, id: NodeId, statement: &Statement) -> ScofError {
    ScofError::OrphanChild {
        line: tree.node(id).line,
        keyword: statement.keyword().symbol().to_string(),
        expected: statement.keyword().expected_parents().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scof::parser::parse;

    fn build(source: &str) -> Result<Movement, ScofError> {
        build_movement(&parse(source)?)
    }

    #[test]
    fn test_piano_example() {
        let movement = build("P Piano\n    T0 voice\n    G\n        T1 piano\n        T2 piano\n").unwrap();
        let expected = Movement::new().with_group(Group::Part(
            Part::new("Piano")
                .with_track(Track::new(0, "voice"))
                .with_grand_staff(GrandStaff::new(vec![
                    Track::new(1, "piano"),
                    Track::new(2, "piano"),
                ])),
        ));
        assert_eq!(movement, expected);
    }

    #[test]
    fn test_condensed_section() {
        let movement = build("S Brass\n    C\n    P Trumpet\n        T0 trumpet\n").unwrap();
        match &movement.groups[0] {
            Group::Section(section) => {
                assert_eq!(section.name.as_deref(), Some("Brass"));
                assert!(section.condensed);
                assert_eq!(section.parts[0].name, "Trumpet");
            }
            other => panic!("expected section, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_track_id_anywhere() {
        let err = build("P Piano\n    T3 left\nS\n    P Organ\n        G\n            T3 pedal\n").unwrap_err();
        match err {
            ScofError::DuplicateTrackId {
                line,
                id,
                first_line,
            } => {
                assert_eq!((line, id, first_line), (6, 3, 2));
            }
            other => panic!("expected duplicate track id, got {:?}", other),
        }
    }

    #[test]
    fn test_measures_are_flat_and_ordered() {
        let movement = build("M 3/4\nP Piano\n    T0 piano\nM\nM 90\n").unwrap();
        assert_eq!(movement.measures.len(), 3);
        assert_eq!(movement.measures[2].overrides.tempo, Some(90));
        assert_eq!(movement.groups.len(), 1);
    }
}
