//! Treeviz formatter for parse trees

use crate::scof::parser::{NodeId, ParseTree, Statement};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(tree: &ParseTree) -> String {
    let mut result = String::new();
    append_children(&mut result, tree, tree.roots(), "");
    result
}

fn display_label(statement: &Statement) -> (&'static str, String) {
    match statement {
        Statement::Part { name } => ("Part", truncate(name, 30)),
        Statement::Section { name } => (
            "Section",
            truncate(name.as_deref().unwrap_or("(unnamed)"), 30),
        ),
        Statement::Condensed => ("Condensed", String::new()),
        Statement::GrandStaff => ("GrandStaff", String::new()),
        Statement::Track { id, label } => ("Track", format!("T{} {}", id, truncate(label, 30))),
        Statement::Measure(measure) => {
            let overrides = &measure.overrides;
            let mut parts = Vec::new();
            if let Some(key) = overrides.key {
                parts.push(key.to_string());
            }
            if let Some(time) = overrides.time {
                parts.push(time.to_string());
            }
            if let Some(tempo) = overrides.tempo {
                parts.push(format!("{} bpm", tempo));
            }
            if let Some(swing) = overrides.swing {
                parts.push(format!("{}% swing", swing));
            }
            if let Some(instruction) = &overrides.instruction {
                parts.push(format!("\"{}\"", truncate(instruction, 30)));
            }
            parts.extend(measure.repeats.iter().map(ToString::to_string));
            ("Measure", parts.join(" "))
        }
    }
}

fn append_node(result: &mut String, tree: &ParseTree, id: NodeId, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let (node_type, label) = display_label(&tree.node(id).statement);

    if label.is_empty() {
        result.push_str(&format!("{}{} {}\n", prefix, connector, node_type));
    } else {
        result.push_str(&format!("{}{} {}: {}\n", prefix, connector, node_type, label));
    }

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, tree, tree.children(id), &new_prefix);
}

fn append_children(result: &mut String, tree: &ParseTree, children: &[NodeId], prefix: &str) {
    for (i, &child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, tree, child, prefix, is_last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scof::parser::parse;

    #[test]
    fn test_treeviz_output() {
        let tree = parse("P Piano\n    T0 voice\n    G\n        T1 piano\n        T2 piano\nM C# 15/16 160 \"Aggressively\"\n").unwrap();
        insta::assert_snapshot!(to_treeviz_str(&tree), @r###"
        ├─ Part: Piano
        │ ├─ Track: T0 voice
        │ └─ GrandStaff
        │   ├─ Track: T1 piano
        │   └─ Track: T2 piano
        └─ Measure: C# 15/16 160 bpm "Aggressively"
        "###);
    }
}
