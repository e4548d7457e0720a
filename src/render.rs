//! Plain-text and Graphviz views of a built graph.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::builder::SchemaGraph;
use crate::graph::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Dot,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "dot" => Some(Self::Dot),
            _ => None,
        }
    }
}

pub fn render(schema_graph: &SchemaGraph, format: Format) -> String {
    match format {
        Format::Text => render_text(schema_graph),
        Format::Dot => render_dot(schema_graph),
    }
}

/// Node table followed by one line per edge.
pub fn render_text(schema_graph: &SchemaGraph) -> String {
    let graph = &schema_graph.graph;
    let names: Vec<String> = graph.nodes().iter().map(|n| name_of(schema_graph, n)).collect();
    let name_width = names
        .iter()
        .map(|n| UnicodeWidthStr::width(n.as_str()))
        .max()
        .unwrap_or(0);
    let key_width = graph
        .nodes()
        .iter()
        .map(|n| n.key.to_string().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (node, name) in graph.nodes().iter().zip(&names) {
        let pad = name_width - UnicodeWidthStr::width(name.as_str());
        let line = format!(
            "{:>kw$}  {}{}  {}",
            node.key,
            name,
            " ".repeat(pad),
            node.columns.join(", "),
            kw = key_width
        );
        writeln!(&mut out, "{}", line.trim_end()).unwrap();
    }

    if !graph.edges().is_empty() {
        out.push('\n');
        writeln!(&mut out, "{}", graph).unwrap();
    }
    out
}

/// Undirected Graphviz graph, one edge per graph edge, labeled with its
/// representative label.
pub fn render_dot(schema_graph: &SchemaGraph) -> String {
    let graph = &schema_graph.graph;
    let mut out = String::new();

    writeln!(&mut out, "graph schema {{").unwrap();
    writeln!(&mut out, "    node [shape=box];").unwrap();

    for node in graph.nodes() {
        writeln!(
            &mut out,
            "    {} [label=\"{}\"];",
            node.key,
            escape(&node_label(schema_graph, node))
        )
        .unwrap();
    }

    for edge in graph.edges() {
        write!(&mut out, "    {} -- {}", edge.left().key, edge.right().key).unwrap();
        if let Some(label) = edge.label() {
            write!(&mut out, " [label=\"{}\"]", escape(label)).unwrap();
        }
        writeln!(&mut out, ";").unwrap();
    }

    writeln!(&mut out, "}}").unwrap();
    out
}

fn name_of(schema_graph: &SchemaGraph, node: &Node) -> String {
    schema_graph
        .table_name(node.key)
        .map_or_else(|| node.key.to_string(), str::to_string)
}

fn node_label(schema_graph: &SchemaGraph, node: &Node) -> String {
    let name = name_of(schema_graph, node);
    if node.columns.is_empty() {
        name
    } else {
        format!("{}\\n{}", name, node.columns.join("\\n"))
    }
}

fn escape(text: &str) -> String {
    text.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_graph, DetailLevel};
    use crate::sql::parse;

    const SQL: &str = r#"
        CREATE TABLE users (id INT PRIMARY KEY, name TEXT);
        CREATE TABLE posts (id INT PRIMARY KEY, user_id INT REFERENCES users(id));
    "#;

    #[test]
    fn test_text_output() {
        let built = build_graph(&parse(SQL), &[], DetailLevel::Pk);
        let text = render_text(&built);

        assert_eq!(text, "1  posts  id\n2  users  id\n\n([user_id]: 1 <--> 2)\n");
    }

    #[test]
    fn test_text_aligns_wide_names() {
        let sql = "CREATE TABLE \"ユーザー\" (id INT); CREATE TABLE ab (id INT);";
        let built = build_graph(&parse(sql), &[], DetailLevel::Tables);
        let text = render_text(&built);

        assert_eq!(text, "1  ab\n2  ユーザー\n");
    }

    #[test]
    fn test_dot_output() {
        let built = build_graph(&parse(SQL), &[], DetailLevel::Tables);
        let dot = render_dot(&built);

        assert!(dot.starts_with("graph schema {\n"));
        assert!(dot.contains("    1 [label=\"posts\"];\n"));
        assert!(dot.contains("    2 [label=\"users\"];\n"));
        assert!(dot.contains("    1 -- 2 [label=\"user_id\"];\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_dot_lists_columns() {
        let built = build_graph(&parse(SQL), &[], DetailLevel::All);
        let dot = render(&built, Format::Dot);
        assert!(dot.contains("[label=\"users\\nid\\nname\"]"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("dot"), Some(Format::Dot));
        assert_eq!(Format::from_str("svg"), None);
    }
}
