// Graphviz DOT description of a follow graph

use std::fmt::Write;

use super::ir::{Cluster, DiagramConfig, Node, Structure};

/// Render the structure as a directed DOT graph (left to right, rounded boxes)
pub fn to_dot(structure: &Structure, config: &DiagramConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_dot(&mut out, structure, config);
    out
}

fn write_dot(out: &mut String, structure: &Structure, config: &DiagramConfig) -> std::fmt::Result {
    writeln!(out, "digraph follow {{")?;
    write!(out, "  graph [rankdir=LR, compound=true")?;
    if let Some(title) = &config.title {
        write!(out, ", label=\"{}\", labelloc=t, fontsize=30", escape(title))?;
    }
    writeln!(out, "];")?;
    writeln!(out, "  node [shape=box, style=rounded];")?;

    for (i, note) in config.notes.iter().enumerate() {
        writeln!(
            out,
            "  \"note.{}\" [label=\"{}\", shape=plaintext, fontsize=30];",
            i,
            escape(note)
        )?;
    }

    for cluster in &structure.clusters {
        write_cluster(out, cluster)?;
    }

    for edge in &structure.references {
        writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"{}\", color=\"{}\"];",
            escape(&edge.from),
            escape(&edge.to),
            escape(&edge.label),
            edge.color
        )?;
    }

    writeln!(out, "}}")
}

fn write_cluster(out: &mut String, cluster: &Cluster) -> std::fmt::Result {
    writeln!(out, "  subgraph \"cluster_{}\" {{", escape(&cluster.name))?;
    writeln!(out, "    label=\"{}\";", escape(&cluster.label))?;
    writeln!(out, "    rank=same;")?;
    writeln!(out, "    {}", node_statement(&cluster.head))?;

    for row in &cluster.rows {
        writeln!(out, "    subgraph \"{}.row\" {{", escape(&row.id))?;
        writeln!(out, "      rank=same;")?;
        for node in &row.nodes {
            writeln!(out, "      {}", node_statement(node))?;
        }
        for pair in row.nodes.windows(2) {
            writeln!(
                out,
                "      \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(&pair[0].id),
                escape(&pair[1].id),
                escape(&row.edge_label)
            )?;
        }
        writeln!(out, "    }}")?;

        if let Some(first) = row.nodes.first() {
            writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(&cluster.head.id),
                escape(&first.id),
                escape(&row.head_edge_label)
            )?;
        }
    }

    writeln!(out, "  }}")
}

fn node_statement(node: &Node) -> String {
    if node.literal {
        // HTML-like label: bold, quoted literal
        format!(
            "\"{}\" [label=<<B>'{}'</B>>];",
            escape(&node.id),
            escape_html(&node.label)
        )
    } else {
        format!("\"{}\" [label=\"{}\"];", escape(&node.id), escape(&node.label))
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BindingSpec, GraphBuilder};
    use crate::diagram::compiler::build_structure;

    fn dot_for_small_graph(config: &DiagramConfig) -> String {
        let mut builder = GraphBuilder::new();
        builder
            .values("durations", "DURATIONS", ["1/2", "1/4"])
            .sequence("main", "The 'Main' music")
            .element("main", vec![BindingSpec::new("durations", 1)])
            .element("main", vec![]);
        to_dot(&build_structure(&builder.build().unwrap()), config)
    }

    #[test]
    fn test_dot_header_and_footer() {
        let dot = dot_for_small_graph(&DiagramConfig::default());
        assert!(dot.starts_with("digraph follow {\n"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("node [shape=box, style=rounded];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_dot_clusters_and_rows() {
        let dot = dot_for_small_graph(&DiagramConfig::default());
        assert!(dot.contains("subgraph \"cluster_durations\""));
        assert!(dot.contains("label=\"The 'Main' music\";"));
        assert!(dot.contains("\"durations.vals.0\" [label=<<B>'1/2'</B>>];"));
        assert!(dot.contains("\"main.seq.0\" -> \"main.seq.1\" [label=\"nxt\"];"));
        assert!(dot.contains("\"main.seq\" -> \"main.seq.0\" [label=\"els\"];"));
    }

    #[test]
    fn test_dot_reference_edges() {
        let dot = dot_for_small_graph(&DiagramConfig::default());
        assert!(dot.contains("\"main.seq.0\" -> \"durations.vals.1\" [label=\"durations\", color=\"red\"];"));
    }

    #[test]
    fn test_dot_title_and_notes_are_escaped() {
        let config = DiagramConfig {
            title: Some("A \"follow\" test".to_string()),
            notes: vec!["line one\nline two".to_string()],
            ..Default::default()
        };
        let dot = dot_for_small_graph(&config);
        assert!(dot.contains("label=\"A \\\"follow\\\" test\""));
        assert!(dot.contains("\"note.0\" [label=\"line one\\nline two\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
    }
}
