use std::collections::{HashMap, HashSet};

use log::warn;

use super::ir::{Cluster, DiagramConfig, DrawCommand, Node, Point, ReferenceEdge, Row, Scene, Structure};
use super::palette::ColorPalette;
use crate::model::{Binding, Branch, Element, EntityKind, FollowGraph};

const MARGIN: i32 = 20;
const PAD: i32 = 12;
const NODE_W: i32 = 56;
const NODE_H: i32 = 28;
const H_GAP: i32 = 40;
const ROW_GAP: i32 = 24;
const CLUSTER_GAP: i32 = 28;
const LABEL_BAND: i32 = 24;
const TITLE_H: i32 = 40;
const NOTE_H: i32 = 24;
const CHAR_W: i32 = 8;

/// Collect clusters and reference edges for every entity of the graph
pub fn build_structure(graph: &FollowGraph) -> Structure {
    let palette = ColorPalette::bindings();
    let mut clusters = Vec::new();
    let mut references = Vec::new();

    for (_, entity) in graph.entities() {
        let name = &entity.name;
        let cluster = match &entity.kind {
            EntityKind::Values(v) => Cluster {
                name: name.clone(),
                label: entity.label.clone(),
                head: plain_node(format!("{}.vals", name), "VALS"),
                rows: vec![Row {
                    id: format!("{}.vals", name),
                    nodes: v
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, value)| Node {
                            id: format!("{}.vals.{}", name, i),
                            label: value.clone(),
                            literal: true,
                        })
                        .collect(),
                    edge_label: "nxt".to_string(),
                    head_edge_label: "vals".to_string(),
                }],
            },
            EntityKind::Sequence(s) => {
                push_references(graph, &palette, &format!("{}.seq", name), &s.elements, &mut references);
                Cluster {
                    name: name.clone(),
                    label: entity.label.clone(),
                    head: plain_node(format!("{}.seq", name), "SEQ"),
                    rows: vec![element_row(format!("{}.seq", name), s.elements.len(), "e", "els")],
                }
            }
            EntityKind::Transform(t) => {
                push_references(graph, &palette, &format!("{}.in", name), &t.inputs, &mut references);

                // Show which input row each output follows
                for i in 0..t.inputs.len() {
                    let Some(element) = (t.function)(&t.inputs, &t.outputs, i) else {
                        continue;
                    };
                    if let Some(j) = t.inputs.iter().position(|input| *input == element) {
                        references.push(ReferenceEdge {
                            from: format!("{}.out.{}", name, i),
                            to: format!("{}.in.{}", name, j),
                            label: t.function_name.clone(),
                            color: "gray".to_string(),
                        });
                    }
                }

                Cluster {
                    name: name.clone(),
                    label: entity.label.clone(),
                    head: plain_node(format!("{}.trns", name), "TRNS"),
                    rows: vec![
                        element_row(format!("{}.in", name), t.inputs.len(), "i", "in"),
                        element_row(format!("{}.out", name), t.inputs.len(), "o", "out"),
                    ],
                }
            }
        };
        clusters.push(cluster);
    }

    // Drop edges into positions that do not exist
    let known: HashSet<&str> = clusters
        .iter()
        .flat_map(|c| c.rows.iter().flat_map(|r| r.nodes.iter().map(|n| n.id.as_str())))
        .collect();
    let references = references
        .into_iter()
        .filter(|edge| {
            let ok = known.contains(edge.to.as_str());
            if !ok {
                warn!("skipping reference {} -> {}: no such node", edge.from, edge.to);
            }
            ok
        })
        .collect();

    Structure { clusters, references }
}

/// Node id a binding points at
pub fn node_id(graph: &FollowGraph, binding: &Binding) -> Option<String> {
    let target = graph.entity(binding.target)?;
    let row = match (&target.kind, binding.branch) {
        (EntityKind::Values(_), _) => "vals",
        (EntityKind::Sequence(_), _) => "seq",
        (EntityKind::Transform(_), Branch::Inputs) => "in",
        (EntityKind::Transform(_), _) => "out",
    };
    Some(format!("{}.{}.{}", target.name, row, binding.index))
}

fn push_references(
    graph: &FollowGraph,
    palette: &ColorPalette,
    row_id: &str,
    rows: &[Element],
    references: &mut Vec<ReferenceEdge>,
) {
    for (i, element) in rows.iter().enumerate() {
        for (slot, binding) in element.iter().enumerate() {
            let Some(to) = node_id(graph, binding) else {
                warn!("skipping reference from {}.{}: unknown target", row_id, i);
                continue;
            };
            let label = graph
                .entity(binding.target)
                .map(|e| e.name.clone())
                .unwrap_or_default();
            references.push(ReferenceEdge {
                from: format!("{}.{}", row_id, i),
                to,
                label,
                color: palette.get_color(slot),
            });
        }
    }
}

fn plain_node(id: String, label: &str) -> Node {
    Node {
        id,
        label: label.to_string(),
        literal: false,
    }
}

fn element_row(id: String, len: usize, node_label: &str, head_edge_label: &str) -> Row {
    Row {
        nodes: (0..len)
            .map(|i| plain_node(format!("{}.{}", id, i), node_label))
            .collect(),
        id,
        edge_label: "nxt".to_string(),
        head_edge_label: head_edge_label.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    tl: Point,
    br: Point,
}

impl Rect {
    fn center(&self) -> Point {
        ((self.tl.0 + self.br.0) / 2, (self.tl.1 + self.br.1) / 2)
    }
}

fn node_width(node: &Node) -> i32 {
    let chars = node.label.chars().count() as i32 + if node.literal { 2 } else { 0 };
    NODE_W.max(chars * CHAR_W + 2 * PAD)
}

/// Lay the structure out top to bottom, one cluster per band
pub fn compile_scene(structure: &Structure, config: &DiagramConfig) -> Scene {
    let mut frames = Vec::new();
    let mut texts = Vec::new();
    let mut boxes = Vec::new();
    let mut arrows = Vec::new();
    let mut rects: HashMap<&str, Rect> = HashMap::new();

    let mut y = MARGIN;
    let mut max_x = MARGIN;

    if let Some(title) = &config.title {
        texts.push(DrawCommand::Text {
            pos: (MARGIN, y),
            text: title.clone(),
            size: 24,
        });
        y += TITLE_H;
    }
    for note in &config.notes {
        texts.push(DrawCommand::Text {
            pos: (MARGIN, y),
            text: note.clone(),
            size: 16,
        });
        y += NOTE_H;
    }

    for cluster in &structure.clusters {
        let top = y;
        let rows_top = top + LABEL_BAND + PAD;
        let n_rows = cluster.rows.len().max(1) as i32;
        let rows_height = n_rows * NODE_H + (n_rows - 1) * ROW_GAP;

        texts.push(DrawCommand::Text {
            pos: (MARGIN + PAD, top + 4),
            text: cluster.label.clone(),
            size: 16,
        });

        let head_x = MARGIN + PAD;
        let head_y = rows_top + (rows_height - NODE_H) / 2;
        let head = Rect {
            tl: (head_x, head_y),
            br: (head_x + node_width(&cluster.head), head_y + NODE_H),
        };
        rects.insert(&cluster.head.id, head);
        boxes.push(node_box(&cluster.head, head));
        let mut right = head.br.0;

        for (r, row) in cluster.rows.iter().enumerate() {
            let row_y = rows_top + r as i32 * (NODE_H + ROW_GAP);
            let mut x = head.br.0 + H_GAP;
            let mut previous: Option<Rect> = None;

            for node in &row.nodes {
                let rect = Rect {
                    tl: (x, row_y),
                    br: (x + node_width(node), row_y + NODE_H),
                };
                rects.insert(&node.id, rect);
                boxes.push(node_box(node, rect));

                let (from, label) = match previous {
                    Some(prev) => (prev, row.edge_label.clone()),
                    None => (head, row.head_edge_label.clone()),
                };
                let (a, b) = anchors(from, rect);
                arrows.push(DrawCommand::Arrow {
                    from: a,
                    to: b,
                    color: "black".to_string(),
                    label: Some(label),
                });

                previous = Some(rect);
                x = rect.br.0 + H_GAP;
                right = right.max(rect.br.0);
            }
        }

        let bottom = rows_top + rows_height + PAD;
        frames.push(DrawCommand::Frame {
            tl: (MARGIN, top),
            br: (right + PAD, bottom),
        });
        max_x = max_x.max(right + PAD);
        y = bottom + CLUSTER_GAP;
    }

    for edge in &structure.references {
        let (Some(from), Some(to)) = (rects.get(edge.from.as_str()), rects.get(edge.to.as_str())) else {
            continue;
        };
        let (a, b) = anchors(*from, *to);
        arrows.push(DrawCommand::Arrow {
            from: a,
            to: b,
            color: edge.color.clone(),
            label: Some(edge.label.clone()),
        });
    }

    let width = config.width.max(u32::try_from(max_x + MARGIN).unwrap_or(0));
    let height = config.height.max(u32::try_from(y - CLUSTER_GAP + MARGIN).unwrap_or(0));

    // Frames under edges under boxes under text
    let mut commands = frames;
    commands.extend(arrows);
    commands.extend(boxes);
    commands.extend(texts);

    Scene {
        width,
        height,
        commands,
    }
}

fn node_box(node: &Node, rect: Rect) -> DrawCommand {
    DrawCommand::Box {
        tl: rect.tl,
        br: rect.br,
        label: if node.literal {
            format!("'{}'", node.label)
        } else {
            node.label.clone()
        },
        bold: node.literal,
    }
}

/// Border points to connect two boxes: sideways when they do not overlap
/// horizontally, otherwise through the top and bottom edges.
fn anchors(a: Rect, b: Rect) -> (Point, Point) {
    let (ca, cb) = (a.center(), b.center());
    if b.tl.0 >= a.br.0 {
        ((a.br.0, ca.1), (b.tl.0, cb.1))
    } else if b.br.0 <= a.tl.0 {
        ((a.tl.0, ca.1), (b.br.0, cb.1))
    } else if cb.1 > ca.1 {
        ((ca.0, a.br.1), (cb.0, b.tl.1))
    } else {
        ((ca.0, a.tl.1), (cb.0, b.br.1))
    }
}
