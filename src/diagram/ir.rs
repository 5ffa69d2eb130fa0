// =============================================================================
// Phase 1: Structure
// =============================================================================

/// Rendering parameters shared by the DOT and raster outputs
#[derive(Debug, Clone)]
pub struct DiagramConfig {
    pub title: Option<String>,
    /// Free-standing annotation lines (e.g. what the main sequence compiles to)
    pub notes: Vec<String>,
    /// Minimum canvas size; the raster grows when the layout needs more room
    pub width: u32,
    pub height: u32,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        DiagramConfig {
            title: None,
            notes: Vec::new(),
            width: 1200,
            height: 800,
        }
    }
}

/// Entity-level view of the graph: one cluster per entity, plus every
/// reference edge between element nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub clusters: Vec<Cluster>,
    pub references: Vec<ReferenceEdge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub label: String,
    pub head: Node,
    pub rows: Vec<Row>,
}

/// A row of element nodes chained by `edge_label` edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub nodes: Vec<Node>,
    pub edge_label: String,
    /// Label of the edge from the cluster head to the first node
    pub head_edge_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// Literal values are drawn bold and quoted
    pub literal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub color: String,
}

// =============================================================================
// Phase 2: Scene
// =============================================================================

pub type Point = (i32, i32);

/// Pixel-space drawing commands. The raster backend executes these blindly.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Cluster outline
    Frame { tl: Point, br: Point },
    /// Node box with a centered label
    Box { tl: Point, br: Point, label: String, bold: bool },
    Arrow { from: Point, to: Point, color: String, label: Option<String> },
    Text { pos: Point, text: String, size: u32 },
}
