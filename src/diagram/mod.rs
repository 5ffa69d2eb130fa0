// Diagram of entities and their cross-references
//
// Pipeline: graph -> Structure (clusters, edges) -> DOT text
//                                                -> Scene (pixel layout) -> PNG

pub mod compiler;
pub mod dot;
pub mod ir;
pub mod palette;
pub mod raster;

pub use ir::DiagramConfig;

use anyhow::{Context, Result};

use crate::model::FollowGraph;

pub fn render_dot(graph: &FollowGraph, config: &DiagramConfig) -> String {
    dot::to_dot(&compiler::build_structure(graph), config)
}

pub fn render_png(graph: &FollowGraph, config: &DiagramConfig) -> Result<Vec<u8>> {
    let structure = compiler::build_structure(graph);
    let scene = compiler::compile_scene(&structure, config);
    raster::render_png(&scene).context("Failed to render diagram")
}
