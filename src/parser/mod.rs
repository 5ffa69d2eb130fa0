// Follow description language parser

pub mod ast;
pub mod document;
pub mod entity;
pub mod lexer;
pub mod reference;

// Public API re-exports
pub use ast::{Document, EntityBody, EntityDecl};
pub use document::parse_document;

use anyhow::{anyhow, Result};

use crate::builder::GraphBuilder;
use crate::model::FollowGraph;

/// Parse a description and build the graph it declares.
pub fn parse_description(input: &str) -> Result<FollowGraph> {
    let (_, document) = parse_document(input).map_err(|e| anyhow!("Parse error: {}", e))?;
    let graph = GraphBuilder::from_document(&document).build()?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Branch;

    #[test]
    fn test_parse_description_resolves() {
        let graph = parse_description(
            r#"
values scale = ["C", "D", "E"]
sequence main = [[scale.2], [back.outputs.0]]
transform back = reverse([[scale.0], [scale.1]])
"#,
        )
        .unwrap();
        let main = graph.id_of("main").unwrap();
        assert_eq!(graph.resolve(main, Branch::Default, 0).unwrap().leaves(), vec!["E"]);
        assert_eq!(graph.resolve(main, Branch::Default, 1).unwrap().leaves(), vec!["D"]);
    }

    #[test]
    fn test_parse_description_syntax_error() {
        let err = parse_description("sequence = []").unwrap_err();
        assert!(err.to_string().contains("Parse error"));
    }

    #[test]
    fn test_parse_description_build_error() {
        let err = parse_description("sequence main = [[ghost.0]]").unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_parse_description_unknown_transform() {
        let err = parse_description("transform t = shuffle()").unwrap_err();
        assert!(err.to_string().contains("shuffle"));
    }
}
