// Abstract Syntax Tree for the follow description language

use crate::builder::BindingSpec;

/// A whole description: entity declarations in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub entities: Vec<EntityDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDecl {
    pub name: String,
    /// Display label; the name is used when absent
    pub label: Option<String>,
    pub body: EntityBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityBody {
    /// `values name = ["C", "D"]`
    Values(Vec<String>),
    /// `sequence name = [[ref, ref], [ref]]`
    Sequence(Vec<Vec<BindingSpec>>),
    /// `transform name = function([[ref], [ref]])`
    Transform {
        function: String,
        inputs: Vec<Vec<BindingSpec>>,
    },
}

impl EntityDecl {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
