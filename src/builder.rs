// Declarative construction of a FollowGraph
//
// Entities are declared by name and bindings refer to targets by name, so
// declarations may appear in any order. Names are resolved to ids in build().

use std::collections::HashMap;

use log::debug;

use crate::error::BuildError;
use crate::model::{Binding, Branch, Element, Entity, EntityId, EntityKind, FollowGraph, Sequence, Transform, TransformFn, Values};
use crate::parser::ast::{Document, EntityBody};
use crate::transform;

/// A binding whose target is still a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSpec {
    pub target: String,
    pub branch: Branch,
    pub index: usize,
}

impl BindingSpec {
    /// Binding on the target's default branch
    pub fn new(target: impl Into<String>, index: usize) -> Self {
        BindingSpec::on(target, Branch::Default, index)
    }

    pub fn on(target: impl Into<String>, branch: Branch, index: usize) -> Self {
        BindingSpec {
            target: target.into(),
            branch,
            index,
        }
    }
}

#[derive(Debug, Clone)]
enum PendingKind {
    Values(Vec<String>),
    Sequence(Vec<Vec<BindingSpec>>),
    Transform {
        function_name: String,
        function: TransformFn,
        inputs: Vec<Vec<BindingSpec>>,
    },
}

#[derive(Debug, Clone)]
struct PendingEntity {
    name: String,
    label: String,
    kind: PendingKind,
}

/// Collects entity declarations; the first misuse is kept and reported by `build()`.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    entities: Vec<PendingEntity>,
    error: Option<BuildError>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the declarations of a parsed description.
    pub fn from_document(document: &Document) -> Self {
        let mut builder = GraphBuilder::new();
        for decl in &document.entities {
            match &decl.body {
                EntityBody::Values(values) => {
                    builder.values(&decl.name, decl.label(), values.iter().cloned());
                }
                EntityBody::Sequence(elements) => {
                    builder.sequence(&decl.name, decl.label());
                    for element in elements {
                        builder.element(&decl.name, element.clone());
                    }
                }
                EntityBody::Transform { function, inputs } => {
                    builder.transform(&decl.name, decl.label(), function);
                    for input in inputs {
                        builder.input(&decl.name, input.clone());
                    }
                }
            }
        }
        builder
    }

    pub fn values<I, S>(&mut self, name: &str, label: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.declare(name, label, PendingKind::Values(values))
    }

    pub fn sequence(&mut self, name: &str, label: &str) -> &mut Self {
        self.declare(name, label, PendingKind::Sequence(Vec::new()))
    }

    /// Declare a transform backed by one of the built-in functions.
    pub fn transform(&mut self, name: &str, label: &str, function_name: &str) -> &mut Self {
        match transform::lookup(function_name) {
            Some(function) => self.transform_with(name, label, function_name, function),
            None => self.fail(BuildError::UnknownTransform(function_name.to_string())),
        }
    }

    pub fn transform_with(&mut self, name: &str, label: &str, function_name: &str, function: TransformFn) -> &mut Self {
        self.declare(
            name,
            label,
            PendingKind::Transform {
                function_name: function_name.to_string(),
                function,
                inputs: Vec::new(),
            },
        )
    }

    /// Append an element to a declared sequence.
    pub fn element(&mut self, name: &str, bindings: Vec<BindingSpec>) -> &mut Self {
        match self.find_mut(name).map(|e| &mut e.kind) {
            Some(PendingKind::Sequence(elements)) => {
                elements.push(bindings);
                self
            }
            Some(_) => self.fail(BuildError::WrongKind {
                name: name.to_string(),
                expected: "sequence",
            }),
            None => self.fail(BuildError::UnknownEntity(name.to_string())),
        }
    }

    /// Append an input row to a declared transform.
    pub fn input(&mut self, name: &str, bindings: Vec<BindingSpec>) -> &mut Self {
        match self.find_mut(name).map(|e| &mut e.kind) {
            Some(PendingKind::Transform { inputs, .. }) => {
                inputs.push(bindings);
                self
            }
            Some(_) => self.fail(BuildError::WrongKind {
                name: name.to_string(),
                expected: "transform",
            }),
            None => self.fail(BuildError::UnknownEntity(name.to_string())),
        }
    }

    pub fn build(&self) -> Result<FollowGraph, BuildError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        let ids: HashMap<&str, EntityId> = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.as_str(), EntityId(i)))
            .collect();

        let mut entities = Vec::with_capacity(self.entities.len());
        for pending in &self.entities {
            let kind = match &pending.kind {
                PendingKind::Values(values) => {
                    if values.is_empty() {
                        return Err(BuildError::EmptyValues(pending.name.clone()));
                    }
                    EntityKind::Values(Values { values: values.clone() })
                }
                PendingKind::Sequence(elements) => EntityKind::Sequence(Sequence {
                    elements: link_rows(elements, &ids)?,
                }),
                PendingKind::Transform {
                    function_name,
                    function,
                    inputs,
                } => EntityKind::Transform(Transform {
                    inputs: link_rows(inputs, &ids)?,
                    outputs: Vec::new(),
                    function: *function,
                    function_name: function_name.clone(),
                }),
            };
            entities.push(Entity {
                name: pending.name.clone(),
                label: pending.label.clone(),
                kind,
            });
        }

        debug!("built follow graph with {} entities", entities.len());
        Ok(FollowGraph::from_entities(entities))
    }

    fn declare(&mut self, name: &str, label: &str, kind: PendingKind) -> &mut Self {
        if self.find_mut(name).is_some() {
            return self.fail(BuildError::DuplicateEntity(name.to_string()));
        }
        self.entities.push(PendingEntity {
            name: name.to_string(),
            label: label.to_string(),
            kind,
        });
        self
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut PendingEntity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    fn fail(&mut self, err: BuildError) -> &mut Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }
}

fn link_rows(rows: &[Vec<BindingSpec>], ids: &HashMap<&str, EntityId>) -> Result<Vec<Element>, BuildError> {
    rows.iter().map(|row| link_element(row, ids)).collect()
}

fn link_element(row: &[BindingSpec], ids: &HashMap<&str, EntityId>) -> Result<Element, BuildError> {
    let mut element = Vec::with_capacity(row.len());
    for spec in row {
        let target = ids
            .get(spec.target.as_str())
            .copied()
            .ok_or_else(|| BuildError::UnknownEntity(spec.target.clone()))?;
        element.push(Binding::new(target, spec.branch, spec.index));
    }
    Ok(element)
}

/// Problems found by [`FollowGraph::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingIssue {
    pub entity: String,
    pub position: usize,
    pub problem: String,
}

impl FollowGraph {
    /// Check every stored binding against its target's current length.
    ///
    /// Transform outputs are computed on demand and are not checked here;
    /// a binding into `outputs` is checked against the input row length.
    pub fn validate(&self) -> Vec<BindingIssue> {
        let mut issues = Vec::new();
        for (_, entity) in self.entities() {
            let rows: &[Element] = match &entity.kind {
                EntityKind::Values(_) => continue,
                EntityKind::Sequence(s) => &s.elements,
                EntityKind::Transform(t) => &t.inputs,
            };
            for (position, element) in rows.iter().enumerate() {
                for binding in element {
                    if let Some(problem) = self.check_binding(binding) {
                        issues.push(BindingIssue {
                            entity: entity.name.clone(),
                            position,
                            problem,
                        });
                    }
                }
            }
        }
        issues
    }

    fn check_binding(&self, binding: &Binding) -> Option<String> {
        let Some(target) = self.entity(binding.target) else {
            return Some(format!("unknown entity #{}", binding.target.0));
        };
        let len = match (&target.kind, binding.branch) {
            (EntityKind::Transform(t), Branch::Inputs) => t.inputs.len(),
            _ => target.len(),
        };
        if binding.index >= len {
            Some(format!(
                "{}.{}.{} is out of range (length {})",
                target.name, binding.branch, binding.index, len
            ))
        } else {
            None
        }
    }
}
