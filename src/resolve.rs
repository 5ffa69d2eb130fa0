use std::collections::HashSet;

use log::debug;

use crate::error::ResolveError;
use crate::model::{Binding, Branch, EntityId, EntityKind, FollowGraph, Resolved, Sequence, Transform, Values};

/// Uniform "get element" capability shared by every entity kind
pub trait Resolvable {
    fn resolve(&self, ctx: &mut Resolution<'_>, branch: Branch, index: usize) -> Result<Resolved, ResolveError>;
}

/// One step on the current resolution path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Frame {
    id: EntityId,
    branch: Branch,
    index: usize,
}

/// Depth-first walk over the binding graph.
///
/// Nothing is cached: every call recomputes from the bindings. The path of
/// frames currently being resolved is kept so a revisited frame is reported
/// as a cycle instead of recursing forever.
pub struct Resolution<'g> {
    graph: &'g FollowGraph,
    path: Vec<Frame>,
    on_path: HashSet<Frame>,
}

impl<'g> Resolution<'g> {
    pub fn new(graph: &'g FollowGraph) -> Self {
        Resolution {
            graph,
            path: Vec::new(),
            on_path: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, id: EntityId, branch: Branch, index: usize) -> Result<Resolved, ResolveError> {
        let graph = self.graph;
        let entity = graph
            .entity(id)
            .ok_or(ResolveError::UnknownEntity { id: id.0 })?;

        let frame = Frame {
            id,
            branch: effective_branch(&entity.kind, branch),
            index,
        };
        if self.on_path.contains(&frame) {
            return Err(ResolveError::Cycle {
                path: self.describe_cycle(frame),
            });
        }

        debug!(
            "in {} '{}', called with branch: {} and index: {}",
            entity.kind_name(),
            entity.name,
            branch,
            index
        );

        self.path.push(frame);
        self.on_path.insert(frame);
        let result = match &entity.kind {
            EntityKind::Values(v) => v.resolve(self, branch, index),
            EntityKind::Sequence(s) => s.resolve(self, branch, index),
            EntityKind::Transform(t) => t.resolve(self, branch, index),
        };
        self.path.pop();
        self.on_path.remove(&frame);
        result
    }

    pub fn resolve_binding(&mut self, binding: &Binding) -> Result<Resolved, ResolveError> {
        self.resolve(binding.target, binding.branch, binding.index)
    }

    /// Resolve every binding of one element, in order.
    pub fn resolve_element(&mut self, element: &[Binding]) -> Result<Resolved, ResolveError> {
        let mut resolved = Vec::with_capacity(element.len());
        for binding in element {
            resolved.push(self.resolve_binding(binding)?);
        }
        Ok(Resolved::List(resolved))
    }

    fn current_name(&self) -> String {
        self.path
            .last()
            .and_then(|frame| self.graph.entity(frame.id))
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }

    fn out_of_range(&self, branch: Branch, index: usize, len: usize) -> ResolveError {
        ResolveError::IndexOutOfRange {
            entity: self.current_name(),
            branch,
            index,
            len,
        }
    }

    fn describe_cycle(&self, repeated: Frame) -> String {
        let start = self.path.iter().position(|f| *f == repeated).unwrap_or(0);
        self.path[start..]
            .iter()
            .chain(std::iter::once(&repeated))
            .map(|f| self.describe_frame(f))
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn describe_frame(&self, frame: &Frame) -> String {
        let name = self
            .graph
            .entity(frame.id)
            .map(|e| e.name.as_str())
            .unwrap_or("?");
        format!("{}.{}.{}", name, frame.branch, frame.index)
    }
}

/// Collapse selectors that address the same element list, so cycle
/// detection does not miss a loop that alternates spellings.
fn effective_branch(kind: &EntityKind, branch: Branch) -> Branch {
    match kind {
        EntityKind::Values(_) | EntityKind::Sequence(_) => Branch::Default,
        EntityKind::Transform(_) => match branch {
            Branch::Inputs => Branch::Inputs,
            _ => Branch::Outputs,
        },
    }
}

impl Resolvable for Values {
    fn resolve(&self, ctx: &mut Resolution<'_>, branch: Branch, index: usize) -> Result<Resolved, ResolveError> {
        self.values
            .get(index)
            .map(|v| Resolved::Value(v.clone()))
            .ok_or_else(|| ctx.out_of_range(branch, index, self.values.len()))
    }
}

impl Resolvable for Sequence {
    fn resolve(&self, ctx: &mut Resolution<'_>, branch: Branch, index: usize) -> Result<Resolved, ResolveError> {
        let element = self
            .elements
            .get(index)
            .ok_or_else(|| ctx.out_of_range(branch, index, self.elements.len()))?;
        ctx.resolve_element(element)
    }
}

impl Resolvable for Transform {
    fn resolve(&self, ctx: &mut Resolution<'_>, branch: Branch, index: usize) -> Result<Resolved, ResolveError> {
        match branch {
            Branch::Inputs => {
                let element = self
                    .inputs
                    .get(index)
                    .ok_or_else(|| ctx.out_of_range(branch, index, self.inputs.len()))?;
                ctx.resolve_element(element)
            }
            Branch::Default | Branch::Elements | Branch::Outputs => {
                let element = (self.function)(&self.inputs, &self.outputs, index).ok_or_else(|| {
                    ResolveError::OutputOutOfRange {
                        entity: ctx.current_name(),
                        function: self.function_name.clone(),
                        index,
                    }
                })?;
                ctx.resolve_element(&element)
            }
        }
    }
}

impl FollowGraph {
    /// Follow bindings from `(id, branch, index)` down to literal values.
    pub fn resolve(&self, id: EntityId, branch: Branch, index: usize) -> Result<Resolved, ResolveError> {
        Resolution::new(self).resolve(id, branch, index)
    }

    pub fn resolve_binding(&self, binding: &Binding) -> Result<Resolved, ResolveError> {
        Resolution::new(self).resolve_binding(binding)
    }

    /// Resolve every position of the named entity's default branch.
    pub fn resolve_all(&self, id: EntityId) -> Result<Vec<Resolved>, ResolveError> {
        let entity = self
            .entity(id)
            .ok_or(ResolveError::UnknownEntity { id: id.0 })?;
        (0..entity.len())
            .map(|i| self.resolve(id, Branch::Default, i))
            .collect()
    }
}
