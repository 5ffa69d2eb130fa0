// Entity graph for follow references

use std::collections::HashMap;
use std::fmt;

/// Position of an entity inside its [`FollowGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// Which element list of an entity a binding points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Branch {
    #[default]
    Default,
    Elements,
    Inputs,
    Outputs,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Default => "default",
            Branch::Elements => "elements",
            Branch::Inputs => "inputs",
            Branch::Outputs => "outputs",
        }
    }

    pub fn from_name(name: &str) -> Option<Branch> {
        match name {
            "default" => Some(Branch::Default),
            "elements" => Some(Branch::Elements),
            "inputs" => Some(Branch::Inputs),
            "outputs" => Some(Branch::Outputs),
            _ => None,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference from one position to an element of another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub target: EntityId,
    pub branch: Branch,
    pub index: usize,
}

impl Binding {
    pub fn new(target: EntityId, branch: Branch, index: usize) -> Self {
        Binding { target, branch, index }
    }
}

/// One position of a sequence or transform row: the bindings it follows.
pub type Element = Vec<Binding>;

/// Computes the bindings of output `index` from the full input and output rows.
/// Returns `None` when the function has nothing at `index`.
pub type TransformFn = fn(&[Element], &[Element], usize) -> Option<Element>;

/// Terminal table of literal values (pitch names, duration fractions, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub elements: Vec<Element>,
}

#[derive(Clone)]
pub struct Transform {
    pub inputs: Vec<Element>,
    pub outputs: Vec<Element>,
    pub function: TransformFn,
    pub function_name: String,
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("function", &self.function_name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Values(Values),
    Sequence(Sequence),
    Transform(Transform),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub label: String,
    pub kind: EntityKind,
}

impl Entity {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Values(_) => "values",
            EntityKind::Sequence(_) => "sequence",
            EntityKind::Transform(_) => "transform",
        }
    }

    /// Number of addressable positions on the entity's default branch.
    /// Transform outputs mirror their inputs one to one.
    pub fn len(&self) -> usize {
        match &self.kind {
            EntityKind::Values(v) => v.values.len(),
            EntityKind::Sequence(s) => s.elements.len(),
            EntityKind::Transform(t) => t.inputs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The populated entity graph. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FollowGraph {
    entities: Vec<Entity>,
    by_name: HashMap<String, EntityId>,
}

impl FollowGraph {
    /// Names must be unique; the builder guarantees it.
    pub(crate) fn from_entities(entities: Vec<Entity>) -> Self {
        let by_name = entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), EntityId(i)))
            .collect();
        FollowGraph { entities, by_name }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Entity> {
        self.id_of(name).and_then(|id| self.entity(id))
    }

    /// Id and entity for a name
    pub fn find(&self, name: &str) -> Option<(EntityId, &Entity)> {
        let id = self.id_of(name)?;
        self.entity(id).map(|e| (id, e))
    }

    /// Entities in declaration order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i), e))
    }

    pub fn first_sequence(&self) -> Option<(EntityId, &Entity)> {
        self.entities()
            .find(|(_, e)| matches!(e.kind, EntityKind::Sequence(_)))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Result of following a binding: a literal, or one entry per followed binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Value(String),
    List(Vec<Resolved>),
}

impl Resolved {
    /// Literal values in depth-first order, nesting removed.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Resolved::Value(v) => out.push(v),
            Resolved::List(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Resolved]> {
        match self {
            Resolved::Value(_) => None,
            Resolved::List(items) => Some(items),
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Value(v) => write!(f, "'{}'", v),
            Resolved::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}
