// Library exports for follow

pub mod builder;
pub mod diagram;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod resolve;
pub mod transform;

pub use builder::{BindingSpec, GraphBuilder};
pub use error::{BuildError, ResolveError};
pub use model::{Binding, Branch, EntityId, FollowGraph, Resolved};
pub use resolve::Resolvable;
