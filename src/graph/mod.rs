pub mod builder;
pub mod cycle;
pub mod dependency_graph;

pub use builder::GraphBuilder;
pub use cycle::{ensure_acyclic, find_cycle};
pub use dependency_graph::{DependencyGraph, GraphNode};
