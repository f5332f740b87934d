//! Intra-repo dependency analysis
//!
//! Built on petgraph for direct control and minimal abstraction. Nodes are
//! arena indices into the [`Workspace`](crate::modules::Workspace); the graph
//! never owns module data.

pub mod module_graph;

pub use module_graph::{DependencyEdge, ModuleGraph};
