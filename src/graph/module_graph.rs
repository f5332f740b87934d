//! Intra-repo dependency graph built on petgraph
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `A → B` means "A depends on B"
//! - **Nodes**: [`ModuleId`]s of the workspace arena (no module data is owned here)
//! - **Edges**: the version A declared for B when the graph was built
//! - **Algorithms**: Kahn toposort with a fixed tie-break, Tarjan SCC for cycle reports
//!
//! Requirements on paths outside the repository produce no edge.

use crate::core::error::{MonoError, MonoResult};
use crate::core::events::{EventSink, ReleaseEvent};
use crate::modules::{ModuleId, ResolvedDependency, Workspace};
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A resolved requirement of one module on another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
  pub dependent: ModuleId,
  pub dependency: ModuleId,
  /// Version the dependent declared at discovery time
  pub declared_version: String,
}

/// Dependency graph over the modules of a [`Workspace`].
pub struct ModuleGraph {
  graph: DiGraph<ModuleId, String>,
  /// Index: ModuleId → node index
  nodes: Vec<NodeIndex>,
}

impl ModuleGraph {
  /// Resolve every module's requirements against the workspace.
  ///
  /// Records one edge per requirement naming another module, and fills each
  /// module's `dependencies` (with the pre-release declared version) in
  /// manifest order.
  pub fn build(workspace: &mut Workspace, events: &mut dyn EventSink) -> Self {
    let mut graph = DiGraph::new();
    let nodes: Vec<NodeIndex> = workspace.ids().map(|id| graph.add_node(id)).collect();

    let mut resolved: Vec<Vec<ResolvedDependency>> = Vec::with_capacity(workspace.len());
    for (id, module) in workspace.iter() {
      let mut deps = Vec::new();
      for requirement in module.manifest.requirements() {
        let Some(dep_id) = workspace.find(&requirement.path) else {
          continue;
        };
        if dep_id == id {
          continue;
        }

        graph.add_edge(nodes[id.0], nodes[dep_id.0], requirement.version.clone());
        events.emit(ReleaseEvent::DependencyFound {
          module: module.path().to_string(),
          dependency: requirement.path.clone(),
          version: requirement.version.clone(),
        });
        deps.push(ResolvedDependency {
          id: dep_id,
          declared_version: requirement.version,
        });
      }
      resolved.push(deps);
    }

    for (module, deps) in workspace.iter_mut().zip(resolved) {
      module.dependencies = deps;
    }

    Self { graph, nodes }
  }

  /// Every dependency edge, grouped by dependent in arena order
  pub fn edges(&self) -> Vec<DependencyEdge> {
    let mut edges: Vec<DependencyEdge> = self
      .graph
      .edge_indices()
      .filter_map(|e| {
        let (from, to) = self.graph.edge_endpoints(e)?;
        Some(DependencyEdge {
          dependent: self.graph[from],
          dependency: self.graph[to],
          declared_version: self.graph[e].clone(),
        })
      })
      .collect();
    edges.sort_by_key(|e| e.dependent);
    edges
  }

  /// Direct dependencies of a module (what it uses).
  pub fn direct_dependencies(&self, id: ModuleId) -> Vec<ModuleId> {
    let mut deps: Vec<ModuleId> = self
      .graph
      .neighbors_directed(self.nodes[id.0], Direction::Outgoing)
      .map(|idx| self.graph[idx])
      .collect();
    deps.sort();
    deps.dedup();
    deps
  }

  /// Direct dependents of a module (what uses it).
  pub fn direct_dependents(&self, id: ModuleId) -> Vec<ModuleId> {
    let mut dependents: Vec<ModuleId> = self
      .graph
      .neighbors_directed(self.nodes[id.0], Direction::Incoming)
      .map(|idx| self.graph[idx])
      .collect();
    dependents.sort();
    dependents.dedup();
    dependents
  }

  /// Get the release order: if A depends on B, B appears before A.
  ///
  /// Kahn's algorithm. Among modules whose dependencies are all placed, the one
  /// with the fewest dependencies goes first, then the smallest identity, so the
  /// order is the same on every run.
  ///
  /// # Errors
  /// Returns [`MonoError::GraphCycle`] if the modules cannot all be ordered.
  pub fn topological_order(&self, workspace: &Workspace) -> MonoResult<Vec<ModuleId>> {
    let count = self.graph.node_count();
    let mut remaining: Vec<usize> = (0..count)
      .map(|i| self.direct_dependencies(ModuleId(i)).len())
      .collect();
    let priority =
      |id: ModuleId| Reverse((self.direct_dependencies(id).len(), workspace.get(id).path().to_string(), id));

    let mut ready: BinaryHeap<_> = (0..count)
      .map(ModuleId)
      .filter(|id| remaining[id.0] == 0)
      .map(priority)
      .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse((_, _, id))) = ready.pop() {
      order.push(id);
      for dependent in self.direct_dependents(id) {
        remaining[dependent.0] -= 1;
        if remaining[dependent.0] == 0 {
          ready.push(priority(dependent));
        }
      }
    }

    if order.len() < count {
      let mut cycles = self.find_cycles(workspace);
      if cycles.is_empty() {
        let mut stuck: Vec<String> = (0..count)
          .filter(|&i| remaining[i] > 0)
          .map(|i| workspace.get(ModuleId(i)).path().to_string())
          .collect();
        stuck.sort();
        cycles.push(stuck);
      }
      return Err(MonoError::GraphCycle { cycles });
    }

    Ok(order)
  }

  /// Detect dependency cycles using Tarjan's SCC algorithm.
  ///
  /// Returns the identities in each cycle, sorted, cycles sorted by first member.
  pub fn find_cycles(&self, workspace: &Workspace) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = algo::tarjan_scc(&self.graph)
      .into_iter()
      .filter(|component| component.len() > 1)
      .map(|component| {
        let mut names: Vec<String> = component
          .into_iter()
          .map(|idx| workspace.get(self.graph[idx]).path().to_string())
          .collect();
        names.sort();
        names
      })
      .collect();
    cycles.sort();
    cycles
  }
}
