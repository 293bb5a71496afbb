//! Dependency sequencer: builds a module graph from the architecture
//! descriptor and computes a linear build order.
//!
//! The build order is the one consistency guarantee of the whole pipeline:
//! no module is ever scheduled for development before a module it depends
//! on. Cycles and undeclared dependencies are contract violations by the
//! architecture stage and fail the run.

use crate::artifact::Architecture;
use crate::errors::PipelineError;
use std::collections::{HashMap, VecDeque};

/// Index into the module list.
pub type ModuleIndex = usize;

/// A directed graph over the architecture's declared modules.
#[derive(Debug)]
pub struct ModuleGraph {
    /// Module names in declaration order (sorted, since the descriptor's
    /// module map is a `BTreeMap`)
    names: Vec<String>,
    /// Forward edges: index -> modules that depend on it
    forward_edges: Vec<Vec<ModuleIndex>>,
    /// Reverse edges: index -> modules it depends on
    reverse_edges: Vec<Vec<ModuleIndex>>,
}

impl ModuleGraph {
    /// Build the graph from an architecture descriptor.
    ///
    /// Every dependency must name another declared module; an unknown name
    /// is surfaced as `PipelineError::UnknownDependency`.
    pub fn build(arch: &Architecture) -> Result<Self, PipelineError> {
        let names: Vec<String> = arch.modules.keys().cloned().collect();
        let index_map: HashMap<&str, ModuleIndex> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut forward_edges: Vec<Vec<ModuleIndex>> = vec![Vec::new(); names.len()];
        let mut reverse_edges: Vec<Vec<ModuleIndex>> = vec![Vec::new(); names.len()];

        for (name, info) in &arch.modules {
            let to = index_map[name.as_str()];
            for dep in &info.dependencies {
                let from = *index_map.get(dep.as_str()).ok_or_else(|| {
                    PipelineError::UnknownDependency {
                        module: name.clone(),
                        dependency: dep.clone(),
                    }
                })?;
                forward_edges[from].push(to);
                reverse_edges[to].push(from);
            }
        }

        Ok(Self {
            names,
            forward_edges,
            reverse_edges,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Compute a total build order consistent with the dependency partial
    /// order, using Kahn's algorithm with a FIFO queue.
    ///
    /// Ties among unblocked modules resolve in the order they became
    /// unblocked, seeded by declaration order, so the result is stable for a
    /// given descriptor. Returns `PipelineError::CircularDependency` naming
    /// the still-blocked modules when the graph has a cycle.
    pub fn build_order(&self) -> Result<Vec<String>, PipelineError> {
        let mut in_degree: Vec<usize> = self.reverse_edges.iter().map(Vec::len).collect();

        let mut queue: VecDeque<ModuleIndex> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, deg)| *deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.names.len());

        while let Some(node) = queue.pop_front() {
            order.push(self.names[node].clone());

            for &dependent in &self.forward_edges[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() != self.names.len() {
            let blocked: Vec<String> = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, deg)| *deg > 0)
                .map(|(i, _)| self.names[i].clone())
                .collect();
            return Err(PipelineError::CircularDependency { modules: blocked });
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ModuleInfo;
    use std::collections::BTreeMap;

    fn arch(modules: &[(&str, &[&str])]) -> Architecture {
        let modules = modules
            .iter()
            .map(|(name, deps)| {
                (
                    name.to_string(),
                    ModuleInfo {
                        dependencies: deps.iter().map(ToString::to_string).collect(),
                        extra: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Architecture {
            modules,
            entry_point: "main.py".to_string(),
            cli_design: BTreeMap::new(),
        }
    }

    #[test]
    fn test_linear_chain_orders_exactly() {
        let arch = arch(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);
        let order = ModuleGraph::build(&arch).unwrap().build_order().unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_every_module_once_and_deps_first() {
        let arch = arch(&[
            ("api", &["auth", "storage"]),
            ("auth", &["storage"]),
            ("cli", &["api"]),
            ("storage", &[]),
        ]);
        let order = ModuleGraph::build(&arch).unwrap().build_order().unwrap();

        assert_eq!(order.len(), 4);
        let pos = |name: &str| order.iter().position(|m| m == name).unwrap();
        assert!(pos("storage") < pos("auth"));
        assert!(pos("storage") < pos("api"));
        assert!(pos("auth") < pos("api"));
        assert!(pos("api") < pos("cli"));
    }

    #[test]
    fn test_two_node_cycle_is_an_error() {
        let arch = arch(&[("a", &["b"]), ("b", &["a"])]);
        let result = ModuleGraph::build(&arch).unwrap().build_order();
        match result {
            Err(PipelineError::CircularDependency { modules }) => {
                assert!(modules.contains(&"a".to_string()));
                assert!(modules.contains(&"b".to_string()));
            }
            other => panic!("Expected CircularDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let arch = arch(&[("a", &["a"])]);
        let result = ModuleGraph::build(&arch).unwrap().build_order();
        assert!(matches!(
            result,
            Err(PipelineError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_cycle_error_excludes_unblocked_modules() {
        // "free" has no dependencies and is schedulable; only the cycle
        // members should be reported.
        let arch = arch(&[("free", &[]), ("x", &["y"]), ("y", &["x"])]);
        let result = ModuleGraph::build(&arch).unwrap().build_order();
        match result {
            Err(PipelineError::CircularDependency { modules }) => {
                assert!(!modules.contains(&"free".to_string()));
                assert_eq!(modules.len(), 2);
            }
            other => panic!("Expected CircularDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_dependency_is_an_error() {
        let arch = arch(&[("a", &["ghost"])]);
        let result = ModuleGraph::build(&arch);
        match result {
            Err(PipelineError::UnknownDependency { module, dependency }) => {
                assert_eq!(module, "a");
                assert_eq!(dependency, "ghost");
            }
            other => panic!("Expected UnknownDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_architecture_yields_empty_order() {
        let arch = arch(&[]);
        let graph = ModuleGraph::build(&arch).unwrap();
        assert!(graph.is_empty());
        assert!(graph.build_order().unwrap().is_empty());
    }

    #[test]
    fn test_order_is_deterministic_across_rebuilds() {
        let arch = arch(&[
            ("alpha", &[]),
            ("beta", &[]),
            ("gamma", &["alpha", "beta"]),
            ("delta", &[]),
        ]);
        let first = ModuleGraph::build(&arch).unwrap().build_order().unwrap();
        for _ in 0..5 {
            let again = ModuleGraph::build(&arch).unwrap().build_order().unwrap();
            assert_eq!(first, again);
        }
    }
}
