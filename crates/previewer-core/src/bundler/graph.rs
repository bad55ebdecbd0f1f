//! Module dependency graph.
//!
//! Tracks the modules reached from the entry and their static
//! dependencies for emission.

use rustc_hash::FxHashMap as HashMap;

/// Unique identifier for a module in the graph.
pub type ModuleId = usize;

/// A module in the dependency graph.
#[derive(Debug, Clone)]
pub struct Module {
    /// Normalized VFS name, or the entry id.
    pub path: String,
    /// Linked registry function body.
    pub code: String,
    /// Module IDs this module imports or re-exports from.
    pub dependencies: Vec<ModuleId>,
}

impl Module {
    /// A module that has been discovered but not linked yet.
    #[must_use]
    pub fn pending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: String::new(),
            dependencies: Vec::new(),
        }
    }
}

/// The module dependency graph.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// All modules, indexed by ID.
    modules: Vec<Module>,
    /// Path to ID mapping for deduplication.
    path_to_id: HashMap<String, ModuleId>,
}

impl ModuleGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module to the graph, returning its ID.
    ///
    /// A path that is already present keeps its existing ID.
    pub fn add(&mut self, module: Module) -> ModuleId {
        if let Some(&id) = self.path_to_id.get(&module.path) {
            return id;
        }
        let id = self.modules.len();
        self.path_to_id.insert(module.path.clone(), id);
        self.modules.push(module);
        id
    }

    /// Get a module by ID.
    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Get a module by ID, mutably.
    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    /// Get module ID by path.
    #[must_use]
    pub fn id_by_path(&self, path: &str) -> Option<ModuleId> {
        self.path_to_id.get(path).copied()
    }

    /// Number of modules in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Get modules in topological order (dependencies before dependents).
    ///
    /// Modules on a cycle are appended in discovery order; the registry
    /// runtime tolerates cycles, so the order only affects readability.
    #[must_use]
    pub fn toposort(&self) -> Vec<ModuleId> {
        let n = self.modules.len();
        if n == 0 {
            return Vec::new();
        }

        let mut in_degree = vec![0usize; n];
        let mut adj: Vec<Vec<ModuleId>> = vec![Vec::new(); n];

        for (id, module) in self.modules.iter().enumerate() {
            for &dep_id in &module.dependencies {
                adj[dep_id].push(id);
                in_degree[id] += 1;
            }
        }

        // Kahn's algorithm
        let mut queue: std::collections::VecDeque<ModuleId> = std::collections::VecDeque::new();
        for (id, &deg) in in_degree.iter().enumerate() {
            if deg == 0 {
                queue.push_back(id);
            }
        }

        let mut placed = vec![false; n];
        let mut order = Vec::with_capacity(n);
        while let Some(id) = queue.pop_front() {
            placed[id] = true;
            order.push(id);
            for &next in &adj[id] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        order.extend((0..n).filter(|&id| !placed[id]));
        order
    }

    /// Iterate over all modules.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(path: &str, deps: Vec<ModuleId>) -> Module {
        Module {
            dependencies: deps,
            ..Module::pending(path)
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = ModuleGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.toposort().is_empty());
    }

    #[test]
    fn test_add_dedupes_by_path() {
        let mut graph = ModuleGraph::new();
        let a = graph.add(Module::pending("A.tsx"));
        let again = graph.add(Module::pending("A.tsx"));
        assert_eq!(a, again);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.id_by_path("A.tsx"), Some(0));
    }

    #[test]
    fn test_toposort_linear() {
        let mut graph = ModuleGraph::new();

        // A depends on B depends on C
        graph.add(module("C.tsx", vec![]));
        graph.add(module("B.tsx", vec![0]));
        graph.add(module("A.tsx", vec![1]));

        assert_eq!(graph.toposort(), vec![0, 1, 2]);
    }

    #[test]
    fn test_toposort_cycle_keeps_every_module() {
        let mut graph = ModuleGraph::new();
        graph.add(module("entry", vec![1]));
        graph.add(module("A.tsx", vec![2]));
        graph.add(module("B.tsx", vec![1]));

        let order = graph.toposort();
        assert_eq!(order.len(), 3);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }
}
