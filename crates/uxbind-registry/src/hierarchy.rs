//! Static subtype table for foreign types.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `ForeignType` (one per declared type)
//! - Edges: child → parent ("is a subtype of")
//!
//! A type may have several parents. The graph is kept acyclic: an edge that
//! would close a cycle is rejected when it is added.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rustc_hash::{FxHashMap, FxHashSet};
use uxbind_core::{ConfigurationError, ForeignType, TypeHash};

/// Declared foreign types and their subtype edges.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    graph: DiGraph<ForeignType, ()>,
    /// TypeHash -> node, for O(1) lookups
    index: FxHashMap<TypeHash, NodeIndex>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type. Declaring the same type twice is a no-op.
    pub fn declare(&mut self, ty: ForeignType) -> NodeIndex {
        if let Some(&node) = self.index.get(&ty.hash) {
            return node;
        }
        let node = self.graph.add_node(ty);
        self.index.insert(ty.hash, node);
        node
    }

    /// Record `child` as a direct subtype of `parent`.
    ///
    /// Both types must already be declared.
    pub fn add_subtype(
        &mut self,
        child: ForeignType,
        parent: ForeignType,
    ) -> Result<(), ConfigurationError> {
        let child_node = self.node(child)?;
        let parent_node = self.node(parent)?;

        if child_node == parent_node
            || has_path_connecting(&self.graph, parent_node, child_node, None)
        {
            return Err(ConfigurationError::CyclicHierarchy {
                child: child.name.to_string(),
                parent: parent.name.to_string(),
            });
        }

        self.graph.update_edge(child_node, parent_node, ());
        Ok(())
    }

    fn node(&self, ty: ForeignType) -> Result<NodeIndex, ConfigurationError> {
        self.index
            .get(&ty.hash)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownType {
                type_name: ty.name.to_string(),
            })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn contains(&self, hash: TypeHash) -> bool {
        self.index.contains_key(&hash)
    }

    pub fn get(&self, hash: TypeHash) -> Option<ForeignType> {
        self.index.get(&hash).map(|&node| self.graph[node])
    }

    /// Every declared type, in declaration order.
    pub fn types(&self) -> impl Iterator<Item = ForeignType> + '_ {
        self.graph.node_weights().copied()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct parents of a type.
    pub fn parents(&self, hash: TypeHash) -> Vec<ForeignType> {
        let Some(&node) = self.index.get(&hash) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|parent| self.graph[parent])
            .collect()
    }

    /// True if `from` is `to` or one of its (transitive) subtypes.
    pub fn is_assignable(&self, from: TypeHash, to: TypeHash) -> bool {
        if from == to {
            return true;
        }
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    /// All strict supertypes of a type.
    pub fn ancestors(&self, hash: TypeHash) -> FxHashSet<TypeHash> {
        let mut ancestors = FxHashSet::default();
        let Some(&start) = self.index.get(&hash) else {
            return ancestors;
        };
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(node) = dfs.next(&self.graph) {
            if node != start {
                ancestors.insert(self.graph[node].hash);
            }
        }
        ancestors
    }

    /// The type and its supertypes grouped by distance.
    ///
    /// Level 0 is the type itself, level 1 its direct parents, and so on. A
    /// type reachable along several paths appears only at its nearest level.
    pub fn levels(&self, hash: TypeHash) -> Vec<Vec<ForeignType>> {
        let Some(&start) = self.index.get(&hash) else {
            return Vec::new();
        };

        let mut levels: Vec<Vec<ForeignType>> = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([(start, 0usize)]);
        seen.insert(start);

        while let Some((node, depth)) = queue.pop_front() {
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(self.graph[node]);
            for parent in self.graph.neighbors_directed(node, Direction::Outgoing) {
                if seen.insert(parent) {
                    queue.push_back((parent, depth + 1));
                }
            }
        }
        levels
    }
}
