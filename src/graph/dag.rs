//! Precedence graph over skills.
//!
//! An arena of nodes with owned adjacency. In-degrees are cached and a
//! ready set (nodes with in-degree zero) is maintained incrementally, so
//! frontier queries never rescan edges. Removing a node decrements the
//! in-degree of its live successors, which is what unblocks them.
//!
//! # Reference
//! Kahn (1962), "Topological Sorting of Large Networks", CACM 5(11)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use thiserror::Error;

use crate::models::Skill;

/// Arena index of a node. Stable for the lifetime of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors raised by graph mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The node id refers to no live node.
    #[error("node {0:?} does not belong to this graph")]
    UnknownNode(NodeId),
    /// The skill is not a node of this graph.
    #[error("skill '{0}' is not in the graph")]
    UnknownSkill(Skill),
    /// Self-loops can never be satisfied.
    #[error("skill '{0}' cannot precede itself")]
    SelfLoop(Skill),
    /// A snapshot edge references a skill index outside the node list.
    #[error("snapshot edge ({0}, {1}) references a missing skill")]
    SnapshotIndex(usize, usize),
    /// A snapshot describes a cyclic graph.
    #[error("snapshot contains a cycle")]
    SnapshotCycle,
}

#[derive(Debug, Clone)]
struct Node {
    skill: Skill,
    successors: Vec<NodeId>,
    in_degree: usize,
}

/// A directed graph of skills and precedence edges.
///
/// Nodes are keyed by skill identity; adding a skill that is already
/// present returns the existing node (first occurrence wins).
#[derive(Debug, Clone, Default)]
pub struct PrecedenceGraph {
    nodes: Vec<Option<Node>>,
    index: HashMap<Skill, NodeId>,
    ready: BTreeSet<NodeId>,
    live: usize,
}

/// Serializable form of a graph: node list plus 0-based edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Live skills in insertion order.
    pub skills: Vec<Skill>,
    /// Edges as (predecessor, successor) indices into `skills`.
    pub edges: Vec<(usize, usize)>,
}

impl PrecedenceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an edgeless graph over the given skills.
    ///
    /// Duplicate skills collapse onto their first occurrence.
    pub fn from_skills(skills: &[Skill]) -> Self {
        let mut graph = Self::new();
        for skill in skills {
            graph.add_skill(skill.clone());
        }
        graph
    }

    /// Restores a graph from a snapshot, re-validating acyclicity.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        let ids: Vec<NodeId> = snapshot
            .skills
            .iter()
            .map(|s| graph.add_skill(s.clone()))
            .collect();

        for &(from, to) in &snapshot.edges {
            let (Some(&a), Some(&b)) = (ids.get(from), ids.get(to)) else {
                return Err(GraphError::SnapshotIndex(from, to));
            };
            graph.add_edge(a, b)?;
        }

        if !graph.is_acyclic() {
            return Err(GraphError::SnapshotCycle);
        }
        Ok(graph)
    }

    /// Adds a skill node, returning its id (existing id for duplicates).
    pub fn add_skill(&mut self, skill: Skill) -> NodeId {
        if let Some(&id) = self.index.get(&skill) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            skill: skill.clone(),
            successors: Vec::new(),
            in_degree: 0,
        }));
        self.index.insert(skill, id);
        self.ready.insert(id);
        self.live += 1;
        id
    }

    /// Adds a precedence edge `from → to`.
    ///
    /// Returns `Ok(false)` if the edge already existed.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        self.node(to)?;
        let from_node = self.node(from)?;
        if from == to {
            return Err(GraphError::SelfLoop(from_node.skill.clone()));
        }
        if from_node.successors.contains(&to) {
            return Ok(false);
        }

        if let Some(node) = self.nodes[from.0].as_mut() {
            node.successors.push(to);
        }
        if let Some(node) = self.nodes[to.0].as_mut() {
            node.in_degree += 1;
        }
        self.ready.remove(&to);
        Ok(true)
    }

    /// Adds a precedence edge between two skills already in the graph.
    pub fn add_dependency(&mut self, before: &Skill, after: &Skill) -> Result<bool, GraphError> {
        let from = self
            .node_id(before)
            .ok_or_else(|| GraphError::UnknownSkill(before.clone()))?;
        let to = self
            .node_id(after)
            .ok_or_else(|| GraphError::UnknownSkill(after.clone()))?;
        self.add_edge(from, to)
    }

    /// Removes a skill and its outgoing edges.
    ///
    /// Returns `false` if the skill was not present.
    pub fn remove(&mut self, skill: &Skill) -> bool {
        let Some(id) = self.index.remove(skill) else {
            return false;
        };
        let Some(node) = self.nodes[id.0].take() else {
            return false;
        };
        self.ready.remove(&id);
        self.live -= 1;

        for succ in node.successors {
            if let Some(s) = self.nodes[succ.0].as_mut() {
                s.in_degree -= 1;
                if s.in_degree == 0 {
                    self.ready.insert(succ);
                }
            }
        }
        true
    }

    /// Removes several skills, returning how many were present.
    pub fn remove_all<'a>(&mut self, skills: impl IntoIterator<Item = &'a Skill>) -> usize {
        skills.into_iter().filter(|s| self.remove(s)).count()
    }

    /// Executable skills: live nodes with in-degree zero, in insertion order.
    pub fn frontier(&self) -> Vec<Skill> {
        self.ready
            .iter()
            .filter_map(|id| self.nodes[id.0].as_ref())
            .map(|n| n.skill.clone())
            .collect()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.live_nodes()
            .map(|(_, n)| n.successors.iter().filter(|s| self.is_live(**s)).count())
            .sum()
    }

    /// Whether every node has been removed.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether the skill is a live node.
    pub fn contains(&self, skill: &Skill) -> bool {
        self.index.contains_key(skill)
    }

    /// Node id of a live skill.
    pub fn node_id(&self, skill: &Skill) -> Option<NodeId> {
        self.index.get(skill).copied()
    }

    /// Skill of a live node.
    pub fn skill(&self, id: NodeId) -> Option<&Skill> {
        self.nodes.get(id.0)?.as_ref().map(|n| &n.skill)
    }

    /// Number of unresolved predecessors of a live skill.
    pub fn in_degree(&self, skill: &Skill) -> Option<usize> {
        let id = self.node_id(skill)?;
        self.nodes[id.0].as_ref().map(|n| n.in_degree)
    }

    /// Live skills in insertion order.
    pub fn skills(&self) -> Vec<Skill> {
        self.live_nodes().map(|(_, n)| n.skill.clone()).collect()
    }

    /// Live edges as (predecessor, successor) skill pairs.
    pub fn edges(&self) -> Vec<(Skill, Skill)> {
        let mut out = Vec::new();
        for (_, node) in self.live_nodes() {
            for &succ in &node.successors {
                if let Some(s) = self.skill(succ) {
                    out.push((node.skill.clone(), s.clone()));
                }
            }
        }
        out
    }

    /// Topological order of live skills, or `None` if a cycle exists.
    ///
    /// Ties are broken by insertion order.
    pub fn topological_order(&self) -> Option<Vec<Skill>> {
        let mut in_degree: HashMap<NodeId, usize> = self
            .live_nodes()
            .map(|(id, n)| (id, n.in_degree))
            .collect();
        let mut queue: VecDeque<NodeId> = self.ready.iter().copied().collect();
        let mut order = Vec::with_capacity(self.live);

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes[id.0].as_ref() else {
                continue;
            };
            order.push(node.skill.clone());
            for succ in &node.successors {
                if let Some(d) = in_degree.get_mut(succ) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(*succ);
                    }
                }
            }
        }

        (order.len() == self.live).then_some(order)
    }

    /// Whether the graph contains no directed cycle.
    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_some()
    }

    /// Serializable snapshot of the live graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        let position: HashMap<NodeId, usize> = self
            .live_nodes()
            .enumerate()
            .map(|(pos, (id, _))| (id, pos))
            .collect();

        let mut edges = Vec::new();
        for (id, node) in self.live_nodes() {
            for succ in &node.successors {
                if let Some(&to) = position.get(succ) {
                    edges.push((position[&id], to));
                }
            }
        }

        GraphSnapshot {
            skills: self.skills(),
            edges,
        }
    }

    fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i), n)))
    }

    fn is_live(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes
            .get(id.0)
            .and_then(|n| n.as_ref())
            .ok_or(GraphError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn skills(names: &[&str]) -> Vec<Skill> {
        names.iter().map(|&n| Skill::new(n)).collect()
    }

    fn chain(names: &[&str]) -> PrecedenceGraph {
        let s = skills(names);
        let mut g = PrecedenceGraph::from_skills(&s);
        for w in s.windows(2) {
            g.add_dependency(&w[0], &w[1]).unwrap();
        }
        g
    }

    #[test]
    fn test_frontier_in_insertion_order() {
        let s = skills(&["A", "B", "C"]);
        let mut g = PrecedenceGraph::from_skills(&s);
        g.add_dependency(&s[0], &s[1]).unwrap();

        assert_eq!(g.frontier(), skills(&["A", "C"]));
        assert_eq!(g.in_degree(&s[1]), Some(1));
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let s = skills(&["A", "B", "A"]);
        let g = PrecedenceGraph::from_skills(&s);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_id(&s[2]), Some(NodeId(0)));
    }

    #[test]
    fn test_self_loop_rejected() {
        let s = skills(&["A"]);
        let mut g = PrecedenceGraph::from_skills(&s);
        let err = g.add_dependency(&s[0], &s[0]).unwrap_err();
        assert_eq!(err, GraphError::SelfLoop(s[0].clone()));
    }

    #[test]
    fn test_duplicate_edge_idempotent() {
        let s = skills(&["A", "B"]);
        let mut g = PrecedenceGraph::from_skills(&s);
        assert!(g.add_dependency(&s[0], &s[1]).unwrap());
        assert!(!g.add_dependency(&s[0], &s[1]).unwrap());
        assert_eq!(g.in_degree(&s[1]), Some(1));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_removal_unblocks_successors() {
        let mut g = chain(&["A", "B", "C"]);
        assert_eq!(g.frontier(), skills(&["A"]));

        assert!(g.remove(&Skill::new("A")));
        assert_eq!(g.frontier(), skills(&["B"]));
        assert_eq!(g.node_count(), 2);
        assert!(!g.remove(&Skill::new("A")));
    }

    #[test]
    fn test_cycle_detection() {
        let s = skills(&["A", "B", "C"]);
        let mut g = PrecedenceGraph::from_skills(&s);
        g.add_dependency(&s[0], &s[1]).unwrap();
        g.add_dependency(&s[1], &s[2]).unwrap();
        assert!(g.is_acyclic());

        g.add_dependency(&s[2], &s[0]).unwrap();
        assert!(!g.is_acyclic());
        assert!(g.frontier().is_empty());
    }

    #[test]
    fn test_topological_order_chain() {
        let g = chain(&["A", "B", "C"]);
        assert_eq!(g.topological_order(), Some(skills(&["A", "B", "C"])));
    }

    #[test]
    fn test_empty_graph() {
        let g = PrecedenceGraph::new();
        assert!(g.is_empty());
        assert!(g.frontier().is_empty());
        assert_eq!(g.topological_order(), Some(Vec::new()));
    }

    #[test]
    fn test_snapshot_round_trip_after_removal() {
        let mut g = chain(&["A", "B", "C"]);
        g.remove(&Skill::new("A"));

        let snap = g.snapshot();
        assert_eq!(snap.skills, skills(&["B", "C"]));
        assert_eq!(snap.edges, vec![(0, 1)]);

        let json = serde_json::to_string(&snap).unwrap();
        let back: GraphSnapshot = serde_json::from_str(&json).unwrap();
        let restored = PrecedenceGraph::from_snapshot(&back).unwrap();
        assert_eq!(restored.frontier(), skills(&["B"]));
        assert_eq!(restored.edges(), g.edges());
    }

    #[test]
    fn test_snapshot_rejects_bad_index_and_cycle() {
        let bad = GraphSnapshot {
            skills: skills(&["A"]),
            edges: vec![(0, 3)],
        };
        assert_eq!(
            PrecedenceGraph::from_snapshot(&bad).unwrap_err(),
            GraphError::SnapshotIndex(0, 3)
        );

        let cyclic = GraphSnapshot {
            skills: skills(&["A", "B"]),
            edges: vec![(0, 1), (1, 0)],
        };
        assert_eq!(
            PrecedenceGraph::from_snapshot(&cyclic).unwrap_err(),
            GraphError::SnapshotCycle
        );
    }

    fn forward_edges() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..10).prop_flat_map(|n| {
            let edges = proptest::collection::vec((0..n, 0..n), 0..20).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .filter(|(a, b)| a < b)
                    .collect::<Vec<_>>()
            });
            (Just(n), edges)
        })
    }

    proptest! {
        #[test]
        fn prop_frontier_is_exactly_in_degree_zero((n, edges) in forward_edges()) {
            let s: Vec<Skill> = (0..n).map(|i| Skill::new(format!("s{i}"))).collect();
            let mut g = PrecedenceGraph::from_skills(&s);
            for (a, b) in &edges {
                g.add_dependency(&s[*a], &s[*b]).unwrap();
            }

            let frontier = g.frontier();
            for skill in &s {
                let zero = !edges.iter().any(|(_, b)| s[*b] == *skill);
                prop_assert_eq!(frontier.contains(skill), zero);
            }

            g.remove_all(&frontier);
            let next = g.frontier();
            prop_assert!(next.iter().all(|x| !frontier.contains(x)));
            prop_assert!(g.is_acyclic());
        }

        #[test]
        fn prop_draining_frontier_empties_dag((n, edges) in forward_edges()) {
            let s: Vec<Skill> = (0..n).map(|i| Skill::new(format!("s{i}"))).collect();
            let mut g = PrecedenceGraph::from_skills(&s);
            for (a, b) in &edges {
                g.add_dependency(&s[*a], &s[*b]).unwrap();
            }

            let mut rounds = 0;
            while !g.is_empty() {
                let frontier = g.frontier();
                prop_assert!(!frontier.is_empty());
                g.remove_all(&frontier);
                rounds += 1;
            }
            prop_assert!(rounds <= n);
        }
    }
}
