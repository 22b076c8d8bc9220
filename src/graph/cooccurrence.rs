//! Word co-occurrence graph
//!
//! Nodes are lowercase words; an edge counts how often two words appear in
//! the same candidate phrase. Unlike a TextRank window graph, self
//! co-occurrence is recorded, so a node's degree equals the summed length of
//! every phrase it occurs in. That is the quantity RAKE needs.

use rustc_hash::FxHashMap;

/// A node in the co-occurrence graph
#[derive(Debug, Clone)]
pub struct WordNode {
    /// The lowercase word for this node
    pub word: String,
    /// Number of phrase occurrences of the word
    pub frequency: u32,
    /// Adjacency list: target node ID -> co-occurrence count
    pub edges: FxHashMap<u32, f64>,
}

impl WordNode {
    /// Create a new node
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            frequency: 0,
            edges: FxHashMap::default(),
        }
    }

    /// Sum of edge weights, self co-occurrence included
    pub fn degree(&self) -> f64 {
        self.edges.values().sum()
    }
}

/// A co-occurrence graph built phrase by phrase
#[derive(Debug, Default)]
pub struct CooccurrenceGraph {
    /// Maps word -> node ID
    word_to_id: FxHashMap<String, u32>,
    /// Node storage
    nodes: Vec<WordNode>,
}

impl CooccurrenceGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            word_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Get or create a node for the given word, returning its ID
    pub fn get_or_create_node(&mut self, word: &str) -> u32 {
        if let Some(&id) = self.word_to_id.get(word) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.word_to_id.insert(word.to_string(), id);
        self.nodes.push(WordNode::new(word));
        id
    }

    /// Increment the edge weight between two nodes
    ///
    /// Self-loops are kept; a non-loop edge is added in both directions.
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: f64) {
        if let Some(node) = self.nodes.get_mut(from as usize) {
            *node.edges.entry(to).or_insert(0.0) += weight;
        }
        if from == to {
            return;
        }
        if let Some(node) = self.nodes.get_mut(to as usize) {
            *node.edges.entry(from).or_insert(0.0) += weight;
        }
    }

    /// Record one phrase occurrence given its lowercase words
    ///
    /// Every word's frequency goes up by one and every ordered word pair in
    /// the phrase (including each word with itself) co-occurs once.
    pub fn add_phrase<S: AsRef<str>>(&mut self, words: &[S]) {
        let ids: Vec<u32> = words
            .iter()
            .map(|w| self.get_or_create_node(w.as_ref()))
            .collect();

        for &id in &ids {
            if let Some(node) = self.nodes.get_mut(id as usize) {
                node.frequency += 1;
            }
        }
        for (i, &a) in ids.iter().enumerate() {
            self.increment_edge(a, a, 1.0);
            for &b in &ids[i + 1..] {
                self.increment_edge(a, b, 1.0);
            }
        }
    }

    /// Degree-to-frequency ratio of a word, or 0.0 if the word is unknown
    pub fn word_score(&self, word: &str) -> f64 {
        self.get_node_id(word)
            .and_then(|id| self.get_node(id))
            .filter(|node| node.frequency > 0)
            .map(|node| node.degree() / f64::from(node.frequency))
            .unwrap_or(0.0)
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&WordNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by word
    pub fn get_node_id(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &WordNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_node() {
        let mut graph = CooccurrenceGraph::new();

        let id_a = graph.get_or_create_node("hobbit");
        let id_b = graph.get_or_create_node("ring");
        let id_c = graph.get_or_create_node("hobbit"); // duplicate

        assert_eq!(id_a, id_c);
        assert_ne!(id_a, id_b);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_edge_incrementing() {
        let mut graph = CooccurrenceGraph::new();

        let id_a = graph.get_or_create_node("powerful");
        let id_b = graph.get_or_create_node("ring");

        graph.increment_edge(id_a, id_b, 1.0);
        graph.increment_edge(id_a, id_b, 1.0);

        // Should have weight 2.0 in both directions
        assert_eq!(graph.get_node(id_a).unwrap().edges.get(&id_b), Some(&2.0));
        assert_eq!(graph.get_node(id_b).unwrap().edges.get(&id_a), Some(&2.0));
    }

    #[test]
    fn test_self_loops_counted_once() {
        let mut graph = CooccurrenceGraph::new();
        let id = graph.get_or_create_node("ring");

        graph.increment_edge(id, id, 1.0);

        assert_eq!(graph.get_node(id).unwrap().edges.get(&id), Some(&1.0));
    }

    #[test]
    fn test_degree_is_summed_phrase_length() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_phrase(&["powerful", "ring"]);
        graph.add_phrase(&["ring"]);
        graph.add_phrase(&["hobbit", "named", "frodo"]);

        let ring = graph.get_node(graph.get_node_id("ring").unwrap()).unwrap();
        assert_eq!(ring.frequency, 2);
        // 2 (powerful ring) + 1 (ring)
        assert_eq!(ring.degree(), 3.0);

        let frodo = graph.get_node(graph.get_node_id("frodo").unwrap()).unwrap();
        assert_eq!(frodo.frequency, 1);
        assert_eq!(frodo.degree(), 3.0);
    }

    #[test]
    fn test_word_score() {
        let mut graph = CooccurrenceGraph::new();
        graph.add_phrase(&["powerful", "ring"]);
        graph.add_phrase(&["ring"]);

        assert!((graph.word_score("ring") - 1.5).abs() < f64::EPSILON);
        assert!((graph.word_score("powerful") - 2.0).abs() < f64::EPSILON);
        assert_eq!(graph.word_score("missing"), 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let graph = CooccurrenceGraph::with_capacity(8);
        assert!(graph.is_empty());
        assert_eq!(graph.nodes().count(), 0);
    }
}
