// src/dag/registry.rs

//! Name-keyed storage for [`WorkNode`]s.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dag::node::WorkNode;
use crate::errors::{DagError, Result};

/// Holds every registered node, remembering registration order.
///
/// Registration order is what seeds the resolver's queue, so the computed
/// execution order is stable for a given sequence of `insert` calls.
#[derive(Debug)]
pub struct NodeRegistry<T> {
    nodes: HashMap<String, WorkNode<T>>,
    order: Vec<String>,
}

impl<T> NodeRegistry<T> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Validate and store a node.
    ///
    /// A node registered under an existing name replaces the previous
    /// definition and keeps its original position.
    pub fn insert(&mut self, node: WorkNode<T>) -> Result<()> {
        validate_node(&node)?;

        if self.nodes.contains_key(&node.name) {
            warn!(
                node = %node.name,
                "node registered twice; replacing previous definition"
            );
        } else {
            self.order.push(node.name.clone());
        }

        debug!(
            node = %node.name,
            dependencies = ?node.dependencies,
            "registered node"
        );
        self.nodes.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&WorkNode<T>> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Node names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkNode<T>> {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }
}

impl<T> Default for NodeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_node<T>(node: &WorkNode<T>) -> Result<()> {
    if node.name.trim().is_empty() {
        return Err(DagError::Validation("Node name is required".to_string()));
    }

    if node.dependencies.iter().any(|dep| dep.trim().is_empty()) {
        return Err(DagError::Validation(format!(
            "Node \"{}\" declares an empty dependency name",
            node.name
        )));
    }

    Ok(())
}
