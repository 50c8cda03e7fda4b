// src/dag/resolver.rs

//! Topological ordering of a [`NodeRegistry`] using Kahn's algorithm.
//!
//! Edge direction: dependency -> dependent. A node's in-degree is the number
//! of distinct dependencies it declares.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::dag::registry::NodeRegistry;
use crate::errors::{DagError, Result};

/// Compute a total order over all registered nodes consistent with their
/// dependencies.
///
/// Fails with [`DagError::MissingDependency`] if any node names an
/// unregistered dependency (checked before anything else), and with
/// [`DagError::CircularDependency`] listing every node that could not be
/// placed if the graph has a cycle.
///
/// Ties are broken by registration order.
pub fn topological_order<T>(registry: &NodeRegistry<T>) -> Result<Vec<String>> {
    ensure_dependencies_exist(registry)?;

    let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(registry.len());
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for node in registry.iter() {
        let mut seen = HashSet::new();
        for dep in node.dependencies.iter().map(String::as_str) {
            if seen.insert(dep) {
                dependents.entry(dep).or_default().push(node.name.as_str());
            }
        }
        in_degree.insert(node.name.as_str(), seen.len());
    }

    let mut queue: VecDeque<&str> = registry
        .iter()
        .map(|node| node.name.as_str())
        .filter(|name| in_degree.get(name) == Some(&0))
        .collect();

    let mut order: Vec<String> = Vec::with_capacity(registry.len());

    while let Some(current) = queue.pop_front() {
        order.push(current.to_string());

        for &dependent in dependents.get(current).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    if order.len() < registry.len() {
        let placed: HashSet<&str> = order.iter().map(String::as_str).collect();
        let unprocessed: Vec<String> = registry
            .names()
            .iter()
            .filter(|name| !placed.contains(name.as_str()))
            .cloned()
            .collect();

        warn!(?unprocessed, "circular dependency detected");
        return Err(DagError::CircularDependency(unprocessed));
    }

    debug!(?order, "topological order resolved");
    Ok(order)
}

fn ensure_dependencies_exist<T>(registry: &NodeRegistry<T>) -> Result<()> {
    for node in registry.iter() {
        for dep in &node.dependencies {
            if !registry.contains(dep) {
                return Err(DagError::MissingDependency {
                    node: node.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}
