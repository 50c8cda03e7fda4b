// src/dag/node.rs

//! A single schedulable unit of work.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a node executor.
pub type NodeFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Zero-argument asynchronous work function attached to a node.
///
/// The scheduler never looks at the produced value; it only distinguishes
/// `Ok` from `Err`.
pub type NodeExecutor<T> = Arc<dyn Fn() -> NodeFuture<T> + Send + Sync>;

/// Wrap an async closure as a [`NodeExecutor`].
///
/// ```
/// use stagedag::dag::node_executor;
///
/// let exec = node_executor(|| async { Ok::<_, anyhow::Error>(42) });
/// # let _ = exec;
/// ```
pub fn node_executor<T, F, Fut>(f: F) -> NodeExecutor<T>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    Arc::new(move || -> NodeFuture<T> { Box::pin(f()) })
}

/// Named unit of work plus the names of the nodes it depends on.
pub struct WorkNode<T> {
    /// Unique identifier within one registry.
    pub name: String,
    /// Nodes that must complete successfully before this one may run.
    pub dependencies: Vec<String>,
    pub executor: NodeExecutor<T>,
}

impl<T> WorkNode<T> {
    /// A node with no dependencies. Add some with [`after`](Self::after).
    pub fn new(name: impl Into<String>, executor: NodeExecutor<T>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            executor,
        }
    }

    /// Declare a dependency. Repeated names are only recorded once.
    pub fn after(mut self, dependency: impl Into<String>) -> Self {
        let dependency = dependency.into();
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        self
    }

    /// Declare several dependencies at once.
    pub fn with_dependencies<I, S>(self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        dependencies.into_iter().fold(self, |node, dep| node.after(dep))
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }
}

impl<T> Clone for WorkNode<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            dependencies: self.dependencies.clone(),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<T> fmt::Debug for WorkNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkNode")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
