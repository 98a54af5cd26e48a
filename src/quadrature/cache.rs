//! Memoized collocation rules keyed by (node count, family).

use std::collections::HashMap;
use std::sync::Arc;

use super::rule::{Quadrature, QuadratureType, quadrature_factory};
use crate::error::Result;

/// Cache of collocation rules.
///
/// Rules are immutable once built, so they are shared as `Arc<Quadrature>`
/// between every sweeper that asks for the same (count, family) pair.
#[derive(Debug, Default)]
pub struct QuadratureCache {
    rules: HashMap<(usize, QuadratureType), Arc<Quadrature>>,
}

impl QuadratureCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached rule, building it on first request.
    pub fn get(&mut self, num_nodes: usize, family: QuadratureType) -> Result<Arc<Quadrature>> {
        if let Some(rule) = self.rules.get(&(num_nodes, family)) {
            return Ok(Arc::clone(rule));
        }
        let rule = Arc::new(quadrature_factory(num_nodes, family)?);
        self.rules.insert((num_nodes, family), Arc::clone(&rule));
        Ok(rule)
    }

    /// Number of cached rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
