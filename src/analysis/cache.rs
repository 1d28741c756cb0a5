use std::collections::HashMap;

use crate::types::{CacheKey, ChartData};

/// Memoises aggregated charts per group and metric
#[derive(Clone)]
pub struct ChartCache {
    cache: HashMap<CacheKey, ChartData>,
}

impl ChartCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Store a chart in the cache
    pub fn store(&mut self, key: CacheKey, chart: ChartData) {
        self.cache.insert(key, chart);
    }

    /// Retrieve a chart from the cache
    pub fn get(&self, key: &CacheKey) -> Option<&ChartData> {
        self.cache.get(key)
    }

    /// Drop every cached chart, e.g. after new data was loaded
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for ChartCache {
    fn default() -> Self {
        Self::new()
    }
}
