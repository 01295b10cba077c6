//! Memo for lazily loaded components
//!
//! Keeps components produced by deferred loaders, keyed by route, with LRU
//! eviction. Only consulted by a resolver built with
//! [`ComponentResolver::memoized`](crate::ComponentResolver::memoized).

use crate::route::RouteId;
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Memo performance statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU memo of loaded components
#[derive(Debug)]
pub struct ComponentCache<C> {
    entries: LruCache<RouteId, C>,
    stats: CacheStats,
}

impl<C: Clone> ComponentCache<C> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Look up the component loaded for `route`
    pub fn get(&mut self, route: RouteId) -> Option<C> {
        if let Some(component) = self.entries.get(&route) {
            self.stats.hits += 1;
            trace_log!("Component cache hit for route {:?}", route);
            Some(component.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Component cache miss for route {:?}", route);
            None
        }
    }

    /// Remember the component loaded for `route`
    pub fn insert(&mut self, route: RouteId, component: C) {
        if let Some((evicted, _)) = self.entries.push(route, component) {
            if evicted != route {
                self.stats.evictions += 1;
                trace_log!("Evicted component for route {:?}", evicted);
            }
        }
    }

    /// Forget one route's component
    pub fn invalidate(&mut self, route: RouteId) -> bool {
        self.entries.pop(&route).is_some()
    }

    pub fn clear(&mut self) {
        trace_log!("Clearing component cache");
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> ComponentCache<&'static str> {
        ComponentCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache = cache(4);
        assert_eq!(cache.get(RouteId(0)), None);

        cache.insert(RouteId(0), "demo");
        assert_eq!(cache.get(RouteId(0)), Some("demo"));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert!((cache.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = cache(2);
        cache.insert(RouteId(0), "a");
        cache.insert(RouteId(1), "b");
        cache.get(RouteId(0));
        cache.insert(RouteId(2), "c");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.get(RouteId(1)), None);
        assert_eq!(cache.get(RouteId(0)), Some("a"));
    }

    #[test]
    fn test_reinsert_is_not_eviction() {
        let mut cache = cache(2);
        cache.insert(RouteId(0), "a");
        cache.insert(RouteId(0), "a2");
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get(RouteId(0)), Some("a2"));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = cache(4);
        cache.insert(RouteId(0), "a");
        cache.insert(RouteId(1), "b");

        assert!(cache.invalidate(RouteId(0)));
        assert!(!cache.invalidate(RouteId(0)));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }
}
