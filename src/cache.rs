use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::ir::{Connection, ContainerSize};
use crate::layout::{PanelRect, TracePath};

/// Canonical serialization of every geometry-affecting input. Panels are
/// keyed in map order so declaration order never changes the key;
/// connection order stays significant because it drives solder slot
/// assignment.
pub fn cache_key(
    panels: &BTreeMap<String, PanelRect>,
    connections: &[Connection],
    container: ContainerSize,
) -> String {
    let mut key = String::new();
    for (idx, (id, rect)) in panels.iter().enumerate() {
        if idx > 0 {
            key.push(';');
        }
        key.push_str(&format!(
            "{id}:{:.2},{:.2},{:.2},{:.2}",
            rect.x, rect.y, rect.width, rect.height
        ));
    }
    key.push('|');
    for (idx, connection) in connections.iter().enumerate() {
        if idx > 0 {
            key.push(';');
        }
        key.push_str(&format!(
            "{}.{}->{}.{}",
            connection.from_panel,
            connection.from_side.as_str(),
            connection.to_panel,
            connection.to_side.as_str()
        ));
    }
    key.push('|');
    key.push_str(&format!("{:.2}x{:.2}", container.width, container.height));
    key
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    traces: Vec<TracePath>,
}

/// Memoizes routed traces keyed by [`cache_key`]. Holds a single slot by
/// default; a larger capacity keeps a bounded most-recently-used history.
/// Storing a new key at capacity evicts the oldest entry outright.
#[derive(Debug)]
pub struct LayoutCache {
    entries: VecDeque<CacheEntry>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&[TracePath]> {
        let found = self.entries.iter().position(|entry| entry.key == key);
        match found {
            Some(idx) => {
                self.hits += 1;
                if idx > 0 {
                    if let Some(entry) = self.entries.remove(idx) {
                        self.entries.push_front(entry);
                    }
                }
                self.entries.front().map(|entry| entry.traces.as_slice())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: String, traces: Vec<TracePath>) {
        if let Some(idx) = self.entries.iter().position(|entry| entry.key == key) {
            self.entries.remove(idx);
        }
        self.entries.push_front(CacheEntry { key, traces });
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Side;

    fn rect(x: f32, y: f32) -> PanelRect {
        PanelRect {
            x,
            y,
            width: 100.0,
            height: 50.0,
        }
    }

    fn panels(entries: &[(&str, PanelRect)]) -> BTreeMap<String, PanelRect> {
        entries
            .iter()
            .map(|(id, rect)| (id.to_string(), *rect))
            .collect()
    }

    fn connection(from: &str, to: &str) -> Connection {
        Connection {
            from_panel: from.to_string(),
            from_side: Side::Right,
            to_panel: to.to_string(),
            to_side: Side::Left,
        }
    }

    fn trace() -> TracePath {
        TracePath {
            from_panel: "a".to_string(),
            from_side: Side::Right,
            to_panel: "b".to_string(),
            to_side: Side::Left,
            points: vec![(0.0, 0.0), (10.0, 0.0)],
            collision: false,
        }
    }

    #[test]
    fn key_ignores_panel_declaration_order() {
        let container = ContainerSize::new(1280.0, 800.0);
        let conns = [connection("a", "b")];
        let forward = panels(&[("a", rect(0.0, 0.0)), ("b", rect(200.0, 0.0))]);
        let reversed = panels(&[("b", rect(200.0, 0.0)), ("a", rect(0.0, 0.0))]);
        assert_eq!(
            cache_key(&forward, &conns, container),
            cache_key(&reversed, &conns, container)
        );
    }

    #[test]
    fn key_changes_with_any_geometry_input() {
        let container = ContainerSize::new(1280.0, 800.0);
        let conns = [connection("a", "b")];
        let base = panels(&[("a", rect(0.0, 0.0)), ("b", rect(200.0, 0.0))]);
        let key = cache_key(&base, &conns, container);

        let nudged = panels(&[("a", rect(1.0, 0.0)), ("b", rect(200.0, 0.0))]);
        assert_ne!(key, cache_key(&nudged, &conns, container));

        let more_conns = [connection("a", "b"), connection("b", "a")];
        assert_ne!(key, cache_key(&base, &more_conns, container));

        let resized = ContainerSize::new(1281.0, 800.0);
        assert_ne!(key, cache_key(&base, &conns, resized));
    }

    #[test]
    fn key_keeps_connection_order_significant() {
        let container = ContainerSize::new(1280.0, 800.0);
        let base = panels(&[("a", rect(0.0, 0.0)), ("b", rect(200.0, 0.0))]);
        let ab_ba = [connection("a", "b"), connection("b", "a")];
        let ba_ab = [connection("b", "a"), connection("a", "b")];
        assert_ne!(
            cache_key(&base, &ab_ba, container),
            cache_key(&base, &ba_ab, container)
        );
    }

    #[test]
    fn single_slot_evicts_on_new_key() {
        let mut cache = LayoutCache::new(1);
        cache.insert("first".to_string(), vec![trace()]);
        assert!(cache.get("first").is_some());
        cache.insert("second".to_string(), vec![trace()]);
        assert!(cache.get("first").is_none());
        assert!(cache.get("second").is_some());
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn bounded_history_keeps_recently_used_entries() {
        let mut cache = LayoutCache::new(2);
        cache.insert("a".to_string(), vec![trace()]);
        cache.insert("b".to_string(), vec![trace()]);
        // Touch "a" so "b" is the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), vec![trace()]);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let mut cache = LayoutCache::new(1);
        assert!(cache.get("missing").is_none());
        cache.insert("key".to_string(), vec![trace()]);
        assert!(cache.get("key").is_some());
        assert!(cache.get("key").is_some());
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }
}
