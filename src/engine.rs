use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheStats, LayoutCache, cache_key};
use crate::config::Config;
use crate::ir::{Board, Connection, ContainerSize, PanelSpec};
use crate::layout::{self, Layout};

/// The trigger kinds the orchestrator reacts to. Kinds outside the
/// configured enabled set are ignored entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Resize,
    PanelChange,
    ConnectionChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Computing,
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    container: ContainerSize,
    deadline: Instant,
}

/// Owns the recomputation lifecycle: filters triggers, debounces resize
/// bursts, and drives breakpoint resolution → panel rectangles → solder
/// placement → cache lookup → routing.
///
/// Everything is synchronous and clock-injected: resize debouncing is a
/// stored deadline, and the embedding event loop ticks it via [`poll`].
/// A later resize before the deadline replaces the pending one
/// (last-write-wins), so a resize burst costs one recomputation.
///
/// [`poll`]: LayoutEngine::poll
#[derive(Debug)]
pub struct LayoutEngine {
    board: Board,
    config: Config,
    container: ContainerSize,
    cache: LayoutCache,
    pending_resize: Option<PendingResize>,
    state: EngineState,
    layout: Option<Layout>,
}

impl LayoutEngine {
    pub fn new(board: Board, config: Config, container: ContainerSize) -> Self {
        let cache = LayoutCache::new(config.cache.history);
        Self {
            board,
            config,
            container,
            cache,
            pending_resize: None,
            state: EngineState::Idle,
            layout: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    /// The most recent result, if any pass has run.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }

    fn enabled(&self, trigger: Trigger) -> bool {
        let triggers = &self.config.engine.enabled_triggers;
        match trigger {
            Trigger::Resize => triggers.resize,
            Trigger::PanelChange => triggers.panel_change,
            Trigger::ConnectionChange => triggers.connection_change,
        }
    }

    /// Record a resize. The recomputation is deferred by the configured
    /// debounce window; a newer resize supersedes the pending one.
    pub fn on_resize(&mut self, container: ContainerSize, now: Instant) {
        if !self.enabled(Trigger::Resize) {
            return;
        }
        let deadline = now + Duration::from_millis(self.config.engine.debounce_ms);
        self.pending_resize = Some(PendingResize {
            container,
            deadline,
        });
    }

    /// Fire the pending resize once its deadline has passed. Returns the
    /// fresh layout when a recomputation ran.
    pub fn poll(&mut self, now: Instant) -> Option<&Layout> {
        let pending = self.pending_resize?;
        if now < pending.deadline {
            return None;
        }
        self.pending_resize = None;
        self.container = pending.container;
        Some(self.recompute())
    }

    /// Replace the panel set. Recomputes immediately when the
    /// panel-change trigger is enabled; otherwise only the stored inputs
    /// change and a later enabled trigger picks them up.
    pub fn on_panels_changed(&mut self, panels: BTreeMap<String, PanelSpec>) -> Option<&Layout> {
        self.board.panels = panels;
        if !self.enabled(Trigger::PanelChange) {
            return None;
        }
        Some(self.recompute())
    }

    /// Replace the connection list; immediate, like panel changes.
    pub fn on_connections_changed(&mut self, connections: Vec<Connection>) -> Option<&Layout> {
        self.board.connections = connections;
        if !self.enabled(Trigger::ConnectionChange) {
            return None;
        }
        Some(self.recompute())
    }

    /// Run the pipeline unconditionally, bypassing trigger filtering (but
    /// not the cache). Used for the initial computation.
    pub fn refresh(&mut self) -> &Layout {
        self.recompute()
    }

    fn recompute(&mut self) -> &Layout {
        self.state = EngineState::Computing;
        let geometry = layout::resolve_geometry(&self.board, &self.config, self.container);
        let key = cache_key(&geometry.panels, &self.board.connections, self.container);
        let cached = self.cache.get(&key).map(|hit| hit.to_vec());
        let traces = match cached {
            Some(traces) => traces,
            None => {
                let routed = layout::route_all(&geometry, &self.config);
                self.cache.insert(key, routed.clone());
                routed
            }
        };
        let next = geometry.into_layout(traces);
        self.state = EngineState::Idle;
        self.layout.insert(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{GridPosition, Side};

    fn position(column_start: u32, row_start: u32, column_span: u32, row_span: u32) -> GridPosition {
        GridPosition {
            column_start,
            row_start,
            column_span,
            row_span,
        }
    }

    fn board() -> Board {
        let mut board = Board::new();
        board.add_panel("a", position(1, 1, 2, 1));
        board.add_panel("b", position(11, 1, 2, 1));
        board.add_connection(Connection {
            from_panel: "a".to_string(),
            from_side: Side::Right,
            to_panel: "b".to_string(),
            to_side: Side::Left,
        });
        board
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(board(), Config::default(), ContainerSize::new(1280.0, 800.0))
    }

    #[test]
    fn refresh_populates_the_layout() {
        let mut engine = engine();
        assert!(engine.layout().is_none());
        let layout = engine.refresh();
        assert_eq!(layout.traces.len(), 1);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn unchanged_inputs_hit_the_cache() {
        let mut engine = engine();
        engine.refresh();
        engine.refresh();
        let stats = engine.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn resize_is_debounced_and_coalesced() {
        let mut engine = engine();
        engine.refresh();
        let t0 = Instant::now();

        engine.on_resize(ContainerSize::new(900.0, 700.0), t0);
        engine.on_resize(ContainerSize::new(800.0, 600.0), t0 + Duration::from_millis(100));
        // Still inside the window measured from the second event.
        assert!(engine.poll(t0 + Duration::from_millis(550)).is_none());

        let layout = engine
            .poll(t0 + Duration::from_millis(700))
            .expect("deadline passed");
        assert_eq!(layout.container.width, 800.0);
        assert!(!engine.has_pending_resize());
        // Exactly one recomputation for the burst.
        assert_eq!(engine.cache_stats().misses, 2);
    }

    #[test]
    fn disabled_resize_trigger_is_ignored_entirely() {
        let mut config = Config::default();
        config.engine.enabled_triggers.resize = false;
        let mut engine =
            LayoutEngine::new(board(), config, ContainerSize::new(1280.0, 800.0));
        engine.refresh();
        let t0 = Instant::now();
        engine.on_resize(ContainerSize::new(400.0, 600.0), t0);
        assert!(!engine.has_pending_resize());
        assert!(engine.poll(t0 + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn panel_change_recomputes_immediately() {
        let mut engine = engine();
        engine.refresh();
        let mut panels = engine.board().panels.clone();
        if let Some(panel) = panels.get_mut("a") {
            panel.desktop = position(1, 2, 2, 1);
        }
        let layout = engine.on_panels_changed(panels).expect("trigger enabled");
        assert_eq!(layout.panels.get("a").map(|r| r.y > 100.0), Some(true));
        assert_eq!(engine.cache_stats().misses, 2);
    }

    #[test]
    fn connection_change_recomputes_immediately() {
        let mut engine = engine();
        engine.refresh();
        let layout = engine
            .on_connections_changed(Vec::new())
            .expect("trigger enabled");
        assert!(layout.traces.is_empty());
    }

    #[test]
    fn disabled_panel_trigger_still_updates_inputs() {
        let mut config = Config::default();
        config.engine.enabled_triggers.panel_change = false;
        let mut engine =
            LayoutEngine::new(board(), config, ContainerSize::new(1280.0, 800.0));
        engine.refresh();
        let mut panels = engine.board().panels.clone();
        if let Some(panel) = panels.get_mut("a") {
            panel.desktop = position(1, 3, 2, 1);
        }
        assert!(engine.on_panels_changed(panels).is_none());
        // The next explicit pass sees the new panel set.
        let layout = engine.refresh();
        assert!(layout.panels.get("a").map(|r| r.y > 100.0).unwrap_or(false));
    }
}
