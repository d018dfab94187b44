mod breakpoint;
mod grid;
mod routing;
mod solder;
pub(crate) mod types;

pub use breakpoint::resolve_breakpoint;
pub use grid::{GridError, resolve_panel_rect};
pub use solder::solder_point;
pub use types::*;

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::config::Config;
use crate::ir::{Board, Breakpoint, Connection, ContainerSize, Side};
use routing::{Obstacle, RouteContext, route_trace};

/// Recoverable per-panel / per-connection conditions. A layout pass never
/// aborts on one of these; the offending panel or connection is skipped
/// and the condition is reported alongside the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutIssue {
    #[error("container dimensions must be positive, got {width}x{height}")]
    Container { width: f32, height: f32 },
    #[error("panel {panel}: {source}")]
    Configuration { panel: String, source: GridError },
    #[error("connection {index} references unknown panel {panel}")]
    UnknownPanel { index: usize, panel: String },
    #[error("connection {index} connects panel {panel} to itself")]
    SelfConnection { index: usize, panel: String },
}

/// Result of one full layout pass.
#[derive(Debug, Clone)]
pub struct Layout {
    pub breakpoint: Breakpoint,
    pub container: ContainerSize,
    pub panels: BTreeMap<String, PanelRect>,
    pub traces: Vec<TracePath>,
    pub issues: Vec<LayoutIssue>,
}

/// A validated connection with both solder points resolved, ready for
/// routing.
#[derive(Debug, Clone)]
pub(crate) struct PlannedTrace {
    pub(crate) connection: Connection,
    pub(crate) start: (f32, f32),
    pub(crate) end: (f32, f32),
}

/// Everything the pipeline resolves ahead of routing. The engine builds
/// its cache key from this and only routes on a miss.
#[derive(Debug)]
pub(crate) struct ResolvedGeometry {
    pub(crate) breakpoint: Breakpoint,
    pub(crate) container: ContainerSize,
    pub(crate) panels: BTreeMap<String, PanelRect>,
    pub(crate) planned: Vec<PlannedTrace>,
    pub(crate) issues: Vec<LayoutIssue>,
}

impl ResolvedGeometry {
    pub(crate) fn into_layout(self, traces: Vec<TracePath>) -> Layout {
        Layout {
            breakpoint: self.breakpoint,
            container: self.container,
            panels: self.panels,
            traces,
            issues: self.issues,
        }
    }
}

pub(crate) fn resolve_geometry(
    board: &Board,
    config: &Config,
    container: ContainerSize,
) -> ResolvedGeometry {
    let breakpoint = resolve_breakpoint(container.width, &config.grid);
    let mut issues = Vec::new();

    let mut panels: BTreeMap<String, PanelRect> = BTreeMap::new();
    if container.width <= 0.0 || container.height <= 0.0 {
        // Reported once; every panel would fail the same way.
        issues.push(LayoutIssue::Container {
            width: container.width,
            height: container.height,
        });
    } else {
        for (id, spec) in &board.panels {
            match resolve_panel_rect(spec.position_for(breakpoint), &config.grid, container) {
                Ok(rect) => {
                    panels.insert(id.clone(), rect);
                }
                Err(source) => issues.push(LayoutIssue::Configuration {
                    panel: id.clone(),
                    source,
                }),
            }
        }
    }

    let mut valid: Vec<&Connection> = Vec::new();
    for (index, connection) in board.connections.iter().enumerate() {
        if connection.from_panel == connection.to_panel {
            issues.push(LayoutIssue::SelfConnection {
                index,
                panel: connection.from_panel.clone(),
            });
            continue;
        }
        let missing = [&connection.from_panel, &connection.to_panel]
            .into_iter()
            .find(|id| !panels.contains_key(*id));
        if let Some(panel) = missing {
            issues.push(LayoutIssue::UnknownPanel {
                index,
                panel: panel.clone(),
            });
            continue;
        }
        valid.push(connection);
    }

    // Each (panel, side) pair shares its solder slots between every valid
    // trace endpoint landing on it, in connection list order. Totals are
    // counted after invalid connections are dropped so a skipped
    // connection never leaves a gap in the split.
    let mut totals: HashMap<(&str, Side), usize> = HashMap::new();
    for connection in &valid {
        *totals
            .entry((connection.from_panel.as_str(), connection.from_side))
            .or_insert(0) += 1;
        *totals
            .entry((connection.to_panel.as_str(), connection.to_side))
            .or_insert(0) += 1;
    }

    let min_dist = config.routing.min_solder_distance;
    let mut counters: HashMap<(&str, Side), usize> = HashMap::new();
    let mut planned = Vec::with_capacity(valid.len());
    for connection in &valid {
        let (Some(from_rect), Some(to_rect)) = (
            panels.get(&connection.from_panel),
            panels.get(&connection.to_panel),
        ) else {
            continue;
        };
        let start = next_slot(
            from_rect,
            connection.from_panel.as_str(),
            connection.from_side,
            &totals,
            &mut counters,
            min_dist,
        );
        let end = next_slot(
            to_rect,
            connection.to_panel.as_str(),
            connection.to_side,
            &totals,
            &mut counters,
            min_dist,
        );
        planned.push(PlannedTrace {
            connection: (*connection).clone(),
            start,
            end,
        });
    }

    ResolvedGeometry {
        breakpoint,
        container,
        panels,
        planned,
        issues,
    }
}

fn next_slot<'a>(
    rect: &PanelRect,
    panel: &'a str,
    side: Side,
    totals: &HashMap<(&'a str, Side), usize>,
    counters: &mut HashMap<(&'a str, Side), usize>,
    min_dist: f32,
) -> (f32, f32) {
    let key = (panel, side);
    let total = totals.get(&key).copied().unwrap_or(1);
    let index = counters.entry(key).or_insert(0);
    let slot = *index;
    *index += 1;
    solder_point(rect, side, slot, total, min_dist).as_tuple()
}

pub(crate) fn route_all(geometry: &ResolvedGeometry, config: &Config) -> Vec<TracePath> {
    let obstacles: Vec<Obstacle> = geometry
        .panels
        .iter()
        .map(|(id, rect)| Obstacle {
            id: id.clone(),
            rect: *rect,
        })
        .collect();

    geometry
        .planned
        .iter()
        .map(|trace| {
            let routed = route_trace(&RouteContext {
                from_id: &trace.connection.from_panel,
                to_id: &trace.connection.to_panel,
                from_side: trace.connection.from_side,
                to_side: trace.connection.to_side,
                start: trace.start,
                end: trace.end,
                obstacles: &obstacles,
                config: &config.routing,
            });
            TracePath {
                from_panel: trace.connection.from_panel.clone(),
                from_side: trace.connection.from_side,
                to_panel: trace.connection.to_panel.clone(),
                to_side: trace.connection.to_side,
                points: routed.points,
                collision: routed.collision,
            }
        })
        .collect()
}

/// Run the full pipeline once, uncached: breakpoint resolution, panel
/// rectangles, solder placement, then routing.
pub fn compute_layout(board: &Board, config: &Config, container: ContainerSize) -> Layout {
    let geometry = resolve_geometry(board, config, container);
    let traces = route_all(&geometry, config);
    geometry.into_layout(traces)
}
