use std::cmp::Ordering;

use crate::config::RoutingConfig;
use crate::ir::Side;

use super::types::PanelRect;

// ── Geometry tolerances ─────────────────────────────────────────────
/// Below this, coordinates are treated as equal.
const EPSILON: f32 = 1e-4;

/// A panel rectangle a trace must not cross. The two endpoint panels are
/// never obstacles for their own trace.
#[derive(Debug, Clone)]
pub(super) struct Obstacle {
    pub(super) id: String,
    pub(super) rect: PanelRect,
}

#[derive(Debug)]
pub(super) struct RouteContext<'a> {
    pub(super) from_id: &'a str,
    pub(super) to_id: &'a str,
    pub(super) from_side: Side,
    pub(super) to_side: Side,
    pub(super) start: (f32, f32),
    pub(super) end: (f32, f32),
    pub(super) obstacles: &'a [Obstacle],
    pub(super) config: &'a RoutingConfig,
}

#[derive(Debug)]
pub(super) struct RoutedTrace {
    pub(super) points: Vec<(f32, f32)>,
    pub(super) collision: bool,
}

#[derive(Debug)]
struct Candidate {
    points: Vec<(f32, f32)>,
    collisions: usize,
    shape_penalty: u32,
    bends: usize,
    manhattan: f32,
    vertical_first: u32,
    second_bend_dist: f32,
}

/// Route one trace between two solder points.
///
/// Candidates are orthogonal polylines with at most two intermediate bend
/// points: the direct segment, both L corners, and Z routes whose middle
/// segment runs along the midline or just past an obstacle edge. The
/// first fully clear candidate family wins; when every candidate crosses
/// something, the one crossing the fewest panels is kept and flagged.
pub(super) fn route_trace(ctx: &RouteContext<'_>) -> RoutedTrace {
    let start = ctx.start;
    let end = ctx.end;
    if points_close(start, end) {
        // Coincident endpoints degenerate to a single segment.
        return RoutedTrace {
            points: vec![start, end],
            collision: false,
        };
    }

    let mut best: Option<Candidate> = None;
    for raw in candidate_polylines(ctx) {
        let candidate = score_candidate(raw, ctx);
        let improves = match &best {
            None => true,
            Some(incumbent) => candidate_order(&candidate, incumbent) == Ordering::Less,
        };
        if improves {
            best = Some(candidate);
        }
    }

    // candidate_polylines always yields the two L corners, so best is set.
    match best {
        Some(candidate) => RoutedTrace {
            collision: candidate.collisions > 0,
            points: candidate.points,
        },
        None => RoutedTrace {
            points: vec![start, end],
            collision: false,
        },
    }
}

fn candidate_polylines(ctx: &RouteContext<'_>) -> Vec<Vec<(f32, f32)>> {
    let start = ctx.start;
    let end = ctx.end;
    let mut candidates: Vec<Vec<(f32, f32)>> = Vec::new();

    let aligned =
        (start.0 - end.0).abs() <= EPSILON || (start.1 - end.1).abs() <= EPSILON;
    if aligned {
        candidates.push(vec![start, end]);
    }

    // L corners, horizontal-first then vertical-first.
    candidates.push(vec![start, (end.0, start.1), end]);
    candidates.push(vec![start, (start.0, end.1), end]);

    // Z routes: middle segment on the midline, or with clearance just
    // outside an intervening panel's edge.
    let pad = ctx.config.detour_pad;
    let mut mid_xs = vec![(start.0 + end.0) / 2.0];
    let mut mid_ys = vec![(start.1 + end.1) / 2.0];
    for obstacle in ctx.obstacles {
        if obstacle.id == ctx.from_id || obstacle.id == ctx.to_id {
            continue;
        }
        mid_xs.push(obstacle.rect.x - pad);
        mid_xs.push(obstacle.rect.right() + pad);
        mid_ys.push(obstacle.rect.y - pad);
        mid_ys.push(obstacle.rect.bottom() + pad);
    }
    for mid in mid_xs {
        candidates.push(vec![start, (mid, start.1), (mid, end.1), end]);
    }
    for mid in mid_ys {
        candidates.push(vec![start, (start.0, mid), (end.0, mid), end]);
    }

    candidates
}

fn score_candidate(raw: Vec<(f32, f32)>, ctx: &RouteContext<'_>) -> Candidate {
    let points = compress_path(&raw);
    let collisions = colliding_panels(&points, ctx.obstacles, ctx.from_id, ctx.to_id);
    let shape_penalty = shape_penalty(&points, ctx.from_side, ctx.to_side);
    let bends = path_bend_count(&points);
    let manhattan = manhattan_length(&points);
    let vertical_first = match first_segment_direction(&points) {
        Some(dir) if dir.1.abs() > EPSILON => 1,
        _ => 0,
    };
    let second_bend_dist = if points.len() > 2 {
        let bend = points[points.len() - 2];
        (ctx.end.0 - bend.0).abs() + (ctx.end.1 - bend.1).abs()
    } else {
        0.0
    };
    Candidate {
        points,
        collisions,
        shape_penalty,
        bends,
        manhattan,
        vertical_first,
        second_bend_dist,
    }
}

/// Fixed preference order: fewest colliding panels, exit-compatible shape,
/// fewest bends, shortest Manhattan length, horizontal-first exit, second
/// bend closest to the destination. Candidates compare strictly so the
/// earliest-generated of an exact tie is kept.
fn candidate_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.collisions
        .cmp(&b.collisions)
        .then(a.shape_penalty.cmp(&b.shape_penalty))
        .then(a.bends.cmp(&b.bends))
        .then(a.manhattan.total_cmp(&b.manhattan))
        .then(a.vertical_first.cmp(&b.vertical_first))
        .then(a.second_bend_dist.total_cmp(&b.second_bend_dist))
}

/// Number of distinct panels (excluding the endpoints' own) that any
/// segment of the polyline crosses.
pub(super) fn colliding_panels(
    points: &[(f32, f32)],
    obstacles: &[Obstacle],
    from_id: &str,
    to_id: &str,
) -> usize {
    if points.len() < 2 {
        return 0;
    }
    let mut count = 0usize;
    for obstacle in obstacles {
        if obstacle.id == from_id || obstacle.id == to_id {
            continue;
        }
        let hit = points
            .windows(2)
            .any(|segment| segment_intersects_rect(segment[0], segment[1], &obstacle.rect));
        if hit {
            count += 1;
        }
    }
    count
}

/// Penalty for polylines that fight their endpoints' exit vectors: the
/// first segment must not move back into the source panel, and the last
/// segment must not arrive moving away from the destination panel.
fn shape_penalty(points: &[(f32, f32)], from_side: Side, to_side: Side) -> u32 {
    let mut penalty = 0;
    if let Some(dir) = first_segment_direction(points) {
        let exit = from_side.exit_vector();
        if dir.0 * exit.0 + dir.1 * exit.1 < 0.0 {
            penalty += 1;
        }
    }
    if let Some(dir) = last_segment_direction(points) {
        let exit = to_side.exit_vector();
        if dir.0 * exit.0 + dir.1 * exit.1 > 0.0 {
            penalty += 1;
        }
    }
    penalty
}

fn first_segment_direction(points: &[(f32, f32)]) -> Option<(f32, f32)> {
    for segment in points.windows(2) {
        let dx = segment[1].0 - segment[0].0;
        let dy = segment[1].1 - segment[0].1;
        if dx.abs() > EPSILON || dy.abs() > EPSILON {
            return Some((dx.signum(), dy.signum()));
        }
    }
    None
}

fn last_segment_direction(points: &[(f32, f32)]) -> Option<(f32, f32)> {
    for segment in points.windows(2).rev() {
        let dx = segment[1].0 - segment[0].0;
        let dy = segment[1].1 - segment[0].1;
        if dx.abs() > EPSILON || dy.abs() > EPSILON {
            return Some((dx.signum(), dy.signum()));
        }
    }
    None
}

/// Axis-aligned segment vs rectangle. Every segment here is horizontal or
/// vertical, so interval overlap on both axes is an exact test; touching
/// the boundary counts as intersecting.
pub(super) fn segment_intersects_rect(a: (f32, f32), b: (f32, f32), rect: &PanelRect) -> bool {
    let min_x = a.0.min(b.0);
    let max_x = a.0.max(b.0);
    let min_y = a.1.min(b.1);
    let max_y = a.1.max(b.1);
    !(max_x < rect.x || min_x > rect.right() || max_y < rect.y || min_y > rect.bottom())
}

/// Drop coincident points and collinear interior points. Always keeps at
/// least the two endpoints.
pub(super) fn compress_path(points: &[(f32, f32)]) -> Vec<(f32, f32)> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    out.push(points[0]);
    for idx in 1..points.len() - 1 {
        let prev = out[out.len() - 1];
        let curr = points[idx];
        if points_close(prev, curr) {
            continue;
        }
        let next = points[idx + 1];
        let dx1 = curr.0 - prev.0;
        let dy1 = curr.1 - prev.1;
        let dx2 = next.0 - curr.0;
        let dy2 = next.1 - curr.1;
        if (dx1.abs() <= EPSILON && dx2.abs() <= EPSILON)
            || (dy1.abs() <= EPSILON && dy2.abs() <= EPSILON)
        {
            continue;
        }
        out.push(curr);
    }
    let last = points[points.len() - 1];
    if out.len() < 2 || !points_close(last, out[out.len() - 1]) {
        out.push(last);
    }
    out
}

pub(super) fn path_bend_count(points: &[(f32, f32)]) -> usize {
    if points.len() < 3 {
        return 0;
    }
    let mut bends = 0usize;
    for idx in 1..points.len() - 1 {
        let p0 = points[idx - 1];
        let p1 = points[idx];
        let p2 = points[idx + 1];
        let dx1 = p1.0 - p0.0;
        let dy1 = p1.1 - p0.1;
        let dx2 = p2.0 - p1.0;
        let dy2 = p2.1 - p1.1;
        if (dx1.abs() <= EPSILON && dy1.abs() <= EPSILON)
            || (dx2.abs() <= EPSILON && dy2.abs() <= EPSILON)
        {
            continue;
        }
        if (dx1 * dy2 - dy1 * dx2).abs() > EPSILON {
            bends += 1;
        }
    }
    bends
}

pub(super) fn manhattan_length(points: &[(f32, f32)]) -> f32 {
    let mut length = 0.0;
    for segment in points.windows(2) {
        length += (segment[1].0 - segment[0].0).abs() + (segment[1].1 - segment[0].1).abs();
    }
    length
}

fn points_close(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() <= EPSILON && (a.1 - b.1).abs() <= EPSILON
}
