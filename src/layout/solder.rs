use crate::ir::Side;

use super::types::{PanelRect, SolderPoint};

/// Place the `index`-th of `total` solder points along a panel edge.
///
/// Points keep `min_dist` clearance from the corners and split the
/// remaining span evenly; a single point sits at the edge midpoint. The
/// result is clamped into the rectangle so degenerate (very small) panels
/// still yield a point on the panel.
pub fn solder_point(
    rect: &PanelRect,
    side: Side,
    index: usize,
    total: usize,
    min_dist: f32,
) -> SolderPoint {
    let length = if side.is_horizontal_edge() {
        rect.width
    } else {
        rect.height
    };
    let available = length - 2.0 * min_dist;
    let along = if total <= 1 {
        min_dist + available / 2.0
    } else {
        min_dist + available * index as f32 / (total - 1) as f32
    };

    let point = match side {
        Side::Top => (rect.x + along, rect.y),
        Side::Bottom => (rect.x + along, rect.bottom()),
        Side::Left => (rect.x, rect.y + along),
        Side::Right => (rect.right(), rect.y + along),
    };

    SolderPoint {
        x: point.0.clamp(rect.x, rect.right()),
        y: point.1.clamp(rect.y, rect.bottom()),
    }
}
