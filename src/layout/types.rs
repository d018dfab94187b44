use serde::Serialize;

use crate::ir::Side;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x
            && point.0 <= self.right()
            && point.1 >= self.y
            && point.1 <= self.bottom()
    }
}

/// A connector location on a panel edge. Recomputed on every pass from the
/// panel's current rectangle; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolderPoint {
    pub x: f32,
    pub y: f32,
}

impl SolderPoint {
    pub fn as_tuple(self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// An orthogonal polyline between two solder points. Immutable once
/// produced; a new geometry pass builds new paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracePath {
    pub from_panel: String,
    pub from_side: Side,
    pub to_panel: String,
    pub to_side: Side,
    /// At least two points; consecutive points differ along one axis only.
    pub points: Vec<(f32, f32)>,
    /// True when no candidate route cleared every intervening panel.
    pub collision: bool,
}

impl TracePath {
    /// Path-drawing command string ("M x y L x y ...") for the consumer's
    /// rendering surface.
    pub fn svg_path_data(&self) -> String {
        let mut data = String::new();
        for (idx, (x, y)) in self.points.iter().enumerate() {
            let op = if idx == 0 { 'M' } else { 'L' };
            if idx > 0 {
                data.push(' ');
            }
            data.push_str(&format!("{op} {x:.2} {y:.2}"));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let rect = PanelRect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert!(rect.contains((10.0, 20.0)));
        assert!(rect.contains((110.0, 70.0)));
        assert!(!rect.contains((9.9, 20.0)));
    }

    #[test]
    fn svg_path_data_round_trips_points() {
        let path = TracePath {
            from_panel: "a".to_string(),
            from_side: Side::Right,
            to_panel: "b".to_string(),
            to_side: Side::Left,
            points: vec![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)],
            collision: false,
        };
        assert_eq!(path.svg_path_data(), "M 0.00 0.00 L 10.00 0.00 L 10.00 5.00");
    }
}
