use crate::config::GridConfig;
use crate::ir::Breakpoint;

/// Map a container width to its breakpoint band. Non-positive widths
/// clamp to mobile.
pub fn resolve_breakpoint(width: f32, grid: &GridConfig) -> Breakpoint {
    if width <= 0.0 || width < grid.mobile_breakpoint_width {
        Breakpoint::Mobile
    } else if width < grid.tablet_breakpoint_width {
        Breakpoint::Tablet
    } else {
        Breakpoint::Desktop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_match_thresholds() {
        let grid = GridConfig::default();
        assert_eq!(resolve_breakpoint(400.0, &grid), Breakpoint::Mobile);
        assert_eq!(resolve_breakpoint(800.0, &grid), Breakpoint::Tablet);
        assert_eq!(resolve_breakpoint(1920.0, &grid), Breakpoint::Desktop);
    }

    #[test]
    fn thresholds_are_exclusive_upper_bounds() {
        let grid = GridConfig::default();
        assert_eq!(
            resolve_breakpoint(grid.mobile_breakpoint_width, &grid),
            Breakpoint::Tablet
        );
        assert_eq!(
            resolve_breakpoint(grid.tablet_breakpoint_width, &grid),
            Breakpoint::Desktop
        );
    }

    #[test]
    fn non_positive_width_clamps_to_mobile() {
        let grid = GridConfig::default();
        assert_eq!(resolve_breakpoint(0.0, &grid), Breakpoint::Mobile);
        assert_eq!(resolve_breakpoint(-100.0, &grid), Breakpoint::Mobile);
    }
}
