use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::GridConfig;
use crate::ir::{Board, Breakpoint, Connection, GridPosition, Side};

static CONFIG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@config\s+(\{.*\})\s*$").unwrap());
static BOARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^board\s+(\d+)x(\d+)(?:\s+gap\s+(\d+(?:\.\d+)?))?(?:\s+padding\s+(\d+(?:\.\d+)?))?\s*$")
        .unwrap()
});
static PANEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^panel\s+([A-Za-z_][A-Za-z0-9_-]*)(?:\s+(mobile|tablet|desktop))?\s+at\s+(\d+)\s*,\s*(\d+)\s+span\s+(\d+)x(\d+)\s*$",
    )
    .unwrap()
});
static TRACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^trace\s+([A-Za-z_][A-Za-z0-9_-]*)\.(top|right|bottom|left)\s*->\s*([A-Za-z_][A-Za-z0-9_-]*)\.(top|right|bottom|left)\s*$",
    )
    .unwrap()
});

/// Grid dimensions declared by a `board` line. Applied on top of the
/// loaded configuration by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDirective {
    pub columns: u32,
    pub rows: u32,
    pub gap: Option<f32>,
    pub padding: Option<f32>,
}

impl GridDirective {
    pub fn apply(&self, grid: &mut GridConfig) {
        grid.columns = self.columns;
        grid.rows = self.rows;
        if let Some(gap) = self.gap {
            grid.gap = gap;
        }
        if let Some(padding) = self.padding {
            grid.padding = padding;
        }
    }
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub board: Board,
    pub grid: Option<GridDirective>,
    /// Raw `@config { ... }` directive, parsed leniently (json5) so board
    /// files can use unquoted keys and trailing commas.
    pub config: Option<serde_json::Value>,
}

/// Parse the line-oriented board format:
///
/// ```text
/// @config { gap: 20 }
/// board 12x8 gap 16 padding 32
/// panel nav at 1,1 span 2x1
/// panel nav mobile at 1,1 span 4x1
/// trace nav.right -> stats.left
/// # comment
/// ```
pub fn parse_board(input: &str) -> Result<ParseOutput> {
    let mut output = ParseOutput::default();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = CONFIG_RE.captures(line) {
            if output.config.is_some() {
                bail!("line {line_no}: duplicate @config directive");
            }
            let value: serde_json::Value = match json5::from_str(&caps[1]) {
                Ok(value) => value,
                Err(err) => bail!("line {line_no}: invalid @config payload: {err}"),
            };
            output.config = Some(normalize_numbers(value));
            continue;
        }

        if let Some(caps) = BOARD_RE.captures(line) {
            if output.grid.is_some() {
                bail!("line {line_no}: duplicate board declaration");
            }
            output.grid = Some(GridDirective {
                columns: caps[1].parse()?,
                rows: caps[2].parse()?,
                gap: caps.get(3).map(|m| m.as_str().parse()).transpose()?,
                padding: caps.get(4).map(|m| m.as_str().parse()).transpose()?,
            });
            continue;
        }

        if let Some(caps) = PANEL_RE.captures(line) {
            let id = &caps[1];
            let tier = caps.get(2).and_then(|m| Breakpoint::from_token(m.as_str()));
            let position = GridPosition {
                column_start: caps[3].parse()?,
                row_start: caps[4].parse()?,
                column_span: caps[5].parse()?,
                row_span: caps[6].parse()?,
            };
            match tier {
                None | Some(Breakpoint::Desktop) => {
                    if !output.board.add_panel(id, position) {
                        bail!("line {line_no}: panel {id} already declared");
                    }
                }
                Some(tier) => {
                    if !output.board.set_tier_position(id, tier, position) {
                        bail!(
                            "line {line_no}: {} override for undeclared or already-overridden panel {id}",
                            tier.as_str()
                        );
                    }
                }
            }
            continue;
        }

        if let Some(caps) = TRACE_RE.captures(line) {
            let from_side = Side::from_token(&caps[2]);
            let to_side = Side::from_token(&caps[4]);
            let (Some(from_side), Some(to_side)) = (from_side, to_side) else {
                bail!("line {line_no}: unknown side in trace");
            };
            output.board.add_connection(Connection {
                from_panel: caps[1].to_string(),
                from_side,
                to_panel: caps[3].to_string(),
                to_side,
            });
            continue;
        }

        bail!("line {line_no}: unrecognized directive: {line}");
    }

    Ok(output)
}

/// json5 surfaces every number as f64; whole values are restored to
/// integers so integer-typed config fields deserialize from the directive.
fn normalize_numbers(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Number(num) => {
            if num.as_i64().is_none()
                && num.as_u64().is_none()
                && let Some(f) = num.as_f64()
                && f.fract() == 0.0
                && f.abs() <= i64::MAX as f64
            {
                return serde_json::Value::Number((f as i64).into());
            }
            serde_json::Value::Number(num)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(normalize_numbers).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}
