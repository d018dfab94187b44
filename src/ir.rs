use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::Top),
            "right" => Some(Self::Right),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Unit vector pointing away from the panel interior.
    pub fn exit_vector(self) -> (f32, f32) {
        match self {
            Self::Top => (0.0, -1.0),
            Self::Right => (1.0, 0.0),
            Self::Bottom => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
        }
    }

    /// Whether the edge itself runs horizontally (top/bottom).
    pub fn is_horizontal_edge(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "mobile" => Some(Self::Mobile),
            "tablet" => Some(Self::Tablet),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

/// 1-indexed grid coordinates with spans, as declared in a board file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub column_start: u32,
    pub row_start: u32,
    pub column_span: u32,
    pub row_span: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: String,
    /// Base position, used for desktop and as the fallback for tiers
    /// without an explicit override.
    pub desktop: GridPosition,
    #[serde(default)]
    pub tablet: Option<GridPosition>,
    #[serde(default)]
    pub mobile: Option<GridPosition>,
}

impl PanelSpec {
    pub fn new(id: &str, desktop: GridPosition) -> Self {
        Self {
            id: id.to_string(),
            desktop,
            tablet: None,
            mobile: None,
        }
    }

    pub fn position_for(&self, breakpoint: Breakpoint) -> GridPosition {
        match breakpoint {
            Breakpoint::Mobile => self.mobile.unwrap_or(self.desktop),
            Breakpoint::Tablet => self.tablet.unwrap_or(self.desktop),
            Breakpoint::Desktop => self.desktop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from_panel: String,
    pub from_side: Side,
    pub to_panel: String,
    pub to_side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    pub panels: BTreeMap<String, PanelSpec>,
    pub connections: Vec<Connection>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a panel's base position. Returns false if the id is taken.
    pub fn add_panel(&mut self, id: &str, desktop: GridPosition) -> bool {
        if self.panels.contains_key(id) {
            return false;
        }
        self.panels
            .insert(id.to_string(), PanelSpec::new(id, desktop));
        true
    }

    /// Attach a tier override to an already-declared panel. Returns false
    /// if the panel is unknown or the tier already has an override.
    pub fn set_tier_position(
        &mut self,
        id: &str,
        breakpoint: Breakpoint,
        position: GridPosition,
    ) -> bool {
        let Some(panel) = self.panels.get_mut(id) else {
            return false;
        };
        let slot = match breakpoint {
            Breakpoint::Mobile => &mut panel.mobile,
            Breakpoint::Tablet => &mut panel.tablet,
            Breakpoint::Desktop => return false,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(position);
        true
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }
}
