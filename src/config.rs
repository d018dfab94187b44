use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process-wide default configuration. Engine instances copy and override
/// it; nothing mutates it after startup.
pub static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
    pub gap: f32,
    pub padding: f32,
    /// Container widths strictly below this resolve to the mobile tier.
    pub mobile_breakpoint_width: f32,
    /// Container widths strictly below this (and at least the mobile
    /// threshold) resolve to the tablet tier.
    pub tablet_breakpoint_width: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 12,
            rows: 8,
            gap: 16.0,
            padding: 32.0,
            mobile_breakpoint_width: 768.0,
            tablet_breakpoint_width: 1024.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Minimum distance from a panel corner to a solder point.
    pub min_solder_distance: f32,
    /// Clearance used when a detour candidate runs along a panel edge.
    pub detour_pad: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_solder_distance: 40.0,
            detour_pad: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of keyed results retained. 1 keeps only the latest result;
    /// larger values keep a bounded LRU history.
    pub history: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { history: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSet {
    pub resize: bool,
    pub panel_change: bool,
    pub connection_change: bool,
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self {
            resize: true,
            panel_change: true,
            connection_change: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub enabled_triggers: TriggerSet,
    /// Quiet window for coalescing resize bursts.
    pub debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled_triggers: TriggerSet::default(),
            debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    pub routing: RoutingConfig,
    pub cache: CacheConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    columns: Option<u32>,
    rows: Option<u32>,
    gap: Option<f32>,
    padding: Option<f32>,
    mobile_breakpoint_width: Option<f32>,
    tablet_breakpoint_width: Option<f32>,
    min_solder_distance: Option<f32>,
    detour_pad: Option<f32>,
    cache_history: Option<usize>,
    debounce_ms: Option<u64>,
    /// Subset of "resize", "panel-change", "connection-change".
    enabled_triggers: Option<Vec<String>>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = DEFAULT_CONFIG.clone();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    apply_config_file(&mut config, parsed)?;
    Ok(config)
}

/// Apply an inline `@config { ... }` directive (parsed leniently by the
/// board parser) on top of an already-loaded configuration.
pub fn apply_config_value(config: &mut Config, value: &serde_json::Value) -> anyhow::Result<()> {
    let parsed: ConfigFile = serde_json::from_value(value.clone())?;
    apply_config_file(config, parsed)
}

fn apply_config_file(config: &mut Config, file: ConfigFile) -> anyhow::Result<()> {
    if let Some(v) = file.columns {
        config.grid.columns = v;
    }
    if let Some(v) = file.rows {
        config.grid.rows = v;
    }
    if let Some(v) = file.gap {
        config.grid.gap = v;
    }
    if let Some(v) = file.padding {
        config.grid.padding = v;
    }
    if let Some(v) = file.mobile_breakpoint_width {
        config.grid.mobile_breakpoint_width = v;
    }
    if let Some(v) = file.tablet_breakpoint_width {
        config.grid.tablet_breakpoint_width = v;
    }
    if let Some(v) = file.min_solder_distance {
        config.routing.min_solder_distance = v;
    }
    if let Some(v) = file.detour_pad {
        config.routing.detour_pad = v;
    }
    if let Some(v) = file.cache_history {
        config.cache.history = v;
    }
    if let Some(v) = file.debounce_ms {
        config.engine.debounce_ms = v;
    }
    if let Some(names) = file.enabled_triggers {
        let mut triggers = TriggerSet {
            resize: false,
            panel_change: false,
            connection_change: false,
        };
        for name in &names {
            match name.as_str() {
                "resize" => triggers.resize = true,
                "panel-change" => triggers.panel_change = true,
                "connection-change" => triggers.connection_change = true,
                other => anyhow::bail!("unknown trigger kind: {other}"),
            }
        }
        config.engine.enabled_triggers = triggers;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = Config::default();
        assert_eq!(config.grid.columns, 12);
        assert!(config.grid.mobile_breakpoint_width < config.grid.tablet_breakpoint_width);
        assert_eq!(config.cache.history, 1);
        assert!(config.engine.enabled_triggers.resize);
    }

    #[test]
    fn directive_overrides_selected_fields() {
        let mut config = Config::default();
        let value = serde_json::json!({
            "gap": 20.0,
            "debounceMs": 120,
            "enabledTriggers": ["resize", "panel-change"],
        });
        apply_config_value(&mut config, &value).unwrap();
        assert_eq!(config.grid.gap, 20.0);
        assert_eq!(config.grid.columns, 12);
        assert_eq!(config.engine.debounce_ms, 120);
        assert!(config.engine.enabled_triggers.resize);
        assert!(config.engine.enabled_triggers.panel_change);
        assert!(!config.engine.enabled_triggers.connection_change);
    }

    #[test]
    fn unknown_trigger_is_rejected() {
        let mut config = Config::default();
        let value = serde_json::json!({ "enabledTriggers": ["scroll"] });
        assert!(apply_config_value(&mut config, &value).is_err());
    }
}
