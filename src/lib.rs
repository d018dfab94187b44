pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod engine;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;

pub use cache::{CacheStats, LayoutCache, cache_key};
pub use config::{Config, GridConfig, load_config};
pub use engine::{EngineState, LayoutEngine, Trigger};
pub use ir::{Board, Breakpoint, Connection, ContainerSize, GridPosition, PanelSpec, Side};
pub use layout::{
    Layout, LayoutIssue, PanelRect, SolderPoint, TracePath, compute_layout, resolve_breakpoint,
};
pub use parser::parse_board;
