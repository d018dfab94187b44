use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::layout::Layout;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub breakpoint: String,
    pub container: [f32; 2],
    pub panels: Vec<PanelDump>,
    pub traces: Vec<TraceDump>,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

#[derive(Debug, Serialize)]
pub struct PanelDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDump {
    pub from: String,
    pub from_side: String,
    pub to: String,
    pub to_side: String,
    pub points: Vec<[f32; 2]>,
    pub collision: bool,
    pub path: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let panels = layout
            .panels
            .iter()
            .map(|(id, rect)| PanelDump {
                id: id.clone(),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            })
            .collect();

        let traces = layout
            .traces
            .iter()
            .map(|trace| TraceDump {
                from: trace.from_panel.clone(),
                from_side: trace.from_side.as_str().to_string(),
                to: trace.to_panel.clone(),
                to_side: trace.to_side.as_str().to_string(),
                points: trace.points.iter().map(|&(x, y)| [x, y]).collect(),
                collision: trace.collision,
                path: trace.svg_path_data(),
            })
            .collect();

        Self {
            breakpoint: layout.breakpoint.as_str().to_string(),
            container: [layout.container.width, layout.container.height],
            panels,
            traces,
            issues: layout.issues.iter().map(|issue| issue.to_string()).collect(),
            cache: None,
        }
    }

    pub fn with_cache_stats(mut self, stats: CacheStats) -> Self {
        self.cache = Some(stats);
        self
    }
}

/// Write the dump as pretty JSON to a file, or stdout when no path is
/// given.
pub fn write_json(dump: &LayoutDump, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            serde_json::to_writer_pretty(stdout.lock(), dump)?;
            println!();
        }
    }
    Ok(())
}
