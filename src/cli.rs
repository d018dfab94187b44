use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::config::{apply_config_value, load_config};
use crate::ir::ContainerSize;
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_json};
use crate::parser::parse_board;

#[derive(Parser, Debug)]
#[command(name = "tbrd", version, about = "Panel grid layout and trace routing engine")]
pub struct Args {
    /// Input board file (.board) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the JSON layout dump. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Container width
    #[arg(short = 'w', long = "width", default_value_t = 1280.0)]
    pub width: f32,

    /// Container height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let parsed = parse_board(&input)?;
    if let Some(value) = &parsed.config {
        apply_config_value(&mut config, value)?;
    }
    if let Some(grid) = parsed.grid {
        grid.apply(&mut config.grid);
    }

    let container = ContainerSize::new(args.width, args.height);
    let layout = compute_layout(&parsed.board, &config, container);
    let dump = LayoutDump::from_layout(&layout);
    write_json(&dump, args.output.as_deref())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["tbrd"]);
        assert_eq!(args.width, 1280.0);
        assert_eq!(args.height, 800.0);
        assert!(args.input.is_none());
    }
}
