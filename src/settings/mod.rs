use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::common::festivals::festival_id;

#[derive(Parser, Debug)]
#[command(name = "levelgraph")]
#[command(version)]
#[command(about = "Resolves everything a level consists of and prints its scene graph")]
pub struct CliArgs {
    #[arg(long, env = "LEVELGRAPH_DATA_DIR", default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Directory inside the data dir that asset paths are relative to
    #[arg(long, env = "LEVELGRAPH_PATH_BASE")]
    pub path_base: Option<String>,

    /// Festival id or name (e.g. bg_halloween2017_00) whose layers should be shown as well
    #[arg(long, value_parser = parse_festival)]
    pub festival: Option<u16>,

    /// Print the scene graph, one node per line
    #[arg(long)]
    pub dump_tree: bool,

    /// Apply the container animations at this point in time before printing
    #[arg(long)]
    pub animate_ms: Option<f32>,

    #[command(subcommand)]
    pub operation_mode: OperationMode,
}

pub fn default_data_dir() -> String {
    std::env::current_dir()
        .map(|dir| dir.join("_data"))
        .unwrap_or_else(|_| PathBuf::from("_data"))
        .to_string_lossy()
        .to_string()
}

#[derive(Subcommand, Debug)]
pub enum OperationMode {
    /// A whole level, e.g. bg/ffxiv/sea_s1/fld/s1f1
    Level { level: String },
    /// A single layer file and everything it nests
    Container { path: String },
}

fn parse_festival(input: &str) -> Result<u16, String> {
    if let Ok(id) = input.parse::<u16>() {
        return Ok(id);
    }

    festival_id(input).ok_or_else(|| format!("{} is neither a festival id nor a known festival", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_with_festival_name() {
        let args = CliArgs::try_parse_from([
            "levelgraph",
            "--data-dir",
            "/tmp/data",
            "--festival",
            "bg_halloween2017_00",
            "--dump-tree",
            "level",
            "bg/ffxiv/sea_s1/fld/s1f1",
        ])
        .unwrap();

        assert_eq!(args.data_dir, "/tmp/data");
        assert_eq!(args.festival, Some(58));
        assert!(args.dump_tree);
        assert!(matches!(args.operation_mode, OperationMode::Level { ref level } if level == "bg/ffxiv/sea_s1/fld/s1f1"));
    }

    #[test]
    fn festival_by_id_and_garbage() {
        assert_eq!(parse_festival("7"), Ok(7));
        assert!(parse_festival("not a festival").is_err());
    }

    #[test]
    fn container_mode() {
        let args = CliArgs::try_parse_from(["levelgraph", "--animate-ms", "1500", "container", "bg/shop.sgb"]).unwrap();
        assert_eq!(args.animate_ms, Some(1500.0));
        assert!(matches!(args.operation_mode, OperationMode::Container { .. }));
    }
}
