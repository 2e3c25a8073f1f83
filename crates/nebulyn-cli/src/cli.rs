// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nebulyn_grid::Direction;

#[derive(Parser, Debug)]
#[command(name = "nebulyn", author, version, about = "Nebulyn port grid tools")]
pub struct Cli {
    /// Directory for the local grid library and prefs (default: platform config dir)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// How v1 files are upgraded when read.
#[derive(Args, Debug, Clone)]
pub struct UpgradeArgs {
    /// Direction given to v1 `inputArrow: true`
    #[arg(long, default_value = "top")]
    pub input_direction: Direction,
    /// Direction given to v1 `outputArrow: true`
    #[arg(long, default_value = "top")]
    pub output_direction: Direction,
    /// textureBasePath for upgraded grids (default: prefs)
    #[arg(long)]
    pub texture_base_path: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw a grid file and list its ports
    Show {
        /// Grid file (.json)
        file: PathBuf,
        /// Also print the grid stylesheet
        #[arg(long)]
        css: bool,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// Port, arrow, colour and block statistics
    Stats {
        /// Grid file (.json)
        file: PathBuf,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Split a grid into one file per colour
    Partition {
        /// Grid file (.json)
        file: PathBuf,
        /// Directory for `<colour>.json` files
        #[arg(long)]
        out_dir: PathBuf,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// Merge colour partitions back into one grid
    Merge {
        /// Partition files, merged in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output grid file
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// Rewrite a grid file in the current schema
    Upgrade {
        /// Grid file (.json)
        file: PathBuf,
        /// Output grid file
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// Save a grid file into the local library
    Save {
        /// Grid file (.json)
        file: PathBuf,
        /// Library name (default: the grid's own name)
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// Export a library grid to a file
    Load {
        /// Library name
        name: String,
        /// Output grid file
        #[arg(long)]
        out: PathBuf,
    },
    /// List the local library
    List,
    /// Remove a grid from the local library
    Delete {
        /// Library name
        name: String,
    },
    /// Show or change editor preferences
    Prefs {
        /// Forget stored preferences before applying any other flag
        #[arg(long)]
        reset: bool,
        /// Cell edge length in pixels
        #[arg(long)]
        cell_size: Option<u32>,
        /// Prefix for derived texture paths
        #[arg(long)]
        texture_base_path: Option<String>,
        /// Name given to new grids
        #[arg(long)]
        grid_name: Option<String>,
        /// Base URL of the remote grid service
        #[arg(long)]
        remote_url: Option<String>,
    },
    /// Upload a grid file to the remote service
    Push {
        /// Grid file (.json)
        file: PathBuf,
        /// Service base URL (default: prefs)
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// Download a grid from the remote service
    Pull {
        /// Grid id
        id: String,
        /// Output grid file
        #[arg(long)]
        out: PathBuf,
        /// Service base URL (default: prefs)
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        upgrade: UpgradeArgs,
    },
    /// List grids stored on the remote service
    RemoteList {
        /// Service base URL (default: prefs)
        #[arg(long)]
        url: Option<String>,
    },
}
