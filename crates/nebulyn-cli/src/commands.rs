// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command implementations.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nebulyn_app_core::library::validate_name;
use nebulyn_app_core::prefs::PREFS_KEY;
use nebulyn_app_core::{ConfigPort, ConfigService, EditorPrefs, GridLibrary};
use nebulyn_config_fs::{export_to_file, import_from_file, FsStore};
use nebulyn_grid::partition::{self, ColorPartition};
use nebulyn_grid::presentation::initialize_presentation;
use nebulyn_grid::snapshot::UpgradeOptions;
use nebulyn_grid::{GridSnapshot, GridStats, PortGrid};
use nebulyn_grid_client::RemoteGridClient;
use tracing::{debug, info};

use crate::cli::{Cli, Command, UpgradeArgs};
use crate::render;

/// Local state every command can reach.
struct Session {
    store: FsStore,
    prefs: EditorPrefs,
}

impl Session {
    fn open(store_dir: Option<PathBuf>) -> Result<Self> {
        let store = match store_dir {
            Some(dir) => FsStore::at(&dir)
                .with_context(|| format!("open store dir {}", dir.display()))?,
            None => FsStore::new().context("locate config dir")?,
        };
        debug!(base = %store.base().display(), "store opened");
        let prefs = ConfigService::new(&store).load_prefs().unwrap_or_default();
        Ok(Self { store, prefs })
    }

    fn upgrade_options(&self, args: &UpgradeArgs) -> UpgradeOptions {
        UpgradeOptions {
            input_direction: args.input_direction,
            output_direction: args.output_direction,
            texture_base_path: args
                .texture_base_path
                .clone()
                .unwrap_or_else(|| self.prefs.texture_base_path.clone()),
        }
    }

    fn read_grid(&self, path: &Path, args: &UpgradeArgs) -> Result<GridSnapshot> {
        let any = import_from_file(path).with_context(|| format!("read {}", path.display()))?;
        Ok(any.into_current(&self.upgrade_options(args)))
    }

    fn client(&self, url: Option<String>) -> RemoteGridClient {
        RemoteGridClient::new(url.unwrap_or_else(|| self.prefs.remote_url.clone()))
    }
}

fn write_grid(snapshot: &GridSnapshot, path: &Path) -> Result<()> {
    export_to_file(snapshot, path).with_context(|| format!("write {}", path.display()))
}

/// Dispatch one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let session = Session::open(cli.store_dir)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Show { file, css, upgrade } => {
            let snapshot = session.read_grid(&file, &upgrade)?;
            let mut grid = PortGrid::new();
            grid.restore(&snapshot);
            writeln!(out, "{} ({} ports)", grid.name(), grid.len())?;
            write!(out, "{}", render::grid_map(&grid))?;
            if !grid.is_empty() {
                writeln!(out, "{}", render::port_table(&grid))?;
            }
            if css {
                let sheet = initialize_presentation(session.prefs.cell_size);
                writeln!(out, "{}", sheet.css)?;
            }
        }
        Command::Stats { file, json } => {
            let any = import_from_file(&file).with_context(|| format!("read {}", file.display()))?;
            let stats = GridStats::of(&any);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                for table in render::stats_tables(&stats) {
                    writeln!(out, "{table}")?;
                }
            }
        }
        Command::Partition {
            file,
            out_dir,
            upgrade,
        } => {
            let snapshot = session.read_grid(&file, &upgrade)?;
            let parts = partition::generate(&snapshot);
            for (color, part) in &parts {
                validate_name(color).with_context(|| format!("colour {color:?}"))?;
                let path = out_dir.join(format!("{color}.json"));
                write_grid(part, &path)?;
                writeln!(out, "{} ({} ports)", path.display(), part.port_count())?;
            }
            info!(colors = parts.len(), "grid partitioned");
        }
        Command::Merge {
            files,
            out: target,
            upgrade,
        } => {
            let mut parts = ColorPartition::new();
            for file in &files {
                let part = session.read_grid(file, &upgrade)?;
                let key = part.color.clone().unwrap_or_else(|| file.display().to_string());
                if parts.insert(key.clone(), part).is_some() {
                    bail!("two partitions for colour {key:?}");
                }
            }
            let merged = partition::merge(&parts);
            write_grid(&merged, &target)?;
            writeln!(out, "{} ({} ports)", target.display(), merged.port_count())?;
        }
        Command::Upgrade {
            file,
            out: target,
            upgrade,
        } => {
            let snapshot = session.read_grid(&file, &upgrade)?;
            write_grid(&snapshot, &target)?;
            writeln!(out, "{} (version {})", target.display(), snapshot.version)?;
        }
        Command::Save {
            file,
            name,
            upgrade,
        } => {
            let snapshot = session.read_grid(&file, &upgrade)?;
            let name = name.unwrap_or_else(|| snapshot.name.clone());
            let library = GridLibrary::new(&session.store);
            let saved_at = library.save(&name, &snapshot)?;
            writeln!(out, "saved {name:?} at {saved_at}")?;
        }
        Command::Load { name, out: target } => {
            let library = GridLibrary::new(&session.store);
            let Some(snapshot) = library.load(&name)? else {
                bail!("no grid named {name:?} in the library");
            };
            write_grid(&snapshot, &target)?;
            writeln!(out, "{} ({} ports)", target.display(), snapshot.port_count())?;
        }
        Command::List => {
            let rows = GridLibrary::new(&session.store).list()?;
            if rows.is_empty() {
                writeln!(out, "library is empty")?;
            } else {
                writeln!(out, "{}", render::library_table(&rows))?;
            }
        }
        Command::Delete { name } => {
            if GridLibrary::new(&session.store).delete(&name)? {
                writeln!(out, "deleted {name:?}")?;
            } else {
                bail!("no grid named {name:?} in the library");
            }
        }
        Command::Prefs {
            reset,
            cell_size,
            texture_base_path,
            grid_name,
            remote_url,
        } => {
            let config = ConfigService::new(&session.store);
            let mut prefs = if reset {
                if config.remove(PREFS_KEY)? {
                    info!("stored prefs removed");
                }
                EditorPrefs::default()
            } else {
                session.prefs.clone()
            };
            let changed = cell_size.is_some()
                || texture_base_path.is_some()
                || grid_name.is_some()
                || remote_url.is_some();
            if let Some(v) = cell_size {
                if v == 0 {
                    bail!("cell size must be positive");
                }
                prefs.cell_size = v;
            }
            if let Some(v) = texture_base_path {
                prefs.texture_base_path = v;
            }
            if let Some(v) = grid_name {
                prefs.grid_name = v;
            }
            if let Some(v) = remote_url {
                prefs.remote_url = v;
            }
            if changed {
                config.save(PREFS_KEY, &prefs)?;
            }
            writeln!(out, "{}", render::prefs_table(&prefs))?;
        }
        Command::Push { file, url, upgrade } => {
            let snapshot = session.read_grid(&file, &upgrade)?;
            let client = session.client(url);
            let saved = client.save(&snapshot).await?;
            writeln!(out, "{}", saved.grid_id)?;
        }
        Command::Pull {
            id,
            out: target,
            url,
            upgrade,
        } => {
            let client = session.client(url);
            let stored = client.load(&id).await?;
            let snapshot = stored
                .snapshot()?
                .into_current(&session.upgrade_options(&upgrade));
            write_grid(&snapshot, &target)?;
            writeln!(out, "{} ({} ports)", target.display(), snapshot.port_count())?;
        }
        Command::RemoteList { url } => {
            let rows = session.client(url).list().await?;
            if rows.is_empty() {
                writeln!(out, "no remote grids")?;
            } else {
                writeln!(out, "{}", render::remote_table(&rows))?;
            }
        }
    }
    Ok(())
}
