mod config;
mod session;
mod store;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use editor::autosave::{AutosaveError, StoreError};
use editor::catalog::{Catalog, CatalogLookupError};
use editor::doc::{Category, SceneError};
use editor::scene::Scene;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::EditorConfig;
use crate::session::{Origin, Session};
use crate::store::FileStore;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error("{path}: {source}")]
    File { path: PathBuf, source: std::io::Error },
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog manifest {path}: {source}")]
    Manifest { path: PathBuf, source: serde_json::Error },
    #[error("missing catalog; pass --catalog or set LEVELEDIT_CATALOG")]
    MissingCatalog,
    #[error("script line {line}: {source}")]
    Script { line: usize, source: serde_json::Error },
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Lookup(#[from] CatalogLookupError),
    #[error("backup store: {0}")]
    Store(#[from] StoreError),
    #[error("autosave: {0}")]
    Autosave(#[from] AutosaveError),
}

#[derive(Parser, Debug)]
#[command(name = "leveledit", about = "Headless tile-map level editor")]
struct Cli {
    /// Sprite catalog manifest (JSON mapping category tags to sprite lists).
    #[arg(long, global = true, env = "LEVELEDIT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Snap drops and drag releases to the tile grid.
    #[arg(long, global = true)]
    snap: bool,

    #[arg(long, global = true)]
    tile_size: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an empty map document.
    New {
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long, default_value = "map.json")]
        out: PathBuf,
    },
    /// Load a map and summarize what it contains.
    Inspect { map: PathBuf },
    /// Run a scripted editing session and export the result.
    Replay {
        /// JSONL input events with `at_ms` timestamps.
        #[arg(long)]
        script: PathBuf,
        /// Starting map; a blank map is used when omitted.
        #[arg(long)]
        map: Option<PathBuf>,
        /// Start from a pending backup if there is one.
        #[arg(long, default_value_t = false)]
        resume: bool,
        #[arg(long, default_value = "map.json")]
        out: PathBuf,
    },
}

fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()) {
        error!(error = %err, "leveledit failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = EditorConfig::from_env();
    config.snap |= cli.snap;
    if let Some(tile_size) = cli.tile_size {
        config.tile_size = tile_size;
    }

    match cli.command {
        Command::New { width, height, out } => {
            let scene = Scene::new(width.unwrap_or(config.map_width), height.unwrap_or(config.map_height));
            write_file(&out, &scene.to_json()?)?;
            info!(path = %out.display(), width = scene.width(), height = scene.height(), "blank map written");
            Ok(())
        }
        Command::Inspect { map } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            run_inspect(&catalog, &map)
        }
        Command::Replay { script, map, resume, out } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let map_json = map.as_deref().map(read_file).transpose()?;
            let origin = match (resume, map_json.as_deref()) {
                (true, fallback) => Origin::Resume { fallback },
                (false, Some(json)) => Origin::Map(json),
                (false, None) => Origin::Blank,
            };
            let store = FileStore::new(&config.backup_dir);
            info!(backup_dir = %store.dir().display(), resume, "starting replay");
            let (mut session, report) = Session::start(catalog, store, &config, origin)?;
            log_skipped(&report);

            let file = File::open(&script).map_err(|source| AppError::File { path: script.clone(), source })?;
            let summary = session.run(BufReader::new(file))?;
            let json = session.finish()?;
            write_file(&out, &json)?;
            info!(
                path = %out.display(),
                events = summary.events,
                spawned = summary.spawned,
                moved = summary.moved,
                deleted = summary.deleted,
                backups = summary.backups,
                "replay complete"
            );
            Ok(())
        }
    }
}

fn run_inspect(catalog: &Catalog, map: &Path) -> Result<(), AppError> {
    let (scene, report) = Scene::deserialize(&read_file(map)?, catalog)?;
    log_skipped(&report);

    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for el in scene.elements() {
        *counts.entry(el.category).or_default() += 1;
    }
    println!("{}: {}x{}, {} elements", map.display(), scene.width(), scene.height(), scene.len());
    for (category, count) in counts {
        println!("  {category:<18} {count}");
    }
    if !report.skipped.is_empty() {
        println!("  skipped            {}", report.skipped.len());
    }
    Ok(())
}

fn log_skipped(report: &editor::doc::LoadReport) {
    for skipped in &report.skipped {
        warn!(position = skipped.position, reason = %skipped.reason, "record skipped");
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, AppError> {
    let path = path.ok_or(AppError::MissingCatalog)?;
    let json = read_file(path)?;
    let catalog =
        Catalog::from_manifest_json(&json).map_err(|source| AppError::Manifest { path: path.to_owned(), source })?;
    info!(path = %path.display(), sprites = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn read_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::File { path: path.to_owned(), source })
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    fs::write(path, contents).map_err(|source| AppError::File { path: path.to_owned(), source })
}
