use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use wayedit::commands::{self, RenderOptions, WaypointLayout};
use wayedit::{init_logging, Config};

#[derive(Parser, Debug)]
#[command(name = "wayedit", version, about = "Map and waypoint editor for robot occupancy grids")]
struct Cli {
    /// Settings file (.toml or .json); defaults to the user config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print map dimensions, resolution, and origin pixel.
    Info {
        /// Map sidecar YAML.
        sidecar: PathBuf,
    },
    /// Composite the map with its overlays into a PNG.
    Render(RenderArgs),
    /// Write the map (with drawing edits) as a binary PGM.
    ExportPgm {
        /// Map sidecar YAML.
        sidecar: PathBuf,

        /// Output PGM path.
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Convert a waypoint file between the current and legacy layouts.
    ConvertWaypoints {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, value_enum)]
        to: Layout,
    },
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Map sidecar YAML.
    sidecar: PathBuf,

    /// Output PNG path.
    #[arg(short, long)]
    out: PathBuf,

    /// Waypoint YAML to draw on top of the map.
    #[arg(long)]
    waypoints: Option<PathBuf>,

    /// Display scale (0.02 to 2.0).
    #[arg(long)]
    scale: Option<f64>,

    /// Draw the grid overlay.
    #[arg(long, default_value_t = false)]
    grid: bool,

    /// Draw the path joining consecutive waypoints.
    #[arg(long, default_value_t = false)]
    path: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Layout {
    Legacy,
    Current,
}

impl From<Layout> for WaypointLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Legacy => WaypointLayout::Legacy,
            Layout::Current => WaypointLayout::Current,
        }
    }
}

/// Loads settings along with the file they should be saved back to.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    match path {
        Some(path) => Ok((Config::load_from_file(path)?, Some(path.clone()))),
        None => match Config::default_path() {
            Ok(path) => Ok((Config::load_or_default(&path)?, Some(path))),
            Err(_) => Ok((Config::default(), None)),
        },
    }
}

fn remember(config: &mut Config, config_path: Option<&Path>, sidecar: &Path) {
    if let Err(e) = commands::remember_map(config, config_path, sidecar) {
        tracing::warn!("Could not update recent files: {:#}", e);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::debug!("wayedit {} (built {})", wayedit::VERSION, wayedit::BUILD_DATE);

    let cli = Cli::parse();
    let (mut config, config_path) = load_config(cli.config.as_ref())?;
    let config_path = config_path.as_deref();

    match cli.cmd {
        Command::Info { sidecar } => {
            println!("{}", commands::map_info(&sidecar, &config)?);
            remember(&mut config, config_path, &sidecar);
        }
        Command::Render(args) => {
            let options = RenderOptions {
                waypoints: args.waypoints.as_deref(),
                scale: args.scale,
                grid: args.grid,
                path: args.path,
            };
            commands::render_map(&args.sidecar, &args.out, &options, &config)?;
            remember(&mut config, config_path, &args.sidecar);
        }
        Command::ExportPgm { sidecar, out } => {
            commands::export_pgm(&sidecar, &out, &config)?;
            remember(&mut config, config_path, &sidecar);
        }
        Command::ConvertWaypoints { input, output, to } => {
            commands::convert_waypoints(&input, &output, to.into())?;
        }
    }

    Ok(())
}
