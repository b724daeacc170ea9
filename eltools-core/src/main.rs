//! # eltools
//!
//! Script entry point: reads elegant results and prints web chart JSON
//! on standard output.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use eltools_core::charts::{self, Chart, HvGraphics};
use eltools_core::config::Settings;
use eltools_core::resonance;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chart helpers for elegant/SDDS results", long_about = None)]
struct Cli {
    /// JSON settings file (defaults apply when omitted)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Override the sdds2stream program
    #[arg(long, global = true)]
    program: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resonance diagram, optionally with the machine tunes marked
    Resonance {
        #[arg(short, long)]
        order: Option<u32>,
        #[arg(long)]
        color: Option<String>,
        /// Twiss file to read nux/nuy from
        #[arg(long)]
        tunes: Option<PathBuf>,
    },
    /// Magnet structure strip
    Structure { file: Option<PathBuf> },
    /// Optical function along s
    Function {
        file: PathBuf,
        #[arg(long, default_value = "betax")]
        func: String,
        #[arg(long, default_value = "red")]
        color: String,
        #[arg(long, default_value = "βx")]
        label: String,
    },
    /// Top view of the machine
    View {
        #[arg(long)]
        xyz: Option<PathBuf>,
        #[arg(long)]
        mag: Option<PathBuf>,
    },
    /// Tune marker for a twiss file
    Tunes { file: Option<PathBuf> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(program) = cli.program {
        settings.program = program;
    }

    let chart = run(cli.command, &settings)?;
    println!("{}", chart.to_json()?);
    Ok(())
}

fn run(command: Command, settings: &Settings) -> Result<Chart> {
    let graphics = HvGraphics::new(settings.converter()).with_mag_file(&settings.mag_file);

    match command {
        Command::Resonance {
            order,
            color,
            tunes,
        } => {
            let order = order.unwrap_or(settings.resonance_order);
            let color = color.unwrap_or_else(|| settings.resonance_color.clone());
            let segments = resonance::resonance_segments(order);
            info!("[MAIN] {} resonance lines up to order {order}", segments.len());
            let diagram = graphics.res_diag(&segments, &color);

            match tunes {
                Some(file) => {
                    let (nu_x, nu_y) = graphics
                        .converter()
                        .tunes(&file)
                        .ok_or_else(|| anyhow!("cannot read tunes from {}", file.display()))?;
                    Ok(charts::overlay(vec![diagram, graphics.tunes(nu_x, nu_y)]))
                }
                None => Ok(diagram),
            }
        }
        Command::Structure { file } => {
            let file = file.unwrap_or_else(|| settings.mag_file.clone());
            graphics
                .plot_structure(file.as_path())
                .ok_or_else(|| anyhow!("cannot plot structure of {}", file.display()))
        }
        Command::Function {
            file,
            func,
            color,
            label,
        } => graphics
            .plot_function(file.as_path(), &func, &color, &label)
            .ok_or_else(|| anyhow!("cannot plot {func} from {}", file.display())),
        Command::View { xyz, mag } => {
            let xyz = xyz.unwrap_or_else(|| settings.xyz_file.clone());
            let mag = mag.unwrap_or_else(|| settings.mag_file.clone());
            let view = graphics
                .converter()
                .acc_view(&xyz, &mag)
                .ok_or_else(|| anyhow!("cannot build lattice view from {}", xyz.display()))?;
            graphics
                .acc_view_plot(&view)
                .ok_or_else(|| anyhow!("cannot plot lattice view"))
        }
        Command::Tunes { file } => {
            let file = file.unwrap_or_else(|| settings.twiss_file.clone());
            let (nu_x, nu_y) = graphics
                .converter()
                .tunes(&file)
                .ok_or_else(|| anyhow!("cannot read tunes from {}", file.display()))?;
            info!("[MAIN] tunes: nux = {nu_x}, nuy = {nu_y}");
            Ok(graphics.tunes(nu_x, nu_y))
        }
    }
}
