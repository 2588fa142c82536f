//! Equaplot CLI - inspect formulas and generate geometry headlessly

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use equaplot_core::config::AnimationClock;
use equaplot_core::prelude::*;
use equaplot_engine::{DEFAULT_DEFINITIONS, Geometry, RefreshOutcome, Registry, Settings};
use equaplot_script::{Bindings, CompiledShape, FormulaEngine, FormulaShape};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "equaplot")]
#[command(about = "Plot formulas as 3D surfaces and curves", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a formula
    Normalize {
        formula: String,
    },

    /// Evaluate a formula at one point
    Eval {
        formula: String,

        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        x: f64,

        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        z: f64,

        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        t: f64,
    },

    /// Generate a surface mesh from y = f(x, z)
    Surface {
        formula: String,

        /// Grid cells per side
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Domain half-extent
        #[arg(long)]
        range: Option<f32>,

        /// Value bound to t
        #[arg(long, default_value = "0")]
        time: f32,

        /// Keep indices within 16 bits
        #[arg(long)]
        narrow_index: bool,

        /// Output file (format auto-detected from extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a clipped polyline from x(t); y(t); z(t)
    Curve {
        formula: String,

        /// Ten samples per unit
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Parameter and clipping half-extent
        #[arg(long)]
        range: Option<f32>,

        /// Offset added to every evaluated t
        #[arg(long, default_value = "0")]
        time: f32,

        #[arg(long)]
        line_width: Option<f32>,

        /// Output file (format auto-detected from extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drive the registry tick loop and report what each tick regenerates
    Run {
        /// Number of ticks
        #[arg(long, default_value = "3")]
        ticks: u32,

        /// Seconds per tick
        #[arg(long, default_value = "0.016")]
        dt: f32,

        /// Advance the animation clock
        #[arg(long)]
        animate: bool,

        /// Formulas to plot (the default scene if none given)
        #[arg(short, long)]
        formula: Vec<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.config.as_deref())?;
    tracing::debug!("Using settings: {:?}", settings);

    match cli.command {
        Commands::Normalize { formula } => {
            run_normalize(&formula)?;
        }
        Commands::Eval { formula, x, z, t } => {
            run_eval(&formula, x, z, t)?;
        }
        Commands::Surface {
            formula,
            resolution,
            range,
            time,
            narrow_index,
            output,
        } => {
            let mut config = settings.render.clone();
            if let Some(resolution) = resolution {
                config.resolution = resolution;
            }
            if let Some(range) = range {
                config.range = range;
            }
            let index_width = if narrow_index {
                IndexWidth::U16
            } else {
                settings.index_width
            };
            run_surface(
                &formula,
                &config.sanitized(),
                index_width,
                time,
                output.as_deref(),
            )?;
        }
        Commands::Curve {
            formula,
            resolution,
            range,
            time,
            line_width,
            output,
        } => {
            let mut config = settings.render.clone();
            if let Some(resolution) = resolution {
                config.resolution = resolution;
            }
            if let Some(range) = range {
                config.range = range;
            }
            if let Some(line_width) = line_width {
                config.line_width = line_width;
            }
            run_curve(&formula, &config.sanitized(), time, output.as_deref())?;
        }
        Commands::Run {
            ticks,
            dt,
            animate,
            formula,
        } => {
            run_ticks(&settings, ticks, dt, animate, &formula);
        }
    }

    Ok(())
}

fn run_normalize(formula: &str) -> Result<()> {
    let shape = FormulaShape::classify(formula)?;
    let kind = if shape.is_surface() { "surface" } else { "curve" };

    println!("{}", shape.canonical());
    println!("kind: {kind}");
    for warning in shape.warnings() {
        println!("warning: {warning}");
    }

    Ok(())
}

fn run_eval(formula: &str, x: f64, z: f64, t: f64) -> Result<()> {
    let engine = FormulaEngine::new();
    let shape = FormulaShape::classify(formula)?;

    match engine.compile_shape(&shape) {
        CompiledShape::Surface(compiled) => {
            report_sample(&engine, &compiled, Bindings::surface(x, z, t), "y");
        }
        CompiledShape::Parametric(components) => {
            for (axis, compiled) in ["x", "y", "z"].iter().zip(&components) {
                report_sample(&engine, compiled, Bindings::curve(t), axis);
            }
        }
    }

    Ok(())
}

fn report_sample(
    engine: &FormulaEngine,
    formula: &equaplot_script::CompiledFormula,
    bindings: Bindings,
    label: &str,
) {
    match engine.try_evaluate(formula, bindings) {
        Ok(value) => println!("{label} = {value}"),
        Err(e) => println!("{label} = 0 ({e})"),
    }
}

fn run_surface(
    formula: &str,
    config: &RenderConfig,
    index_width: IndexWidth,
    time: f32,
    output: Option<&Path>,
) -> Result<()> {
    let engine = FormulaEngine::new();
    let CompiledShape::Surface(compiled) = engine.compile_shape(&FormulaShape::classify(formula)?)
    else {
        anyhow::bail!("'{formula}' is a parametric curve, use the curve command");
    };

    let resolution = config.effective_resolution(index_width);
    if resolution.was_clamped() {
        println!(
            "Resolution {} clamped to {} for {:?} indices",
            resolution.requested, resolution.effective, index_width
        );
    }

    let field = engine.surface(&compiled, time);
    let mesh = generate_surface(&field, &config.surface_params(index_width));

    println!("Formula:    {}", compiled.canonical());
    println!("Vertices:   {}", mesh.vertex_count());
    println!("Triangles:  {}", mesh.triangle_count());
    println!("Fallbacks:  {}", field.failures());
    if let Some(bounds) = mesh.bounds() {
        println!("Bounds:     {:?} .. {:?}", bounds.min, bounds.max);
    }

    if let Some(path) = output {
        mesh.export(path)
            .with_context(|| format!("Failed to export {}", path.display()))?;
        println!("Saved to: {}", path.display());
    }

    Ok(())
}

fn run_curve(formula: &str, config: &RenderConfig, time: f32, output: Option<&Path>) -> Result<()> {
    let engine = FormulaEngine::new();
    let CompiledShape::Parametric(components) =
        engine.compile_shape(&FormulaShape::classify(formula)?)
    else {
        anyhow::bail!("'{formula}' is a surface, use the surface command");
    };

    let mut params = config.curve_params(&AnimationClock::new());
    params.time_offset = time;

    let path = engine.parametric(&components);
    let polyline = generate_curve(&path, &params);

    println!("Samples:    {}", params.segments() + 1);
    println!("Points:     {}", polyline.len());
    println!("Fallbacks:  {}", path.failures());
    if let (Some(first), Some(last)) = (polyline.first(), polyline.last()) {
        println!("From:       {first:?}");
        println!("To:         {last:?}");
    }

    if let Some(out) = output {
        polyline
            .export(out)
            .with_context(|| format!("Failed to export {}", out.display()))?;
        println!("Saved to: {}", out.display());
    }

    Ok(())
}

fn run_ticks(settings: &Settings, ticks: u32, dt: f32, animate: bool, formulas: &[String]) {
    let mut registry = Registry::from_settings(settings);
    if formulas.is_empty() {
        for (formula, color) in DEFAULT_DEFINITIONS {
            registry.add_with_color(formula, color);
        }
    } else {
        for formula in formulas {
            registry.add(formula.as_str());
        }
    }
    if animate {
        registry.set_animate(true);
    }

    for tick in 0..ticks {
        let report = registry.tick(dt);
        println!(
            "tick {tick}: t={:.3} regenerated={} recolored={} invalid={}",
            report.elapsed,
            report.regenerated(),
            report.recolored(),
            report.invalid()
        );

        for (id, outcome) in &report.outcomes {
            if let RefreshOutcome::Invalid(e) = outcome {
                println!("  {id}: {e}");
            }
        }
    }

    for definition in registry.definitions() {
        let summary = match definition.object().map(|o| &o.geometry) {
            Some(Geometry::Surface(mesh)) => format!("surface, {} vertices", mesh.vertex_count()),
            Some(Geometry::Curve(polyline)) => format!("curve, {} points", polyline.len()),
            Some(Geometry::Empty) | None => "empty".to_string(),
        };
        println!("[{}] {} -> {}", definition.index(), definition.formula(), summary);
    }
}
