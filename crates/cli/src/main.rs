use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use bounded_embed::api::{
    inside_fraction, project_with_cfg, run, Boundary, Metric, Observations, Shape, SolverCfg,
    Tsne, TsneCfg,
};
use bounded_embed::Vec2;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Boundary-constrained 2D embeddings")]
struct Cmd {
    /// Log per-iteration progress
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeName {
    Circle,
    Heart,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricName {
    Cosine,
    Euclidean,
}

impl From<MetricName> for Metric {
    fn from(m: MetricName) -> Self {
        match m {
            MetricName::Cosine => Metric::Cosine,
            MetricName::Euclidean => Metric::Euclidean,
        }
    }
}

#[derive(clap::Args, Debug)]
struct ShapeArgs {
    #[arg(long, value_enum, default_value_t = ShapeName::Circle)]
    shape: ShapeName,
    /// Circle radius or heart size
    #[arg(long, visible_aliases = ["radius", "size"], default_value_t = 1.0)]
    scale: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_x: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_y: f64,
}

impl ShapeArgs {
    fn to_shape(&self) -> Result<Shape> {
        let name = match self.shape {
            ShapeName::Circle => "circle",
            ShapeName::Heart => "heart",
        };
        let params = BTreeMap::from([
            ("radius".to_string(), self.scale),
            ("size".to_string(), self.scale),
            ("center_x".to_string(), self.center_x),
            ("center_y".to_string(), self.center_y),
        ]);
        Ok(Shape::from_params(name, &params)?)
    }
}

#[derive(Subcommand)]
enum Action {
    /// Embed the rows of a CSV/Parquet table inside a boundary and write `x,y` CSV
    Embed {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        shape: ShapeArgs,
        /// Keep only the first N numeric columns (e.g. leading PCs)
        #[arg(long)]
        max_dims: Option<usize>,
        #[arg(long, default_value_t = 50.0)]
        perplexity: f64,
        #[arg(long, value_enum, default_value_t = MetricName::Cosine)]
        metric: MetricName,
        /// Worker threads (0 = all cores)
        #[arg(long, default_value_t = 0)]
        n_jobs: usize,
        #[arg(long, default_value_t = 750)]
        iters: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Evaluate a boundary at one point and show its projection
    Boundary {
        #[command(flatten)]
        shape: ShapeArgs,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Embed {
            input,
            out,
            shape,
            max_dims,
            perplexity,
            metric,
            n_jobs,
            iters,
            seed,
        } => {
            let cfg = TsneCfg {
                perplexity,
                metric: metric.into(),
                n_jobs,
                n_iter: iters,
                early_exaggeration_iter: TsneCfg::default().early_exaggeration_iter.min(iters),
                seed,
                verbose: cmd.verbose,
                ..TsneCfg::default()
            };
            embed(input, out, shape.to_shape()?, max_dims, cfg)
        }
        Action::Boundary { shape, x, y } => boundary(shape.to_shape()?, Vec2::new(x, y)),
        Action::Report => report(),
    }
}

fn embed(
    input: PathBuf,
    out: PathBuf,
    shape: Shape,
    max_dims: Option<usize>,
    cfg: TsneCfg,
) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), %shape, "embed");
    let x = io::read_matrix(&input, max_dims)?;
    let mut obs = Observations::new(x);
    let mut tsne = Tsne::new(cfg);
    let points = run(&mut obs, &shape, &mut tsne)?;
    io::write_embedding(&out, &points)?;

    let inside = inside_fraction(&shape, &points);
    tracing::info!(n = points.len(), inside, "wrote embedding");
    let payload = provenance::Payload::new(serde_json::json!({
        "input": input.to_string_lossy(),
        "shape": shape,
        "tsne": cfg,
        "max_dims": max_dims,
    }))
    .with_summary(serde_json::json!({
        "n": points.len(),
        "dims": obs.x.ncols(),
        "inside_fraction": inside,
    }));
    let prov = provenance::write_sidecar(&out, payload)?;
    tracing::debug!(path = %prov.display(), "provenance");
    Ok(())
}

#[derive(Serialize)]
struct BoundaryReport {
    shape: Shape,
    point: [f64; 2],
    value: f64,
    inside: bool,
    projected: [f64; 2],
    projected_value: f64,
    converged: bool,
}

fn boundary(shape: Shape, p: Vec2) -> Result<()> {
    let value = shape.eval_at(p);
    let proj = project_with_cfg(p, &shape, SolverCfg::default());
    let report = BoundaryReport {
        shape,
        point: [p.x, p.y],
        value,
        inside: value >= 0.0,
        projected: [proj.point.x, proj.point.y],
        projected_value: proj.value,
        converged: proj.converged,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "bounded_embed": bounded_embed::VERSION,
        "shapes": Shape::NAMES,
        "defaults": {
            "tsne": TsneCfg::default(),
            "shape": Shape::default(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
