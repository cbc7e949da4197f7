use anyhow::{bail, Context, Result};
use clap::Parser;
use globe_mesh::data::load_countries;
use globe_mesh::{MeshCache, MeshConfig};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Build the country mesh cache from a GeoJSON dataset
#[derive(Parser, Debug)]
#[command(name = "globe-mesh", version, about)]
struct Cli {
    /// Input GeoJSON feature collection
    #[arg(default_value = "data/countries.geojson")]
    input: PathBuf,

    /// Output mesh cache
    #[arg(default_value = "data/mesh_cache.json")]
    output: PathBuf,

    /// Globe radius in scene units
    #[arg(long, default_value_t = MeshConfig::default().globe_radius)]
    radius: f64,

    /// Outline half-width on the globe
    #[arg(long, default_value_t = MeshConfig::default().globe_outline_width)]
    outline_width: f64,

    /// Flat map units per degree
    #[arg(long, default_value_t = MeshConfig::default().flat_scale)]
    flat_scale: f64,

    /// Outline half-width on the flat map
    #[arg(long, default_value_t = MeshConfig::default().flat_outline_width)]
    flat_outline_width: f64,
}

impl Cli {
    fn config(&self) -> Result<MeshConfig> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            bail!("--radius must be positive, got {}", self.radius);
        }
        if !(self.flat_scale.is_finite() && self.flat_scale > 0.0) {
            bail!("--flat-scale must be positive, got {}", self.flat_scale);
        }
        for (flag, width) in [("--outline-width", self.outline_width), ("--flat-outline-width", self.flat_outline_width)] {
            if !(width.is_finite() && width >= 0.0) {
                bail!("{flag} must be zero or positive, got {width}");
            }
        }
        Ok(MeshConfig {
            globe_radius: self.radius,
            globe_outline_width: self.outline_width,
            flat_scale: self.flat_scale,
            flat_outline_width: self.flat_outline_width,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config()?;

    if !cli.input.exists() {
        bail!("input dataset not found: {}", cli.input.display());
    }

    let start = Instant::now();
    let countries = load_countries(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let cache = MeshCache::build(&countries, &config);
    cache
        .write(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!("Done in {:.2?}", start.elapsed());
    Ok(())
}
