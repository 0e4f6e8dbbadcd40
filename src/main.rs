//! Gridstate - grid topology to state-space model
//!
//! Builds the linear state-space model of a small power grid, either from a
//! description file or from a randomly generated topology.
//!
//! # Usage
//!
//! ```bash
//! gridstate grid.grd --format json > model.json
//! gridstate --sources 3 --loads 4 --params params.json --seed 7 --graph dot
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gridstate_core::{
    dsl::{self, GridDescription},
    error::{GridError, Result},
    model::{GridConfig, GridModel},
    output::{write_report, GraphFormat, OutputFormat},
    Parameters,
};

/// Grid state-space model builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a grid description file
    #[arg(value_name = "GRID_FILE")]
    grid_file: Option<PathBuf>,

    /// Number of sources (overrides the file)
    #[arg(long)]
    sources: Option<usize>,

    /// Number of loads (overrides the file)
    #[arg(long)]
    loads: Option<usize>,

    /// JSON file with R_source, L_source, C_source, R_cabel, L_cabel, R_load
    #[arg(short, long, value_name = "PARAMS_JSON")]
    params: Option<PathBuf>,

    /// Source-to-source connection probability
    #[arg(long)]
    s2s: Option<f64>,

    /// Source-to-load connection probability
    #[arg(long)]
    s2l: Option<f64>,

    /// Seed for topology generation (random if absent)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Graph export to include
    #[arg(short, long, value_enum, default_value_t = GraphFormat::None)]
    graph: GraphFormat,

    /// Report connection matrix invariant violations
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Start from the description file, if any
    let mut desc = match &args.grid_file {
        Some(path) => {
            info!("reading grid description from {}", path.display());
            GridDescription::from_ast(dsl::parse_file(path)?)?
        }
        None => GridDescription {
            config: GridConfig::new(
                args.sources.ok_or(GridError::MissingDirective {
                    directive: "--sources",
                })?,
                args.loads.ok_or(GridError::MissingDirective {
                    directive: "--loads",
                })?,
            ),
            params: Default::default(),
            cm: None,
            seed: None,
        },
    };

    // Command-line overrides
    if let Some(n) = args.sources {
        desc.config.num_source = n;
    }
    if let Some(n) = args.loads {
        desc.config.num_loads = n;
    }
    if let Some(p) = args.s2s {
        desc.config = desc.config.with_s2s_p(p);
    }
    if let Some(p) = args.s2l {
        desc.config = desc.config.with_s2l_p(p);
    }
    let seed = args.seed.or(desc.seed);

    let mut rng = match seed {
        Some(seed) => {
            debug!("seeding topology generator with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let model = match &args.params {
        Some(path) => {
            let parameters = Parameters::from_json_file(path)?;
            GridModel::new(desc.config, parameters, desc.cm, &mut rng)?
        }
        None => desc.into_model(&mut rng)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &model, args.format, args.graph, args.check)?;
    out.flush().map_err(|e| GridError::output(e.to_string()))?;

    Ok(())
}
