use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use kdtable::{Axis, Config, Criterion, Extreme, Point, Sample, SampleIndex};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Query a k-d tree built from a sample file", long_about = None)]
struct Args {
    /// Sample file to load (and to update on insert)
    #[arg(short, long)]
    sample: Option<PathBuf>,

    /// JSON configuration file (TOML with the `toml` feature)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree sideways
    Render,
    /// Point with the smallest value on an axis
    Min { axis: String },
    /// Point with the largest value on an axis
    Max { axis: String },
    /// Samples inside an inclusive rectangle
    Range {
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        low: Vec<f64>,
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        high: Vec<f64>,
    },
    /// Run a SELECT ... FROM ... WHERE ... query
    Query { query: String },
    /// Add a sample and save the sample file
    Insert {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        attributes: Vec<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };

    // Inserting into a sample file that does not exist yet starts a new one.
    let inserting = matches!(args.command, Command::Insert { .. });
    let load = args
        .sample
        .as_ref()
        .filter(|path| !inserting || config.resolve_path(path).exists());

    let mut builder = SampleIndex::builder().config(config);
    if let Some(path) = load {
        builder = builder.sample_path(path);
    }
    let mut index = builder.build()?;

    match args.command {
        Command::Render => println!("{}", index.render()?),
        Command::Min { axis } => print_extreme(&index, &axis, Extreme::Min)?,
        Command::Max { axis } => print_extreme(&index, &axis, Extreme::Max)?,
        Command::Range { low, high } => {
            let hits = index.range_query([low[0], low[1]], [high[0], high[1]])?;
            for sample in hits {
                println!("{}", sample_json(&index, sample));
            }
        }
        Command::Query { query } => {
            for record in index.run_query(&query)? {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Command::Insert { x, y, attributes } => {
            let Some(path) = &args.sample else {
                bail!("insert needs --sample");
            };
            index.insert(Point::new(x, y), attributes)?;
            index.save(path)?;
            println!("{}", index.len());
        }
    }
    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;

    #[cfg(feature = "toml")]
    if path.extension().is_some_and(|ext| ext == "toml") {
        return Ok(Config::from_toml(&text)?);
    }

    Ok(Config::from_json(&text)?)
}

fn resolve_axis(index: &SampleIndex, name: &str) -> anyhow::Result<Axis> {
    match index.criteria().resolve(name) {
        Some(Criterion::Axis(axis)) => Ok(axis),
        Some(Criterion::Attribute(_)) => bail!("{} is an attribute, not an axis", name),
        None => match name {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            _ => bail!("unknown axis: {}", name),
        },
    }
}

fn print_extreme(index: &SampleIndex, axis: &str, extreme: Extreme) -> anyhow::Result<()> {
    let axis = resolve_axis(index, axis)?;
    match index.find_extreme(axis, extreme) {
        Some(point) => {
            let criteria = index.criteria();
            let mut object = Map::new();
            object.insert(criteria.axis_name(Axis::X).to_string(), json!(point.x()));
            object.insert(criteria.axis_name(Axis::Y).to_string(), json!(point.y()));
            println!("{}", Value::Object(object));
        }
        None => bail!("the index is empty"),
    }
    Ok(())
}

fn sample_json(index: &SampleIndex, sample: &Sample) -> Value {
    let criteria = index.criteria();
    let mut object = Map::new();
    for axis in Axis::ALL {
        object.insert(
            criteria.axis_name(axis).to_string(),
            json!(sample.point.coord(axis)),
        );
    }
    for (position, value) in sample.attributes.iter().enumerate() {
        if let Some(name) = criteria.attribute_name(position) {
            object.insert(name.to_string(), json!(value));
        }
    }
    Value::Object(object)
}
