use clap::Parser;
use pixfilter::image::io::{load_rgba_image, save_image};
use pixfilter::{
    CorrelationConfig, CorrelationMatcher, CorrelationResult, Execution, FilterParams,
    FilterRegistry, PixelBuffer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "PixFilter CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// List registered filters with their parameters and exit.
    #[arg(long)]
    list_filters: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum Task {
    #[default]
    Filter,
    AutoCorrelate,
    CrossCorrelate,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilterConfigJson {
    id: String,
    params: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CorrelationConfigJson {
    auto_tie_tolerance: f64,
}

impl Default for CorrelationConfigJson {
    fn default() -> Self {
        Self {
            auto_tie_tolerance: CorrelationConfig::default().auto_tie_tolerance,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    second_path: Option<String>,
    output_path: Option<String>,
    map_path: Option<String>,
    report_path: Option<String>,
    task: Task,
    filter: FilterConfigJson,
    correlation: CorrelationConfigJson,
    parallel: bool,
}

#[derive(Debug, Serialize)]
struct OffsetRecord {
    x: i64,
    y: i64,
}

#[derive(Debug, Serialize)]
struct CorrelationReport {
    best_value: f64,
    best_offsets: Vec<OffsetRecord>,
    center_value: Option<f64>,
    swapped: bool,
    map_width: usize,
    map_height: usize,
}

impl From<&CorrelationResult> for CorrelationReport {
    fn from(value: &CorrelationResult) -> Self {
        Self {
            best_value: value.best_value,
            best_offsets: value
                .best_offsets
                .iter()
                .map(|o| OffsetRecord { x: o.x, y: o.y })
                .collect(),
            center_value: value.center_value,
            swapped: value.swapped,
            map_width: value.similarity_map.width(),
            map_height: value.similarity_map.height(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FilterReport {
    id: String,
    params: BTreeMap<String, f64>,
    width: usize,
    height: usize,
}

#[derive(Debug, Serialize)]
struct ParamRecord {
    id: &'static str,
    name: &'static str,
    default: f64,
    min: f64,
    max: f64,
    step: f64,
}

#[derive(Debug, Serialize)]
struct FilterRecord {
    id: &'static str,
    name: &'static str,
    params: Vec<ParamRecord>,
}

fn list_filters(registry: &FilterRegistry) -> Result<String, serde_json::Error> {
    let records: Vec<FilterRecord> = registry
        .descriptors()
        .map(|desc| FilterRecord {
            id: desc.id,
            name: desc.name,
            params: desc
                .params
                .iter()
                .map(|p| ParamRecord {
                    id: p.id,
                    name: p.name,
                    default: p.default,
                    min: p.min,
                    max: p.max,
                    step: p.step,
                })
                .collect(),
        })
        .collect();
    serde_json::to_string_pretty(&records)
}

fn run_filter(
    config: &Config,
    registry: &FilterRegistry,
    input: &PixelBuffer,
) -> Result<String, Box<dyn std::error::Error>> {
    let desc = registry
        .get(&config.filter.id)
        .ok_or_else(|| format!("unknown filter '{}'", config.filter.id))?
        .descriptor();
    let mut params = FilterParams::from(config.filter.params.clone());
    for param in desc.params {
        if params.get(param.id).is_none() {
            params.set(param.id, param.default);
        }
    }
    tracing::info!(id = desc.id, execution = ?registry.execution(), "running filter");

    let output = registry.apply_filter(desc.id, input.view(), &params)?;
    match &config.output_path {
        Some(path) => save_image(&output, path)?,
        None => tracing::info!("no output_path set; filtered image discarded"),
    }

    let report = FilterReport {
        id: desc.id.to_string(),
        params: params.iter().map(|(k, v)| (k.to_string(), v)).collect(),
        width: output.width(),
        height: output.height(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn run_correlation(
    config: &Config,
    input: &PixelBuffer,
) -> Result<String, Box<dyn std::error::Error>> {
    let matcher = CorrelationMatcher::new().with_config(
        CorrelationConfig::default()
            .with_auto_tie_tolerance(config.correlation.auto_tie_tolerance)
            .with_parallel(config.parallel),
    );
    tracing::info!(config = ?matcher.config(), task = ?config.task, "running correlation");

    let result = match config.task {
        Task::AutoCorrelate => matcher.auto_correlate(input.view())?,
        _ => {
            let path = config
                .second_path
                .as_ref()
                .ok_or("second_path must be set for cross_correlate")?;
            let second = load_rgba_image(path)?;
            matcher.cross_correlate(input.view(), second.view())?
        }
    };

    if let Some(path) = &config.map_path {
        save_image(&result.similarity_map, path)?;
    }
    let report = CorrelationReport::from(&result);
    Ok(serde_json::to_string_pretty(&report)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pixfilter=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let registry = FilterRegistry::standard();
    if cli.list_filters {
        println!("{}", list_filters(&registry)?);
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let exec = if config.parallel {
        Execution::Parallel
    } else {
        Execution::Sequential
    };
    let registry = registry.with_execution(exec);
    let input = load_rgba_image(&config.input_path)?;
    tracing::info!(
        width = input.width(),
        height = input.height(),
        "loaded input image"
    );

    let json = match config.task {
        Task::Filter => run_filter(&config, &registry, &input)?,
        Task::AutoCorrelate | Task::CrossCorrelate => run_correlation(&config, &input)?,
    };

    match &config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
