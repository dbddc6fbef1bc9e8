use crate::common;
use crate::config::{Config, ExportFileType};
use crate::export::{self, ExportSubject};
use crate::layers::{DeriveOptions, Layer, LayerDeriver};
use crate::model::{Execution, Process, Provenance};
use crate::provenance::{ProvenanceTable, ProvenanceTableBuilder};
use notify::{Config as WatchConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use tracing::{debug, error, info};

use anyhow::Result;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Csv,
}

impl From<OutputFormat> for ExportFileType {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFileType::JSON,
            OutputFormat::Yaml => ExportFileType::YAML,
            OutputFormat::Csv => ExportFileType::CSV,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub watch: bool,
}

/// Loads the configuration file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration: {}", path.display());
            Ok(Config::from_file(path)?)
        }
        None => Ok(Config::default()),
    }
}

pub fn derive_layers_from_files(
    process_path: &Path,
    execution_path: &Path,
    config: &Config,
) -> Result<Vec<Layer>> {
    let process: Process = common::read_json_file(process_path)?;
    let execution: Execution = common::read_json_file(execution_path)?;

    let layers = LayerDeriver::new(config.palette.clone())
        .with_options(DeriveOptions {
            skip_pending_steps: config.skip_pending_steps,
        })
        .derive(&process, &execution)?;

    info!(
        "Derived {} layers for process '{}'",
        layers.len(),
        process.name
    );
    Ok(layers)
}

pub fn build_provenance_from_file(input_path: &Path, config: &Config) -> Result<ProvenanceTable> {
    let provenance: Provenance = common::read_json_file(input_path)?;

    let table = ProvenanceTableBuilder::new()
        .with_feature_uri_key(&config.feature_uri_key)
        .build(&provenance)?;

    info!(
        "Built provenance table for '{}' with {} properties and {} steps",
        table.step_name,
        table.properties.len(),
        table.steps.len()
    );
    Ok(table)
}

/// Writes the subject to the explicit output, then to every configured export.
/// Prints to stdout when there is nowhere else to write.
///
/// Paths in configured exports, including custom templates and partials, are
/// relative to the configuration file.
pub fn export_results(
    subject: ExportSubject<'_>,
    config: &Config,
    options: &RunOptions,
) -> Result<()> {
    if let Some(output) = &options.output {
        let content = export::render(subject, &options.format.into())?;
        info!("Writing {} to {}", subject.kind(), output.display());
        common::write_string_to_file(output, &content)?;
    }

    let base_dir = options
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default();

    for profile in &config.exports {
        let path = base_dir.join(&profile.filename);
        let exporter = profile.exporter.resolved_against(&base_dir);
        debug!("Exporting {} as {:?}", subject.kind(), exporter);
        let content = export::render(subject, &exporter)?;
        info!("Writing {} to {}", subject.kind(), path.display());
        common::write_string_to_file(&path, &content)?;
    }

    if options.output.is_none() && config.exports.is_empty() {
        println!("{}", export::render(subject, &options.format.into())?);
    }

    Ok(())
}

fn run_layers_once(process: &Path, execution: &Path, options: &RunOptions) -> Result<()> {
    let config = load_config(options.config.as_deref())?;
    let layers = derive_layers_from_files(process, execution, &config)?;
    export_results(ExportSubject::Layers(&layers), &config, options)
}

fn run_provenance_once(input: &Path, options: &RunOptions) -> Result<()> {
    let config = load_config(options.config.as_deref())?;
    let table = build_provenance_from_file(input, &config)?;
    export_results(ExportSubject::Provenance(&table), &config, options)
}

/// Derives and exports the layers of a process execution, with optional file watching
pub fn execute_layers(process: &Path, execution: &Path, options: &RunOptions) -> Result<()> {
    info!(
        "Deriving layers from {} and {}",
        process.display(),
        execution.display()
    );
    run_layers_once(process, execution, options)?;

    if options.watch {
        let mut files = vec![process.to_path_buf(), execution.to_path_buf()];
        files.extend(options.config.clone());
        watch_for_changes(&files, || run_layers_once(process, execution, options))?;
    }

    Ok(())
}

/// Builds and exports the provenance table of a POI, with optional file watching
pub fn execute_provenance(input: &Path, options: &RunOptions) -> Result<()> {
    info!("Building provenance table from {}", input.display());
    run_provenance_once(input, options)?;

    if options.watch {
        let mut files = vec![input.to_path_buf()];
        files.extend(options.config.clone());
        watch_for_changes(&files, || run_provenance_once(input, options))?;
    }

    Ok(())
}

/// Re-runs `rerun` whenever one of the input files is modified.
///
/// Inputs are refreshed by the backend while an execution progresses, so a
/// failed re-run is logged and the watch continues.
fn watch_for_changes<F>(files: &[PathBuf], mut rerun: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    info!("Watching for changes");
    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, WatchConfig::default())?;
    for file in files {
        watcher.watch(file, RecursiveMode::NonRecursive)?;
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                if let Ok(event) = event {
                    if let EventKind::Modify(_) = event.kind {
                        debug!("File modified {:?}", event.paths);
                        info!("Change detected, re-running");
                        if let Err(e) = rerun() {
                            error!("Re-run failed: {:#}", e);
                        }
                    }
                }
            }
            Err(e) => {
                error!("Watch channel closed: {:?}", e);
                return Err(e.into());
            }
        }
    }
}
