//! Build command implementation.
//!
//! Reads unit tables and writes a purchase icon per unit and scale.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Config;
use crate::error::{PurchaserError, Result};
use crate::output::{build_summary, display_path, plural, unit_label, Printer};
use crate::parser::load_units;
use crate::paths::AssetPaths;
use crate::render::{UnitComposer, WriteOutcome};
use crate::report::{BatchReport, TableReport, UnitReport, UnitStatus};
use crate::types::UnitSpec;

/// Build purchase icons from unit tables
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Unit tables to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Project root containing the {scale}x sprite directories
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: purchaser.yaml in the project root)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output scale; repeat for several (overrides the config)
    #[arg(long = "scale")]
    pub scales: Vec<u32>,

    /// Copy background and mask pixels as well as content
    #[arg(long)]
    pub copy_background: bool,

    /// Rewrite outputs even when they are newer than their inputs
    #[arg(long)]
    pub force: bool,

    /// Print the build report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl BuildArgs {
    /// Resolve the effective config: file (explicit or discovered) plus flags.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::discover(&self.root)?,
        };

        if !self.scales.is_empty() {
            config.scales = self.scales.clone();
        }
        if self.copy_background {
            config.copy_background = true;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run(args: &BuildArgs, printer: &Printer) -> Result<BatchReport> {
    let config = args.resolve_config()?;
    let paths = AssetPaths::new(&args.root, &config.marker_dir);

    let mut report = BatchReport::default();

    for file in &args.files {
        let table = process_table(file, &config, &paths, args.force, printer)?;
        report.tables.push(table);
    }

    printer.status(
        "Finished",
        &build_summary(
            report.count(UnitStatus::Written),
            report.count(UnitStatus::Fresh),
            report.count(UnitStatus::Failed),
        ),
    );

    if args.json {
        let json = report.to_json().map_err(|e| PurchaserError::Encode {
            message: format!("Failed to serialize report: {}", e),
        })?;
        println!("{}", json);
    }

    Ok(report)
}

/// Process every unit of one table.
///
/// Reading or parsing the table is fatal; a failing unit is reported and
/// skipped.
pub fn process_table(
    file: &Path,
    config: &Config,
    paths: &AssetPaths,
    force: bool,
    printer: &Printer,
) -> Result<TableReport> {
    let units = load_units(file)?;
    printer.status(
        "Loading",
        &format!("{} ({})", display_path(file), plural(units.len(), "unit", "units")),
    );

    let mut report = TableReport::new(file.to_path_buf());

    let mut scales = Vec::new();
    for &scale in &config.scales {
        let dir = paths.scale_dir(scale);
        if dir.is_dir() {
            scales.push(scale);
        } else {
            printer.info(
                "Skipping",
                &format!("{}x: {} does not exist", scale, display_path(&dir)),
            );
            report.units.push(UnitReport {
                id: String::new(),
                scale: Some(scale),
                status: UnitStatus::MissingScale,
                path: Some(dir),
                messages: vec![],
            });
        }
    }

    let composers: Vec<UnitComposer<'_>> = scales
        .iter()
        .map(|&scale| UnitComposer::new(config, paths, scale))
        .collect();

    for unit in &units {
        if unit.template.is_skipped() {
            printer.verbose("Skipping", &format!("{} ({} template)", unit.id, unit.template));
            report.units.push(UnitReport {
                id: unit.id.clone(),
                scale: None,
                status: UnitStatus::Skipped,
                path: None,
                messages: vec![],
            });
            continue;
        }

        for composer in &composers {
            report.units.push(render_unit(composer, unit, force, printer));
        }
    }

    Ok(report)
}

fn render_unit(composer: &UnitComposer<'_>, unit: &UnitSpec, force: bool, printer: &Printer) -> UnitReport {
    let scale = composer.scale();
    let label = unit_label(&unit.id, scale);

    match composer.render(unit, force) {
        Ok(rendered) => {
            for warning in &rendered.warnings {
                printer.warning("Warning", &format!("{}: {}", label, warning));
            }

            let status = match rendered.outcome {
                WriteOutcome::Written => {
                    printer.status(
                        "Building",
                        &format!("{} -> {}", label, display_path(&rendered.path)),
                    );
                    UnitStatus::Written
                }
                WriteOutcome::UpToDate => {
                    printer.verbose("Fresh", &label);
                    UnitStatus::Fresh
                }
            };

            UnitReport {
                id: unit.id.clone(),
                scale: Some(scale),
                status,
                path: Some(rendered.path),
                messages: rendered.warnings,
            }
        }
        Err(e) => {
            printer.warning("Warning", &format!("could not build {}: {}", label, e));
            UnitReport {
                id: unit.id.clone(),
                scale: Some(scale),
                status: UnitStatus::Failed,
                path: None,
                messages: vec![e.to_string()],
            }
        }
    }
}
