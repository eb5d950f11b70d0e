//! Command implementations. Output goes to the given writer; diagnostics go
//! through `tracing`.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use registrar_core::config::DATA_DIR_ENV;
use registrar_core::{Checked, Collection, Config, RecordKind, RecordStore, Report};
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::Command;

/// Where the configuration and store live.
#[derive(Debug, Clone)]
pub struct Paths {
    pub config_file: PathBuf,
    pub data_dir_override: Option<PathBuf>,
}

impl Paths {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            config_file: Config::config_path()?,
            data_dir_override: std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        })
    }

    fn open_store(&self) -> Result<RecordStore> {
        let config = Config::load_from(&self.config_file)?;
        let dir = config.resolve_store_dir(self.data_dir_override.clone())?;
        debug!(dir = %dir.display(), "Opening store");
        RecordStore::new(dir)
    }
}

pub fn run(command: Command, paths: &Paths, out: &mut dyn Write) -> Result<ExitCode> {
    match command {
        Command::Kinds => kinds(out),
        Command::Validate { kind, file, many } => validate(kind, &file, many, out),
        Command::Normalize { kind, file, many } => normalize(kind, &file, many, out),
        Command::Import { collection, file } => import(paths, collection, &file, out),
        Command::Status => status(paths, out),
        Command::Config {
            school,
            year,
            data_dir,
        } => {
            let update = Config {
                data_dir,
                school,
                academic_year: year,
            };
            config(paths, update, out)
        }
    }
}

fn read_json(file: &Path) -> Result<Value> {
    let contents = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", file.display()))
}

/// Check one record, or each element of an array with `many`.
fn check(kind: RecordKind, value: Value, many: bool) -> Result<Vec<Checked>> {
    let checked = if many {
        kind.check_each(value)?
    } else {
        vec![kind.check(value)?]
    };
    Ok(checked)
}

fn write_report(out: &mut dyn Write, report: &Report) -> Result<()> {
    for violation in &report.violations {
        writeln!(out, "{}", violation)?;
    }
    Ok(())
}

fn kinds(out: &mut dyn Write) -> Result<ExitCode> {
    for kind in RecordKind::ALL {
        writeln!(out, "{}", kind)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(kind: RecordKind, file: &Path, many: bool, out: &mut dyn Write) -> Result<ExitCode> {
    let value = read_json(file)?;
    let checked = check(kind, value, many)?;

    let mut report = Report::default();
    for (i, record) in checked.iter().enumerate() {
        if many {
            report.merge(&format!("[{}]", i), record.report.clone());
        } else {
            report.merge("", record.report.clone());
        }
    }
    write_report(out, &report)?;

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if errors > 0 {
        writeln!(
            out,
            "{}: {} error(s), {} warning(s)",
            file.display(),
            errors,
            warnings
        )?;
        return Ok(ExitCode::FAILURE);
    }
    writeln!(
        out,
        "{}: {} {} record(s) ok, {} warning(s)",
        file.display(),
        checked.len(),
        kind,
        warnings
    )?;
    Ok(ExitCode::SUCCESS)
}

fn normalize(kind: RecordKind, file: &Path, many: bool, out: &mut dyn Write) -> Result<ExitCode> {
    let value = read_json(file)?;
    let checked = check(kind, value, many)?;
    for record in &checked {
        for violation in &record.report.violations {
            debug!(kind = %kind, %violation, "Normalized record has violations");
        }
    }

    let normalized = if many {
        Value::Array(checked.into_iter().map(|c| c.normalized).collect())
    } else {
        checked
            .into_iter()
            .next()
            .map(|c| c.normalized)
            .unwrap_or(Value::Null)
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&normalized)?)?;
    Ok(ExitCode::SUCCESS)
}

fn import(paths: &Paths, collection: Collection, file: &Path, out: &mut dyn Write) -> Result<ExitCode> {
    let value = read_json(file)?;
    let store = paths.open_store()?;
    let imported = store.import(&collection, value)?;
    write_report(out, &imported.report)?;

    if !imported.saved {
        writeln!(
            out,
            "Refused to import {}: {} error(s)",
            collection,
            imported.report.errors().count()
        )?;
        return Ok(ExitCode::FAILURE);
    }
    writeln!(out, "Imported {} record(s) into {}", imported.count, collection)?;
    Ok(ExitCode::SUCCESS)
}

fn status(paths: &Paths, out: &mut dyn Write) -> Result<ExitCode> {
    let store = paths.open_store()?;
    writeln!(out, "Store: {}", store.dir().display())?;

    let collections = store.collections()?;
    if collections.is_empty() {
        writeln!(out, "No collections stored")?;
    }
    for collection in &collections {
        match store.load::<Vec<Value>>(collection) {
            Ok(Some(snapshot)) => writeln!(
                out,
                "{:<28} {:>6} records  {}",
                collection.to_string(),
                snapshot.records.len(),
                snapshot.age_display()
            )?,
            Ok(None) => {}
            Err(e) => writeln!(out, "{:<28} unreadable: {:#}", collection.to_string(), e)?,
        }
    }

    if store.any_stale() {
        writeln!(out, "Core collections are missing or stale; re-import them")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn config(paths: &Paths, update: Config, out: &mut dyn Write) -> Result<ExitCode> {
    let mut config = Config::load_from(&paths.config_file)?;
    let changed = update != Config::default();

    if let Some(school) = update.school {
        config.school = Some(school);
    }
    if let Some(year) = update.academic_year {
        config.academic_year = Some(year);
    }
    if let Some(dir) = update.data_dir {
        config.data_dir = Some(dir);
    }
    if changed {
        config.save_to(&paths.config_file)?;
        info!(path = %paths.config_file.display(), "Saved config");
    }

    writeln!(out, "Config: {}", paths.config_file.display())?;
    writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
    Ok(ExitCode::SUCCESS)
}
