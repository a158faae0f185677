// JSON export of fit and sweep results.
//
// External plotting tools read these files; the layout is the serde
// representation of FitReport and SelectionTable plus normalized curves.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::pipeline::fit::FitReport;
use crate::selection::{Metric, SelectionTable};

pub const FIT_FILE: &str = "fit.json";
pub const SELECTION_FILE: &str = "selection.json";

#[derive(Serialize)]
struct SelectionExport<'a> {
    #[serde(flatten)]
    table: &'a SelectionTable,
    normalized: BTreeMap<Metric, Vec<(usize, f64)>>,
}

/// Write `fit.json` into `dir`, creating the directory if needed.
pub fn write_report(dir: &Path, report: &FitReport) -> Result<PathBuf> {
    write_json(dir, FIT_FILE, report)
}

/// Write `selection.json` (raw scores plus normalized curves) into `dir`.
pub fn write_selection(dir: &Path, table: &SelectionTable) -> Result<PathBuf> {
    let export = SelectionExport {
        table,
        normalized: table.normalized(),
    };
    write_json(dir, SELECTION_FILE, &export)
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "Wrote export");
    Ok(path)
}
