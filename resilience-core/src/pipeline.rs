//! Batch assessment over occupation JSON records
//!
//! Reads occupation records, derives categories, classifies, and optionally
//! writes the assessment back into each record.
//!
//! Global invariants enforced:
//! - A bad record is skipped with a reason; it never aborts the batch
//! - Each occupation is independent; results are sorted after the parallel pass
//! - Record fields other than the assessment key are preserved untouched
//! - Writes are atomic (temp file + rename)

use crate::assessment::{assess, AssessmentContext, CareerAiAssessment, OccupationSignals};
use crate::config::ResolvedConfig;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An occupation record loaded from disk
#[derive(Debug, Clone)]
pub struct OccupationRecord {
    pub path: PathBuf,
    pub code: String,
    pub title: Option<String>,
    pub fields: Map<String, Value>,
}

impl OccupationRecord {
    /// Parse a record from JSON text
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))?;

        let fields = match value {
            Value::Object(map) => map,
            _ => anyhow::bail!("occupation record must be a JSON object: {}", path.display()),
        };

        let code = fields
            .get("code")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .with_context(|| format!("missing occupation code: {}", path.display()))?
            .to_string();
        let title = fields
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(OccupationRecord {
            path: path.to_path_buf(),
            code,
            title,
            fields,
        })
    }

    /// Load and parse a record file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        Self::parse(path, &content)
    }

    /// Raw classification signals carried by the record
    pub fn signals(&self) -> Result<OccupationSignals> {
        // Unknown keys are ignored, so the whole record can be read directly
        serde_json::from_value(Value::Object(self.fields.clone()))
            .with_context(|| format!("invalid signals for occupation {}", self.code))
    }

    /// Overwrite the assessment entry wholesale
    pub fn set_assessment(&mut self, key: &str, assessment: &CareerAiAssessment) -> Result<()> {
        let value = serde_json::to_value(assessment).context("failed to serialize assessment")?;
        self.fields.insert(key.to_string(), value);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.fields)
            .with_context(|| format!("failed to serialize record: {}", self.code))?;
        text.push('\n');
        Ok(text)
    }
}

/// Options shared by every file in a batch
pub struct BatchOptions<'a> {
    pub config: &'a ResolvedConfig,
    pub context: AssessmentContext,
    /// Write assessments back into the record files
    pub write: bool,
}

/// One successfully assessed occupation
#[derive(Debug, Clone)]
pub struct AssessedOccupation {
    pub path: PathBuf,
    pub code: String,
    pub title: Option<String>,
    pub assessment: CareerAiAssessment,
}

/// A file that could not be assessed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of processing a single file
#[derive(Debug)]
pub enum FileOutcome {
    Assessed(AssessedOccupation),
    /// Excluded by the include/exclude code filters
    Filtered(String),
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub assessed: Vec<AssessedOccupation>,
    pub skipped: Vec<SkippedFile>,
    pub filtered: usize,
    pub written: usize,
}

/// Assess one occupation file
pub fn process_file(path: &Path, options: &BatchOptions) -> Result<FileOutcome> {
    let mut record = OccupationRecord::load(path)?;

    if !options.config.should_include(&record.code) {
        return Ok(FileOutcome::Filtered(record.code));
    }

    let signals = record.signals()?;
    let assessment = assess(&signals, &options.context);
    debug!(
        code = %record.code,
        classification = %assessment.classification,
        rule = %assessment.rule,
        "classified occupation"
    );

    if options.write {
        record.set_assessment(&options.config.output_key, &assessment)?;
        atomic_write(path, &record.to_json()?)?;
    }

    Ok(FileOutcome::Assessed(AssessedOccupation {
        path: record.path,
        code: record.code,
        title: record.title,
        assessment,
    }))
}

/// Assess a set of files in parallel
pub fn run_batch(files: &[PathBuf], options: &BatchOptions) -> BatchResult {
    run_batch_with_progress(files, options, || {})
}

/// Assess a set of files in parallel, calling `on_file` after each one
pub fn run_batch_with_progress<F>(
    files: &[PathBuf],
    options: &BatchOptions,
    on_file: F,
) -> BatchResult
where
    F: Fn() + Sync + Send,
{
    let outcomes: Vec<(PathBuf, Result<FileOutcome>)> = files
        .par_iter()
        .map(|path| {
            let outcome = process_file(path, options);
            on_file();
            (path.clone(), outcome)
        })
        .collect();

    let mut result = BatchResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(FileOutcome::Assessed(occupation)) => {
                if options.write {
                    result.written += 1;
                }
                result.assessed.push(occupation);
            }
            Ok(FileOutcome::Filtered(code)) => {
                debug!(code = %code, "occupation excluded by filters");
                result.filtered += 1;
            }
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                result.skipped.push(SkippedFile {
                    path,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    result
        .assessed
        .sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.path.cmp(&b.path)));
    result.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    result
}

/// Collect and assess every occupation record under `path`
pub fn assess_path(path: &Path, options: &BatchOptions) -> Result<BatchResult> {
    let files = collect_assessable_files(path, options.config)?;
    Ok(run_batch(&files, options))
}

/// Occupation files under `path`, minus the config file the run was loaded from
///
/// An explicit `--config` file may carry any name and live beside the data.
pub fn collect_assessable_files(path: &Path, config: &ResolvedConfig) -> Result<Vec<PathBuf>> {
    let mut files = collect_occupation_files(path)?;
    if let Some(config_path) = &config.config_path {
        let config_path = canonical(config_path);
        files.retain(|f| canonical(f) != config_path);
    }
    Ok(files)
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Collect occupation record files from a path (file or directory)
///
/// Directories are walked recursively; hidden directories, `node_modules`,
/// and symlinks are skipped. Only `.json` files are returned, sorted.
pub fn collect_occupation_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_record_file(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        collect_recursive(path, &mut files)?;
    } else {
        anyhow::bail!("path does not exist: {}", path.display());
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

/// Config files live beside the data and must not be treated as records
const CONFIG_FILE_NAMES: &[&str] = &[".resiliencerc.json", "resilience.config.json", "package.json"];

fn is_record_file(path: &Path) -> bool {
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    is_json && !CONFIG_FILE_NAMES.contains(&name)
}

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules"
}

fn collect_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("failed to read metadata: {}", path.display()))?;

        if metadata.is_symlink() {
            continue;
        }

        if metadata.is_dir() {
            let skip = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_skipped_dir);
            if !skip {
                collect_recursive(&path, files)?;
            }
        } else if metadata.is_file() && is_record_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Write a file atomically (temp file in the same directory, then rename)
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    let result = write_then_rename(&temp_path, path, contents);
    if result.is_err() && temp_path.exists() {
        // Never leave a half-written temp file beside the record
        if let Err(e) = std::fs::remove_file(&temp_path) {
            warn!("failed to remove temp file {}: {}", temp_path.display(), e);
        }
    }
    result
}

fn write_then_rename(temp_path: &Path, path: &Path, contents: &str) -> Result<()> {
    use std::fs;
    use std::io::Write;

    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write to temp file: {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync temp file: {}", temp_path.display()))?;
    drop(file);

    fs::rename(temp_path, path)
        .with_context(|| format!("failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
