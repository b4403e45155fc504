//! Reference checking - reports which `$ref` nodes inline resolution keeps.
//!
//! Checks OpenAPI documents for:
//! - JSON syntax and IO errors
//! - Dangling definition references (named schema does not exist)
//! - Cyclic references (kept as `$ref` to guarantee termination)
//! - References outside `components.schemas` (left untouched)
//! - Documents without a `paths` object

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::loader::load_document;
use crate::resolver::{resolve_with_report, UnresolvedReason};
use crate::types::{json_type_name, PATHS_KEY};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from checking.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON Pointer to the node in the resolved document (e.g., "/paths/~1pets/get")
    pub path: String,
    pub message: String,
}

/// Result of checking a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a checked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of checking a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl CheckResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Overall verdict: no errors, and no warnings either when `strict`.
    pub fn passes(&self, strict: bool) -> bool {
        self.is_ok() && (!strict || self.warnings == 0)
    }
}

/// Check a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
pub fn check(path: &Path, strict: bool) -> CheckResult {
    let results: Vec<FileResult> = collect_document_files(path)
        .iter()
        .map(|file| check_file(file, path))
        .collect();

    let errors = results.iter().map(|r| count(r, Severity::Error)).sum();
    let warnings = results.iter().map(|r| count(r, Severity::Warning)).sum();
    let failed = results
        .iter()
        .filter(|r| match r.status {
            FileStatus::Error => true,
            FileStatus::Warning => strict,
            FileStatus::Ok => false,
        })
        .count();

    CheckResult {
        path: path.to_path_buf(),
        files_checked: results.len(),
        passed: results.len() - failed,
        failed,
        errors,
        warnings,
        results,
    }
}

/// Check a single document file.
pub fn check_file(file: &Path, base_path: &Path) -> FileResult {
    let diagnostics = match load_document(file) {
        Ok(document) => check_document(&document, file),
        Err(e) => vec![Diagnostic {
            severity: Severity::Error,
            code: "E001".to_string(),
            file: file.to_path_buf(),
            path: "/".to_string(),
            message: format!("cannot load document: {}", e),
        }],
    };

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

/// Check an already-loaded document. `file` is only used to label diagnostics.
pub fn check_document(document: &Value, file: &Path) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    match document.get(PATHS_KEY) {
        Some(Value::Object(_)) => {}
        Some(other) => diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: "W003".to_string(),
            file: file.to_path_buf(),
            path: "/paths".to_string(),
            message: format!("paths should be an object, got {}", json_type_name(other)),
        }),
        None => diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: "W003".to_string(),
            file: file.to_path_buf(),
            path: "/".to_string(),
            message: "document has no paths section".to_string(),
        }),
    }

    for kept in resolve_with_report(document).unresolved {
        let (severity, code, message) = match kept.reason {
            UnresolvedReason::Missing => (
                Severity::Error,
                "E002",
                format!("definition not found: {}", kept.reference),
            ),
            UnresolvedReason::Cycle => (
                Severity::Warning,
                "W001",
                format!("cyclic reference kept: {}", kept.reference),
            ),
            UnresolvedReason::Foreign => (
                Severity::Warning,
                "W002",
                format!("reference outside components.schemas: {}", kept.reference),
            ),
        };
        diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            file: file.to_path_buf(),
            path: kept.path,
            message,
        });
    }

    diagnostics
}

fn count(result: &FileResult, severity: Severity) -> usize {
    result
        .diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .count()
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Every `.json` file under `path`, sorted. A lone file is kept only if it is JSON.
fn collect_document_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return if is_json(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                pending.push(entry_path);
            } else if is_json(&entry_path) {
                files.push(entry_path);
            }
        }
    }
    files.sort();
    files
}
