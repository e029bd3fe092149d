//! Boot the project and surface the errors collected along the way.

use super::project::load_project;
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct VerificationSummary {
    files: usize,
    pages: usize,
    routes: usize,
    errors: Vec<ErrorEntry>,
}

#[derive(Serialize)]
struct ErrorEntry {
    path: Option<String>,
    message: String,
}

/// Report parse failures; exits non-zero when any file failed.
pub fn verify_project(config_path: &Path, json: bool) -> Result<()> {
    let (_config, project) = load_project(config_path)?;

    let errors: Vec<ErrorEntry> = project
        .report()
        .errors
        .iter()
        .map(|e| ErrorEntry {
            path: e.path().map(|p| p.display().to_string()),
            message: e.to_string(),
        })
        .collect();

    let summary = VerificationSummary {
        files: project.files().len(),
        pages: project.pages().len(),
        routes: project.routes().len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Verification complete: {} files, {} pages, {} routes, {} errors",
            summary.files,
            summary.pages,
            summary.routes,
            summary.errors.len()
        );
        for err in &summary.errors {
            println!("- {}", err.message);
        }
    }

    if !summary.errors.is_empty() {
        bail!("{} file(s) failed to parse", summary.errors.len());
    }
    Ok(())
}
