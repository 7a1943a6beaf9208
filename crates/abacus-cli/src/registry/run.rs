use std::fs::{OpenOptions, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use abacus_core::{QuestionSettings, ValidationIssue};
use abacus_generate::{Worksheet, WorksheetOptions, WorksheetReport};

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub config_path: PathBuf,
    pub settings: QuestionSettings,
    pub options: WorksheetOptions,
    pub normalization_warnings: Vec<ValidationIssue>,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig<'a> {
    pub run_id: &'a str,
    pub started_at: String,
    pub source: String,
    pub settings: &'a QuestionSettings,
    pub options: &'a WorksheetOptions,
    pub normalization_warnings: &'a [ValidationIssue],
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub worksheet_path: PathBuf,
    pub answers_path: PathBuf,
    pub report_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        source: ctx.config_path.display().to_string(),
        settings: &ctx.settings,
        options: &ctx.options,
        normalization_warnings: &ctx.normalization_warnings,
        git: collect_git_info(),
    };
    write_json(&root.join("config.json"), &config)?;

    let logs_path = root.join("logs.ndjson");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        logs_path,
        worksheet_path: root.join("worksheet.json"),
        answers_path: root.join("answers.txt"),
        report_path: root.join("report.json"),
        root,
    })
}

pub fn write_worksheet(paths: &RunPaths, worksheet: &Worksheet) -> RegistryResult<()> {
    write_json(&paths.worksheet_path, worksheet)
}

/// Answer key: one numbered line per question.
pub fn write_answers(paths: &RunPaths, worksheet: &Worksheet) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&paths.answers_path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "worksheet {} (seed {})", worksheet.id, worksheet.seed)?;
    for (index, question) in worksheet.questions.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} {}",
            index + 1,
            question.question_string,
            question.expected_answer
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Written instead of the worksheet when a run cannot be completed.
pub fn write_report(paths: &RunPaths, report: &WorksheetReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}
