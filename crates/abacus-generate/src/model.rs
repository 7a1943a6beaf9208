use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use abacus_core::{Question, QuestionSettings};

/// Options for the worksheet engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetOptions {
    /// Number of questions on the worksheet.
    pub count: u32,
    /// Regenerate questions whose rendering already appears on the sheet.
    pub unique: bool,
    /// Maximum draws for a single question slot when `unique` is set.
    pub max_attempts_question: u32,
}

impl Default for WorksheetOptions {
    fn default() -> Self {
        Self {
            count: 20,
            unique: false,
            max_attempts_question: 50,
        }
    }
}

/// Structured worksheet issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_index: Option<u32>,
}

impl GenerationIssue {
    pub fn warning(code: &str, message: impl Into<String>, question_index: Option<u32>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            question_index,
        }
    }

    pub fn error(code: &str, message: impl Into<String>, question_index: Option<u32>) -> Self {
        Self {
            level: "error".to_string(),
            code: code.to_string(),
            message: message.into(),
            question_index,
        }
    }
}

/// Report for a worksheet run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetReport {
    pub questions_requested: u32,
    pub questions_generated: u32,
    pub retries_total: u64,
    pub fallback_count: u64,
    pub duration_ms: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl WorksheetReport {
    pub fn new(questions_requested: u32) -> Self {
        Self {
            questions_requested,
            questions_generated: 0,
            retries_total: 0,
            fallback_count: 0,
            duration_ms: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_fallback(&mut self) {
        self.fallback_count += 1;
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}

/// A generated worksheet: questions plus everything needed to reproduce them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: String,
    pub seed: String,
    pub settings: QuestionSettings,
    pub questions: Vec<Question>,
    pub report: WorksheetReport,
}
