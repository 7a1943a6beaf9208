use std::collections::HashSet;
use std::time::Instant;

use rand::{Rng, RngCore};
use tracing::{info, warn};

use abacus_core::QuestionSettings;

use crate::dispatch::generate_question;
use crate::errors::GenerationError;
use crate::model::{GenerationIssue, Worksheet, WorksheetOptions, WorksheetReport};
use crate::rng::{fresh_seed, rng_from_seed};

const WORKSHEET_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const WORKSHEET_ID_LEN: usize = 6;

/// Generates a batch of questions from one seeded random stream.
#[derive(Debug, Clone)]
pub struct WorksheetEngine {
    options: WorksheetOptions,
}

impl WorksheetEngine {
    pub fn new(options: WorksheetOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, settings: &QuestionSettings) -> Result<Worksheet, GenerationError> {
        if self.options.count == 0 {
            return Err(GenerationError::InvalidSettings(
                "worksheet count must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();
        let seed = settings.seed.clone().unwrap_or_else(fresh_seed);
        let mut rng = rng_from_seed(&seed);
        let mut report = WorksheetReport::new(self.options.count);

        info!(
            seed = %seed,
            operation = %settings.operation_type(),
            count = self.options.count,
            unique = self.options.unique,
            "worksheet started"
        );

        let mut seen: HashSet<String> = HashSet::new();
        let mut questions = Vec::with_capacity(self.options.count as usize);
        let max_attempts = self.options.max_attempts_question.max(1);

        for index in 0..self.options.count {
            let mut attempts = 0_u32;
            let question = loop {
                attempts += 1;
                let question = match generate_question(settings, &mut rng) {
                    Ok(question) => question,
                    Err(err) => return Err(self.fail(err, index, report, start)),
                };
                if !self.options.unique || !seen.contains(&question.question_string) {
                    break question;
                }
                if attempts >= max_attempts {
                    report.record_warning(GenerationIssue::warning(
                        "duplicate_question",
                        format!(
                            "'{}' repeats after {attempts} attempts",
                            question.question_string
                        ),
                        Some(index),
                    ));
                    break question;
                }
            };
            report.retries_total += u64::from(attempts - 1);

            if question.fallback {
                report.record_fallback();
                report.record_warning(GenerationIssue::warning(
                    "fallback_question",
                    format!("'{}' is a fallback question", question.question_string),
                    Some(index),
                ));
            }

            seen.insert(question.question_string.clone());
            questions.push(question);
        }

        let id = worksheet_id(&mut rng);
        report.questions_generated = questions.len() as u32;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            worksheet_id = %id,
            questions = report.questions_generated,
            retries = report.retries_total,
            fallbacks = report.fallback_count,
            duration_ms = report.duration_ms,
            "worksheet completed"
        );

        Ok(Worksheet {
            id,
            seed,
            settings: settings.clone(),
            questions,
            report,
        })
    }

    /// Configuration errors surface as-is; search failures carry the partial report.
    fn fail(
        &self,
        err: GenerationError,
        index: u32,
        mut report: WorksheetReport,
        start: Instant,
    ) -> GenerationError {
        warn!(question_index = index, error = %err, "worksheet generation failed");
        match err {
            GenerationError::Exhausted(_) | GenerationError::Invariant(_) => {
                report.questions_generated = index;
                report.duration_ms = start.elapsed().as_millis() as u64;
                report.record_warning(GenerationIssue::error(
                    "generation_failed",
                    err.to_string(),
                    Some(index),
                ));
                GenerationError::Failed(report)
            }
            other => other,
        }
    }
}

fn worksheet_id(rng: &mut dyn RngCore) -> String {
    (0..WORKSHEET_ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..WORKSHEET_ID_ALPHABET.len());
            char::from(WORKSHEET_ID_ALPHABET[idx])
        })
        .collect()
}
