use serde::Serialize;

use crate::error::{Error, Result};
use crate::rules::parse_rule_set;
use crate::scenario::Scenario;
use crate::settings::{
    AddSubSettings, DivideSettings, DivisionFormula, MultiplySettings, OperationSettings,
    QuestionSettings,
};

pub const MAX_ADD_SUB_TERMS: u32 = 50;
pub const MAX_WEIGHTING_MULTIPLIER: u32 = 100;
pub const MAX_ADD_SUB_TERM_DIGITS: u32 = 5;
pub const MAX_DIVISOR_DIGITS: u32 = 6;
pub const MAX_DIVIDEND_DIGITS: u32 = 9;
/// Multiplicand plus multiplier digits; keeps every product inside `i64`.
pub const MAX_PRODUCT_DIGITS: usize = 18;
/// Largest times-table factor; two of them still multiply inside `i64`.
pub const MAX_TIMES_TABLE_FACTOR: u32 = 1_000_000_000;

const CODE_CLAMPED: &str = "value_clamped";
const CODE_RANGE_RAISED: &str = "range_raised";
const CODE_DEFAULTED: &str = "value_defaulted";

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Structured validation issue with location and hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
            hint,
        }
    }

    /// Issues that describe a repair made by [`normalize_settings`].
    fn is_repair(&self) -> bool {
        matches!(
            self.code.as_str(),
            CODE_CLAMPED | CODE_RANGE_RAISED | CODE_DEFAULTED
        )
    }
}

/// Aggregated validation report with errors and warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    fn error(&mut self, code: &str, path: &str, message: String, hint: Option<&str>) {
        self.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            code,
            path,
            message,
            hint.map(str::to_string),
        ));
    }

    fn warning(&mut self, code: &str, path: &str, message: String) {
        self.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            code,
            path,
            message,
            None,
        ));
    }
}

/// Settings after clamping and defaulting, with the repairs that were applied.
#[derive(Debug, Clone)]
pub struct NormalizedSettings {
    pub settings: QuestionSettings,
    pub warnings: Vec<ValidationIssue>,
}

/// Clamp, default and complete settings before they reach a generator.
///
/// Out-of-range numbers are pulled into range and reported as warnings. Rule
/// strings are parsed into `processed_rules`; an unparseable rule or an empty
/// times-table range is an error.
pub fn normalize_settings(
    settings: &QuestionSettings,
) -> std::result::Result<NormalizedSettings, ValidationReport> {
    let mut report = ValidationReport::default();

    let operation = match &settings.operation {
        OperationSettings::AddSubtract(add_sub) => {
            OperationSettings::AddSubtract(normalize_add_sub(add_sub, &mut report))
        }
        OperationSettings::Multiply(multiply) => {
            OperationSettings::Multiply(normalize_multiply(multiply, &mut report))
        }
        OperationSettings::Divide(divide) => {
            OperationSettings::Divide(normalize_divide(divide, &mut report))
        }
    };

    if !report.is_ok() {
        return Err(report);
    }

    Ok(NormalizedSettings {
        settings: QuestionSettings {
            seed: settings.seed.clone(),
            operation,
        },
        warnings: report.warnings,
    })
}

/// Reject settings that [`normalize_settings`] would have to repair.
///
/// Generators call this before sampling; the first problem is returned as
/// [`Error::InvalidSettings`].
pub fn validate_settings(settings: &QuestionSettings) -> Result<()> {
    match normalize_settings(settings) {
        Ok(normalized) => match normalized.warnings.iter().find(|issue| issue.is_repair()) {
            Some(issue) => Err(invalid(issue)),
            None => Ok(()),
        },
        Err(report) => match report.errors.first() {
            Some(issue) => Err(invalid(issue)),
            None => Ok(()),
        },
    }
}

fn invalid(issue: &ValidationIssue) -> Error {
    Error::InvalidSettings(format!("{}: {}", issue.path, issue.message))
}

fn normalize_add_sub(settings: &AddSubSettings, report: &mut ValidationReport) -> AddSubSettings {
    let min_terms = clamp(
        settings.min_add_sub_terms,
        1,
        MAX_ADD_SUB_TERMS,
        "/min_add_sub_terms",
        report,
    );
    let max_terms = clamp_upper_bound(
        settings.max_add_sub_terms,
        min_terms,
        MAX_ADD_SUB_TERMS,
        "/max_add_sub_terms",
        report,
    );

    let scenario = match settings.add_sub_scenario {
        Some(id) => clamp(
            u32::from(id),
            u32::from(Scenario::MIN),
            u32::from(Scenario::MAX),
            "/add_sub_scenario",
            report,
        ),
        None => {
            report.warning(
                CODE_DEFAULTED,
                "/add_sub_scenario",
                "add_sub_scenario is required for add_subtract; defaulted to 1".to_string(),
            );
            u32::from(Scenario::MIN)
        }
    };

    let weighting = clamp(
        settings.add_sub_weighting_multiplier,
        1,
        MAX_WEIGHTING_MULTIPLIER,
        "/add_sub_weighting_multiplier",
        report,
    );
    let min_digits = clamp(
        settings.min_add_sub_term_digits,
        1,
        MAX_ADD_SUB_TERM_DIGITS,
        "/min_add_sub_term_digits",
        report,
    );
    let max_digits = clamp_upper_bound(
        settings.max_add_sub_term_digits,
        min_digits,
        MAX_ADD_SUB_TERM_DIGITS,
        "/max_add_sub_term_digits",
        report,
    );

    AddSubSettings {
        min_add_sub_terms: min_terms,
        max_add_sub_terms: max_terms,
        add_sub_scenario: u8::try_from(scenario).ok(),
        add_sub_weighting_multiplier: weighting,
        min_add_sub_term_digits: min_digits,
        max_add_sub_term_digits: max_digits,
    }
}

fn normalize_multiply(
    settings: &MultiplySettings,
    report: &mut ValidationReport,
) -> MultiplySettings {
    let mut normalized = settings.clone();

    if let Some(table) = &settings.times_table {
        if table.term1_min > table.term1_max {
            report.error(
                "empty_times_table_range",
                "/times_table/term1_min",
                format!(
                    "term1 range {}..={} is empty",
                    table.term1_min, table.term1_max
                ),
                Some("term1_min must not exceed term1_max"),
            );
        }
        if table.term2_min > table.term2_max {
            report.error(
                "empty_times_table_range",
                "/times_table/term2_min",
                format!(
                    "term2 range {}..={} is empty",
                    table.term2_min, table.term2_max
                ),
                Some("term2_min must not exceed term2_max"),
            );
        }
        for (path, value) in [
            ("/times_table/term1_max", table.term1_max),
            ("/times_table/term2_max", table.term2_max),
        ] {
            if value > MAX_TIMES_TABLE_FACTOR {
                report.error(
                    "factor_too_large",
                    path,
                    format!("{value} exceeds the largest factor {MAX_TIMES_TABLE_FACTOR}"),
                    None,
                );
            }
        }
        return normalized;
    }

    // Precomputed parts win over the raw rule string.
    let (rules, path) = match (&settings.processed_rules, &settings.rule_string) {
        (Some(parts), _) => {
            let rules = parse_rule_set(&parts.join("+"))
                .filter(|rules| &rules.checked_parts() == parts);
            if rules.is_none() {
                report.error(
                    "invalid_processed_rules",
                    "/processed_rules",
                    format!("processed rules {parts:?} are not a consistent rule set"),
                    None,
                );
            }
            (rules, "/processed_rules")
        }
        (None, Some(rule)) => {
            let rules = parse_rule_set(rule);
            match &rules {
                Some(rules) => normalized.processed_rules = Some(rules.checked_parts()),
                None => report.error(
                    "invalid_rule_string",
                    "/rule_string",
                    format!("rule string '{rule}' is not valid"),
                    Some("use parts over a, s, d, 0 of equal length and zero pattern, e.g. 'ss + sd'"),
                ),
            }
            (rules, "/rule_string")
        }
        (None, None) => {
            report.error(
                "missing_rules",
                "/rule_string",
                "multiply settings need rule_string, processed_rules or times_table".to_string(),
                None,
            );
            (None, "/rule_string")
        }
    };

    if let Some(rules) = rules {
        let digits = rules.term1_digits() + rules.term2_digits();
        if digits > MAX_PRODUCT_DIGITS {
            report.error(
                "rule_too_long",
                path,
                format!(
                    "a {}-digit by {}-digit product exceeds {MAX_PRODUCT_DIGITS} digits",
                    rules.term1_digits(),
                    rules.term2_digits()
                ),
                Some("use fewer rule parts or shorter parts"),
            );
        }
    }

    normalized
}

fn normalize_divide(settings: &DivideSettings, report: &mut ValidationReport) -> DivideSettings {
    if settings.division_formula_type != DivisionFormula::AnyDigits {
        for (field, value) in [
            ("/divisor_digits", settings.divisor_digits),
            ("/dividend_digits_min", settings.dividend_digits_min),
            ("/dividend_digits_max", settings.dividend_digits_max),
        ] {
            if value.is_some() {
                report.warning(
                    "ignored_field",
                    field,
                    format!(
                        "{} is only read by {}",
                        &field[1..],
                        DivisionFormula::AnyDigits
                    ),
                );
            }
        }
        return settings.clone();
    }

    let divisor_digits = clamp(
        settings.divisor_digits.unwrap_or(1),
        1,
        MAX_DIVISOR_DIGITS,
        "/divisor_digits",
        report,
    );
    let dividend_min = clamp(
        settings.dividend_digits_min.unwrap_or(2),
        1,
        MAX_DIVIDEND_DIGITS,
        "/dividend_digits_min",
        report,
    );
    let dividend_max = clamp_upper_bound(
        settings
            .dividend_digits_max
            .unwrap_or_else(|| (dividend_min + 1).clamp(2, MAX_DIVIDEND_DIGITS)),
        dividend_min,
        MAX_DIVIDEND_DIGITS,
        "/dividend_digits_max",
        report,
    );

    if dividend_max < divisor_digits {
        report.warning(
            "unreachable_dividend_digits",
            "/dividend_digits_max",
            format!(
                "a {dividend_max}-digit dividend cannot hold a {divisor_digits}-digit divisor twice; the fallback question will be used"
            ),
        );
    }

    DivideSettings {
        division_formula_type: settings.division_formula_type,
        divisor_digits: Some(divisor_digits),
        dividend_digits_min: Some(dividend_min),
        dividend_digits_max: Some(dividend_max),
    }
}

fn clamp(value: u32, min: u32, max: u32, path: &str, report: &mut ValidationReport) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        report.warning(
            CODE_CLAMPED,
            path,
            format!("{value} is outside {min}..={max}; clamped to {clamped}"),
        );
    }
    clamped
}

/// Clamp the upper end of a range, raising it to `lower` when it falls below.
fn clamp_upper_bound(
    value: u32,
    lower: u32,
    max: u32,
    path: &str,
    report: &mut ValidationReport,
) -> u32 {
    if value < lower {
        report.warning(
            CODE_RANGE_RAISED,
            path,
            format!("{value} is below the range minimum {lower}; raised to {lower}"),
        );
        return lower;
    }
    clamp(value, lower, max, path, report)
}
