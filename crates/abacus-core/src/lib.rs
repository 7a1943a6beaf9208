//! Core contracts for the abacus question generator.
//!
//! This crate defines the settings and question types, the scenario
//! catalogue, the multiplication rule language, and the validation layer
//! that every generator relies on before sampling.

pub mod error;
pub mod question;
pub mod rules;
pub mod scenario;
pub mod settings;
pub mod validation;

pub use error::{Error, Result};
pub use question::{OperationType, Question};
pub use rules::{
    MAX_ENUMERATED_DIGITS, MAX_RULE_PART_LEN, RuleChar, RuleSet, enumerate_valid_rule_strings,
    parse_rule_set, parse_rule_string, zero_pattern_value,
};
pub use scenario::Scenario;
pub use settings::{
    AddSubSettings, DivideSettings, DivisionFormula, MultiplySettings, OperationSettings,
    QuestionSettings, TimesTable,
};
pub use validation::{
    IssueSeverity, MAX_PRODUCT_DIGITS, MAX_TIMES_TABLE_FACTOR, NormalizedSettings,
    ValidationIssue, ValidationReport, normalize_settings, validate_settings,
};
