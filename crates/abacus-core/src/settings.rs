use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::question::OperationType;

/// Input of a single generator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSettings {
    /// Seed for the deterministic random source. Worksheets sharing a seed
    /// share their questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(flatten)]
    pub operation: OperationSettings,
}

/// Per-operation settings, tagged by `operation_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "operation_type", rename_all = "snake_case")]
pub enum OperationSettings {
    AddSubtract(AddSubSettings),
    #[serde(alias = "multiplication")]
    Multiply(MultiplySettings),
    #[serde(alias = "division")]
    Divide(DivideSettings),
}

impl OperationSettings {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationSettings::AddSubtract(_) => OperationType::AddSubtract,
            OperationSettings::Multiply(_) => OperationType::Multiply,
            OperationSettings::Divide(_) => OperationType::Divide,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AddSubSettings {
    #[serde(default = "default_min_terms", alias = "minAddSubTerms")]
    pub min_add_sub_terms: u32,
    #[serde(default = "default_max_terms", alias = "maxAddSubTerms")]
    pub max_add_sub_terms: u32,
    /// Scenario id (1..=10). Required: generation fails without it.
    #[serde(default, alias = "addSubScenario")]
    pub add_sub_scenario: Option<u8>,
    #[serde(default = "default_weighting", alias = "addSubWeightingMultiplier")]
    pub add_sub_weighting_multiplier: u32,
    #[serde(default = "default_term_digits", alias = "minAddSubTermDigits")]
    pub min_add_sub_term_digits: u32,
    #[serde(default = "default_term_digits", alias = "maxAddSubTermDigits")]
    pub max_add_sub_term_digits: u32,
}

fn default_min_terms() -> u32 {
    2
}

fn default_max_terms() -> u32 {
    5
}

fn default_weighting() -> u32 {
    3
}

fn default_term_digits() -> u32 {
    1
}

impl Default for AddSubSettings {
    fn default() -> Self {
        Self {
            min_add_sub_terms: default_min_terms(),
            max_add_sub_terms: default_max_terms(),
            add_sub_scenario: Some(1),
            add_sub_weighting_multiplier: default_weighting(),
            min_add_sub_term_digits: default_term_digits(),
            max_add_sub_term_digits: default_term_digits(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MultiplySettings {
    /// Raw rule string such as `"ss + sd"`. Parsed when `processed_rules` is absent.
    #[serde(default, alias = "ruleString", skip_serializing_if = "Option::is_none")]
    pub rule_string: Option<String>,
    /// Checked rule parts: one per multiplier digit, one character per multiplicand digit.
    #[serde(default, alias = "processedRules", skip_serializing_if = "Option::is_none")]
    pub processed_rules: Option<Vec<String>>,
    /// Draw factors from fixed ranges instead of following rules.
    #[serde(default, alias = "timesTable", skip_serializing_if = "Option::is_none")]
    pub times_table: Option<TimesTable>,
}

impl MultiplySettings {
    pub fn from_rule(rule_string: impl Into<String>) -> Self {
        Self {
            rule_string: Some(rule_string.into()),
            ..Self::default()
        }
    }
}

/// Inclusive factor ranges for times-table practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimesTable {
    #[serde(alias = "term1Min")]
    pub term1_min: u32,
    #[serde(alias = "term1Max")]
    pub term1_max: u32,
    #[serde(alias = "term2Min")]
    pub term2_min: u32,
    #[serde(alias = "term2Max")]
    pub term2_max: u32,
}

/// Division archetypes. Names follow the abacus teaching vocabulary where the
/// divisor is the "cat" and the leading dividend digit the "mice".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DivisionFormula {
    /// 2-digit dividend, divisor 2..=9, leading digit below the divisor.
    #[serde(rename = "TYPE1_CAT_GT_MICE1_2D")]
    CatGtMice2D,
    /// 3-digit dividend, divisor 2..=9, leading digit below the divisor.
    #[serde(rename = "TYPE2_CAT_GT_MICE1_3D")]
    CatGtMice3D,
    /// 2- or 3-digit dividend, divisor 2..=9, leading digit equal to the divisor.
    #[serde(rename = "TYPE3_CAT_EQ_MICE1_2OR3D")]
    CatEqMice,
    /// 2-digit dividend, divisor 2..=8, leading digit above the divisor.
    #[serde(rename = "TYPE4_CAT_LT_MICE1_2D")]
    CatLtMice2D,
    /// Free digit counts for both terms.
    #[serde(rename = "TYPE5_ANY_DIGITS")]
    AnyDigits,
}

impl DivisionFormula {
    pub const ALL: [DivisionFormula; 5] = [
        DivisionFormula::CatGtMice2D,
        DivisionFormula::CatGtMice3D,
        DivisionFormula::CatEqMice,
        DivisionFormula::CatLtMice2D,
        DivisionFormula::AnyDigits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DivisionFormula::CatGtMice2D => "TYPE1_CAT_GT_MICE1_2D",
            DivisionFormula::CatGtMice3D => "TYPE2_CAT_GT_MICE1_3D",
            DivisionFormula::CatEqMice => "TYPE3_CAT_EQ_MICE1_2OR3D",
            DivisionFormula::CatLtMice2D => "TYPE4_CAT_LT_MICE1_2D",
            DivisionFormula::AnyDigits => "TYPE5_ANY_DIGITS",
        }
    }
}

impl fmt::Display for DivisionFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DivideSettings {
    #[serde(alias = "divisionFormulaType")]
    pub division_formula_type: DivisionFormula,
    /// Only read by `TYPE5_ANY_DIGITS`.
    #[serde(default, alias = "divisorDigits", skip_serializing_if = "Option::is_none")]
    pub divisor_digits: Option<u32>,
    #[serde(default, alias = "dividendDigitsMin", skip_serializing_if = "Option::is_none")]
    pub dividend_digits_min: Option<u32>,
    #[serde(default, alias = "dividendDigitsMax", skip_serializing_if = "Option::is_none")]
    pub dividend_digits_max: Option<u32>,
}

impl DivideSettings {
    pub fn new(formula: DivisionFormula) -> Self {
        Self {
            division_formula_type: formula,
            divisor_digits: None,
            dividend_digits_min: None,
            dividend_digits_max: None,
        }
    }
}

const KNOWN_OPERATION_TAGS: [&str; 5] = [
    "add_subtract",
    "multiply",
    "multiplication",
    "divide",
    "division",
];

const LEGACY_FIELDS: [(&str, &str); 6] = [
    ("minNumbers", "min_add_sub_terms"),
    ("maxNumbers", "max_add_sub_terms"),
    ("scenario", "add_sub_scenario"),
    ("weightingMultiplier", "add_sub_weighting_multiplier"),
    ("minOperandDigits", "min_add_sub_term_digits"),
    ("maxOperandDigits", "max_add_sub_term_digits"),
];

impl QuestionSettings {
    pub fn new(operation: OperationSettings) -> Self {
        Self {
            seed: None,
            operation,
        }
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation.operation_type()
    }

    /// Decode settings from loosely-typed JSON.
    ///
    /// Accepts `operationType` in place of `operation_type`. When the tag is
    /// missing or unknown, settings written by older clients (`minNumbers`,
    /// `scenario`, ...) are read as add/subtract settings; anything else is an
    /// unsupported operation.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(Error::InvalidSettings(
                "settings must be a JSON object".to_string(),
            ));
        };

        if !object.contains_key("operation_type") {
            if let Some(tag) = object.remove("operationType") {
                object.insert("operation_type".to_string(), tag);
            }
        }

        let tag = match object.get("operation_type") {
            Some(Value::String(tag)) => Some(tag.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        };

        match tag {
            Some(tag) if KNOWN_OPERATION_TAGS.contains(&tag.as_str()) => {
                Ok(serde_json::from_value(Value::Object(object))?)
            }
            _ if has_legacy_fields(&object) => legacy_add_subtract(object),
            Some(tag) => Err(Error::UnsupportedOperation(tag)),
            None => Err(Error::UnsupportedOperation(
                "missing operation_type".to_string(),
            )),
        }
    }
}

fn has_legacy_fields(object: &Map<String, Value>) -> bool {
    LEGACY_FIELDS
        .iter()
        .any(|(legacy, _)| object.contains_key(*legacy))
}

fn legacy_add_subtract(object: Map<String, Value>) -> Result<QuestionSettings> {
    let mut mapped = Map::new();
    mapped.insert(
        "operation_type".to_string(),
        Value::String(OperationType::AddSubtract.as_str().to_string()),
    );
    if let Some(seed) = object.get("seed") {
        mapped.insert("seed".to_string(), seed.clone());
    }
    for (legacy, field) in LEGACY_FIELDS {
        if let Some(value) = object.get(legacy) {
            mapped.insert(field.to_string(), value.clone());
        }
    }
    Ok(serde_json::from_value(Value::Object(mapped))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn division_formula_uses_wire_names() {
        let encoded = serde_json::to_string(&DivisionFormula::CatEqMice).unwrap();
        assert_eq!(encoded, "\"TYPE3_CAT_EQ_MICE1_2OR3D\"");
        for formula in DivisionFormula::ALL {
            let decoded: DivisionFormula =
                serde_json::from_value(json!(formula.as_str())).unwrap();
            assert_eq!(decoded, formula);
        }
    }

    #[test]
    fn non_object_is_rejected() {
        let err = QuestionSettings::from_json_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }
}
