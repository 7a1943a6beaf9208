use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Operation family a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    AddSubtract,
    #[serde(alias = "multiplication")]
    Multiply,
    #[serde(alias = "division")]
    Divide,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::AddSubtract => "add_subtract",
            OperationType::Multiply => "multiply",
            OperationType::Divide => "divide",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated question. Produced once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// Addend/subtrahend chain, `[multiplicand, multiplier]` or `[dividend, divisor]`.
    pub operands: Vec<i64>,
    pub expected_answer: i64,
    /// Canonical rendering, always terminated by `" ="`.
    pub question_string: String,
    pub operation_type: OperationType,
    /// Set when a generator gave up and returned its fixed fallback question.
    #[serde(default, skip_serializing_if = "is_false")]
    pub fallback: bool,
}

impl Question {
    /// Builds an add/subtract question from a signed operand chain.
    ///
    /// The first operand is rendered unsigned; later operands are rendered as
    /// `" + n"` or `" - n"`.
    pub fn add_subtract(operands: Vec<i64>) -> Self {
        let expected_answer = operands.iter().sum();
        let mut question_string = String::new();
        for (index, operand) in operands.iter().enumerate() {
            if index == 0 {
                question_string.push_str(&operand.to_string());
            } else {
                let sign = if *operand < 0 { " - " } else { " + " };
                question_string.push_str(sign);
                question_string.push_str(&operand.abs().to_string());
            }
        }
        question_string.push_str(" =");

        Self {
            operands,
            expected_answer,
            question_string,
            operation_type: OperationType::AddSubtract,
            fallback: false,
        }
    }

    /// Builds a multiplication question, or `None` when the product overflows `i64`.
    pub fn multiply(multiplicand: i64, multiplier: i64) -> Option<Self> {
        let expected_answer = multiplicand.checked_mul(multiplier)?;
        Some(Self {
            operands: vec![multiplicand, multiplier],
            expected_answer,
            question_string: format!("{multiplicand} x {multiplier} ="),
            operation_type: OperationType::Multiply,
            fallback: false,
        })
    }

    /// Builds a division question. Callers guarantee `dividend % divisor == 0`
    /// and a non-zero divisor.
    pub fn divide(dividend: i64, divisor: i64) -> Self {
        Self {
            operands: vec![dividend, divisor],
            expected_answer: dividend / divisor,
            question_string: format!("{dividend} ÷ {divisor} ="),
            operation_type: OperationType::Divide,
            fallback: false,
        }
    }

    /// Marks the question as a generator fallback.
    pub fn into_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn is_correct(&self, answer: i64) -> bool {
        answer == self.expected_answer
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question_string)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
