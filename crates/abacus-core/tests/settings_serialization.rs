use abacus_core::{
    AddSubSettings, DivisionFormula, Error, MultiplySettings, OperationSettings, OperationType,
    Question, QuestionSettings,
};
use schemars::schema_for;
use serde_json::json;

#[test]
fn decodes_snake_case_add_subtract_settings() {
    let settings: QuestionSettings = serde_json::from_value(json!({
        "operation_type": "add_subtract",
        "seed": "week-3",
        "min_add_sub_terms": 3,
        "max_add_sub_terms": 4,
        "add_sub_scenario": 5,
        "add_sub_weighting_multiplier": 2,
        "min_add_sub_term_digits": 1,
        "max_add_sub_term_digits": 2
    }))
    .expect("decode settings");

    assert_eq!(settings.seed.as_deref(), Some("week-3"));
    let OperationSettings::AddSubtract(add_sub) = settings.operation else {
        panic!("expected add/subtract settings");
    };
    assert_eq!(add_sub.add_sub_scenario, Some(5));
    assert_eq!(add_sub.max_add_sub_term_digits, 2);
}

#[test]
fn accepts_camel_case_fields_and_operation_aliases() {
    let settings = QuestionSettings::from_json_value(json!({
        "operationType": "division",
        "divisionFormulaType": "TYPE5_ANY_DIGITS",
        "divisorDigits": 2,
        "dividendDigitsMin": 3,
        "dividendDigitsMax": 4
    }))
    .expect("decode settings");

    assert_eq!(settings.operation_type(), OperationType::Divide);
    let OperationSettings::Divide(divide) = settings.operation else {
        panic!("expected divide settings");
    };
    assert_eq!(divide.division_formula_type, DivisionFormula::AnyDigits);
    assert_eq!(divide.divisor_digits, Some(2));
    assert_eq!(divide.dividend_digits_max, Some(4));
}

#[test]
fn multiplication_alias_maps_to_multiply() {
    let settings = QuestionSettings::from_json_value(json!({
        "operation_type": "multiplication",
        "ruleString": "ss + sd"
    }))
    .expect("decode settings");

    assert_eq!(
        settings.operation,
        OperationSettings::Multiply(MultiplySettings::from_rule("ss + sd"))
    );
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let settings: QuestionSettings =
        serde_json::from_value(json!({ "operation_type": "add_subtract" })).expect("decode");
    let OperationSettings::AddSubtract(add_sub) = settings.operation else {
        panic!("expected add/subtract settings");
    };
    assert_eq!(add_sub.min_add_sub_terms, 2);
    assert_eq!(add_sub.max_add_sub_terms, 5);
    assert_eq!(add_sub.add_sub_weighting_multiplier, 3);
    assert_eq!(add_sub.add_sub_scenario, None);
}

#[test]
fn legacy_fields_become_add_subtract_settings() {
    let settings = QuestionSettings::from_json_value(json!({
        "seed": "legacy",
        "minNumbers": 3,
        "maxNumbers": 6,
        "scenario": 4,
        "weightingMultiplier": 5,
        "minOperandDigits": 1,
        "maxOperandDigits": 2
    }))
    .expect("legacy settings");

    assert_eq!(settings.seed.as_deref(), Some("legacy"));
    assert_eq!(
        settings.operation,
        OperationSettings::AddSubtract(AddSubSettings {
            min_add_sub_terms: 3,
            max_add_sub_terms: 6,
            add_sub_scenario: Some(4),
            add_sub_weighting_multiplier: 5,
            min_add_sub_term_digits: 1,
            max_add_sub_term_digits: 2,
        })
    );
}

#[test]
fn unknown_operation_without_legacy_fields_is_unsupported() {
    let err = QuestionSettings::from_json_value(json!({ "operation_type": "modulo" }))
        .expect_err("unsupported");
    assert!(matches!(err, Error::UnsupportedOperation(ref op) if op == "modulo"));

    let err = QuestionSettings::from_json_value(json!({ "seed": "x" })).expect_err("missing");
    assert!(matches!(err, Error::UnsupportedOperation(_)));
}

#[test]
fn unknown_operation_with_legacy_fields_uses_shim() {
    let settings = QuestionSettings::from_json_value(json!({
        "operation_type": "abacus",
        "scenario": 2
    }))
    .expect("legacy settings");
    assert_eq!(settings.operation_type(), OperationType::AddSubtract);
}

#[test]
fn question_serializes_with_snake_case_operation() {
    let question = Question::divide(84, 4);
    let value = serde_json::to_value(&question).expect("serialize");
    assert_eq!(
        value,
        json!({
            "operands": [84, 4],
            "expected_answer": 21,
            "question_string": "84 ÷ 4 =",
            "operation_type": "divide"
        })
    );
}

#[test]
fn settings_schema_describes_operation_tag() {
    let schema = schema_for!(QuestionSettings);
    let json = serde_json::to_string(&schema).expect("serialize schema");
    assert!(json.contains("operation_type"));
    assert!(json.contains("TYPE5_ANY_DIGITS"));
    assert!(json.contains("add_sub_scenario"));
}
