use abacus_core::{
    AddSubSettings, DivideSettings, DivisionFormula, Error, MultiplySettings, OperationSettings,
    MAX_TIMES_TABLE_FACTOR, QuestionSettings, TimesTable, normalize_settings, validate_settings,
};

fn add_sub(settings: AddSubSettings) -> QuestionSettings {
    QuestionSettings::new(OperationSettings::AddSubtract(settings))
}

#[test]
fn clamps_add_subtract_ranges_with_warnings() {
    let settings = add_sub(AddSubSettings {
        min_add_sub_terms: 0,
        max_add_sub_terms: 80,
        add_sub_scenario: Some(12),
        add_sub_weighting_multiplier: 500,
        min_add_sub_term_digits: 3,
        max_add_sub_term_digits: 1,
    });

    let normalized = normalize_settings(&settings).expect("repairable");
    let OperationSettings::AddSubtract(fixed) = normalized.settings.operation else {
        panic!("expected add/subtract settings");
    };
    assert_eq!(fixed.min_add_sub_terms, 1);
    assert_eq!(fixed.max_add_sub_terms, 50);
    assert_eq!(fixed.add_sub_scenario, Some(10));
    assert_eq!(fixed.add_sub_weighting_multiplier, 100);
    assert_eq!(fixed.min_add_sub_term_digits, 3);
    assert_eq!(fixed.max_add_sub_term_digits, 3);

    let codes: Vec<&str> = normalized
        .warnings
        .iter()
        .map(|issue| issue.code.as_str())
        .collect();
    assert!(codes.contains(&"value_clamped"));
    assert!(codes.contains(&"range_raised"));
    assert_eq!(normalized.warnings.len(), 5);
}

#[test]
fn strict_validation_rejects_what_normalization_repairs() {
    let settings = add_sub(AddSubSettings {
        min_add_sub_term_digits: 3,
        max_add_sub_term_digits: 2,
        ..AddSubSettings::default()
    });
    let err = validate_settings(&settings).expect_err("max below min");
    assert!(
        matches!(err, Error::InvalidSettings(ref message) if message.contains("max_add_sub_term_digits"))
    );

    assert!(validate_settings(&add_sub(AddSubSettings::default())).is_ok());
}

#[test]
fn missing_scenario_is_a_configuration_error() {
    let settings = add_sub(AddSubSettings {
        add_sub_scenario: None,
        ..AddSubSettings::default()
    });
    let err = validate_settings(&settings).expect_err("scenario required");
    assert!(matches!(err, Error::InvalidSettings(ref message) if message.contains("add_sub_scenario")));

    let normalized = normalize_settings(&settings).expect("defaulted");
    assert_eq!(normalized.warnings[0].code, "value_defaulted");
}

#[test]
fn rule_string_is_processed_into_checked_parts() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings::from_rule(
        "0s + 0d",
    )));
    let normalized = normalize_settings(&settings).expect("valid rule");
    let OperationSettings::Multiply(multiply) = normalized.settings.operation else {
        panic!("expected multiply settings");
    };
    assert_eq!(
        multiply.processed_rules,
        Some(vec!["0s".to_string(), "0d".to_string()])
    );
}

#[test]
fn invalid_rule_string_is_reported() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings::from_rule(
        "ss + s",
    )));
    let report = normalize_settings(&settings).expect_err("invalid rule");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, "invalid_rule_string");
    assert!(report.errors[0].hint.is_some());
}

#[test]
fn multiply_without_rules_is_rejected() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings::default()));
    let err = validate_settings(&settings).expect_err("no rules");
    assert!(matches!(err, Error::InvalidSettings(_)));
}

#[test]
fn processed_rules_must_be_consistent() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings {
        processed_rules: Some(vec!["ss".to_string(), "s".to_string()]),
        ..MultiplySettings::default()
    }));
    let report = normalize_settings(&settings).expect_err("inconsistent");
    assert_eq!(report.errors[0].code, "invalid_processed_rules");
}

#[test]
fn empty_times_table_range_is_an_error() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings {
        times_table: Some(TimesTable {
            term1_min: 9,
            term1_max: 2,
            term2_min: 1,
            term2_max: 9,
        }),
        ..MultiplySettings::default()
    }));
    let report = normalize_settings(&settings).expect_err("empty range");
    assert_eq!(report.errors[0].path, "/times_table/term1_min");
}

#[test]
fn any_digits_division_gets_defaults() {
    let settings = QuestionSettings::new(OperationSettings::Divide(DivideSettings::new(
        DivisionFormula::AnyDigits,
    )));
    assert!(validate_settings(&settings).is_ok());

    let normalized = normalize_settings(&settings).expect("defaults");
    let OperationSettings::Divide(divide) = normalized.settings.operation else {
        panic!("expected divide settings");
    };
    assert_eq!(divide.divisor_digits, Some(1));
    assert_eq!(divide.dividend_digits_min, Some(2));
    assert_eq!(divide.dividend_digits_max, Some(3));
    assert!(normalized.warnings.is_empty());
}

#[test]
fn any_digits_division_is_clamped() {
    let settings = QuestionSettings::new(OperationSettings::Divide(DivideSettings {
        division_formula_type: DivisionFormula::AnyDigits,
        divisor_digits: Some(9),
        dividend_digits_min: Some(0),
        dividend_digits_max: Some(12),
    }));
    let normalized = normalize_settings(&settings).expect("repairable");
    let OperationSettings::Divide(divide) = normalized.settings.operation else {
        panic!("expected divide settings");
    };
    assert_eq!(divide.divisor_digits, Some(6));
    assert_eq!(divide.dividend_digits_min, Some(1));
    assert_eq!(divide.dividend_digits_max, Some(9));
}

#[test]
fn archetype_fields_are_ignored_outside_any_digits() {
    let settings = QuestionSettings::new(OperationSettings::Divide(DivideSettings {
        divisor_digits: Some(2),
        ..DivideSettings::new(DivisionFormula::CatGtMice2D)
    }));
    let normalized = normalize_settings(&settings).expect("valid");
    assert_eq!(normalized.warnings.len(), 1);
    assert_eq!(normalized.warnings[0].code, "ignored_field");
    assert!(validate_settings(&settings).is_ok());
}

fn multiply(settings: MultiplySettings) -> QuestionSettings {
    QuestionSettings::new(OperationSettings::Multiply(settings))
}

#[test]
fn rules_with_too_many_digits_are_rejected() {
    let many_parts = multiply(MultiplySettings::from_rule(["a"; 20].join("+")));
    let report = normalize_settings(&many_parts).expect_err("20 parts");
    assert_eq!(report.errors[0].code, "rule_too_long");
    assert_eq!(report.errors[0].path, "/rule_string");
    assert!(validate_settings(&many_parts).is_err());

    let wide_parts = multiply(MultiplySettings::from_rule(["aaaaaa"; 13].join("+")));
    assert!(validate_settings(&wide_parts).is_err());

    let processed = multiply(MultiplySettings {
        processed_rules: Some(vec!["ssssss".to_string(); 14]),
        ..MultiplySettings::default()
    });
    let report = normalize_settings(&processed).expect_err("14 parts");
    assert_eq!(report.errors[0].path, "/processed_rules");
}

#[test]
fn eighteen_digit_rules_are_accepted() {
    let settings = multiply(MultiplySettings::from_rule(["aaaaaa"; 12].join("+")));
    assert!(validate_settings(&settings).is_ok());
}

#[test]
fn oversized_times_table_factors_are_rejected() {
    let settings = multiply(MultiplySettings {
        times_table: Some(TimesTable {
            term1_min: 2,
            term1_max: u32::MAX,
            term2_min: 2,
            term2_max: MAX_TIMES_TABLE_FACTOR,
        }),
        ..MultiplySettings::default()
    });
    let report = normalize_settings(&settings).expect_err("factor too large");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, "factor_too_large");
    assert_eq!(report.errors[0].path, "/times_table/term1_max");
}
