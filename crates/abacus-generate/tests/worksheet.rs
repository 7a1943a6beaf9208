use std::collections::HashSet;

use abacus_core::{
    AddSubSettings, DivideSettings, DivisionFormula, MultiplySettings, OperationSettings,
    QuestionSettings,
};
use abacus_generate::{
    GenerationError, WorksheetEngine, WorksheetOptions, generate_question, rng_from_seed,
};

fn two_term_simple_chain() -> QuestionSettings {
    QuestionSettings::new(OperationSettings::AddSubtract(AddSubSettings {
        min_add_sub_terms: 2,
        max_add_sub_terms: 2,
        add_sub_scenario: Some(1),
        add_sub_weighting_multiplier: 1,
        min_add_sub_term_digits: 1,
        max_add_sub_term_digits: 1,
    }))
}

fn options(count: u32, unique: bool) -> WorksheetOptions {
    WorksheetOptions {
        count,
        unique,
        ..WorksheetOptions::default()
    }
}

#[test]
fn worksheet_has_requested_count() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings::from_rule(
        "ss + sd",
    )))
    .with_seed("count");

    let worksheet = WorksheetEngine::new(options(12, false))
        .run(&settings)
        .expect("worksheet");

    assert_eq!(worksheet.questions.len(), 12);
    assert_eq!(worksheet.report.questions_requested, 12);
    assert_eq!(worksheet.report.questions_generated, 12);
    assert_eq!(worksheet.report.fallback_count, 0);
    assert_eq!(worksheet.seed, "count");
    assert_eq!(worksheet.id.len(), 6);
}

#[test]
fn seeded_worksheets_are_reproducible() {
    let settings = QuestionSettings::new(OperationSettings::AddSubtract(AddSubSettings {
        add_sub_scenario: Some(6),
        ..AddSubSettings::default()
    }))
    .with_seed("repeat-me");
    let engine = WorksheetEngine::new(options(10, false));

    let first = engine.run(&settings).expect("first");
    let second = engine.run(&settings).expect("second");

    assert_eq!(first.id, second.id);
    assert_eq!(first.questions, second.questions);
}

#[test]
fn unseeded_worksheet_records_a_replayable_seed() {
    let settings = QuestionSettings::new(OperationSettings::Divide(DivideSettings::new(
        DivisionFormula::CatGtMice3D,
    )));
    let engine = WorksheetEngine::new(options(5, false));

    let first = engine.run(&settings).expect("first");
    assert_eq!(first.seed.len(), 32);

    let replay = engine
        .run(&settings.clone().with_seed(first.seed.clone()))
        .expect("replay");
    assert_eq!(first.questions, replay.questions);
    assert_eq!(first.id, replay.id);
}

#[test]
fn worksheet_matches_sequential_generation() {
    let settings = two_term_simple_chain().with_seed("sequence");
    let worksheet = WorksheetEngine::new(options(8, false))
        .run(&settings)
        .expect("worksheet");

    let mut rng = rng_from_seed("sequence");
    for question in &worksheet.questions {
        let expected = generate_question(&settings, &mut rng).expect("question");
        assert_eq!(question, &expected);
    }
}

#[test]
fn unique_worksheet_has_distinct_questions() {
    // Sixteen distinct two-term chains exist in the simple 1-4 scenario.
    let settings = two_term_simple_chain().with_seed("unique");
    let worksheet = WorksheetEngine::new(options(10, true))
        .run(&settings)
        .expect("worksheet");

    let distinct: HashSet<_> = worksheet
        .questions
        .iter()
        .map(|question| question.question_string.as_str())
        .collect();
    assert_eq!(distinct.len(), 10);
    assert!(!worksheet.report.warnings_by_code.contains_key("duplicate_question"));
}

#[test]
fn exhausted_uniqueness_is_reported() {
    let settings = two_term_simple_chain().with_seed("crowded");
    let worksheet = WorksheetEngine::new(options(20, true))
        .run(&settings)
        .expect("worksheet");

    assert_eq!(worksheet.questions.len(), 20);
    let duplicates = worksheet.report.warnings_by_code["duplicate_question"];
    assert!(duplicates >= 4, "only {duplicates} duplicate warnings");
    assert!(worksheet.report.retries_total >= duplicates * 49);
}

#[test]
fn fallbacks_are_counted() {
    let settings = QuestionSettings::new(OperationSettings::Divide(DivideSettings {
        division_formula_type: DivisionFormula::AnyDigits,
        divisor_digits: Some(3),
        dividend_digits_min: Some(2),
        dividend_digits_max: Some(2),
    }))
    .with_seed("fallback");

    let worksheet = WorksheetEngine::new(options(3, false))
        .run(&settings)
        .expect("worksheet");

    assert_eq!(worksheet.report.fallback_count, 3);
    assert_eq!(worksheet.report.warnings_by_code["fallback_question"], 3);
    assert!(worksheet.questions.iter().all(|question| question.fallback));
}

#[test]
fn empty_worksheet_is_rejected() {
    let settings = two_term_simple_chain();
    let err = WorksheetEngine::new(options(0, false))
        .run(&settings)
        .expect_err("count 0");
    assert!(matches!(err, GenerationError::InvalidSettings(_)));
}

#[test]
fn invalid_settings_are_not_wrapped_in_a_report() {
    let settings = QuestionSettings::new(OperationSettings::Multiply(MultiplySettings::default()));
    let err = WorksheetEngine::new(options(2, false))
        .run(&settings)
        .expect_err("no rules");
    assert!(matches!(err, GenerationError::Settings(_)));
}
