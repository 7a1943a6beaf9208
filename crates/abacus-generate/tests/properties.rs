use abacus_core::{
    AddSubSettings, DivideSettings, DivisionFormula, MultiplySettings, OperationSettings,
    QuestionSettings, RuleChar, parse_rule_set,
};
use abacus_generate::{
    generate_addition_subtraction_question, generate_division_question,
    generate_multiplication_question, generate_question, rng_from_seed,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const RULES: [&str; 8] = ["s", "d", "ss", "sd + ss", "ds", "0s", "s0s", "aa + as"];

fn digits_of(value: i64, width: usize) -> Vec<u32> {
    let text = format!("{:0width$}", value.unsigned_abs(), width = width);
    text.chars().filter_map(|ch| ch.to_digit(10)).collect()
}

fn first_digit(value: i64) -> i64 {
    let mut value = value;
    while value >= 10 {
        value /= 10;
    }
    value
}

fn formula() -> impl Strategy<Value = DivisionFormula> {
    prop::sample::select(DivisionFormula::ALL.to_vec())
}

proptest! {
    #[test]
    fn chains_never_go_negative(
        seed in any::<u64>(),
        scenario in 1u8..=10,
        weighting in 1u32..=5,
        min_terms in 1u32..=4,
        extra_terms in 0u32..=4,
        max_digits in 1u32..=3,
    ) {
        let settings = AddSubSettings {
            min_add_sub_terms: min_terms,
            max_add_sub_terms: min_terms + extra_terms,
            add_sub_scenario: Some(scenario),
            add_sub_weighting_multiplier: weighting,
            min_add_sub_term_digits: 1,
            max_add_sub_term_digits: max_digits,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let question = generate_addition_subtraction_question(&settings, &mut rng).unwrap();

        let len = question.operands.len() as u32;
        prop_assert!(len >= min_terms && len <= min_terms + extra_terms);
        prop_assert!(question.operands[0] > 0);

        let mut total = 0;
        for operand in &question.operands {
            prop_assert!(*operand != 0);
            prop_assert!(operand.abs() < 10_i64.pow(max_digits));
            total += operand;
            prop_assert!(total >= 0, "{}", question);
        }
        prop_assert_eq!(question.expected_answer, total);
    }

    #[test]
    fn products_follow_their_rule(seed in any::<u64>(), rule in prop::sample::select(RULES.to_vec())) {
        let checked = parse_rule_set(rule).unwrap().checked_parts();
        let width = checked[0].len();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let question = generate_multiplication_question(&MultiplySettings::from_rule(rule), &mut rng).unwrap();

        prop_assert!(!question.fallback);
        let (multiplicand, multiplier) = (question.operands[0], question.operands[1]);
        prop_assert_eq!(question.expected_answer, multiplicand * multiplier);

        let x_digits = digits_of(multiplicand, width);
        let y_digits = digits_of(multiplier, 0);
        prop_assert_eq!(x_digits.len(), width);
        prop_assert_eq!(y_digits.len(), checked.len());

        for (part, y) in checked.iter().zip(&y_digits) {
            let chars = RuleChar::decode_part(part).unwrap();
            for (ch, x) in chars.iter().zip(&x_digits) {
                prop_assert!(ch.accepts(x * y), "{} breaks {}", question, rule);
            }
        }
    }

    #[test]
    fn divisions_are_exact(seed in any::<u64>(), formula in formula()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let question = generate_division_question(&DivideSettings::new(formula), &mut rng).unwrap();
        let (dividend, divisor) = (question.operands[0], question.operands[1]);

        prop_assert!(!question.fallback);
        prop_assert!(divisor >= 2);
        prop_assert_eq!(dividend % divisor, 0);
        prop_assert_eq!(question.expected_answer, dividend / divisor);

        let lead = first_digit(dividend);
        match formula {
            DivisionFormula::CatGtMice2D => {
                prop_assert!(lead < divisor && dividend < 100);
            }
            DivisionFormula::CatGtMice3D => {
                prop_assert!(lead < divisor && (100..1000).contains(&dividend));
            }
            DivisionFormula::CatEqMice => {
                prop_assert!(lead == divisor && dividend < 1000);
            }
            DivisionFormula::CatLtMice2D => {
                prop_assert!(lead > divisor && dividend < 100);
            }
            DivisionFormula::AnyDigits => {
                prop_assert!(dividend / divisor >= 2);
            }
        }
    }

    #[test]
    fn any_digit_divisions_respect_digit_counts(
        seed in any::<u64>(),
        divisor_digits in 1u32..=3,
        dividend_min in 2u32..=5,
        extra in 0u32..=2,
    ) {
        prop_assume!(dividend_min > divisor_digits);
        let settings = DivideSettings {
            division_formula_type: DivisionFormula::AnyDigits,
            divisor_digits: Some(divisor_digits),
            dividend_digits_min: Some(dividend_min),
            dividend_digits_max: Some(dividend_min + extra),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let question = generate_division_question(&settings, &mut rng).unwrap();
        let (dividend, divisor) = (question.operands[0], question.operands[1]);

        prop_assert!(!question.fallback);
        prop_assert_eq!(dividend % divisor, 0);
        prop_assert_eq!(divisor.to_string().len() as u32, divisor_digits);
        let dividend_len = dividend.to_string().len() as u32;
        prop_assert!(dividend_len >= dividend_min && dividend_len <= dividend_min + extra);
    }

    #[test]
    fn same_seed_same_question(seed in "[a-z0-9]{1,12}", pick in 0usize..3) {
        let operation = match pick {
            0 => OperationSettings::AddSubtract(AddSubSettings::default()),
            1 => OperationSettings::Multiply(MultiplySettings::from_rule("ss + sd")),
            _ => OperationSettings::Divide(DivideSettings::new(DivisionFormula::CatEqMice)),
        };
        let settings = QuestionSettings::new(operation);

        let left = generate_question(&settings, &mut rng_from_seed(&seed)).unwrap();
        let right = generate_question(&settings, &mut rng_from_seed(&seed)).unwrap();
        prop_assert_eq!(left, right);
    }
}
