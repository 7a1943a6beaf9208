//! Digit transition tables, indexed by `[scenario - 1][d1]`.
//!
//! `d1` is the digit showing on the rod before the operand digit is applied;
//! each entry lists the operand digits `d2` a scenario allows on that rod.
//! The weightable tables list which of those digits get extra draws.

use abacus_core::Scenario;

use crate::add_sub::Operation;

pub(crate) type DigitTable = [[&'static [u8]; 10]; 10];

pub(crate) fn valid_digits(scenario: Scenario, operation: Operation, d1: u8) -> &'static [u8] {
    lookup(
        match operation {
            Operation::Add => &VALID_ADDITION,
            Operation::Subtract => &VALID_SUBTRACTION,
        },
        scenario,
        d1,
    )
}

pub(crate) fn weightable_digits(scenario: Scenario, operation: Operation, d1: u8) -> &'static [u8] {
    lookup(
        match operation {
            Operation::Add => &WEIGHTABLE_ADDITION,
            Operation::Subtract => &WEIGHTABLE_SUBTRACTION,
        },
        scenario,
        d1,
    )
}

fn lookup(table: &DigitTable, scenario: Scenario, d1: u8) -> &'static [u8] {
    table[scenario.index()]
        .get(usize::from(d1))
        .copied()
        .unwrap_or(&[])
}

#[rustfmt::skip]
static VALID_ADDITION: DigitTable = [
    // 1
    [
        &[1, 2, 3, 4], &[1, 2, 3], &[1, 2], &[1], &[], &[], &[], &[], &[], &[],
    ],
    // 2
    [
        &[1, 2, 3, 4, 5], &[1, 2, 3, 5], &[1, 2, 5], &[1, 5], &[5], &[1, 2, 3, 4], &[1, 2, 3],
        &[1, 2], &[1], &[],
    ],
    // 3
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 5, 6, 7, 8], &[1, 2, 5, 6, 7], &[1, 5, 6], &[5],
        &[1, 2, 3, 4], &[1, 2, 3], &[1, 2], &[1], &[],
    ],
    // 4
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7],
        &[1, 2, 3, 4, 5, 6], &[1, 2, 3, 4, 5], &[1, 2, 3, 4], &[1, 2, 3], &[1, 2], &[1], &[],
    ],
    // 5
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7],
        &[1, 2, 3, 4, 5, 6], &[1, 2, 3, 4, 5], &[1, 2, 3, 4], &[1, 2, 3], &[1, 2], &[1], &[],
    ],
    // 6
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5],
        &[1, 2, 3, 4, 5, 9], &[1, 2, 3, 4, 5, 8, 9], &[1, 2, 3, 4, 5, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 7
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5],
        &[1, 2, 3, 4, 5, 9], &[1, 2, 3, 4, 5, 8, 9], &[1, 2, 3, 4, 5, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 8
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 9
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 10
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
];

#[rustfmt::skip]
static VALID_SUBTRACTION: DigitTable = [
    // 1
    [
        &[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[], &[], &[], &[], &[],
    ],
    // 2
    [
        &[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[5], &[1, 5], &[1, 2, 5], &[1, 2, 3, 5],
        &[1, 2, 3, 4, 5],
    ],
    // 3
    [
        &[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[5], &[1, 5, 6], &[1, 2, 5, 6, 7],
        &[1, 2, 3, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 4
    [
        &[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[5], &[1, 5, 6], &[1, 2, 5, 6, 7],
        &[1, 2, 3, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 5
    [
        &[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5, 6],
        &[1, 2, 3, 4, 5, 6, 7], &[1, 2, 3, 4, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 6
    [
        &[], &[1], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4], &[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5, 6],
        &[1, 2, 3, 4, 5, 6, 7], &[1, 2, 3, 4, 5, 6, 7, 8], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 7
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 7, 8, 9], &[1, 2, 3, 4, 5, 8, 9],
        &[1, 2, 3, 4, 5, 9], &[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 8
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 7, 8, 9], &[1, 2, 3, 4, 5, 8, 9],
        &[1, 2, 3, 4, 5, 9], &[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 9
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 10
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
        &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
];

#[rustfmt::skip]
static WEIGHTABLE_ADDITION: DigitTable = [
    // 1
    [
        &[], &[], &[], &[], &[], &[], &[], &[], &[], &[],
    ],
    // 2
    [
        &[1, 2, 3, 4], &[5], &[5], &[5], &[5], &[], &[], &[], &[], &[],
    ],
    // 3
    [
        &[6, 7, 8, 9], &[6, 7, 8], &[6, 7], &[6], &[], &[], &[], &[], &[], &[],
    ],
    // 4
    [
        &[1, 2, 3, 4], &[4], &[3, 4], &[2, 3, 4], &[1, 2, 3, 4], &[], &[], &[], &[], &[],
    ],
    // 5
    [
        &[1, 2, 3, 4], &[4], &[3, 4], &[2, 3, 4], &[1, 2, 3, 4], &[], &[], &[], &[], &[],
    ],
    // 6
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[9], &[8, 9], &[7, 8, 9], &[6, 7, 8, 9], &[5], &[4, 5, 9],
        &[3, 4, 5, 8, 9], &[2, 3, 4, 5, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 7
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[9], &[8, 9], &[7, 8, 9], &[6, 7, 8, 9], &[5], &[4, 5, 9],
        &[3, 4, 5, 8, 9], &[2, 3, 4, 5, 7, 8, 9], &[1, 2, 3, 4, 5, 6, 7, 8, 9],
    ],
    // 8
    [
        &[5, 6, 7, 8], &[], &[], &[], &[], &[6, 7, 8, 9], &[6, 7, 8], &[6, 7], &[6], &[],
    ],
    // 9
    [
        &[5, 6, 7, 8], &[], &[], &[], &[], &[6, 7, 8, 9], &[6, 7, 8], &[6, 7], &[6], &[],
    ],
    // 10
    [
        &[], &[], &[], &[], &[], &[], &[], &[], &[], &[],
    ],
];

#[rustfmt::skip]
static WEIGHTABLE_SUBTRACTION: DigitTable = [
    // 1
    [
        &[], &[], &[], &[], &[], &[], &[], &[], &[], &[],
    ],
    // 2
    [
        &[], &[], &[], &[], &[], &[5], &[5], &[5], &[5], &[5],
    ],
    // 3
    [
        &[], &[], &[], &[], &[], &[], &[6], &[6, 7], &[6, 7, 8], &[6, 7, 8, 9],
    ],
    // 4
    [
        &[], &[], &[], &[], &[], &[], &[6], &[6, 7], &[6, 7, 8], &[6, 7, 8, 9],
    ],
    // 5
    [
        &[], &[], &[], &[], &[], &[1, 2, 3, 4], &[2, 3, 4], &[3, 4], &[4], &[],
    ],
    // 6
    [
        &[], &[], &[], &[], &[], &[], &[], &[], &[], &[],
    ],
    // 7
    [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9], &[2, 3, 4, 5, 7, 8, 9], &[3, 4, 5, 8, 9], &[4, 5, 9], &[5],
        &[6, 7, 8, 9], &[7, 8, 9], &[8, 9], &[9], &[],
    ],
    // 8
    [
        &[], &[], &[], &[], &[], &[], &[], &[], &[], &[],
    ],
    // 9
    [
        &[], &[6], &[6, 7], &[6, 7, 8], &[6, 7, 8, 9], &[], &[], &[], &[], &[],
    ],
    // 10
    [
        &[], &[], &[], &[], &[], &[], &[], &[], &[], &[],
    ],
];

