use std::fmt;

use serde::{Deserialize, Serialize};

const LABELS: [&str; 10] = [
    "Simple 1-4",
    "Simple 1-5",
    "Simple 1-9",
    "Friends +",
    "Friends +/-",
    "Relatives +",
    "Relatives +/-",
    "Mix +",
    "Mix +/-",
    "All Formulas",
];

/// Pedagogical add/subtract profile (1..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario(u8);

impl Scenario {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(id: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&id).then_some(Self(id))
    }

    pub fn id(self) -> u8 {
        self.0
    }

    /// Zero-based position in the scenario tables.
    pub fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    /// Scenarios from "Relatives +" onward teach ten-complement borrowing, so a
    /// subtraction digit may exceed the rod digit when a higher rod can lend.
    pub fn borrows_across_rods(self) -> bool {
        self.0 >= 6
    }

    pub fn all() -> impl Iterator<Item = Scenario> {
        (Self::MIN..=Self::MAX).map(Scenario)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}
