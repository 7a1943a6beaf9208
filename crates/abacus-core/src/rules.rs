use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Longest rule part kept after parsing; extra characters are dropped.
pub const MAX_RULE_PART_LEN: usize = 6;

/// Longest term accepted by [`enumerate_valid_rule_strings`].
pub const MAX_ENUMERATED_DIGITS: usize = 3;

const ENUMERATION_ALPHABET: [char; 4] = ['s', 'd', 'a', '0'];

/// Constraint on a single digit-pair product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleChar {
    /// `a`: any product.
    Any,
    /// `s`: product in 1..=9.
    Single,
    /// `d`: product of 10 or more.
    Double,
    /// `0`: product must be zero.
    Zero,
}

impl RuleChar {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'a' => Some(Self::Any),
            's' => Some(Self::Single),
            'd' => Some(Self::Double),
            '0' => Some(Self::Zero),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Any => 'a',
            Self::Single => 's',
            Self::Double => 'd',
            Self::Zero => '0',
        }
    }

    pub fn accepts(self, product: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Single => (1..=9).contains(&product),
            Self::Double => product >= 10,
            Self::Zero => product == 0,
        }
    }

    /// Decode a checked rule part. Fails on characters outside the alphabet.
    pub fn decode_part(part: &str) -> Option<Vec<RuleChar>> {
        part.chars().map(Self::from_char).collect()
    }
}

impl fmt::Display for RuleChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Binary value of a part where `0` is a 0 bit and every other character a 1 bit.
/// Returns `None` for an empty part.
pub fn zero_pattern_value(part: &str) -> Option<u32> {
    if part.is_empty() {
        return None;
    }
    Some(
        part.chars()
            .fold(0u32, |acc, ch| (acc << 1) | u32::from(ch != '0')),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RulePart {
    checked: String,
    output: String,
}

/// A validated multiplication rule.
///
/// Each part constrains one digit of the multiplier; each character of a part
/// constrains one digit of the multiplicand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    parts: Vec<RulePart>,
    zero_pattern: u32,
}

impl RuleSet {
    /// Parts with leading zeros removed, as shown to users.
    pub fn parts(&self) -> Vec<String> {
        self.parts.iter().map(|part| part.output.clone()).collect()
    }

    /// Parts as validated, keeping leading zeros. Generators consume these.
    pub fn checked_parts(&self) -> Vec<String> {
        self.parts.iter().map(|part| part.checked.clone()).collect()
    }

    /// Digit count of the multiplicand.
    pub fn term1_digits(&self) -> usize {
        self.parts.first().map_or(0, |part| part.checked.len())
    }

    /// Digit count of the multiplier.
    pub fn term2_digits(&self) -> usize {
        self.parts.len()
    }

    pub fn zero_pattern(&self) -> u32 {
        self.zero_pattern
    }

    /// Multiplicand positions (most significant first) that must hold a zero digit.
    pub fn forced_zero_positions(&self) -> Vec<usize> {
        self.parts
            .first()
            .map(|part| {
                part.checked
                    .char_indices()
                    .filter(|(_, ch)| *ch == '0')
                    .map(|(idx, _)| idx)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .map(|part| part.checked.as_str())
            .collect::<Vec<_>>()
            .join(" + ");
        f.write_str(&joined)
    }
}

/// Parse a rule string such as `"ss + sd"` or `"0s + d0a"`.
///
/// Input is lowercased, `o` is read as `0`, and parts are separated by `+` or
/// spaces. Other characters outside `{a, s, d, 0}`, tabs and newlines
/// included, are dropped from their part, and every part is
/// capped at [`MAX_RULE_PART_LEN`]. Every remaining part must share the first
/// part's length and zero pattern.
pub fn parse_rule_set(input: &str) -> Option<RuleSet> {
    let normalized = input.to_lowercase().replace('o', "0");

    let parts: Vec<RulePart> = normalized
        .split(['+', ' '])
        .filter_map(|raw| {
            let cleaned: String = raw
                .chars()
                .filter(|ch| RuleChar::from_char(*ch).is_some())
                .collect();
            let checked: String = cleaned.chars().take(MAX_RULE_PART_LEN).collect();
            if checked.is_empty() {
                return None;
            }
            let output: String = cleaned
                .trim_start_matches('0')
                .chars()
                .take(MAX_RULE_PART_LEN)
                .collect();
            Some(RulePart { checked, output })
        })
        .collect();

    let first = parts.first()?;
    let reference_len = first.checked.len();
    let reference_pattern = zero_pattern_value(&first.checked)?;

    let consistent = parts.iter().all(|part| {
        part.checked.len() == reference_len
            && zero_pattern_value(&part.checked) == Some(reference_pattern)
    });
    if !consistent {
        return None;
    }

    Some(RuleSet {
        parts,
        zero_pattern: reference_pattern,
    })
}

/// Parse a rule string into its display parts, or `None` when invalid.
pub fn parse_rule_string(input: &str) -> Option<Vec<String>> {
    parse_rule_set(input).map(|rules| rules.parts())
}

/// Every rule string with `term2_digits` parts of `term1_digits` characters that
/// [`parse_rule_set`] accepts, excluding parts that start with `0`.
///
/// Parts are grouped by zero pattern first so only consistent combinations are
/// ever built. Digit counts outside `1..=3` yield an empty set.
pub fn enumerate_valid_rule_strings(term1_digits: usize, term2_digits: usize) -> BTreeSet<String> {
    let range = 1..=MAX_ENUMERATED_DIGITS;
    if !range.contains(&term1_digits) || !range.contains(&term2_digits) {
        return BTreeSet::new();
    }

    let mut groups: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for part in all_parts(term1_digits) {
        if part.starts_with('0') {
            continue;
        }
        if let Some(pattern) = zero_pattern_value(&part) {
            groups.entry(pattern).or_default().push(part);
        }
    }

    let mut out = BTreeSet::new();
    for group in groups.values() {
        let mut combos: Vec<Vec<&str>> = vec![Vec::new()];
        for _ in 0..term2_digits {
            combos = combos
                .into_iter()
                .flat_map(|prefix| {
                    group.iter().map(move |part| {
                        let mut next = prefix.clone();
                        next.push(part.as_str());
                        next
                    })
                })
                .collect();
        }
        out.extend(combos.into_iter().map(|combo| combo.join("+")));
    }
    out
}

fn all_parts(len: usize) -> Vec<String> {
    let mut parts = vec![String::new()];
    for _ in 0..len {
        parts = parts
            .into_iter()
            .flat_map(|prefix| {
                ENUMERATION_ALPHABET.iter().map(move |ch| {
                    let mut next = prefix.clone();
                    next.push(*ch);
                    next
                })
            })
            .collect();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pattern_reads_as_binary() {
        assert_eq!(zero_pattern_value("s0s"), Some(0b101));
        assert_eq!(zero_pattern_value("0s"), Some(0b01));
        assert_eq!(zero_pattern_value(""), None);
    }

    #[test]
    fn rule_chars_check_products() {
        assert!(RuleChar::Single.accepts(9));
        assert!(!RuleChar::Single.accepts(0));
        assert!(!RuleChar::Single.accepts(10));
        assert!(RuleChar::Double.accepts(10));
        assert!(RuleChar::Zero.accepts(0));
        assert!(RuleChar::Any.accepts(81));
        assert_eq!(RuleChar::decode_part("sx"), None);
    }

    #[test]
    fn all_parts_covers_alphabet() {
        assert_eq!(all_parts(2).len(), 16);
    }
}
