//! Check-digit algorithms (dígitos verificadores).
//!
//! Free functions over explicit digit strings. Bank-specific behaviour is
//! carried by [`Modulo11`] values rather than by code: the weight cycle,
//! whether the remainder or its complement is used, and how out-of-range
//! results map to a digit.
//!
//! ```
//! use cnab::digit::{Modulo11, modulo10, modulo11};
//!
//! assert_eq!(modulo10("261533").unwrap(), '4');
//! assert_eq!(modulo11("0001", &Modulo11::REMAINDER_9_TO_2).unwrap(), '9');
//! ```

use std::borrow::Cow;

use crate::error::{CnabError, CnabResult};

/// How the weighted sum is turned into a check value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    /// Use `sum % 11` directly.
    Remainder,
    /// Use `11 - sum % 11`.
    Complement,
}

/// A modulo-11 scheme.
///
/// Weights are applied from the rightmost digit and repeat cyclically
/// when the input is longer than the cycle. After reduction, values found
/// in `overrides` are replaced by the mapped character; any other value
/// above 9 becomes `'0'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modulo11 {
    /// Weight cycle, first element applies to the rightmost digit.
    pub weights: Cow<'static, [u32]>,
    /// Remainder or complement.
    pub reduction: Reduction,
    /// Reduced value → check character.
    pub overrides: Cow<'static, [(u32, char)]>,
}

impl Modulo11 {
    /// Weights 2..9, complement, 10 and 11 become `0`.
    pub const STANDARD: Self = Self {
        weights: Cow::Borrowed(&[2, 3, 4, 5, 6, 7, 8, 9]),
        reduction: Reduction::Complement,
        overrides: Cow::Borrowed(&[(10, '0'), (11, '0')]),
    };

    /// Weights 9, 8, ..., 2 from the right, plain remainder, 10 becomes `0`.
    ///
    /// Agency and account digits of the cooperative banks.
    pub const REMAINDER_9_TO_2: Self = Self {
        weights: Cow::Borrowed(&[9, 8, 7, 6, 5, 4, 3, 2]),
        reduction: Reduction::Remainder,
        overrides: Cow::Borrowed(&[(10, '0')]),
    };

    /// General barcode check digit (DAC): 0, 10 and 11 become `1`.
    pub const BARCODE: Self = Self {
        weights: Cow::Borrowed(&[2, 3, 4, 5, 6, 7, 8, 9]),
        reduction: Reduction::Complement,
        overrides: Cow::Borrowed(&[(10, '1'), (11, '1')]),
    };

    /// CPF digits: weights 2..11.
    pub const CPF: Self = Self {
        weights: Cow::Borrowed(&[2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
        reduction: Reduction::Complement,
        overrides: Cow::Borrowed(&[(10, '0'), (11, '0')]),
    };

    /// Builds a scheme from owned tables.
    pub fn new(weights: Vec<u32>, reduction: Reduction, overrides: Vec<(u32, char)>) -> Self {
        Self { weights: Cow::Owned(weights), reduction, overrides: Cow::Owned(overrides) }
    }

    /// Weighted sum of `digits` modulo 11.
    pub fn remainder(&self, digits: &str) -> CnabResult<u32> {
        Ok(weighted_sum(digits, &self.weights)? % 11)
    }

    fn reduce(&self, remainder: u32) -> u32 {
        match self.reduction {
            Reduction::Remainder => remainder,
            Reduction::Complement => 11 - remainder,
        }
    }

    fn map(&self, value: u32) -> char {
        self.overrides
            .iter()
            .find(|(from, _)| *from == value)
            .map(|(_, to)| *to)
            .unwrap_or(if value <= 9 { digit_char(value) } else { '0' })
    }
}

/// Modulo-10 check digit.
///
/// Digits are weighted 2, 1, 2, ... from the right, the decimal digits of
/// each product are summed and the digit is `10 - total % 10`, with 10
/// becoming 0.
pub fn modulo10(digits: &str) -> CnabResult<char> {
    let values = parse_digits(digits)?;
    let total: u32 = values
        .iter()
        .rev()
        .enumerate()
        .map(|(pos, &d)| {
            let product = if pos % 2 == 0 { d * 2 } else { d };
            product / 10 + product % 10
        })
        .sum();
    Ok(digit_char((10 - total % 10) % 10))
}

/// Modulo-11 check digit under the given scheme.
pub fn modulo11(digits: &str, scheme: &Modulo11) -> CnabResult<char> {
    let remainder = scheme.remainder(digits)?;
    Ok(scheme.map(scheme.reduce(remainder)))
}

/// Two-digit composite check ("número de controle").
///
/// The first digit is [`modulo10`] of the input; the second is a modulo-11
/// pass with weights 2..7 over the input followed by the first digit. A
/// remainder of 1 is not allowed: the first digit is incremented (9 wraps
/// to 0) and the second pass repeated. Remainder 0 gives `'0'`, any other
/// remainder gives `11 - r`.
pub fn double_digit(digits: &str) -> CnabResult<[char; 2]> {
    const WEIGHTS: [u32; 6] = [2, 3, 4, 5, 6, 7];

    let mut first = modulo10(digits)?;
    // Bumping the first digit moves the sum by 2, so one retry is enough.
    loop {
        let remainder = weighted_sum(&format!("{digits}{first}"), &WEIGHTS)? % 11;
        match remainder {
            1 => first = if first == '9' { '0' } else { char::from(first as u8 + 1) },
            0 => return Ok([first, '0']),
            r => return Ok([first, digit_char(11 - r)]),
        }
    }
}

/// Verifies that the last `check_len` characters of `value` are the
/// check digits `compute` produces for the rest.
pub fn verify<F>(value: &str, check_len: usize, compute: F) -> CnabResult<bool>
where
    F: Fn(&str) -> CnabResult<String>,
{
    if value.len() <= check_len {
        return Err(invalid(value));
    }
    let (body, check) = value.split_at(value.len() - check_len);
    Ok(compute(body)? == check)
}

fn weighted_sum(digits: &str, weights: &[u32]) -> CnabResult<u32> {
    if weights.is_empty() {
        return Err(CnabError::InvalidLayout("modulo 11 weight cycle is empty".into()));
    }
    let values = parse_digits(digits)?;
    Ok(values.iter().rev().enumerate().map(|(pos, &d)| d * weights[pos % weights.len()]).sum())
}

fn parse_digits(digits: &str) -> CnabResult<Vec<u32>> {
    if digits.is_empty() {
        return Err(invalid(digits));
    }
    digits.chars().map(|c| c.to_digit(10).ok_or_else(|| invalid(digits))).collect()
}

fn invalid(value: &str) -> CnabError {
    CnabError::InvalidInput { field: "digits".into(), value: value.to_string() }
}

fn digit_char(value: u32) -> char {
    char::from(b'0' + value as u8)
}
