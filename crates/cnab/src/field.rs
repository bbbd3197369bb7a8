//! Fixed-width field formatting.
//!
//! Encoding pads values into slots and never truncates: a value that does
//! not fit is an error. Decoding slices a column range out of a line.
//! Widths and positions count characters, not bytes.

use chrono::NaiveDate;

use crate::error::{CnabError, CnabResult};

/// Justification inside a fixed-width slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Value first, fill on the right.
    Left,
    /// Fill first, value on the right.
    Right,
}

/// Pads `value` to `width` with `fill`.
///
/// Fails with [`CnabError::FieldOverflow`] if `value` is longer than `width`.
pub fn pad(value: &str, width: usize, fill: char, align: Align) -> CnabResult<String> {
    let len = value.chars().count();
    if len > width {
        return Err(CnabError::FieldOverflow { field: "value".into(), width, actual: len });
    }
    let padding: String = std::iter::repeat_n(fill, width - len).collect();
    Ok(match align {
        Align::Left => format!("{value}{padding}"),
        Align::Right => format!("{padding}{value}"),
    })
}

/// Right-justifies a digit string with `'0'`.
///
/// ```
/// use cnab::field::pad_numeric;
///
/// assert_eq!(pad_numeric("3666", 12).unwrap(), "000000003666");
/// assert!(pad_numeric("12345", 4).is_err());
/// ```
pub fn pad_numeric(value: &str, width: usize) -> CnabResult<String> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CnabError::InvalidInput { field: "value".into(), value: value.to_string() });
    }
    pad(value, width, '0', Align::Right)
}

/// Left-justifies text with spaces, folding accents and upper-casing.
pub fn pad_text(value: &str, width: usize) -> CnabResult<String> {
    pad(&fold_ascii(value).to_ascii_uppercase(), width, ' ', Align::Left)
}

/// Left-justifies text with spaces, folding accents but keeping the case.
pub fn pad_text_preserving(value: &str, width: usize) -> CnabResult<String> {
    pad(&fold_ascii(value), width, ' ', Align::Left)
}

/// A run of `width` copies of `fill`.
pub fn filler(fill: char, width: usize) -> String {
    std::iter::repeat_n(fill, width).collect()
}

/// Amount in centavos, zero-padded.
pub fn format_amount(cents: u64, width: usize) -> CnabResult<String> {
    pad_numeric(&cents.to_string(), width)
}

/// `DDMMYYYY`, or eight zeros when there is no date.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| filler('0', 8), |d| d.format("%d%m%Y").to_string())
}

/// Extracts the column range `start..end` (0-based, end exclusive).
///
/// Fails with [`CnabError::LineTooShort`] when the line has fewer than
/// `end` characters. The line number in the error is 0; callers that know
/// it attach it with [`CnabError::at_line`].
pub fn slice(line: &str, start: usize, end: usize) -> CnabResult<&str> {
    if start > end {
        return Err(CnabError::InvalidLayout(format!("column range {start}..{end} is reversed")));
    }
    let len = line.chars().count();
    if len < end {
        return Err(CnabError::LineTooShort { line: 0, required: end, actual: len });
    }
    let offset = |pos: usize| line.char_indices().nth(pos).map_or(line.len(), |(i, _)| i);
    Ok(&line[offset(start)..offset(end)])
}

/// Replaces Portuguese accented letters by their ASCII base letter and
/// any other non-ASCII character by `'?'`, so the result is pure ASCII
/// of the same character count.
///
/// ```
/// use cnab::field::fold_ascii;
///
/// assert_eq!(fold_ascii("Rua Nº 5 – 2ª"), "Rua No 5 ? 2a");
/// ```
pub fn fold_ascii(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            'º' => 'o',
            'ª' => 'a',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}
