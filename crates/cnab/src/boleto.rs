//! Boleto barcode codec: free field, 44-digit barcode and digitable line.
//!
//! Only the numeric codec lives here; rendering the slip is out of scope.
//!
//! ```
//! use chrono::NaiveDate;
//! use cnab::boleto::BanrisulBoleto;
//!
//! let boleto = BanrisulBoleto::new("1102", "9000150", "22832563", '1').unwrap();
//! let due = NaiveDate::from_ymd_opt(2015, 7, 14).unwrap();
//! let barcode = boleto.barcode(12345, due).unwrap();
//! assert_eq!(barcode.as_str(), "04199648900000123452111020090001228325634018");
//! assert_eq!(
//!     barcode.digitable_line().unwrap(),
//!     "04192.11107 20090.001221 83256.340189 9 64890000012345"
//! );
//! ```

use std::fmt;

use chrono::NaiveDate;

use crate::{
    digit::{Modulo11, double_digit, modulo10, modulo11},
    error::{CnabError, CnabResult},
    field::{format_amount, pad_numeric},
    model::{Checks, ValidationError},
};

/// Real (BRL) currency code in the barcode.
const CURRENCY: char = '9';

/// Day-count factor of the due date, four digits.
///
/// Counts days since 1997-10-07; past 9999 the count restarts at 1000.
pub fn due_date_factor(due: NaiveDate) -> CnabResult<String> {
    let base = NaiveDate::from_ymd_opt(1997, 10, 7)
        .ok_or_else(|| CnabError::InvalidLayout("barcode base date".into()))?;
    let days = (due - base).num_days();
    if days < 0 {
        return Err(CnabError::InvalidInput {
            field: "due_date".into(),
            value: due.to_string(),
        });
    }
    let factor = if days > 9999 { (days - 1000) % 9000 + 1000 } else { days };
    Ok(format!("{factor:04}"))
}

/// A 44-digit boleto barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode(String);

impl Barcode {
    /// Assembles `bank + currency + DAC + factor + amount + free field`.
    ///
    /// The free field must be exactly 25 digits; the amount has to fit
    /// in ten digits.
    pub fn new(bank_code: &str, amount: u64, due: NaiveDate, free_field: &str) -> CnabResult<Self> {
        if free_field.len() != 25 || !free_field.chars().all(|c| c.is_ascii_digit()) {
            return Err(CnabError::InvalidInput {
                field: "free_field".into(),
                value: free_field.to_string(),
            });
        }
        let bank = pad_numeric(bank_code, 3).map_err(|e| e.in_field("bank_code"))?;
        let amount = format_amount(amount, 10).map_err(|e| e.in_field("amount"))?;
        let factor = due_date_factor(due)?;

        let without_dac = format!("{bank}{CURRENCY}{factor}{amount}{free_field}");
        let dac = modulo11(&without_dac, &Modulo11::BARCODE)?;
        Ok(Self(format!("{bank}{CURRENCY}{dac}{factor}{amount}{free_field}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// General check digit (position 5).
    pub fn dac(&self) -> char {
        self.0.as_bytes()[4] as char
    }

    /// Free field (positions 20 to 44).
    pub fn free_field(&self) -> &str {
        &self.0[19..]
    }

    /// Typed-in form of the barcode.
    pub fn digitable_line(&self) -> CnabResult<String> {
        digitable_line(&self.0)
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts a 44-digit barcode into the 47-digit digitable line
/// `AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEE`.
pub fn digitable_line(barcode: &str) -> CnabResult<String> {
    if barcode.len() != 44 || !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(CnabError::InvalidInput { field: "barcode".into(), value: barcode.to_string() });
    }
    let field = |body: String| -> CnabResult<String> {
        let check = modulo10(&body)?;
        Ok(format!("{body}{check}"))
    };
    let first = field(format!("{}{}", &barcode[0..4], &barcode[19..24]))?;
    let second = field(barcode[24..34].to_string())?;
    let third = field(barcode[34..44].to_string())?;
    Ok(format!(
        "{}.{} {}.{} {}.{} {} {}",
        &first[..5],
        &first[5..],
        &second[..5],
        &second[5..],
        &third[..5],
        &third[5..],
        &barcode[4..5],
        &barcode[5..19],
    ))
}

/// Banrisul (041) boleto numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanrisulBoleto {
    agency: String,
    /// Covenant padded to 13 and stripped of its first four digits.
    covenant: String,
    number: String,
    wallet: char,
}

impl BanrisulBoleto {
    pub const BANK_CODE: &'static str = "041";

    /// Validates and normalizes the fields: agency up to 4 digits,
    /// covenant up to 13, number up to 8, wallet exactly one digit.
    pub fn new(agency: &str, covenant: &str, number: &str, wallet: char) -> CnabResult<Self> {
        let mut checks = Checks::new();
        checks.required_digits("agency", agency, 4);
        checks.required_digits("covenant", covenant, 13);
        checks.required_digits("number", number, 8);
        if !wallet.is_ascii_digit() {
            checks.push(ValidationError::NotNumeric {
                field: "wallet".into(),
                value: wallet.to_string(),
            });
        }
        checks.finish()?;

        let covenant = pad_numeric(covenant, 13)?;
        Ok(Self {
            agency: pad_numeric(agency, 4)?,
            covenant: covenant[4..].to_string(),
            number: pad_numeric(number, 8)?,
            wallet,
        })
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn covenant(&self) -> &str {
        &self.covenant
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn wallet(&self) -> char {
        self.wallet
    }

    /// Two check digits of the agency.
    pub fn agency_check(&self) -> CnabResult<String> {
        double_digit(&self.agency).map(|[a, b]| format!("{a}{b}"))
    }

    /// Two check digits of the "nosso número".
    pub fn our_number_check(&self) -> CnabResult<String> {
        double_digit(&self.number).map(|[a, b]| format!("{a}{b}"))
    }

    /// `"22832563-51"`.
    pub fn our_number_display(&self) -> CnabResult<String> {
        Ok(format!("{}-{}", self.number, self.our_number_check()?))
    }

    /// `"1102.48 / 0090001-50"`.
    pub fn agency_covenant_display(&self) -> CnabResult<String> {
        let (code, check) = self.covenant.split_at(7);
        Ok(format!("{}.{} / {code}-{check}", self.agency, self.agency_check()?))
    }

    /// 25-digit free field:
    /// `"21" + agency(4) + covenant(7) + number(8) + "40" + double digit`.
    pub fn free_field(&self) -> CnabResult<String> {
        let body = format!("21{}{}{}40", self.agency, &self.covenant[..7], self.number);
        let [first, second] = double_digit(&body)?;
        Ok(format!("{body}{first}{second}"))
    }

    /// Full barcode for `amount` centavos due on `due`.
    pub fn barcode(&self, amount: u64, due: NaiveDate) -> CnabResult<Barcode> {
        Barcode::new(Self::BANK_CODE, amount, due, &self.free_field()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn boleto() -> BanrisulBoleto {
        BanrisulBoleto::new("1102", "9000150", "22832563", '1').unwrap()
    }

    #[test]
    fn normalizes_fields() {
        let b = boleto();
        assert_eq!(b.agency(), "1102");
        assert_eq!(b.covenant(), "009000150");
        assert_eq!(b.number(), "22832563");

        let short = BanrisulBoleto::new("548", "140", "4", '1').unwrap();
        assert_eq!(short.agency(), "0548");
        assert_eq!(short.number(), "00000004");
    }

    #[test]
    fn check_digits_and_display() {
        let b = boleto();
        assert_eq!(b.agency_check().unwrap(), "48");
        assert_eq!(b.our_number_check().unwrap(), "51");
        assert_eq!(b.our_number_display().unwrap(), "22832563-51");
        assert_eq!(b.agency_covenant_display().unwrap(), "1102.48 / 0090001-50");

        let short = BanrisulBoleto::new("0548", "140", "4", '1').unwrap();
        assert_eq!(short.agency_check().unwrap(), "87");
        assert_eq!(short.our_number_check().unwrap(), "26");
    }

    #[test]
    fn free_field_has_25_digits() {
        let free = boleto().free_field().unwrap();
        assert_eq!(free, "2111020090001228325634018");
        assert_eq!(free.len(), 25);
    }

    #[test]
    fn rejects_oversized_fields() {
        let err = BanrisulBoleto::new("11020", "12345678901234", "123456789", 'x').unwrap_err();
        let CnabError::Validation(errors) = &err else {
            panic!("unexpected error {err:?}");
        };
        assert!(errors.has("agency"));
        assert!(errors.has("covenant"));
        assert!(errors.has("number"));
        assert!(errors.has("wallet"));
    }

    #[test]
    fn due_date_factor_wraps_after_9999() {
        assert_eq!(due_date_factor(date(2015, 7, 14)).unwrap(), "6489");
        assert_eq!(due_date_factor(date(2025, 2, 21)).unwrap(), "9999");
        assert_eq!(due_date_factor(date(2025, 2, 22)).unwrap(), "1000");
        assert!(due_date_factor(date(1997, 10, 6)).is_err());
    }

    #[test]
    fn barcode_and_digitable_line() {
        let barcode = boleto().barcode(12345, date(2015, 7, 14)).unwrap();
        assert_eq!(barcode.as_str(), "04199648900000123452111020090001228325634018");
        assert_eq!(barcode.dac(), '9');
        assert_eq!(barcode.free_field(), "2111020090001228325634018");
        assert_eq!(
            barcode.digitable_line().unwrap(),
            "04192.11107 20090.001221 83256.340189 9 64890000012345"
        );
    }

    #[test]
    fn barcode_rejects_bad_parts() {
        let due = date(2015, 7, 14);
        assert!(Barcode::new("041", 1, due, "123").is_err());
        assert!(Barcode::new("041", 12_345_678_901, due, &"1".repeat(25)).is_err());
        assert!(digitable_line("123").is_err());
    }
}
