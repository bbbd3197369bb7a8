//! Sicredi (748), CNAB240 layout 081/040.

use chrono::Datelike;

use crate::{
    digit::{Modulo11, modulo11},
    error::{CnabError, CnabResult},
    field::{pad, pad_numeric, Align},
    model::{AccountConfig, AccountRules, Checks, Payment, ValidationError},
};

use super::{BankLayout, prefixed};

/// Sicredi remessa layout.
///
/// The "nosso número" is generated: issue year (2), generation byte (1),
/// sequence (5) and a modulo 11 digit computed over agency, station,
/// account and those eight characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sicredi {
    station: String,
    byte_idt: char,
}

impl Sicredi {
    /// `station` is the two-digit posto; `byte_idt` is `'1'` when the
    /// cooperative generates the number and `'2'..='9'` when the
    /// beneficiary does.
    pub fn new(station: &str, byte_idt: char) -> CnabResult<Self> {
        if station.is_empty() {
            return Err(CnabError::MissingRequiredField("station".into()));
        }
        let station = pad_numeric(station, 2).map_err(|e| e.in_field("station"))?;
        if !matches!(byte_idt, '1'..='9') {
            return Err(CnabError::InvalidInput {
                field: "byte_idt".into(),
                value: byte_idt.to_string(),
            });
        }
        Ok(Self { station, byte_idt })
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn byte_idt(&self) -> char {
        self.byte_idt
    }

    /// Nine-character "nosso número" with its check digit.
    pub fn formatted_our_number(
        &self,
        account: &AccountConfig,
        payment: &Payment,
    ) -> CnabResult<String> {
        let body = format!(
            "{:02}{}{}",
            payment.issue_date.year().rem_euclid(100),
            self.byte_idt,
            pad_numeric(&payment.our_number, 5).map_err(|e| e.in_field("our_number"))?,
        );
        let composite = format!(
            "{}{}{}{body}",
            pad_numeric(&account.agency, 4).map_err(|e| e.in_field("agency"))?,
            self.station,
            pad_numeric(&account.account, 5).map_err(|e| e.in_field("account"))?,
        );
        let digit = modulo11(&composite, &Modulo11::STANDARD).map_err(|e| e.in_field("our_number"))?;
        Ok(format!("{body}{digit}"))
    }
}

impl BankLayout for Sicredi {
    fn bank_code(&self) -> &'static str {
        "748"
    }

    fn bank_name(&self) -> &'static str {
        "SICREDI"
    }

    fn file_layout_version(&self) -> &'static str {
        "081"
    }

    fn batch_layout_version(&self) -> &'static str {
        "040"
    }

    fn account_rules(&self) -> AccountRules {
        AccountRules {
            agency: 4,
            account: 5,
            covenant: None,
            agency_digit_required: false,
            wallet: 2,
        }
    }

    fn check_payment(&self, payment: &Payment, prefix: &str, checks: &mut Checks) {
        let actual = payment.our_number.chars().count();
        if actual > 5 {
            checks.push(ValidationError::TooLong {
                field: prefixed(prefix, "our_number"),
                max: 5,
                actual,
            });
        }
    }

    fn our_number(&self, account: &AccountConfig, payment: &Payment) -> CnabResult<String> {
        pad(&self.formatted_our_number(account, payment)?, 20, ' ', Align::Left)
    }
}
