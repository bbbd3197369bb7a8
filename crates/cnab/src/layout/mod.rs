//! Bank capability interface for CNAB240 remessa files.
//!
//! [`BankLayout`] is everything the segment builder needs to know about a
//! bank: identity data (code, name, layout versions), the widths its
//! account fields allow, and small override functions for the blocks that
//! differ between banks. The provided methods carry the FEBRABAN defaults;
//! a bank overrides only what it changes.
//!
//! Builders are generic over `L: BankLayout + ?Sized`, so both concrete
//! banks and `&dyn BankLayout` work.

mod cecred;
mod sicoob;
mod sicredi;

use chrono::NaiveDate;

pub use cecred::Cecred;
pub use sicoob::Sicoob;
pub use sicredi::Sicredi;

use crate::{
    digit::{Modulo11, modulo11},
    error::{CnabError, CnabResult},
    field::{filler, format_amount, pad, pad_numeric, pad_text, Align},
    model::{AccountConfig, AccountRules, Checks, Payment},
};

/// Line width of the CNAB240 family.
pub const CNAB240_WIDTH: usize = 240;

/// One-character codes of segment P that vary per bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleCodes {
    /// Código da carteira.
    pub wallet: char,
    /// Forma de cadastramento.
    pub registration: char,
    /// Tipo de documento.
    pub document_type: char,
    /// Who prints the boleto (emissão).
    pub issuer: char,
    /// Who delivers the boleto (distribuição).
    pub distribution: char,
    /// Aceite.
    pub acceptance: char,
}

impl Default for TitleCodes {
    fn default() -> Self {
        Self {
            wallet: '1',
            registration: '1',
            document_type: '1',
            issuer: '2',
            distribution: '2',
            acceptance: 'N',
        }
    }
}

/// Write-off instruction (baixa/devolução).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOff {
    pub code: char,
    pub days: u16,
}

/// Totals of one batch, accumulated from its payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchTotals {
    /// Number of payments (titles).
    pub payments: usize,
    /// Sum of payment amounts in centavos.
    pub amount: u64,
    /// Records in the batch, header and trailer included.
    pub records: usize,
}

impl BatchTotals {
    /// Adds one payment.
    pub fn add(&mut self, payment: &Payment) {
        self.payments += 1;
        self.amount += payment.amount;
    }
}

/// Per-bank data and override points.
pub trait BankLayout {
    /// Three-digit bank code.
    fn bank_code(&self) -> &'static str;

    /// Bank name as printed in the file header (padded to 30).
    fn bank_name(&self) -> &'static str;

    /// File header layout version.
    fn file_layout_version(&self) -> &'static str;

    /// Batch header layout version.
    fn batch_layout_version(&self) -> &'static str;

    /// Field widths the bank accepts for the beneficiary account.
    fn account_rules(&self) -> AccountRules;

    /// Bank-specific payment checks run during validation.
    fn check_payment(&self, _payment: &Payment, _prefix: &str, _checks: &mut Checks) {}

    /// Agency check digit: the configured one, or modulo 11 with weights
    /// 9..2 and the plain remainder.
    fn agency_digit(&self, account: &AccountConfig) -> CnabResult<char> {
        given_or_computed(account.agency_digit.as_deref(), "agency", &account.agency, |agency| {
            modulo11(agency, &Modulo11::REMAINDER_9_TO_2)
        })
    }

    /// Account check digit, same rule as the agency by default.
    fn account_digit(&self, account: &AccountConfig) -> CnabResult<char> {
        given_or_computed(account.account_digit.as_deref(), "account", &account.account, |acc| {
            modulo11(acc, &Modulo11::REMAINDER_9_TO_2)
        })
    }

    /// Agency/account composite digit; blank unless the bank uses one.
    fn composite_digit(&self, _account: &AccountConfig) -> CnabResult<char> {
        Ok(' ')
    }

    /// Covenant block of the file header (20 characters).
    fn covenant_field(&self, _account: &AccountConfig) -> CnabResult<String> {
        Ok(filler(' ', 20))
    }

    /// Covenant block of the batch header (20 characters).
    fn batch_covenant_field(&self, account: &AccountConfig) -> CnabResult<String> {
        self.covenant_field(account)
    }

    /// Agency, digit, account, digit and composite digit (20 characters).
    fn account_block(&self, account: &AccountConfig) -> CnabResult<String> {
        Ok(format!(
            "{}{}{}{}{}",
            pad_numeric(&account.agency, 5).map_err(|e| e.in_field("agency"))?,
            self.agency_digit(account)?,
            pad_numeric(&account.account, 12).map_err(|e| e.in_field("account"))?,
            self.account_digit(account)?,
            self.composite_digit(account)?,
        ))
    }

    /// Reserved-for-bank and reserved-for-company areas of the file
    /// header (40 characters).
    fn file_header_reserved(&self) -> String {
        filler(' ', 40)
    }

    /// Trailing filler of the file header (`complemento_header`, 29).
    fn file_header_complement(&self) -> String {
        filler(' ', 29)
    }

    /// Trailing filler of the batch header (33).
    fn batch_header_complement(&self) -> String {
        filler(' ', 33)
    }

    /// "Nosso número" as printed in segment P (20 characters).
    fn our_number(&self, account: &AccountConfig, payment: &Payment) -> CnabResult<String>;

    /// Account identification and "nosso número" block of segment P
    /// (34 characters).
    fn title_account_block(
        &self,
        account: &AccountConfig,
        payment: &Payment,
    ) -> CnabResult<String> {
        Ok(format!(
            "{}{}{}{}",
            pad_numeric(&account.account, 12).map_err(|e| e.in_field("account"))?,
            self.account_digit(account)?,
            self.composite_digit(account)?,
            self.our_number(account, payment)?,
        ))
    }

    /// Segment P code characters.
    fn title_codes(&self) -> TitleCodes {
        TitleCodes::default()
    }

    /// Document number of segment P (15 characters).
    fn document_number(&self, payment: &Payment) -> CnabResult<String> {
        pad_text(&payment.document_number, 15).map_err(|e| e.in_field("document_number"))
    }

    /// Company's own title identification (25 characters).
    fn company_title_id(&self, payment: &Payment) -> CnabResult<String> {
        pad_text(&payment.document_number, 25).map_err(|e| e.in_field("document_number"))
    }

    /// Species code used when the payment names none or an unknown one.
    fn default_species_code(&self) -> &'static str {
        "02"
    }

    /// Two-digit species code of segment P.
    fn species_code(&self, payment: &Payment) -> &'static str {
        payment
            .species
            .as_deref()
            .and_then(febraban_species_code)
            .unwrap_or_else(|| self.default_species_code())
    }

    /// Write-off instruction.
    fn write_off(&self, _payment: &Payment) -> WriteOff {
        WriteOff { code: '0', days: 0 }
    }

    /// Date from which interest applies; `None` prints zeros.
    fn interest_date(&self, payment: &Payment) -> Option<NaiveDate> {
        effective_date(payment.interest_code(), payment.interest.and_then(|i| i.date), payment)
    }

    /// Date from which the fine applies; `None` prints zeros.
    fn fine_date(&self, payment: &Payment) -> Option<NaiveDate> {
        effective_date(payment.fine_code(), payment.fine.and_then(|f| f.date), payment)
    }

    /// Whether segment Q is emitted for every payment, address or not.
    fn requires_segment_q(&self) -> bool {
        true
    }

    /// Batch trailer complement (217 characters) built from the totals.
    fn batch_trailer_complement(&self, totals: &BatchTotals) -> CnabResult<String> {
        collection_totals(totals)
    }
}

/// Exempt codes print zeros; otherwise the explicit date, falling back to
/// the day after the due date.
pub fn effective_date(code: char, explicit: Option<NaiveDate>, payment: &Payment) -> Option<NaiveDate> {
    if code == '0' {
        return None;
    }
    explicit.or_else(|| payment.due_date.succ_opt())
}

/// Simple-collection totals (count + amount) followed by zeroed linked,
/// secured and discounted collections, padded with spaces to 217.
pub fn collection_totals(totals: &BatchTotals) -> CnabResult<String> {
    let simple = format!(
        "{}{}",
        pad_numeric(&totals.payments.to_string(), 6).map_err(|e| e.in_field("payments"))?,
        format_amount(totals.amount, 17).map_err(|e| e.in_field("amount"))?,
    );
    pad(&format!("{simple}{}", filler('0', 69)), 217, ' ', Align::Left)
}

/// FEBRABAN species table.
///
/// ```
/// use cnab::layout::febraban_species_code;
///
/// assert_eq!(febraban_species_code("DSI"), Some("05"));
/// assert_eq!(febraban_species_code("xx"), None);
/// ```
#[must_use]
pub fn febraban_species_code(species: &str) -> Option<&'static str> {
    let code = match species.trim().to_ascii_uppercase().as_str() {
        "CH" => "01",
        "DM" => "02",
        "DMI" => "03",
        "DS" => "04",
        "DSI" => "05",
        "DR" => "06",
        "LC" => "07",
        "NCC" => "08",
        "NCE" => "09",
        "NCI" => "10",
        "NCR" => "11",
        "NP" => "12",
        "NPR" => "13",
        "TM" => "14",
        "TS" => "15",
        "NS" => "16",
        "RC" => "17",
        "FAT" => "18",
        "ND" => "19",
        "AP" => "20",
        "ME" => "21",
        "PC" => "22",
        "NF" => "23",
        "DD" => "24",
        "CPR" => "25",
        "OU" => "99",
        _ => return None,
    };
    Some(code)
}

/// Field name under a validation prefix such as `batches[0].payments[1]`.
pub(crate) fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
}

fn given_or_computed<F>(given: Option<&str>, field: &str, value: &str, compute: F) -> CnabResult<char>
where
    F: Fn(&str) -> CnabResult<char>,
{
    match given {
        Some(digit) => {
            digit.chars().next().ok_or_else(|| CnabError::MissingRequiredField(format!("{field}_digit")))
        }
        None => compute(value).map_err(|e| e.in_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fine, FineCode, Interest, InterestCode, Payer};

    fn payment() -> Payment {
        Payment {
            amount: 5000,
            due_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
            issue_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
            document_number: "6969".into(),
            our_number: "1".into(),
            payer: Payer { name: "X".into(), document: "82136760505".into(), address: None },
            guarantor: None,
            interest: None,
            fine: None,
            discount: None,
            protest: None,
            species: None,
            iof: 0,
            rebate: 0,
        }
    }

    #[test]
    fn collection_totals_layout() {
        let totals = BatchTotals { payments: 1, amount: 5000, records: 5 };
        let complement = collection_totals(&totals).unwrap();
        assert_eq!(complement.len(), 217);
        assert_eq!(&complement[..23], "00000100000000000005000");
        assert_eq!(&complement[23..92], "0".repeat(69));
        assert!(complement[92..].chars().all(|c| c == ' '));
    }

    #[test]
    fn effective_dates_default_to_day_after_due() {
        let mut p = payment();
        assert_eq!(effective_date(p.interest_code(), None, &p), None);

        p.interest = Some(Interest { code: InterestCode::DailyValue, value: 10, date: None });
        assert_eq!(
            effective_date(p.interest_code(), None, &p),
            NaiveDate::from_ymd_opt(2015, 7, 15)
        );

        let explicit = NaiveDate::from_ymd_opt(2015, 8, 1);
        p.fine = Some(Fine { code: FineCode::Percentage, value: 200, date: explicit });
        assert_eq!(effective_date(p.fine_code(), explicit, &p), explicit);

        p.fine = Some(Fine { code: FineCode::Exempt, value: 0, date: explicit });
        assert_eq!(effective_date(p.fine_code(), explicit, &p), None);
    }

    #[test]
    fn species_table_is_case_insensitive() {
        assert_eq!(febraban_species_code("np"), Some("12"));
        assert_eq!(febraban_species_code(" DM "), Some("02"));
        assert_eq!(febraban_species_code(""), None);
    }
}
