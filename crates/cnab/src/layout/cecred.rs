//! Cecred / Ailos (085), CNAB240 layout 087/045.

use crate::{
    digit::{Modulo11, modulo11},
    error::CnabResult,
    field::{filler, pad, pad_numeric, Align},
    model::{AccountConfig, AccountRules, Checks, Payment},
};

use super::{BankLayout, BatchTotals, TitleCodes, WriteOff, prefixed};

/// Cecred remessa layout.
///
/// The agency digit is supplied by the caller; the account digit and the
/// agency/account composite digit use the standard modulo 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cecred;

impl BankLayout for Cecred {
    fn bank_code(&self) -> &'static str {
        "085"
    }

    fn bank_name(&self) -> &'static str {
        "CECRED"
    }

    fn file_layout_version(&self) -> &'static str {
        "087"
    }

    fn batch_layout_version(&self) -> &'static str {
        "045"
    }

    fn account_rules(&self) -> AccountRules {
        AccountRules {
            agency: 5,
            account: 12,
            covenant: Some(6),
            agency_digit_required: true,
            wallet: 1,
        }
    }

    fn check_payment(&self, payment: &Payment, prefix: &str, checks: &mut Checks) {
        checks.digits(&prefixed(prefix, "document_number"), &payment.document_number, 15);
    }

    fn account_digit(&self, account: &AccountConfig) -> CnabResult<char> {
        if let Some(digit) = account.account_digit.as_deref().and_then(|d| d.chars().next()) {
            return Ok(digit);
        }
        let padded = pad_numeric(&account.account, 12).map_err(|e| e.in_field("account"))?;
        modulo11(&padded, &Modulo11::STANDARD).map_err(|e| e.in_field("account"))
    }

    fn composite_digit(&self, account: &AccountConfig) -> CnabResult<char> {
        let composite = format!(
            "{}{}{}{}",
            pad_numeric(&account.agency, 5).map_err(|e| e.in_field("agency"))?,
            self.agency_digit(account)?,
            pad_numeric(&account.account, 12).map_err(|e| e.in_field("account"))?,
            self.account_digit(account)?,
        );
        modulo11(&composite, &Modulo11::STANDARD).map_err(|e| e.in_field("account"))
    }

    fn covenant_field(&self, account: &AccountConfig) -> CnabResult<String> {
        let covenant = account.covenant.as_deref().unwrap_or_default();
        let covenant = pad_numeric(covenant, 6).map_err(|e| e.in_field("covenant"))?;
        pad(&covenant, 20, ' ', Align::Left)
    }

    fn our_number(&self, _account: &AccountConfig, payment: &Payment) -> CnabResult<String> {
        pad_numeric(&payment.our_number, 20).map_err(|e| e.in_field("our_number"))
    }

    fn title_codes(&self) -> TitleCodes {
        TitleCodes {
            wallet: '1',
            registration: '0',
            document_type: '2',
            issuer: '2',
            distribution: '0',
            acceptance: 'N',
        }
    }

    fn document_number(&self, payment: &Payment) -> CnabResult<String> {
        pad_numeric(&payment.document_number, 15).map_err(|e| e.in_field("document_number"))
    }

    fn default_species_code(&self) -> &'static str {
        "99"
    }

    fn write_off(&self, _payment: &Payment) -> WriteOff {
        WriteOff { code: '1', days: 0 }
    }

    fn batch_trailer_complement(&self, _totals: &BatchTotals) -> CnabResult<String> {
        Ok(format!("{}{}", filler('0', 69), filler(' ', 148)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::Payer;

    fn account() -> AccountConfig {
        AccountConfig {
            company_name: "SOCIEDADE BRASILEIRA ZOOLOGIA".into(),
            company_document: "74576177000177".into(),
            agency: "4327".into(),
            agency_digit: Some("3".into()),
            account: "03666".into(),
            account_digit: None,
            covenant: Some("12387".into()),
            wallet: "1".into(),
        }
    }

    fn payment() -> Payment {
        Payment {
            amount: 5000,
            due_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
            issue_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
            document_number: "6969".into(),
            our_number: "1".into(),
            payer: Payer { name: "PABLO".into(), document: "82136760505".into(), address: None },
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
    fn account_block_uses_given_agency_digit_and_composite_digit() {
        assert_eq!(Cecred.account_digit(&account()).unwrap(), '8');
        assert_eq!(Cecred.composite_digit(&account()).unwrap(), '1');
        assert_eq!(Cecred.account_block(&account()).unwrap(), "04327300000000366681");
    }

    #[test]
    fn covenant_is_zero_padded_then_left_justified() {
        assert_eq!(Cecred.covenant_field(&account()).unwrap(), "012387              ");
    }

    #[test]
    fn title_block_and_document_number() {
        let block = Cecred.title_account_block(&account(), &payment()).unwrap();
        assert_eq!(block, "0000000036668100000000000000000001");
        assert_eq!(Cecred.document_number(&payment()).unwrap(), "000000000006969");
        assert_eq!(Cecred.company_title_id(&payment()).unwrap(), format!("{:<25}", "6969"));
    }

    #[test]
    fn species_defaults_to_99() {
        let mut p = payment();
        assert_eq!(Cecred.species_code(&p), "99");
        p.species = Some("DM".into());
        assert_eq!(Cecred.species_code(&p), "02");
    }

    #[test]
    fn trailer_complement_is_fixed() {
        let complement = Cecred.batch_trailer_complement(&BatchTotals::default()).unwrap();
        assert_eq!(complement.len(), 217);
        assert!(complement.starts_with(&"0".repeat(69)));
        assert!(complement.ends_with(' '));
    }

    #[test]
    fn non_numeric_document_number_is_reported() {
        let mut p = payment();
        p.document_number = "NF-12".into();
        let mut checks = Checks::new();
        Cecred.check_payment(&p, "batches[0].payments[0]", &mut checks);
        assert!(checks.finish().unwrap_err().has("batches[0].payments[0].document_number"));
    }
}
