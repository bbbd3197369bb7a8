//! Sicoob (756), CNAB240 layout 081/040.

use crate::{
    error::{CnabError, CnabResult},
    field::{filler, pad_numeric},
    model::{AccountConfig, AccountRules, Checks, Payment, ValidationError},
};

use super::{BankLayout, prefixed};

/// Sicoob remessa layout.
///
/// `parcel` and `form_type` go into the "nosso número" block of
/// segment P, after the number itself and the modality (wallet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sicoob {
    parcel: String,
    form_type: char,
}

impl Sicoob {
    /// Builds the layout, checking both parameters.
    ///
    /// `parcel` is up to two digits; `form_type` a single digit
    /// (`'4'` for A4 sheets without envelope).
    pub fn new(parcel: &str, form_type: char) -> CnabResult<Self> {
        if parcel.is_empty() {
            return Err(CnabError::MissingRequiredField("parcel".into()));
        }
        let parcel = pad_numeric(parcel, 2).map_err(|e| e.in_field("parcel"))?;
        if !form_type.is_ascii_digit() {
            return Err(CnabError::InvalidInput {
                field: "form_type".into(),
                value: form_type.to_string(),
            });
        }
        Ok(Self { parcel, form_type })
    }

    pub fn parcel(&self) -> &str {
        &self.parcel
    }

    pub fn form_type(&self) -> char {
        self.form_type
    }
}

impl Default for Sicoob {
    fn default() -> Self {
        Self { parcel: "01".to_string(), form_type: '4' }
    }
}

impl BankLayout for Sicoob {
    fn bank_code(&self) -> &'static str {
        "756"
    }

    fn bank_name(&self) -> &'static str {
        "SICOOB"
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
            account: 8,
            covenant: Some(7),
            agency_digit_required: false,
            wallet: 2,
        }
    }

    fn check_payment(&self, payment: &Payment, prefix: &str, checks: &mut Checks) {
        let field = prefixed(prefix, "our_number");
        let actual = payment.our_number.chars().count();
        if actual > 10 {
            checks.push(ValidationError::TooLong { field, max: 10, actual });
        }
    }

    /// Number (10) + parcel (2) + modality (2) + form type (1) + 5 blanks.
    fn our_number(&self, account: &AccountConfig, payment: &Payment) -> CnabResult<String> {
        Ok(format!(
            "{}{}{}{}{}",
            pad_numeric(&payment.our_number, 10).map_err(|e| e.in_field("our_number"))?,
            self.parcel,
            pad_numeric(&account.wallet, 2).map_err(|e| e.in_field("wallet"))?,
            self.form_type,
            filler(' ', 5),
        ))
    }
}
