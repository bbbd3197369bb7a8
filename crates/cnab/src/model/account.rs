//! Данные получателя (beneficiário) и правила их ширины для банка.

use serde::{Deserialize, Serialize};

use super::{
    document::is_valid_document,
    validation::{Checks, ValidationError},
};

/// Счёт получателя платежей.
///
/// Значения хранятся так, как их передал вызывающий код; приведение к
/// ширине банка происходит один раз, при сборке файла, после проверки
/// через [`AccountConfig::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Название компании (empresa mãe).
    pub company_name: String,
    /// CPF или CNPJ получателя, только цифры.
    pub company_document: String,
    /// Код агентства без контрольной цифры.
    pub agency: String,
    /// Контрольная цифра агентства, если банк её не вычисляет.
    #[serde(default)]
    pub agency_digit: Option<String>,
    /// Номер счёта без контрольной цифры.
    pub account: String,
    /// Контрольная цифра счёта, если банк её не вычисляет.
    #[serde(default)]
    pub account_digit: Option<String>,
    /// Код договора с банком (convênio).
    #[serde(default)]
    pub covenant: Option<String>,
    /// Код кошелька / модальности (carteira).
    pub wallet: String,
}

/// Ширины полей счёта, объявленные банком.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRules {
    /// Максимум цифр агентства.
    pub agency: usize,
    /// Максимум цифр счёта.
    pub account: usize,
    /// Максимум цифр договора; при `None` договор не нужен.
    pub covenant: Option<usize>,
    /// Контрольная цифра агентства передаётся вызывающим кодом.
    pub agency_digit_required: bool,
    /// Максимум символов кода кошелька.
    pub wallet: usize,
}

impl AccountConfig {
    /// Проверяет счёт против правил банка, добавляя ошибки в `checks`.
    pub fn check(&self, rules: &AccountRules, checks: &mut Checks) {
        checks.required_text("company_name", &self.company_name, 30);
        if checks.required_digits("company_document", &self.company_document, 14)
            && !is_valid_document(&self.company_document)
        {
            checks.push(ValidationError::InvalidDocument {
                field: "company_document".into(),
                value: self.company_document.clone(),
            });
        }
        checks.required_digits("agency", &self.agency, rules.agency);
        checks.required_digits("account", &self.account, rules.account);
        checks.required_text("wallet", &self.wallet, rules.wallet);

        match (&self.agency_digit, rules.agency_digit_required) {
            (Some(digit), _) => {
                checks.exact_digits("agency_digit", digit, 1);
            }
            (None, true) => checks.push(ValidationError::Missing { field: "agency_digit".into() }),
            (None, false) => {}
        }
        if let Some(digit) = &self.account_digit {
            checks.exact_digits("account_digit", digit, 1);
        }
        if let Some(max) = rules.covenant {
            match &self.covenant {
                Some(covenant) => {
                    checks.required_digits("covenant", covenant, max);
                }
                None => checks.push(ValidationError::Missing { field: "covenant".into() }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: AccountRules = AccountRules {
        agency: 4,
        account: 8,
        covenant: Some(7),
        agency_digit_required: false,
        wallet: 2,
    };

    fn account() -> AccountConfig {
        AccountConfig {
            company_name: "SOCIEDADE BRASILEIRA DE ZOOLOGIA LTDA".to_string(),
            company_document: "74576177000177".to_string(),
            agency: "4327".to_string(),
            agency_digit: None,
            account: "03666".to_string(),
            account_digit: None,
            covenant: Some("512231".to_string()),
            wallet: "01".to_string(),
        }
    }

    fn errors(account: &AccountConfig, rules: &AccountRules) -> Vec<String> {
        let mut checks = Checks::new();
        account.check(rules, &mut checks);
        match checks.finish() {
            Ok(()) => vec![],
            Err(e) => e.errors().iter().map(|e| e.field().to_string()).collect(),
        }
    }

    #[test]
    fn company_name_longer_than_thirty_is_rejected() {
        // "SOCIEDADE BRASILEIRA DE ZOOLOGIA LTDA" has 37 characters
        assert_eq!(errors(&account(), &RULES), vec!["company_name"]);
    }

    #[test]
    fn valid_account_passes() {
        let mut acc = account();
        acc.company_name = "SOCIEDADE BRASILEIRA ZOOLOGIA".to_string();
        assert!(errors(&acc, &RULES).is_empty());
    }

    #[test]
    fn oversized_agency_and_account() {
        let mut acc = account();
        acc.company_name = "ZOO".to_string();
        acc.agency = "12345".to_string();
        acc.account = "123456789".to_string();
        assert_eq!(errors(&acc, &RULES), vec!["agency", "account"]);
    }

    #[test]
    fn missing_covenant_and_agency_digit() {
        let mut acc = account();
        acc.company_name = "ZOO".to_string();
        acc.covenant = None;
        let rules = AccountRules { agency_digit_required: true, ..RULES };
        assert_eq!(errors(&acc, &rules), vec!["agency_digit", "covenant"]);
    }

    #[test]
    fn invalid_company_document() {
        let mut acc = account();
        acc.company_name = "ZOO".to_string();
        acc.company_document = "74576177000178".to_string();
        assert_eq!(errors(&acc, &RULES), vec!["company_document"]);
    }
}
