//! Платёж (título) и связанные с ним коды.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    document::{DocumentKind, is_valid_document},
    validation::{Checks, ValidationError},
};

/// Код начисления пени за просрочку (juros de mora).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestCode {
    /// Пени нет (`0`).
    Exempt,
    /// Фиксированная сумма в день (`1`).
    DailyValue,
    /// Месячная ставка (`2`).
    MonthlyRate,
}

/// Код штрафа (multa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineCode {
    /// Штрафа нет (`0`).
    Exempt,
    /// Фиксированная сумма (`1`).
    FixedValue,
    /// Процент (`2`).
    Percentage,
}

/// Код скидки (desconto).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountCode {
    /// Без скидки (`0`).
    NoDiscount,
    /// Фиксированная сумма до даты (`1`).
    FixedUntilDate,
    /// Процент до даты (`2`).
    PercentageUntilDate,
}

/// Код протеста (protesto).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtestCode {
    /// Протест через календарные дни (`1`).
    CalendarDays,
    /// Протест через рабочие дни (`2`).
    BusinessDays,
    /// Не протестовать (`3`).
    DoNotProtest,
}

macro_rules! cnab_code {
    ($ty:ident, { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $ty {
            /// Символ кода в файле CNAB.
            #[must_use]
            pub const fn code(&self) -> char {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

cnab_code!(InterestCode, { Exempt => '0', DailyValue => '1', MonthlyRate => '2' });
cnab_code!(FineCode, { Exempt => '0', FixedValue => '1', Percentage => '2' });
cnab_code!(DiscountCode, {
    NoDiscount => '0',
    FixedUntilDate => '1',
    PercentageUntilDate => '2',
});
cnab_code!(ProtestCode, {
    CalendarDays => '1',
    BusinessDays => '2',
    DoNotProtest => '3',
});

/// Адрес плательщика.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub neighbourhood: String,
    /// CEP, 8 цифр.
    pub zip_code: String,
    pub city: String,
    /// UF, 2 буквы.
    pub state: String,
}

/// Плательщик (sacado / pagador).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    /// CPF или CNPJ, только цифры.
    pub document: String,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Payer {
    /// Вид документа плательщика.
    #[must_use]
    pub fn document_kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(&self.document)
    }
}

/// Гарант (sacador avalista).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guarantor {
    pub name: String,
    pub document: String,
}

/// Пени за просрочку.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub code: InterestCode,
    /// Сумма в сентаво в день или ставка, по коду.
    #[serde(default)]
    pub value: u64,
    /// Дата начала; по умолчанию решает банк.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Штраф.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fine {
    pub code: FineCode,
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Скидка.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub code: DiscountCode,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub value: u64,
}

/// Инструкция протеста.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protest {
    pub code: ProtestCode,
    #[serde(default)]
    pub days: u8,
}

/// Платёж для включения в файл remessa.
///
/// Суммы в сентаво. После создания не меняется; сегменты P/Q/R
/// строятся из него без побочных эффектов.
///
/// # Пример
///
/// ```
/// use chrono::NaiveDate;
/// use cnab::model::{Payer, Payment};
///
/// let payment = Payment {
///     amount: 5000,
///     due_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
///     issue_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
///     document_number: "6969".to_string(),
///     our_number: "429715".to_string(),
///     payer: Payer {
///         name: "PABLO DIEGO".to_string(),
///         document: "82136760505".to_string(),
///         address: None,
///     },
///     guarantor: None,
///     interest: None,
///     fine: None,
///     discount: None,
///     protest: None,
///     species: None,
///     iof: 0,
///     rebate: 0,
/// };
/// assert!(payment.validate().is_ok());
/// assert!(!payment.needs_segment_r());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: u64,
    pub due_date: NaiveDate,
    pub issue_date: NaiveDate,
    pub document_number: String,
    pub our_number: String,
    pub payer: Payer,
    #[serde(default)]
    pub guarantor: Option<Guarantor>,
    #[serde(default)]
    pub interest: Option<Interest>,
    #[serde(default)]
    pub fine: Option<Fine>,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub protest: Option<Protest>,
    /// Вид документа (espécie), например `DM`, `DSI`, `NP`.
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub iof: u64,
    /// Сумма уменьшения (abatimento).
    #[serde(default)]
    pub rebate: u64,
}

impl Payment {
    /// Нужен ли сегмент R (пени, штраф или протест).
    #[must_use]
    pub fn needs_segment_r(&self) -> bool {
        self.interest.is_some() || self.fine.is_some() || self.protest.is_some()
    }

    /// Код пени; `0`, если пени нет.
    #[must_use]
    pub fn interest_code(&self) -> char {
        self.interest.map_or('0', |i| i.code.code())
    }

    /// Код штрафа; `0`, если штрафа нет.
    #[must_use]
    pub fn fine_code(&self) -> char {
        self.fine.map_or('0', |f| f.code.code())
    }

    /// Проверяет общие для всех банков ограничения CNAB240.
    ///
    /// `prefix` добавляется к именам полей в ошибках, например
    /// `batches[0].payments[2]`.
    pub fn check(&self, prefix: &str, checks: &mut Checks) {
        let field = |name: &str| {
            if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
        };

        if self.amount == 0 {
            checks.push(ValidationError::Invalid {
                field: field("amount"),
                message: "must be greater than zero".into(),
            });
        }
        checks.amount(&field("amount"), self.amount, 15);
        checks.required_text(&field("document_number"), &self.document_number, 15);
        checks.required_digits(&field("our_number"), &self.our_number, 20);

        checks.required_text(&field("payer.name"), &self.payer.name, 40);
        check_document(checks, &field("payer.document"), &self.payer.document);
        if let Some(address) = &self.payer.address {
            checks.required_text(&field("payer.address.street"), &address.street, 40);
            checks.text(&field("payer.address.neighbourhood"), &address.neighbourhood, 15);
            checks.exact_digits(&field("payer.address.zip_code"), &address.zip_code, 8);
            checks.required_text(&field("payer.address.city"), &address.city, 15);
            if address.state.len() != 2 || !address.state.chars().all(|c| c.is_ascii_alphabetic())
            {
                checks.push(ValidationError::Invalid {
                    field: field("payer.address.state"),
                    message: format!("expected a two-letter state, got '{}'", address.state),
                });
            }
        }
        if let Some(guarantor) = &self.guarantor {
            checks.required_text(&field("guarantor.name"), &guarantor.name, 40);
            check_document(checks, &field("guarantor.document"), &guarantor.document);
        }

        if let Some(interest) = &self.interest {
            checks.amount(&field("interest.value"), interest.value, 15);
        }
        if let Some(fine) = &self.fine {
            checks.amount(&field("fine.value"), fine.value, 15);
        }
        if let Some(discount) = &self.discount {
            checks.amount(&field("discount.value"), discount.value, 15);
        }
        if let Some(protest) = &self.protest {
            checks.amount(&field("protest.days"), u64::from(protest.days), 2);
        }
        if let Some(species) = &self.species {
            checks.text(&field("species"), species, 3);
        }
        checks.amount(&field("iof"), self.iof, 15);
        checks.amount(&field("rebate"), self.rebate, 15);
    }

    /// Проверяет платёж отдельно от файла.
    pub fn validate(&self) -> Result<(), super::ValidationErrors> {
        let mut checks = Checks::new();
        self.check("", &mut checks);
        checks.finish()
    }
}

fn check_document(checks: &mut Checks, field: &str, document: &str) {
    if checks.required_digits(field, document, 14) && !is_valid_document(document) {
        checks.push(ValidationError::InvalidDocument {
            field: field.to_string(),
            value: document.to_string(),
        });
    }
}
