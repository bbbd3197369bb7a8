//! Документы плательщиков и получателей: CPF (физлицо) и CNPJ (юрлицо).

use serde::{Deserialize, Serialize};

use crate::digit::{Modulo11, modulo11};

/// Вид документа, определяемый по числу цифр.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// 11 цифр.
    #[serde(rename = "CPF")]
    Cpf,
    /// 14 цифр.
    #[serde(rename = "CNPJ")]
    Cnpj,
}

impl DocumentKind {
    /// Определяет вид документа по длине. Значение должно состоять из цифр.
    ///
    /// ```
    /// use cnab::model::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::detect("82136760505"), Some(DocumentKind::Cpf));
    /// assert_eq!(DocumentKind::detect("74576177000177"), Some(DocumentKind::Cnpj));
    /// assert_eq!(DocumentKind::detect("123"), None);
    /// ```
    #[must_use]
    pub fn detect(document: &str) -> Option<Self> {
        if !document.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        match document.len() {
            11 => Some(Self::Cpf),
            14 => Some(Self::Cnpj),
            _ => None,
        }
    }

    /// Код "tipo de inscrição" в файлах CNAB.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Cpf => '1',
            Self::Cnpj => '2',
        }
    }

    fn scheme(&self) -> Modulo11 {
        match self {
            Self::Cpf => Modulo11::CPF,
            Self::Cnpj => Modulo11::STANDARD,
        }
    }
}

/// Проверяет контрольные цифры CPF или CNPJ.
#[must_use]
pub fn is_valid_document(document: &str) -> bool {
    let Some(kind) = DocumentKind::detect(document) else {
        return false;
    };
    let (body, check) = document.split_at(document.len() - 2);
    // Документ из одинаковых цифр проходит контроль, но недействителен.
    if document.chars().all(|c| Some(c) == document.chars().next()) {
        return false;
    }
    let scheme = kind.scheme();
    let Ok(first) = modulo11(body, &scheme) else {
        return false;
    };
    let Ok(second) = modulo11(&format!("{body}{first}"), &scheme) else {
        return false;
    };
    check.chars().eq([first, second])
}
