//! Шаг нормализации и проверки входных данных.
//!
//! Все проверки выполняются один раз, до сборки первого сегмента, и
//! возвращают полный список найденных проблем, а не первую из них.

use thiserror::Error;

use crate::field::fold_ascii;

/// Ошибка одного поля.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Missing { field: String },
    #[error("{field} must have at most {max} characters, got {actual}")]
    TooLong { field: String, max: usize, actual: usize },
    #[error("{field} must have exactly {expected} characters, got {actual}")]
    WrongLength { field: String, expected: usize, actual: usize },
    #[error("{field} must contain only digits, got '{value}'")]
    NotNumeric { field: String, value: String },
    #[error("{field} is not a valid CPF/CNPJ: '{value}'")]
    InvalidDocument { field: String, value: String },
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

impl ValidationError {
    /// Имя поля, к которому относится ошибка.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field }
            | Self::TooLong { field, .. }
            | Self::WrongLength { field, .. }
            | Self::NotNumeric { field, .. }
            | Self::InvalidDocument { field, .. }
            | Self::Invalid { field, .. } => field,
        }
    }
}

/// Набор ошибок валидации.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Ошибки в порядке обнаружения.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Есть ли ошибка для поля `field`.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }
}

/// Накопитель проверок.
///
/// Каждая проверка добавляет ошибку и возвращает `false`, если значение
/// не прошло; [`Checks::finish`] превращает накопленное в результат.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    /// Пустой накопитель.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет произвольную ошибку.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Значение не пустое (после обрезки пробелов).
    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(ValidationError::Missing { field: field.to_string() });
            return false;
        }
        true
    }

    /// Только цифры и не длиннее `max`. Пустое значение допускается.
    pub fn digits(&mut self, field: &str, value: &str, max: usize) -> bool {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            self.push(ValidationError::NotNumeric {
                field: field.to_string(),
                value: value.to_string(),
            });
            return false;
        }
        self.max_len(field, value, max)
    }

    /// Обязательное числовое поле.
    pub fn required_digits(&mut self, field: &str, value: &str, max: usize) -> bool {
        self.required(field, value) && self.digits(field, value, max)
    }

    /// Ровно `expected` цифр.
    pub fn exact_digits(&mut self, field: &str, value: &str, expected: usize) -> bool {
        if !self.digits(field, value, expected) {
            return false;
        }
        let actual = value.chars().count();
        if actual != expected {
            self.push(ValidationError::WrongLength { field: field.to_string(), expected, actual });
            return false;
        }
        true
    }

    /// Текст, который поместится в `max` символов после нормализации.
    pub fn text(&mut self, field: &str, value: &str, max: usize) -> bool {
        self.max_len(field, &fold_ascii(value), max)
    }

    /// Обязательный текст.
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) -> bool {
        self.required(field, value) && self.text(field, value, max)
    }

    /// Числовое значение помещается в `width` цифр.
    pub fn amount(&mut self, field: &str, value: u64, width: usize) -> bool {
        self.max_len(field, &value.to_string(), width)
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) -> bool {
        let actual = value.chars().count();
        if actual > max {
            self.push(ValidationError::TooLong { field: field.to_string(), max, actual });
            return false;
        }
        true
    }

    /// Были ли ошибки.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Итог проверки.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(ValidationErrors(self.errors)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure() {
        let mut checks = Checks::new();
        assert!(!checks.required("agency", " "));
        assert!(!checks.digits("account", "12a", 8));
        assert!(!checks.text("name", "x".repeat(41).as_str(), 40));
        assert!(checks.required_digits("covenant", "512231", 7));

        let errors = checks.finish().unwrap_err();
        assert_eq!(errors.errors().len(), 3);
        assert!(errors.has("agency"));
        assert!(errors.has("account"));
        assert!(errors.has("name"));
        assert!(!errors.has("covenant"));
    }

    #[test]
    fn exact_digits_reports_wrong_length() {
        let mut checks = Checks::new();
        assert!(!checks.exact_digits("zip_code", "1234", 8));
        let errors = checks.finish().unwrap_err();
        assert_eq!(errors.errors(), &[ValidationError::WrongLength {
            field: "zip_code".into(),
            expected: 8,
            actual: 4,
        }]);
    }

    #[test]
    fn accents_do_not_inflate_text_length() {
        let mut checks = Checks::new();
        assert!(checks.text("city", "São Paulo", 9));
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn display_joins_messages() {
        let errors = ValidationErrors(vec![
            ValidationError::Missing { field: "agency".into() },
            ValidationError::TooLong { field: "account".into(), max: 8, actual: 9 },
        ]);
        assert_eq!(
            errors.to_string(),
            "agency must not be blank; account must have at most 8 characters, got 9"
        );
    }
}
