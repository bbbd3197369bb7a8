//! Модуль ошибок кодека CNAB.

use thiserror::Error;

use crate::model::ValidationErrors;

/// Главная ошибка кодирования и разбора файлов CNAB.
///
/// Любая ошибка прерывает текущую единицу работы (один сегмент или одну
/// строку): частичный или обрезанный вывод никогда не возвращается.
#[derive(Debug, Error)]
pub enum CnabError {
    // === Ошибки полей ===
    /// Ожидались цифры, получено что-то другое (или пустая строка).
    #[error("Invalid input for '{field}': expected decimal digits, got '{value}'")]
    InvalidInput {
        /// Имя поля.
        field: String,
        /// Фактическое значение.
        value: String,
    },

    /// Нормализованное значение длиннее ширины поля.
    #[error("Field '{field}' overflows: width {width}, got {actual} characters")]
    FieldOverflow {
        /// Имя поля.
        field: String,
        /// Объявленная ширина.
        width: usize,
        /// Фактическая длина.
        actual: usize,
    },

    /// Отсутствует обязательное значение.
    #[error("Missing required field '{0}'")]
    MissingRequiredField(String),

    // === Ошибки записей ===
    /// Собранная запись не совпала с шириной раскладки.
    #[error("Record '{record}' is {actual} characters wide, layout declares {expected}")]
    RecordWidth {
        /// Тип записи.
        record: &'static str,
        /// Ширина раскладки.
        expected: usize,
        /// Фактическая ширина.
        actual: usize,
    },

    /// Строка файла возврата короче требуемого диапазона колонок.
    #[error("Line {line} is too short: need {required} characters, got {actual}")]
    LineTooShort {
        /// Номер строки (1-based, 0 если неизвестен).
        line: usize,
        /// Требуемая длина.
        required: usize,
        /// Фактическая длина.
        actual: usize,
    },

    /// Некорректное описание раскладки (диапазоны колонок).
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    // === Ошибки валидации ===
    /// Ошибки шага нормализации входных данных.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    // === I/O и сериализация ===
    /// Ошибка ввода/вывода.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Ошибка JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CnabError {
    /// Подставляет имя поля в ошибки, созданные без контекста.
    ///
    /// Функции контрольных цифр и форматирования не знают, какое поле
    /// они обрабатывают, и сообщают обобщённое имя.
    #[must_use]
    pub fn in_field(self, name: &str) -> Self {
        match self {
            Self::InvalidInput { value, .. } => Self::InvalidInput { field: name.to_string(), value },
            Self::FieldOverflow { width, actual, .. } => {
                Self::FieldOverflow { field: name.to_string(), width, actual }
            }
            other => other,
        }
    }

    /// Подставляет номер строки в [`CnabError::LineTooShort`].
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::LineTooShort { required, actual, .. } => {
                Self::LineTooShort { line, required, actual }
            }
            other => other,
        }
    }
}

/// Удобный alias для Result с CnabError.
pub type CnabResult<T> = Result<T, CnabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_field_renames_overflow() {
        let err = CnabError::FieldOverflow { field: "value".into(), width: 4, actual: 5 };
        let err = err.in_field("agency");
        assert_eq!(err.to_string(), "Field 'agency' overflows: width 4, got 5 characters");
    }

    #[test]
    fn at_line_keeps_other_errors() {
        let err = CnabError::MissingRequiredField("agency".into()).at_line(3);
        assert!(matches!(err, CnabError::MissingRequiredField(f) if f == "agency"));
    }
}
