//! Разбор файлов возврата (retorno) фиксированной ширины.
//!
//! Раскладка ([`RetornoLayout`]) состоит из карты колонок и правила, по
//! которому отбрасывается trailer. Первая строка файла всегда header и
//! пропускается; пустые строки игнорируются. Бизнес-проверок нет:
//! запись хранит подстроки в том виде, в каком они стоят в файле.
//!
//! # Пример
//!
//! ```
//! use cnab::retorno::{BANCO_NORDESTE_CNAB400, RetornoParser};
//!
//! let header = format!("0{}", " ".repeat(399));
//! let mut detail = format!("1{}", "0".repeat(399));
//! detail.replace_range(62..70, "00000116");
//! let trailer = format!("9{}", " ".repeat(399));
//! let text = format!("{header}\n{detail}\n{trailer}\n");
//!
//! let records = RetornoParser::new(&BANCO_NORDESTE_CNAB400).parse_str(&text).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].get("nosso_numero"), Some("00000116"));
//! ```

mod export;
mod layouts;
mod reader;

use std::{borrow::Cow, collections::HashSet};

use serde::{Serialize, Serializer, ser::SerializeMap};

pub use export::{write_csv, write_json_lines};
pub use layouts::{BANCO_NORDESTE_CNAB400, by_name};
pub use reader::RetornoReader;

use crate::{
    error::{CnabError, CnabResult},
    field::slice,
};

// === Раскладка ===

/// Именованный диапазон колонок `start..end` (0-based, конец исключён).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: Cow<'static, str>,
    pub start: usize,
    pub end: usize,
}

impl Column {
    pub fn new(name: impl Into<Cow<'static, str>>, start: usize, end: usize) -> Self {
        Self { name: name.into(), start, end }
    }

    const fn fixed(name: &'static str, start: usize, end: usize) -> Self {
        Self { name: Cow::Borrowed(name), start, end }
    }
}

/// Как распознать trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailerPolicy {
    /// Trailer нет, все строки после header являются записями.
    None,
    /// Последняя непустая строка считается trailer.
    LastLine,
    /// Строки с `value` в колонках `start..end` считаются trailer.
    Marker { start: usize, end: usize, value: Cow<'static, str> },
}

impl TrailerPolicy {
    fn is_marker(&self, line: &str) -> bool {
        match self {
            Self::Marker { start, end, value } => {
                slice(line, *start, *end).is_ok_and(|found| found == value)
            }
            Self::None | Self::LastLine => false,
        }
    }
}

/// Раскладка файла возврата.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetornoLayout {
    name: Cow<'static, str>,
    width: usize,
    columns: Cow<'static, [Column]>,
    trailer: TrailerPolicy,
}

impl RetornoLayout {
    /// Создаёт раскладку, проверяя карту колонок.
    ///
    /// Ошибка [`CnabError::InvalidLayout`], если колонок нет, диапазон
    /// пуст или выходит за `width`, имя повторяется или маркер trailer
    /// не помещается в строку.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        width: usize,
        columns: Vec<Column>,
        trailer: TrailerPolicy,
    ) -> CnabResult<Self> {
        let name = name.into();
        if columns.is_empty() {
            return Err(CnabError::InvalidLayout(format!("layout '{name}' has no columns")));
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if column.start >= column.end || column.end > width {
                return Err(CnabError::InvalidLayout(format!(
                    "column '{}' range {}..{} does not fit in {width} characters",
                    column.name, column.start, column.end
                )));
            }
            if !seen.insert(column.name.as_ref()) {
                return Err(CnabError::InvalidLayout(format!(
                    "column '{}' is declared twice",
                    column.name
                )));
            }
        }
        if let TrailerPolicy::Marker { start, end, value } = &trailer
            && (start >= end || *end > width || value.chars().count() != end - start)
        {
            return Err(CnabError::InvalidLayout(format!(
                "trailer marker '{value}' at {start}..{end} does not fit"
            )));
        }
        Ok(Self { name, width, columns: Cow::Owned(columns), trailer })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ширина строки.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn trailer(&self) -> &TrailerPolicy {
        &self.trailer
    }

    /// Минимальная длина строки с данными: конец самой дальней колонки.
    pub fn required_len(&self) -> usize {
        self.columns.iter().map(|c| c.end).max().unwrap_or(0)
    }

    /// Имена колонок по порядку.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_ref())
    }
}

// === Запись ===

/// Одна строка данных: поля в порядке раскладки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetornoRecord {
    line: usize,
    fields: Vec<(String, String)>,
}

impl RetornoRecord {
    /// Номер строки в файле (с 1).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Значение поля по имени.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for RetornoRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// === Разбор ===

/// Разбирает строки по раскладке.
#[derive(Debug, Clone, Copy)]
pub struct RetornoParser<'a> {
    layout: &'a RetornoLayout,
}

impl<'a> RetornoParser<'a> {
    pub fn new(layout: &'a RetornoLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &'a RetornoLayout {
        self.layout
    }

    /// Разбирает весь текст файла.
    pub fn parse_str(&self, text: &str) -> CnabResult<Vec<RetornoRecord>> {
        RetornoReader::new(text.as_bytes(), *self).collect()
    }

    /// Разбирает одну строку данных. `line` задаёт номер строки для ошибок.
    pub fn parse_line(&self, text: &str, line: usize) -> CnabResult<RetornoRecord> {
        let required = self.layout.required_len();
        let actual = text.chars().count();
        if actual < required {
            return Err(CnabError::LineTooShort { line, required, actual });
        }
        let fields = self
            .layout
            .columns
            .iter()
            .map(|column| {
                let value = slice(text, column.start, column.end).map_err(|e| e.at_line(line))?;
                Ok((column.name.to_string(), value.to_string()))
            })
            .collect::<CnabResult<Vec<_>>>()?;
        Ok(RetornoRecord { line, fields })
    }

    fn is_trailer(&self, text: &str) -> bool {
        self.layout.trailer.is_marker(text)
    }
}
