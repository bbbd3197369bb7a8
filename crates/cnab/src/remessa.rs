//! Сборка файла remessa CNAB240.
//!
//! [`RemessaAssembler`] проверяет входные данные целиком, затем строит
//! строки в порядке: header файла, для каждого лота header лота,
//! сегменты P/Q/R каждого платежа и trailer лота, в конце trailer файла.

use std::{
    fmt,
    io::{BufWriter, Write},
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    error::{CnabError, CnabResult},
    layout::{BankLayout, BatchTotals},
    model::{AccountConfig, Checks, Payment},
    segment::{Segment, SegmentBuilder},
};

/// Разделитель строк файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`.
    #[default]
    Lf,
    /// `\r\n`.
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Параметры одного файла remessa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Дата и время генерации, печатаются в header файла.
    pub generated_at: NaiveDateTime,
    /// Последовательный номер файла (sequencial remessa).
    #[serde(default = "default_file_sequence")]
    pub file_sequence: u32,
    /// Первое сообщение header лота.
    #[serde(default)]
    pub message_1: String,
    /// Второе сообщение header лота.
    #[serde(default)]
    pub message_2: String,
    #[serde(default)]
    pub line_ending: LineEnding,
}

fn default_file_sequence() -> u32 {
    1
}

impl FileSettings {
    /// Настройки по умолчанию для заданного момента генерации.
    #[must_use]
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            file_sequence: default_file_sequence(),
            message_1: String::new(),
            message_2: String::new(),
            line_ending: LineEnding::default(),
        }
    }

    /// Проверяет ширины, добавляя ошибки в `checks`.
    pub fn check(&self, checks: &mut Checks) {
        checks.amount("settings.file_sequence", u64::from(self.file_sequence), 6);
        checks.text("settings.message_1", &self.message_1, 40);
        checks.text("settings.message_2", &self.message_2, 40);
    }
}

/// Лот: платежи одного header/trailer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Batch {
    pub payments: Vec<Payment>,
}

impl Batch {
    #[must_use]
    pub fn new(payments: Vec<Payment>) -> Self {
        Self { payments }
    }
}

/// Собирает файл remessa для одного банка и одного счёта.
///
/// # Пример
///
/// ```
/// use chrono::NaiveDate;
/// use cnab::prelude::*;
///
/// let account = AccountConfig {
///     company_name: "SOCIEDADE BRASILEIRA ZOOLOGIA".into(),
///     company_document: "74576177000177".into(),
///     agency: "4327".into(),
///     agency_digit: None,
///     account: "03666".into(),
///     account_digit: None,
///     covenant: Some("512231".into()),
///     wallet: "01".into(),
/// };
/// let payment = Payment {
///     amount: 5000,
///     due_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
///     issue_date: NaiveDate::from_ymd_opt(2015, 7, 14).unwrap(),
///     document_number: "6969".into(),
///     our_number: "1".into(),
///     payer: Payer { name: "PABLO".into(), document: "82136760505".into(), address: None },
///     guarantor: None,
///     interest: None,
///     fine: None,
///     discount: None,
///     protest: None,
///     species: None,
///     iof: 0,
///     rebate: 0,
/// };
/// let generated_at = NaiveDate::from_ymd_opt(2015, 7, 14)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// let settings = FileSettings::new(generated_at);
///
/// let layout = Sicoob::default();
/// let file = RemessaAssembler::new(&layout, &account, &settings)
///     .assemble(&[Batch::new(vec![payment])])
///     .unwrap();
/// // header, batch header, P, Q, batch trailer, trailer
/// assert_eq!(file.len(), 6);
/// assert!(file.lines().iter().all(|line| line.len() == 240));
/// ```
pub struct RemessaAssembler<'a, L: BankLayout + ?Sized> {
    layout: &'a L,
    account: &'a AccountConfig,
    settings: &'a FileSettings,
}

impl<'a, L: BankLayout + ?Sized> RemessaAssembler<'a, L> {
    pub fn new(layout: &'a L, account: &'a AccountConfig, settings: &'a FileSettings) -> Self {
        Self { layout, account, settings }
    }

    /// Шаг проверки: все ошибки счёта, настроек и платежей сразу.
    pub fn validate(&self, batches: &[Batch]) -> CnabResult<()> {
        if batches.is_empty() {
            return Err(CnabError::MissingRequiredField("batches".into()));
        }
        if let Some(index) = batches.iter().position(|b| b.payments.is_empty()) {
            return Err(CnabError::MissingRequiredField(format!("batches[{index}].payments")));
        }

        let mut checks = Checks::new();
        self.account.check(&self.layout.account_rules(), &mut checks);
        self.settings.check(&mut checks);
        for (i, batch) in batches.iter().enumerate() {
            for (j, payment) in batch.payments.iter().enumerate() {
                let prefix = format!("batches[{i}].payments[{j}]");
                payment.check(&prefix, &mut checks);
                self.layout.check_payment(payment, &prefix, &mut checks);
            }
        }
        checks.finish()?;
        Ok(())
    }

    /// Проверяет данные и строит файл.
    pub fn assemble(&self, batches: &[Batch]) -> CnabResult<RemessaFile> {
        self.validate(batches)?;
        debug!(
            bank = self.layout.bank_code(),
            batches = batches.len(),
            "assembling remessa"
        );

        let builder = SegmentBuilder::new(self.layout, self.account, self.settings);
        let mut lines = vec![builder.file_header()?];

        for (index, batch) in batches.iter().enumerate() {
            let batch_number = index + 1;
            lines.push(builder.batch_header(batch_number)?);

            let mut totals = BatchTotals::default();
            let mut sequence = 0;
            for payment in &batch.payments {
                sequence += 1;
                lines.push(builder.segment_p(payment, batch_number, sequence)?);
                if self.layout.requires_segment_q() || payment.payer.address.is_some() {
                    sequence += 1;
                    lines.push(builder.segment_q(payment, batch_number, sequence)?);
                }
                if payment.needs_segment_r() {
                    sequence += 1;
                    lines.push(builder.segment_r(payment, batch_number, sequence)?);
                }
                totals.add(payment);
            }
            totals.records = sequence + 2;
            lines.push(builder.batch_trailer(batch_number, &totals)?);
            trace!(
                batch = batch_number,
                payments = totals.payments,
                amount = totals.amount,
                "batch closed"
            );
        }

        let records = lines.len() + 1;
        lines.push(builder.file_trailer(batches.len(), records)?);
        debug!(lines = lines.len(), "remessa assembled");

        Ok(RemessaFile::new(lines, self.settings.line_ending))
    }
}

/// Готовый файл remessa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemessaFile {
    lines: Vec<String>,
    line_ending: LineEnding,
}

impl RemessaFile {
    fn new(segments: Vec<Segment>, line_ending: LineEnding) -> Self {
        Self { lines: segments.into_iter().map(Segment::into_string).collect(), line_ending }
    }

    /// Строки без разделителей.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Записывает файл через [`BufWriter`], возвращает число строк.
    pub fn write_to<W: Write>(&self, writer: W) -> CnabResult<usize> {
        let mut out = BufWriter::new(writer);
        for line in &self.lines {
            out.write_all(line.as_bytes())?;
            out.write_all(self.line_ending.as_str().as_bytes())?;
        }
        out.flush()?;
        Ok(self.lines.len())
    }
}

impl fmt::Display for RemessaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
            f.write_str(self.line_ending.as_str())?;
        }
        Ok(())
    }
}
