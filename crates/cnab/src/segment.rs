//! CNAB240 record builders.
//!
//! Each record is assembled by [`LineBuilder`], which appends fields of
//! declared width and checks the total in [`LineBuilder::finish`]. A field
//! that does not fit aborts the record: no partial line is ever returned.

use std::fmt;

use chrono::NaiveDate;

use crate::{
    error::{CnabError, CnabResult},
    field::{filler, format_amount, format_date, pad_numeric, pad_text},
    layout::{BankLayout, BatchTotals, CNAB240_WIDTH},
    model::{AccountConfig, DocumentKind, Payment},
    remessa::FileSettings,
};

// === Тип записи ===

/// Record type of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    FileHeader,
    BatchHeader,
    SegmentP,
    SegmentQ,
    SegmentR,
    BatchTrailer,
    FileTrailer,
}

impl RecordKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FileHeader => "file_header",
            Self::BatchHeader => "batch_header",
            Self::SegmentP => "segment_p",
            Self::SegmentQ => "segment_q",
            Self::SegmentR => "segment_r",
            Self::BatchTrailer => "batch_trailer",
            Self::FileTrailer => "file_trailer",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === Готовая запись ===

/// One finished fixed-width line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    kind: RecordKind,
    line: String,
}

impl Segment {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn into_string(self) -> String {
        self.line
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

// === Построитель строки ===

/// Appends fields to one line of a declared width.
#[derive(Debug)]
pub struct LineBuilder {
    kind: RecordKind,
    width: usize,
    line: String,
}

impl LineBuilder {
    pub fn new(kind: RecordKind, width: usize) -> Self {
        Self { kind, width, line: String::with_capacity(width) }
    }

    /// Digits right-justified with zeros.
    pub fn numeric(&mut self, name: &str, value: &str, width: usize) -> CnabResult<&mut Self> {
        let value = pad_numeric(value, width).map_err(|e| e.in_field(name))?;
        self.line.push_str(&value);
        Ok(self)
    }

    /// Upper-cased text left-justified with spaces.
    pub fn text(&mut self, name: &str, value: &str, width: usize) -> CnabResult<&mut Self> {
        let value = pad_text(value, width).map_err(|e| e.in_field(name))?;
        self.line.push_str(&value);
        Ok(self)
    }

    /// Amount in centavos.
    pub fn amount(&mut self, name: &str, cents: u64, width: usize) -> CnabResult<&mut Self> {
        let value = format_amount(cents, width).map_err(|e| e.in_field(name))?;
        self.line.push_str(&value);
        Ok(self)
    }

    /// A block already formatted by the bank layout; must be exactly
    /// `width` characters.
    pub fn block(&mut self, name: &str, value: &str, width: usize) -> CnabResult<&mut Self> {
        let actual = value.chars().count();
        if actual != width {
            return Err(CnabError::FieldOverflow { field: name.to_string(), width, actual });
        }
        self.line.push_str(value);
        Ok(self)
    }

    /// Eight-character date, zeros when absent.
    pub fn date(&mut self, date: Option<NaiveDate>) -> &mut Self {
        self.line.push_str(&format_date(date));
        self
    }

    /// Constant text written as is.
    pub fn literal(&mut self, value: &str) -> &mut Self {
        self.line.push_str(value);
        self
    }

    pub fn char(&mut self, value: char) -> &mut Self {
        self.line.push(value);
        self
    }

    pub fn fill(&mut self, fill: char, width: usize) -> &mut Self {
        self.line.push_str(&filler(fill, width));
        self
    }

    /// Checks the accumulated width in bytes; the line must be ASCII.
    pub fn finish(self) -> CnabResult<Segment> {
        let actual = self.line.len();
        if actual != self.width || !self.line.is_ascii() {
            return Err(CnabError::RecordWidth {
                record: self.kind.as_str(),
                expected: self.width,
                actual,
            });
        }
        Ok(Segment { kind: self.kind, line: self.line })
    }
}

// === Записи CNAB240 ===

/// Builds every CNAB240 record for one account and one file.
pub struct SegmentBuilder<'a, L: BankLayout + ?Sized> {
    layout: &'a L,
    account: &'a AccountConfig,
    settings: &'a FileSettings,
}

impl<'a, L: BankLayout + ?Sized> SegmentBuilder<'a, L> {
    pub fn new(layout: &'a L, account: &'a AccountConfig, settings: &'a FileSettings) -> Self {
        Self { layout, account, settings }
    }

    fn line(&self, kind: RecordKind) -> CnabResult<LineBuilder> {
        let mut line = LineBuilder::new(kind, CNAB240_WIDTH);
        line.numeric("bank_code", self.layout.bank_code(), 3)?;
        Ok(line)
    }

    fn detail(&self, kind: RecordKind, segment: char, batch: usize, sequence: usize) -> CnabResult<LineBuilder> {
        let mut line = self.line(kind)?;
        line.numeric("batch", &batch.to_string(), 4)?
            .char('3')
            .numeric("sequence", &sequence.to_string(), 5)?
            .char(segment)
            .char(' ')
            .literal("01");
        Ok(line)
    }

    /// Registro header de arquivo.
    pub fn file_header(&self) -> CnabResult<Segment> {
        let layout = self.layout;
        let generated_at = self.settings.generated_at;
        let mut line = self.line(RecordKind::FileHeader)?;
        line.literal("0000").char('0').fill(' ', 9);
        line.char(inscription(&self.account.company_document, "company_document")?);
        line.numeric("company_document", &self.account.company_document, 14)?
            .block("covenant", &layout.covenant_field(self.account)?, 20)?
            .block("account", &layout.account_block(self.account)?, 20)?
            .text("company_name", &self.account.company_name, 30)?
            .text("bank_name", layout.bank_name(), 30)?
            .fill(' ', 10)
            .char('1')
            .literal(&generated_at.format("%d%m%Y").to_string())
            .literal(&generated_at.format("%H%M%S").to_string())
            .numeric("file_sequence", &self.settings.file_sequence.to_string(), 6)?
            .numeric("file_layout_version", layout.file_layout_version(), 3)?
            .literal("00000")
            .block("reserved", &layout.file_header_reserved(), 40)?
            .block("file_header_complement", &layout.file_header_complement(), 29)?;
        line.finish()
    }

    /// Registro header de lote.
    pub fn batch_header(&self, batch: usize) -> CnabResult<Segment> {
        let layout = self.layout;
        let mut line = self.line(RecordKind::BatchHeader)?;
        line.numeric("batch", &batch.to_string(), 4)?
            .char('1')
            .char('R')
            .literal("01")
            .literal("  ")
            .numeric("batch_layout_version", layout.batch_layout_version(), 3)?
            .char(' ')
            .char(inscription(&self.account.company_document, "company_document")?);
        line.numeric("company_document", &self.account.company_document, 15)?
            .block("covenant", &layout.batch_covenant_field(self.account)?, 20)?
            .block("account", &layout.account_block(self.account)?, 20)?
            .text("company_name", &self.account.company_name, 30)?
            .text("message_1", &self.settings.message_1, 40)?
            .text("message_2", &self.settings.message_2, 40)?
            .numeric("file_sequence", &self.settings.file_sequence.to_string(), 8)?
            .date(Some(self.settings.generated_at.date()))
            .date(None)
            .block("batch_header_complement", &layout.batch_header_complement(), 33)?;
        line.finish()
    }

    /// Segmento P: title identification, amounts and instructions.
    pub fn segment_p(&self, payment: &Payment, batch: usize, sequence: usize) -> CnabResult<Segment> {
        let layout = self.layout;
        let codes = layout.title_codes();
        let interest = payment.interest;
        let discount = payment.discount;
        let protest = payment.protest;
        let write_off = layout.write_off(payment);

        let mut line = self.detail(RecordKind::SegmentP, 'P', batch, sequence)?;
        line.numeric("agency", &self.account.agency, 5)?
            .char(layout.agency_digit(self.account)?)
            .block("title_account", &layout.title_account_block(self.account, payment)?, 34)?
            .char(codes.wallet)
            .char(codes.registration)
            .char(codes.document_type)
            .char(codes.issuer)
            .char(codes.distribution)
            .block("document_number", &layout.document_number(payment)?, 15)?
            .date(Some(payment.due_date))
            .amount("amount", payment.amount, 15)?
            .literal("00000")
            .char(' ')
            .block("species", layout.species_code(payment), 2)?
            .char(codes.acceptance)
            .date(Some(payment.issue_date))
            .char(payment.interest_code())
            .date(layout.interest_date(payment))
            .amount("interest.value", interest.map_or(0, |i| i.value), 15)?
            .char(discount.map_or('0', |d| d.code.code()))
            .date(discount.and_then(|d| d.date))
            .amount("discount.value", discount.map_or(0, |d| d.value), 15)?
            .amount("iof", payment.iof, 15)?
            .amount("rebate", payment.rebate, 15)?
            .block("company_title_id", &layout.company_title_id(payment)?, 25)?
            .char(protest.map_or('3', |p| p.code.code()))
            .numeric("protest.days", &protest.map_or(0, |p| p.days).to_string(), 2)?
            .char(write_off.code)
            .numeric("write_off.days", &write_off.days.to_string(), 3)?
            .literal("09")
            .fill('0', 10)
            .char(' ');
        line.finish()
    }

    /// Segmento Q: payer and guarantor.
    pub fn segment_q(&self, payment: &Payment, batch: usize, sequence: usize) -> CnabResult<Segment> {
        let payer = &payment.payer;
        let mut line = self.detail(RecordKind::SegmentQ, 'Q', batch, sequence)?;
        line.char(inscription(&payer.document, "payer.document")?);
        line.numeric("payer.document", &payer.document, 15)?
            .text("payer.name", &payer.name, 40)?;

        match &payer.address {
            Some(address) => {
                let (zip, suffix) = split_zip(&address.zip_code)?;
                line.text("payer.address.street", &address.street, 40)?
                    .text("payer.address.neighbourhood", &address.neighbourhood, 15)?
                    .numeric("payer.address.zip_code", zip, 5)?
                    .numeric("payer.address.zip_code", suffix, 3)?
                    .text("payer.address.city", &address.city, 15)?
                    .text("payer.address.state", &address.state, 2)?;
            }
            None => {
                line.fill(' ', 55).fill('0', 8).fill(' ', 17);
            }
        }

        match &payment.guarantor {
            Some(guarantor) => {
                line.char(inscription(&guarantor.document, "guarantor.document")?);
                line.numeric("guarantor.document", &guarantor.document, 15)?
                    .text("guarantor.name", &guarantor.name, 40)?;
            }
            None => {
                line.char('0').fill('0', 15).fill(' ', 40);
            }
        }

        line.literal("000").fill(' ', 20).fill(' ', 8);
        line.finish()
    }

    /// Segmento R: fine, with discounts 2 and 3 zeroed.
    pub fn segment_r(&self, payment: &Payment, batch: usize, sequence: usize) -> CnabResult<Segment> {
        let mut line = self.detail(RecordKind::SegmentR, 'R', batch, sequence)?;
        for _ in 0..2 {
            line.char('0').fill('0', 8).fill('0', 15);
        }
        line.char(payment.fine_code())
            .date(self.layout.fine_date(payment))
            .amount("fine.value", payment.fine.map_or(0, |f| f.value), 15)?
            .fill(' ', 10)
            .fill(' ', 40)
            .fill(' ', 40)
            .fill(' ', 20)
            .fill('0', 8)
            .literal("000")
            .literal("00000")
            .char(' ')
            .fill('0', 12)
            .char(' ')
            .char(' ')
            .char('0')
            .fill(' ', 9);
        line.finish()
    }

    /// Registro trailer de lote.
    pub fn batch_trailer(&self, batch: usize, totals: &BatchTotals) -> CnabResult<Segment> {
        let mut line = self.line(RecordKind::BatchTrailer)?;
        line.numeric("batch", &batch.to_string(), 4)?
            .char('5')
            .fill(' ', 9)
            .numeric("records", &totals.records.to_string(), 6)?
            .block("batch_trailer_complement", &self.layout.batch_trailer_complement(totals)?, 217)?;
        line.finish()
    }

    /// Registro trailer de arquivo.
    pub fn file_trailer(&self, batches: usize, records: usize) -> CnabResult<Segment> {
        let mut line = self.line(RecordKind::FileTrailer)?;
        line.literal("9999")
            .char('9')
            .fill(' ', 9)
            .numeric("batches", &batches.to_string(), 6)?
            .numeric("records", &records.to_string(), 6)?
            .literal("000000")
            .fill(' ', 205);
        line.finish()
    }
}

fn inscription(document: &str, field: &str) -> CnabResult<char> {
    DocumentKind::detect(document).map(|kind| kind.code()).ok_or_else(|| CnabError::InvalidInput {
        field: field.to_string(),
        value: document.to_string(),
    })
}

fn split_zip(zip: &str) -> CnabResult<(&str, &str)> {
    if zip.len() != 8 || !zip.chars().all(|c| c.is_ascii_digit()) {
        return Err(CnabError::InvalidInput {
            field: "payer.address.zip_code".into(),
            value: zip.to_string(),
        });
    }
    Ok(zip.split_at(5))
}
