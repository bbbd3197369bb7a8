//! Потоковый reader файлов возврата.
//!
//! [`RetornoReader`] это итератор записей поверх любого [`Read`]. Читает по
//! одной строке; для [`TrailerPolicy::LastLine`] держит одну строку
//! впереди, чтобы узнать, что текущая строка последняя.

use std::io::{BufRead, BufReader, Read};

use tracing::trace;

use super::{RetornoParser, RetornoRecord, TrailerPolicy};
use crate::error::CnabResult;

/// Потоковый reader записей retorno.
///
/// # Пример
///
/// ```ignore
/// use cnab::retorno::{BANCO_NORDESTE_CNAB400, RetornoParser, RetornoReader};
/// use std::fs::File;
///
/// let file = File::open("CNAB400BANCONORDESTE.RET")?;
/// for record in RetornoReader::new(file, RetornoParser::new(&BANCO_NORDESTE_CNAB400)) {
///     println!("{}", record?.get("nosso_numero").unwrap_or_default());
/// }
/// ```
pub struct RetornoReader<'a, R> {
    inner: BufReader<R>,
    parser: RetornoParser<'a>,
    /// Номер последней прочитанной строки (с 1).
    line: usize,
    /// Следующая непустая строка, прочитанная заранее.
    pending: Option<(usize, String)>,
    /// Счётчик выданных записей.
    records_read: usize,
    header_skipped: bool,
    finished: bool,
}

impl<'a, R: Read> RetornoReader<'a, R> {
    pub fn new(reader: R, parser: RetornoParser<'a>) -> Self {
        Self {
            inner: BufReader::new(reader),
            parser,
            line: 0,
            pending: None,
            records_read: 0,
            header_skipped: false,
            finished: false,
        }
    }

    /// Количество успешно разобранных записей.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Читает одну физическую строку без `\n`/`\r\n`.
    fn read_raw(&mut self) -> CnabResult<Option<String>> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    /// Следующая непустая строка с её номером.
    fn read_line(&mut self) -> CnabResult<Option<(usize, String)>> {
        while let Some(text) = self.read_raw()? {
            if text.trim().is_empty() {
                trace!(line = self.line, "skipping blank line");
                continue;
            }
            return Ok(Some((self.line, text)));
        }
        Ok(None)
    }

    fn next_detail(&mut self) -> CnabResult<Option<(usize, String)>> {
        if !self.header_skipped {
            self.header_skipped = true;
            if self.read_raw()?.is_some() {
                trace!("skipping header line");
            }
        }

        loop {
            let current = match self.pending.take() {
                Some(current) => current,
                None => match self.read_line()? {
                    Some(current) => current,
                    None => return Ok(None),
                },
            };

            match self.parser.layout().trailer() {
                TrailerPolicy::LastLine => match self.read_line()? {
                    Some(next) => self.pending = Some(next),
                    None => {
                        trace!(line = current.0, "skipping trailer line");
                        return Ok(None);
                    }
                },
                TrailerPolicy::Marker { .. } if self.parser.is_trailer(&current.1) => {
                    trace!(line = current.0, "skipping trailer line");
                    continue;
                }
                TrailerPolicy::Marker { .. } | TrailerPolicy::None => {}
            }
            return Ok(Some(current));
        }
    }
}

impl<R: Read> Iterator for RetornoReader<'_, R> {
    type Item = CnabResult<RetornoRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self
            .next_detail()
            .and_then(|detail| detail.map(|(line, text)| self.parser.parse_line(&text, line)).transpose());
        match result {
            Ok(Some(record)) => {
                self.records_read += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true; // остановка при ошибке
                Some(Err(e))
            }
        }
    }
}
