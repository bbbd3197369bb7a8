//! CSV and JSON-lines output of parsed records.

use std::io::{BufWriter, Write};

use super::{RetornoLayout, RetornoRecord};
use crate::error::CnabResult;

/// Writes a header row with the layout's column names, then one row per
/// record. Returns the number of records written.
pub fn write_csv<'r, W, I>(layout: &RetornoLayout, records: I, writer: W) -> CnabResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'r RetornoRecord>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(layout.column_names())?;
    let mut written = 0;
    for record in records {
        csv.write_record(record.values())?;
        written += 1;
    }
    csv.flush()?;
    Ok(written)
}

/// Writes one JSON object per line.
pub fn write_json_lines<'r, W, I>(records: I, writer: W) -> CnabResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'r RetornoRecord>,
{
    let mut out = BufWriter::new(writer);
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retorno::{Column, RetornoParser, TrailerPolicy};

    fn records() -> (RetornoLayout, Vec<RetornoRecord>) {
        let layout = RetornoLayout::new(
            "pair",
            6,
            vec![Column::new("code", 0, 2), Column::new("value", 2, 6)],
            TrailerPolicy::None,
        )
        .unwrap();
        let records = RetornoParser::new(&layout).parse_str("HEADER\n01abcd\n020000\n").unwrap();
        (layout, records)
    }

    #[test]
    fn csv_has_header_and_rows() {
        let (layout, records) = records();
        let mut out = Vec::new();
        assert_eq!(write_csv(&layout, &records, &mut out).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "code,value\n01,abcd\n02,0000\n");
    }

    #[test]
    fn json_lines() {
        let (_, records) = records();
        let mut out = Vec::new();
        assert_eq!(write_json_lines(&records, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, [r#"{"code":"01","value":"abcd"}"#, r#"{"code":"02","value":"0000"}"#]);
    }
}
