//! Сквозные проверки сборки remessa для всех банков.

use std::fs;

use chrono::NaiveDate;
use cnab::prelude::*;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings() -> FileSettings {
    let mut settings = FileSettings::new(date(2015, 7, 14).and_hms_opt(9, 15, 0).unwrap());
    settings.file_sequence = 7;
    settings.message_1 = "Pagável até o vencimento".to_string();
    settings
}

fn account() -> AccountConfig {
    AccountConfig {
        company_name: "SOCIEDADE BRASILEIRA ZOOLOGIA".to_string(),
        company_document: "74576177000177".to_string(),
        agency: "4327".to_string(),
        agency_digit: None,
        account: "03666".to_string(),
        account_digit: None,
        covenant: Some("512231".to_string()),
        wallet: "1".to_string(),
    }
}

fn payment(amount: u64, our_number: &str) -> Payment {
    Payment {
        amount,
        due_date: date(2015, 7, 14),
        issue_date: date(2015, 7, 1),
        document_number: "6969".to_string(),
        our_number: our_number.to_string(),
        payer: Payer {
            name: "PABLO DIEGO JOSÉ FRANCISCO".to_string(),
            document: "12345678909".to_string(),
            address: Some(Address {
                street: "RUA RIO GRANDE DO SUL 999".to_string(),
                neighbourhood: "São José".to_string(),
                zip_code: "12345678".to_string(),
                city: "Santa Rita".to_string(),
                state: "RJ".to_string(),
            }),
        },
        guarantor: None,
        interest: Some(Interest { code: InterestCode::DailyValue, value: 5, date: None }),
        fine: Some(Fine { code: FineCode::Percentage, value: 200, date: None }),
        discount: None,
        protest: None,
        species: Some("DM".to_string()),
        iof: 0,
        rebate: 0,
    }
}

fn batches() -> Vec<Batch> {
    vec![
        Batch::new(vec![payment(5000, "1"), payment(12345, "2"), payment(1, "3")]),
        Batch::new(vec![payment(99999, "4")]),
    ]
}

fn assemble(layout: &dyn BankLayout, account: &AccountConfig) -> RemessaFile {
    let settings = settings();
    RemessaAssembler::new(layout, account, &settings).assemble(&batches()).unwrap()
}

fn cecred_account() -> AccountConfig {
    AccountConfig { agency_digit: Some("3".to_string()), ..account() }
}

#[test]
fn every_line_has_240_characters() {
    let sicredi = Sicredi::new("14", '2').unwrap();
    let files = [
        assemble(&Sicoob::default(), &account()),
        assemble(&sicredi, &account()),
        assemble(&Cecred, &cecred_account()),
    ];
    for file in &files {
        // header + (bh + 3 * PQR + bt) + (bh + PQR + bt) + trailer
        assert_eq!(file.len(), 1 + 11 + 5 + 1);
        for line in file.lines() {
            assert_eq!(line.chars().count(), 240);
        }
    }
}

#[test]
fn trailer_totals_match_segment_p_amounts() {
    let file = assemble(&Sicoob::default(), &account());
    let lines = file.lines();

    let mut amounts = Vec::new();
    let mut current = 0u64;
    let mut count = 0usize;
    for line in lines {
        match (&line[7..8], &line[13..14]) {
            ("3", "P") => {
                current += line[85..100].parse::<u64>().unwrap();
                count += 1;
            }
            ("5", _) => {
                assert_eq!(line[23..29].parse::<usize>().unwrap(), count);
                assert_eq!(line[29..46].parse::<u64>().unwrap(), current);
                amounts.push(current);
                current = 0;
                count = 0;
            }
            _ => {}
        }
    }
    assert_eq!(amounts, [5000 + 12345 + 1, 99999]);
}

#[test]
fn record_counters() {
    let file = assemble(&Sicoob::default(), &account());
    let lines = file.lines();
    let trailer = lines.last().unwrap();
    assert_eq!(&trailer[17..23], "000002");
    assert_eq!(trailer[23..29].parse::<usize>().unwrap(), lines.len());

    // detail sequence restarts in the second batch
    let second_header = lines.iter().position(|l| &l[3..8] == "00021").unwrap();
    assert_eq!(&lines[second_header + 1][8..13], "00001");
    assert_eq!(&lines[second_header - 2][8..14], "00009R");
}

#[test]
fn header_carries_settings() {
    let file = assemble(&Cecred, &cecred_account());
    let header = &file.lines()[0];
    assert_eq!(&header[0..3], "085");
    assert_eq!(&header[32..52], "512231              ");
    assert_eq!(&header[157..163], "000007");
    assert_eq!(&header[163..166], "087");

    let batch_header = &file.lines()[1];
    assert_eq!(&batch_header[13..16], "045");
    assert_eq!(batch_header[103..143].trim_end(), "PAGAVEL ATE O VENCIMENTO");
}

#[test]
fn sicredi_our_numbers_follow_the_sequence() {
    let sicredi = Sicredi::new("14", '2').unwrap();
    let file = assemble(&sicredi, &account());
    let first_p = &file.lines()[2];
    assert_eq!(&first_p[37..57], "152000012           ");
}

#[test]
fn write_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("remessa.rem");
    let file = assemble(&Sicoob::default(), &account());

    let written = file.write_to(fs::File::create(&path).unwrap()).unwrap();
    assert_eq!(written, file.len());

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), file.len());
    assert_eq!(content, file.to_string());
}

#[test]
fn invalid_input_produces_no_file() {
    let settings = settings();
    let mut acc = account();
    acc.company_name = "SOCIEDADE BRASILEIRA DE ZOOLOGIA LTDA".to_string();
    let mut bad = batches();
    bad[1].payments[0].payer.address.as_mut().unwrap().zip_code = "1234".to_string();

    let err = RemessaAssembler::new(&Sicoob::default(), &acc, &settings)
        .assemble(&bad)
        .unwrap_err();
    match err {
        CnabError::Validation(errors) => {
            assert!(errors.has("company_name"));
            assert!(errors.has("batches[1].payments[0].payer.address.zip_code"));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn written_lines_are_240_bytes_with_non_ascii_text() {
    let settings = settings();
    let acc = account();
    let mut batches = batches();
    for payment in &mut batches[0].payments {
        if let Some(address) = payment.payer.address.as_mut() {
            address.street = "RUA Nº 5 – 2ª TRAVESSA".to_string();
            address.city = "Sant’Ana do Sul".to_string();
        }
    }

    let file = RemessaAssembler::new(&Sicoob::default(), &acc, &settings).assemble(&batches).unwrap();
    let mut bytes = Vec::new();
    file.write_to(&mut bytes).unwrap();

    let content = String::from_utf8(bytes).unwrap();
    assert!(content.is_ascii());
    for line in content.lines() {
        assert_eq!(line.len(), 240);
    }
}
