//! Кодек банковских файлов CNAB (Бразилия).
//!
//! Крейт собирает файлы remessa (инструкции по выставлению boletos) в
//! формате CNAB240 и разбирает файлы retorno фиксированной ширины:
//!
//! - [`digit`]: контрольные цифры (модуль 10, модуль 11, двойная цифра)
//! - [`field`]: форматирование полей фиксированной ширины
//! - [`model`]: счёт, платежи и шаг валидации
//! - [`layout`]: особенности банков (Sicoob, Sicredi, Cecred)
//! - [`segment`] / [`remessa`]: сборка записей и файла
//! - [`retorno`]: разбор файлов возврата
//! - [`boleto`]: штрихкод и линия для ввода (Banrisul)
//!
//! # Быстрый старт
//!
//! ```
//! use cnab::prelude::*;
//!
//! let layout = Sicoob::default();
//! let account = AccountConfig {
//!     company_name: "SOCIEDADE BRASILEIRA ZOOLOGIA".to_string(),
//!     company_document: "74576177000177".to_string(),
//!     agency: "4327".to_string(),
//!     agency_digit: None,
//!     account: "03666".to_string(),
//!     account_digit: None,
//!     covenant: Some("512231".to_string()),
//!     wallet: "01".to_string(),
//! };
//!
//! assert_eq!(layout.agency_digit(&account).unwrap(), '3');
//! assert_eq!(layout.account_block(&account).unwrap(), "0432730000000036668 ");
//! ```

pub mod boleto;
pub mod digit;
pub mod error;
pub mod field;
pub mod layout;
pub mod model;
pub mod remessa;
pub mod retorno;
pub mod segment;

/// Часто используемые типы.
pub mod prelude {
    pub use crate::{
        error::{CnabError, CnabResult},
        layout::{BankLayout, BatchTotals, Cecred, Sicoob, Sicredi},
        model::{
            AccountConfig, Address, Discount, DiscountCode, Fine, FineCode, Guarantor, Interest,
            InterestCode, Payer, Payment, Protest, ProtestCode, ValidationError, ValidationErrors,
        },
        remessa::{Batch, FileSettings, LineEnding, RemessaAssembler, RemessaFile},
        retorno::{
            BANCO_NORDESTE_CNAB400, Column, RetornoLayout, RetornoParser, RetornoReader,
            RetornoRecord, TrailerPolicy,
        },
    };
}
