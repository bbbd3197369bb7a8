//! Модель данных: счёт получателя, платежи и шаг их проверки.
//!
//! Типы этого модуля описывают *что* попадает в файл, независимо от
//! банка. Ширины полей конкретного банка приходят через
//! [`AccountRules`] и [`crate::layout::BankLayout`].

mod account;
mod document;
mod payment;
mod validation;

pub use account::{AccountConfig, AccountRules};
pub use document::{DocumentKind, is_valid_document};
pub use payment::{
    Address, Discount, DiscountCode, Fine, FineCode, Guarantor, Interest, InterestCode, Payer,
    Payment, Protest, ProtestCode,
};
pub use validation::{Checks, ValidationError, ValidationErrors};
