//! # e2e-tests - End-to-end тесты CLI инструментов
//!
//! Этот крейт содержит e2e тесты для CLI инструментов воркспейса:
//! - `cnab-remessa`: сборка файла remessa CNAB240 из JSON-задания
//! - `cnab-retorno`: разбор файла retorno в CSV или JSON
//!
//! ## Фикстуры
//!
//! Тестовые файлы расположены в `fixtures/`:
//! - `sicoob_job.json`: задание Sicoob на два лота и три платежа
//! - `invalid_job.json`: то же задание с ошибками в полях
//! - `CNAB400BANCONORDESTE.RET`: retorno Banco do Nordeste, две записи

use std::path::PathBuf;

/// Получить путь к директории фикстур.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Получить путь к фикстуре по имени файла.
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}
