//! Built-in retorno layouts.

use std::borrow::Cow;

use super::{Column, RetornoLayout, TrailerPolicy};

const BANCO_NORDESTE_COLUMNS: &[Column] = &[
    Column::fixed("codigo_registro", 0, 1),
    Column::fixed("documento_empresa", 3, 17),
    Column::fixed("agencia", 17, 21),
    Column::fixed("conta_corrente", 23, 30),
    Column::fixed("numero_controle", 37, 62),
    Column::fixed("nosso_numero", 62, 70),
    Column::fixed("carteira", 107, 108),
    Column::fixed("codigo_ocorrencia", 108, 110),
    Column::fixed("data_ocorrencia", 110, 116),
    Column::fixed("numero_documento", 116, 126),
    Column::fixed("data_vencimento", 146, 152),
    Column::fixed("valor_titulo", 152, 165),
    Column::fixed("banco_recebedor", 165, 168),
    Column::fixed("agencia_recebedora", 168, 173),
    Column::fixed("especie_documento", 173, 175),
    Column::fixed("valor_tarifa", 175, 188),
    Column::fixed("outras_despesas", 188, 201),
    Column::fixed("juros_desconto", 201, 214),
    Column::fixed("iof_desconto", 214, 227),
    Column::fixed("valor_abatimento", 227, 240),
    Column::fixed("desconto_concedido", 240, 253),
    Column::fixed("valor_recebido", 253, 266),
    Column::fixed("juros_mora", 266, 279),
    Column::fixed("outros_recebimentos", 279, 292),
    Column::fixed("data_credito", 295, 301),
    Column::fixed("sequencial", 394, 400),
];

/// Banco do Nordeste, CNAB400. Trailer lines carry `9` in column 0.
pub static BANCO_NORDESTE_CNAB400: RetornoLayout = RetornoLayout {
    name: Cow::Borrowed("banco-nordeste"),
    width: 400,
    columns: Cow::Borrowed(BANCO_NORDESTE_COLUMNS),
    trailer: TrailerPolicy::Marker { start: 0, end: 1, value: Cow::Borrowed("9") },
};

/// Looks up a built-in layout by its command-line name.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static RetornoLayout> {
    match name {
        "banco-nordeste" | "banco-nordeste-cnab400" => Some(&BANCO_NORDESTE_CNAB400),
        _ => None,
    }
}
