//! Compare generated rows against reference output (e.g. rows exported from
//! the import workbook).

use serde::Serialize;

use crate::model::GeneratedRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowMismatch {
    /// Same position, differing field.
    Field {
        index: usize,
        field: &'static str,
        expected: String,
        actual: String,
    },
    /// Reference has a row the generator did not produce.
    Missing { index: usize, item_number: String },
    /// Generator produced a row past the end of the reference.
    Extra { index: usize, item_number: String },
}

impl std::fmt::Display for RowMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field { index, field, expected, actual } => {
                write!(f, "row {index}: {field} expected '{expected}', got '{actual}'")
            }
            Self::Missing { index, item_number } => {
                write!(f, "row {index}: missing '{item_number}'")
            }
            Self::Extra { index, item_number } => {
                write!(f, "row {index}: unexpected '{item_number}'")
            }
        }
    }
}

/// Positional comparison. An empty result means the outputs agree.
pub fn compare_rows(expected: &[GeneratedRow], actual: &[GeneratedRow]) -> Vec<RowMismatch> {
    let mut out = Vec::new();

    for (index, (exp, act)) in expected.iter().zip(actual).enumerate() {
        let fields: [(&'static str, &str, &str); 4] = [
            ("item_number", exp.item_number.as_str(), act.item_number.as_str()),
            ("description", exp.description.as_str(), act.description.as_str()),
            ("bom", exp.bom.as_str(), act.bom.as_str()),
            ("template", exp.template.as_str(), act.template.as_str()),
        ];
        for (field, e, a) in fields {
            if e != a {
                out.push(RowMismatch::Field {
                    index,
                    field,
                    expected: e.to_string(),
                    actual: a.to_string(),
                });
            }
        }
        if exp.product_type != act.product_type {
            out.push(RowMismatch::Field {
                index,
                field: "product_type",
                expected: exp.product_type.to_string(),
                actual: act.product_type.to_string(),
            });
        }
    }

    for (index, row) in expected.iter().enumerate().skip(actual.len()) {
        out.push(RowMismatch::Missing { index, item_number: row.item_number.clone() });
    }
    for (index, row) in actual.iter().enumerate().skip(expected.len()) {
        out.push(RowMismatch::Extra { index, item_number: row.item_number.clone() });
    }

    out
}
