//! `partline generate`: ERP rows for a job sheet or a single equipment record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use partline_rows::numbering::generate_rows_with;
use partline_rows::{
    compare_rows, generate_job, EquipmentRecord, GeneratedRow, GeneratorConfig, JobOutput, JobSheet,
    RowMismatch,
};

use crate::exit_codes::{EXIT_GENERATE_MISMATCH, EXIT_GENERATE_PARSE, EXIT_USAGE};
use crate::util::render_table;
use crate::CliError;

const TABLE_HEADERS: [&str; 5] = ["Item Number", "Description", "BOM", "Template", "Product Type"];
const MAX_COLUMN_WIDTH: usize = 72;

/// What a sheet file holds: a tagged record (`"kind": "heater"`) or a whole job.
#[derive(Debug)]
enum SheetInput {
    Record(EquipmentRecord),
    Job(JobSheet),
}

impl SheetInput {
    fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("kind").is_some() {
            serde_json::from_value(value).map(Self::Record)
        } else {
            serde_json::from_value(value).map(Self::Job)
        }
    }
}

/// Reference output for `--expect`: a bare row list or per-section lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reference {
    Rows(Vec<GeneratedRow>),
    Sections {
        #[serde(default)]
        heater_items: Vec<GeneratedRow>,
        #[serde(default)]
        tank_items: Vec<GeneratedRow>,
        #[serde(default)]
        pump_items: Vec<GeneratedRow>,
    },
}

impl Reference {
    fn into_rows(self) -> Vec<GeneratedRow> {
        match self {
            Self::Rows(rows) => rows,
            Self::Sections { heater_items, tank_items, pump_items } => {
                heater_items.into_iter().chain(tank_items).chain(pump_items).collect()
            }
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Generated {
    Record { rows: Vec<GeneratedRow> },
    Job(JobOutput),
}

impl Generated {
    fn rows(&self) -> Vec<GeneratedRow> {
        match self {
            Self::Record { rows } => rows.clone(),
            Self::Job(output) => output.all_rows().cloned().collect(),
        }
    }
}

#[derive(Serialize)]
struct MismatchReport<'a> {
    mismatches: &'a [RowMismatch],
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("cannot read {what} {}: {e}", path.display()),
        hint: None,
    })?;
    serde_json::from_str(&text).map_err(|e| CliError {
        code: EXIT_GENERATE_PARSE,
        message: format!("invalid {what} {}: {e}", path.display()),
        hint: None,
    })
}

pub fn cmd_generate(
    sheet_path: PathBuf,
    json: bool,
    expect: Option<PathBuf>,
    stack_height: Option<f64>,
    config: &GeneratorConfig,
) -> Result<(), CliError> {
    let value = read_json::<serde_json::Value>(&sheet_path, "sheet")?;
    let sheet = SheetInput::from_value(value).map_err(|e| CliError {
        code: EXIT_GENERATE_PARSE,
        message: format!("invalid sheet {}: {e}", sheet_path.display()),
        hint: Some("a sheet is a job object or a record tagged with \"kind\"".into()),
    })?;

    let generated = match sheet {
        SheetInput::Record(record) => Generated::Record {
            rows: generate_rows_with(&record, stack_height, config),
        },
        SheetInput::Job(mut sheet) => {
            if stack_height.is_some() {
                sheet.stack_height = stack_height;
            }
            Generated::Job(generate_job(&sheet, config))
        }
    };
    let rows = generated.rows();

    if let Some(expect_path) = expect {
        let reference = read_json::<Reference>(&expect_path, "reference")?.into_rows();
        let mismatches = compare_rows(&reference, &rows);
        if !mismatches.is_empty() {
            if json {
                let report = MismatchReport { mismatches: &mismatches };
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::generic(e.to_string()))?;
                println!("{out}");
            } else {
                for m in &mismatches {
                    eprintln!("  {m}");
                }
            }
            return Err(CliError {
                code: EXIT_GENERATE_MISMATCH,
                message: format!(
                    "{} mismatch(es) against {}",
                    mismatches.len(),
                    expect_path.display()
                ),
                hint: None,
            });
        }
        log::info!("{} rows match {}", rows.len(), expect_path.display());
    }

    if json {
        let out = serde_json::to_string_pretty(&generated).map_err(|e| CliError::generic(e.to_string()))?;
        println!("{out}");
    } else {
        let table: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                vec![
                    r.item_number.clone(),
                    r.description.clone(),
                    r.bom.clone(),
                    r.template.clone(),
                    r.product_type.to_string(),
                ]
            })
            .collect();
        print!("{}", render_table(&TABLE_HEADERS, &table, MAX_COLUMN_WIDTH));
    }
    Ok(())
}
