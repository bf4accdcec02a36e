use serde::{Deserialize, Serialize};

use crate::model::{EquipmentRecord, GeneratedRow, RowTemplate};
use crate::templates::build_templates;

/// Template code for the finished-good row.
pub const TEMPLATE_MAIN: &str = "FGFAB";
/// Template code for every other row.
pub const TEMPLATE_SUB: &str = "Sub Assy";

/// How rows carrying an override suffix are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixStyle {
    /// `{job}-{dash}-A`
    #[default]
    Dash,
    /// `{job}-{dash}.{n}-A`
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub suffix_style: SuffixStyle,
    /// Dash number used when a record has none.
    pub default_dash: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            suffix_style: SuffixStyle::Dash,
            default_dash: "01".into(),
        }
    }
}

impl GeneratorConfig {
    /// Dash to number against: the record's own, else the configured default.
    pub fn effective_dash<'a>(&'a self, dash: Option<&'a str>) -> &'a str {
        dash.map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(self.default_dash.as_str())
    }
}

/// Generate the numbered rows for one record.
pub fn generate_rows(record: &EquipmentRecord, config: &GeneratorConfig) -> Vec<GeneratedRow> {
    generate_rows_with(record, None, config)
}

/// Same as [`generate_rows`] with a stack height override for heaters.
pub fn generate_rows_with(
    record: &EquipmentRecord,
    stack_height: Option<f64>,
    config: &GeneratorConfig,
) -> Vec<GeneratedRow> {
    let templates = build_templates(record, stack_height);
    let dash = config.effective_dash(record.dash_number());
    let rows = format_items(record.job_number(), dash, &templates, config);
    log::debug!(
        "generated {} {} rows for {}-{}",
        rows.len(),
        record.kind(),
        record.job_number(),
        dash
    );
    rows
}

/// Number a template list: item number, BOM reference and template code.
pub fn format_items(
    job_number: &str,
    dash: &str,
    templates: &[RowTemplate],
    config: &GeneratorConfig,
) -> Vec<GeneratedRow> {
    templates
        .iter()
        .enumerate()
        .map(|(seq, tpl)| {
            let item_number = item_number(job_number, dash, seq, tpl.override_suffix, config.suffix_style);
            GeneratedRow {
                bom: format!("{item_number}-000"),
                item_number,
                description: tpl.description.clone(),
                template: if seq == 0 { TEMPLATE_MAIN } else { TEMPLATE_SUB }.to_string(),
                product_type: tpl.product_type,
            }
        })
        .collect()
}

fn item_number(
    job: &str,
    dash: &str,
    seq: usize,
    suffix: Option<&str>,
    style: SuffixStyle,
) -> String {
    if seq == 0 {
        return format!("{job}-{dash}");
    }
    match (suffix, style) {
        (Some(s), SuffixStyle::Dash) => format!("{job}-{dash}-{s}"),
        (Some(s), SuffixStyle::Dotted) => format!("{job}-{dash}.{seq}-{s}"),
        (None, _) => format!("{job}-{dash}.{seq}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Heater, ProductType, Tank};

    fn heater() -> EquipmentRecord {
        EquipmentRecord::Heater(Heater {
            job_number: "24001".into(),
            dash_number: Some("02".into()),
            heater_diameter: 72,
            heater_height: 12.0,
            stack_diameter: 24,
            stack_height: None,
            flange_inlet: 4.0,
            heater_model: "GP".into(),
            material: "304".into(),
            gas_train_size: 1.5,
            gas_train_mount: "L".into(),
            btu: 3.0,
            hand: "RH".into(),
            heater_ab: String::new(),
            heater_single_dual: "S".into(),
        })
    }

    #[test]
    fn heater_numbering() {
        let rows = generate_rows(&heater(), &GeneratorConfig::default());
        assert_eq!(rows.len(), 7);
        let numbers: Vec<&str> = rows.iter().map(|r| r.item_number.as_str()).collect();
        assert_eq!(
            numbers,
            vec![
                "24001-02", "24001-02.1", "24001-02.2", "24001-02.3", "24001-02.4", "24001-02.5",
                "24001-02-A",
            ]
        );
        assert_eq!(rows[0].bom, "24001-02-000");
        assert_eq!(rows[6].bom, "24001-02-A-000");
        assert_eq!(rows[0].template, "FGFAB");
        assert!(rows[1..].iter().all(|r| r.template == "Sub Assy"));
        assert_eq!(rows[0].product_type, ProductType::Item);
    }

    #[test]
    fn dotted_suffix_style() {
        let config = GeneratorConfig { suffix_style: SuffixStyle::Dotted, ..Default::default() };
        let rows = generate_rows(&heater(), &config);
        assert_eq!(rows[6].item_number, "24001-02.6-A");
        assert_eq!(rows[5].item_number, "24001-02.5");
    }

    #[test]
    fn missing_dash_uses_default() {
        let tank = EquipmentRecord::Tank(Tank {
            job_number: "J7".into(),
            dash_number: None,
            tank_diameter: 96,
            tank_height: 16,
            tank_inches: 0.0,
            material: "cs".into(),
            tank_type: "vert".into(),
        });
        let rows = generate_rows(&tank, &GeneratorConfig::default());
        assert_eq!(rows[0].item_number, "J7-01");
        assert_eq!(rows[1].item_number, "J7-01.1");
        assert_eq!(rows[2].item_number, "J7-01-A");
    }

    #[test]
    fn stack_override() {
        let rows = generate_rows_with(&heater(), Some(30.0), &GeneratorConfig::default());
        assert_eq!(rows[3].description, "HEATER, STACK, 24X30, W/2FL");
    }

    #[test]
    fn generation_is_deterministic() {
        let config = GeneratorConfig::default();
        assert_eq!(generate_rows(&heater(), &config), generate_rows(&heater(), &config));
    }
}
