use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Equipment records
// ---------------------------------------------------------------------------

fn default_single_dual() -> String {
    "S".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heater {
    #[serde(default)]
    pub job_number: String,
    #[serde(default)]
    pub dash_number: Option<String>,
    pub heater_diameter: i64,
    pub heater_height: f64,
    pub stack_diameter: i64,
    /// Falls back to `heater_height` when absent.
    #[serde(default)]
    pub stack_height: Option<f64>,
    pub flange_inlet: f64,
    #[serde(default)]
    pub heater_model: String,
    #[serde(default)]
    pub material: String,
    pub gas_train_size: f64,
    #[serde(default)]
    pub gas_train_mount: String,
    pub btu: f64,
    #[serde(default)]
    pub hand: String,
    /// A/B designation; empty for single heaters.
    #[serde(default)]
    pub heater_ab: String,
    #[serde(default = "default_single_dual")]
    pub heater_single_dual: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    #[serde(default)]
    pub job_number: String,
    #[serde(default)]
    pub dash_number: Option<String>,
    pub tank_diameter: i64,
    pub tank_height: i64,
    #[serde(default)]
    pub tank_inches: f64,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub tank_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    #[serde(default)]
    pub job_number: String,
    #[serde(default)]
    pub dash_number: Option<String>,
    #[serde(default)]
    pub pump_type: String,
    #[serde(default)]
    pub pump_pressure: String,
    #[serde(default)]
    pub system_type: String,
    pub hp: f64,
    #[serde(default)]
    pub material: String,
    pub skid_length: f64,
    pub skid_width: f64,
    pub skid_height: f64,
}

/// One piece of equipment on a job, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EquipmentRecord {
    Heater(Heater),
    Tank(Tank),
    Pump(Pump),
}

impl EquipmentRecord {
    pub fn kind(&self) -> EquipmentKind {
        match self {
            Self::Heater(_) => EquipmentKind::Heater,
            Self::Tank(_) => EquipmentKind::Tank,
            Self::Pump(_) => EquipmentKind::Pump,
        }
    }

    pub fn job_number(&self) -> &str {
        match self {
            Self::Heater(h) => &h.job_number,
            Self::Tank(t) => &t.job_number,
            Self::Pump(p) => &p.job_number,
        }
    }

    /// Raw dash number, `None` when absent or blank.
    pub fn dash_number(&self) -> Option<&str> {
        let dash = match self {
            Self::Heater(h) => h.dash_number.as_deref(),
            Self::Tank(t) => t.dash_number.as_deref(),
            Self::Pump(p) => p.dash_number.as_deref(),
        };
        dash.map(str::trim).filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Heater,
    Tank,
    Pump,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 3] = [Self::Heater, Self::Tank, Self::Pump];
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heater => write!(f, "heater"),
            Self::Tank => write!(f, "tank"),
            Self::Pump => write!(f, "pump"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// ERP product type. Serialized with the display names the import expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(alias = "Finished Good")]
    Item,
    #[serde(rename = "Sub Assy", alias = "Subassembly")]
    SubAssembly,
    #[serde(alias = "Raw Material")]
    Phantom,
    #[serde(rename = "Pegged Supply", alias = "Purchased")]
    PeggedSupply,
}

impl ProductType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::SubAssembly => "Sub Assy",
            Self::Phantom => "Phantom",
            Self::PeggedSupply => "Pegged Supply",
        }
    }

    /// Parse a display name or one of the older spreadsheet labels.
    /// An empty label means `Item`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" | "Item" | "Finished Good" => Some(Self::Item),
            "Sub Assy" | "Subassembly" => Some(Self::SubAssembly),
            "Phantom" | "Raw Material" => Some(Self::Phantom),
            "Pegged Supply" | "Purchased" => Some(Self::PeggedSupply),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An un-numbered row as produced by the per-kind templates.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTemplate {
    pub description: String,
    pub product_type: ProductType,
    /// Replaces sequential numbering (precut rows use `A`).
    pub override_suffix: Option<&'static str>,
}

/// A finished ERP import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRow {
    pub item_number: String,
    pub description: String,
    pub bom: String,
    pub template: String,
    pub product_type: ProductType,
}
