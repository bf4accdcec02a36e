//! Job sheets: the heater/tank/pump selection for one job number.

use serde::{Deserialize, Serialize};

use crate::error::RowsError;
use crate::model::{EquipmentKind, EquipmentRecord, GeneratedRow, Heater, Pump, RowTemplate, Tank};
use crate::numbering::{format_items, GeneratorConfig};
use crate::templates::{heater_rows, pump_rows, tank_rows};

/// Everything entered for one job. Sections left out generate nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSheet {
    pub job_number: String,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub heater: Option<Heater>,
    #[serde(default)]
    pub tank: Option<Tank>,
    #[serde(default)]
    pub pump: Option<Pump>,
    /// Stack height entered separately from the heater record.
    #[serde(default)]
    pub stack_height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobOutput {
    pub job_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    pub heater_items: Vec<GeneratedRow>,
    pub tank_items: Vec<GeneratedRow>,
    pub pump_items: Vec<GeneratedRow>,
}

impl JobOutput {
    /// Rows of every section, heater first.
    pub fn all_rows(&self) -> impl Iterator<Item = &GeneratedRow> {
        self.heater_items
            .iter()
            .chain(self.tank_items.iter())
            .chain(self.pump_items.iter())
    }

    pub fn items(&self, kind: EquipmentKind) -> &[GeneratedRow] {
        match kind {
            EquipmentKind::Heater => &self.heater_items,
            EquipmentKind::Tank => &self.tank_items,
            EquipmentKind::Pump => &self.pump_items,
        }
    }
}

/// Generate all sections of a job sheet.
///
/// Rows are numbered against the sheet's job number; each section uses its
/// own dash number or the configured default.
pub fn generate_job(sheet: &JobSheet, config: &GeneratorConfig) -> JobOutput {
    let job = sheet.job_number.trim();
    let number = |dash: Option<&str>, templates: Vec<RowTemplate>| {
        let dash = config.effective_dash(dash);
        format_items(job, dash, &templates, config)
    };

    JobOutput {
        job_number: job.to_string(),
        job_name: sheet.job_name.clone(),
        heater_items: sheet
            .heater
            .as_ref()
            .map(|h| number(h.dash_number.as_deref(), heater_rows(h, sheet.stack_height)))
            .unwrap_or_default(),
        tank_items: sheet
            .tank
            .as_ref()
            .map(|t| number(t.dash_number.as_deref(), tank_rows(t)))
            .unwrap_or_default(),
        pump_items: sheet
            .pump
            .as_ref()
            .map(|p| number(p.dash_number.as_deref(), pump_rows(p)))
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// JobBook
// ---------------------------------------------------------------------------

/// In-memory register of equipment records across jobs.
///
/// Keeps insertion order so the latest record per (job, kind) is the one a
/// job sheet is built from. A (job, kind, dash) triple can only be entered
/// once; a missing dash counts as the configured default dash.
#[derive(Debug, Default)]
pub struct JobBook {
    config: GeneratorConfig,
    records: Vec<EquipmentRecord>,
    names: Vec<(String, Option<String>)>,
}

impl JobBook {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config, records: Vec::new(), names: Vec::new() }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Create or rename a job.
    pub fn set_job_name(&mut self, job_number: &str, name: Option<String>) {
        let job = job_number.trim();
        match self.names.iter_mut().find(|(j, _)| j == job) {
            Some(entry) => entry.1 = name,
            None => self.names.push((job.to_string(), name)),
        }
    }

    pub fn insert(&mut self, record: EquipmentRecord) -> Result<(), RowsError> {
        let job = record.job_number().trim().to_string();
        if job.is_empty() {
            return Err(RowsError::MissingJobNumber);
        }
        let kind = record.kind();
        let dash = self.config.effective_dash(record.dash_number()).to_string();

        let taken = self.records_for_job(&job).any(|r| {
            r.kind() == kind && self.config.effective_dash(r.dash_number()) == dash
        });
        if taken {
            return Err(RowsError::DuplicateDash { job_number: job, kind, dash });
        }

        if !self.names.iter().any(|(j, _)| *j == job) {
            self.names.push((job, None));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records_for_job<'a>(&'a self, job_number: &str) -> impl Iterator<Item = &'a EquipmentRecord> + 'a {
        let job = job_number.trim().to_string();
        self.records.iter().filter(move |r| r.job_number().trim() == job)
    }

    /// Most recently inserted record of a kind for a job.
    pub fn latest(&self, job_number: &str, kind: EquipmentKind) -> Option<&EquipmentRecord> {
        self.records_for_job(job_number).filter(|r| r.kind() == kind).last()
    }

    /// Job numbers in the order they were first seen.
    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|(j, _)| j.as_str())
    }

    /// Drop a job and every record filed under it. Returns the records removed.
    pub fn remove_job(&mut self, job_number: &str) -> usize {
        let job = job_number.trim();
        let before = self.records.len();
        self.records.retain(|r| r.job_number().trim() != job);
        self.names.retain(|(j, _)| j != job);
        let removed = before - self.records.len();
        log::info!("removed job {job} ({removed} records)");
        removed
    }

    /// Assemble a sheet from the latest record per kind.
    pub fn sheet(&self, job_number: &str) -> Option<JobSheet> {
        let job = job_number.trim();
        let name = self.names.iter().find(|(j, _)| j == job)?.1.clone();

        let mut sheet = JobSheet {
            job_number: job.to_string(),
            job_name: name,
            ..Default::default()
        };
        for kind in EquipmentKind::ALL {
            match self.latest(job, kind) {
                Some(EquipmentRecord::Heater(h)) => sheet.heater = Some(h.clone()),
                Some(EquipmentRecord::Tank(t)) => sheet.tank = Some(t.clone()),
                Some(EquipmentRecord::Pump(p)) => sheet.pump = Some(p.clone()),
                None => {}
            }
        }
        Some(sheet)
    }

    /// Generate rows for a job from its latest records.
    pub fn generate(&self, job_number: &str) -> Option<JobOutput> {
        self.sheet(job_number).map(|sheet| generate_job(&sheet, &self.config))
    }
}
