//! Per-kind row templates, in catalog order (main assembly first).

use crate::format::{format_number, upper, upper_trimmed};
use crate::model::{EquipmentRecord, Heater, ProductType, Pump, RowTemplate, Tank};

/// Suffix used by precut rows in place of sequential numbering.
pub const PRECUT_SUFFIX: &str = "A";

fn row(description: String, product_type: ProductType) -> RowTemplate {
    RowTemplate { description, product_type, override_suffix: None }
}

fn precut(description: String) -> RowTemplate {
    RowTemplate {
        description,
        product_type: ProductType::Phantom,
        override_suffix: Some(PRECUT_SUFFIX),
    }
}

/// Build the un-numbered rows for a record.
///
/// `stack_height` overrides the heater's own stack height; ignored for
/// other kinds.
pub fn build_templates(record: &EquipmentRecord, stack_height: Option<f64>) -> Vec<RowTemplate> {
    match record {
        EquipmentRecord::Heater(heater) => heater_rows(heater, stack_height),
        EquipmentRecord::Tank(tank) => tank_rows(tank),
        EquipmentRecord::Pump(pump) => pump_rows(pump),
    }
}

pub fn heater_rows(heater: &Heater, stack_height: Option<f64>) -> Vec<RowTemplate> {
    let d = heater.heater_diameter.to_string();
    let h = format_number(heater.heater_height);
    let sd = heater.stack_diameter.to_string();
    let sh = format_number(
        stack_height
            .or(heater.stack_height)
            .unwrap_or(heater.heater_height),
    );
    let model = upper(&heater.heater_model);
    let material = upper(&heater.material);
    let hand = upper(&heater.hand);
    let mount = upper(&heater.gas_train_mount);
    let gts = format_number(heater.gas_train_size);
    let btu = format_number(heater.btu);
    let ab = upper_trimmed(&heater.heater_ab);

    let main = if ab.is_empty() {
        format!("HEATER, FAB, {d}X{h}, {model}, {material}")
    } else {
        format!("HEATER {ab}, FAB, {d}X{h}, {model}, {material}")
    };

    vec![
        row(main, ProductType::Item),
        row(format!("HEATER, WELD, {d}X{h}, {material}"), ProductType::PeggedSupply),
        row(format!("HEATER, SHELL, {d}X{h}, {material}"), ProductType::SubAssembly),
        row(format!("HEATER, STACK, {sd}X{sh}, W/2FL"), ProductType::SubAssembly),
        row(
            format!("GAS TRAIN, {gts}, {mount}, SIEMENS, {btu}MBTU, {hand}"),
            ProductType::PeggedSupply,
        ),
        row(format!("HEATER, MOD PIPING, {model}"), ProductType::SubAssembly),
        precut(format!("PRECUT HTR, {material}")),
    ]
}

pub fn tank_rows(tank: &Tank) -> Vec<RowTemplate> {
    let d = tank.tank_diameter.to_string();
    let h = tank.tank_height.to_string();
    let material = upper(&tank.material);
    let ttype = upper(&tank.tank_type);

    vec![
        row(format!("TANK, FAB, {d}X{h}, {material}, {ttype}"), ProductType::Item),
        row(format!("TANK, SHELL, {d}X{h}, {material}"), ProductType::SubAssembly),
        precut(format!("TANK, PRECUT, {material}")),
    ]
}

pub fn pump_rows(pump: &Pump) -> Vec<RowTemplate> {
    let ptype = upper(&pump.pump_type);
    let pressure = upper(&pump.pump_pressure);
    let system = upper(&pump.system_type);
    let hp = format_number(pump.hp);
    let material = upper(&pump.material);
    let sl = format_number(pump.skid_length);
    let sw = format_number(pump.skid_width);
    let sh = format_number(pump.skid_height);

    vec![
        row(
            format!("PUMP, {ptype}, {pressure}, {system}, {hp}HP, {material}"),
            ProductType::Item,
        ),
        row(format!("SKID, {sl}X{sw}X{sh}"), ProductType::SubAssembly),
        precut(format!("PUMP, PRECUT, {material}")),
    ]
}
