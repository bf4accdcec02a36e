//! Value rendering shared by the row templates.
//!
//! These mirror the spreadsheet formulas the import workbook was built from,
//! so output must stay byte-for-byte stable.

/// Render a dimension the way the workbook does.
///
/// Integer-valued floats drop the decimal point (`12.0` -> `"12"`); anything
/// else uses the shortest round-trip form (`12.5` -> `"12.5"`). Magnitudes
/// below 1e-4 switch to exponent form with a two-digit exponent (`"5e-05"`),
/// matching the legacy generator output.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if value == 0.0 {
        // Covers -0.0 as well.
        return "0".into();
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else if value.abs() < 1e-4 {
        exponent_form(value)
    } else {
        format!("{value}")
    }
}

fn exponent_form(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

/// Uppercase a code attribute. Empty stays empty.
pub fn upper(code: &str) -> String {
    code.to_uppercase()
}

/// Uppercase and trim; used for codes that arrive padded (heater A/B).
pub fn upper_trimmed(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_floats_drop_point() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(72.0), "72");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1e16), "10000000000000000");
    }

    #[test]
    fn fractional_floats_render_as_is() {
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.375), "0.375");
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn tiny_fractions_use_exponent_form() {
        assert_eq!(format_number(0.00005), "5e-05");
        assert_eq!(format_number(-0.000015), "-1.5e-05");
        assert_eq!(format_number(1.5e-120), "1.5e-120");
        assert_eq!(format_number(0.0001), "0.0001");
    }

    #[test]
    fn zero_and_non_finite() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn codes() {
        assert_eq!(upper("gp"), "GP");
        assert_eq!(upper(""), "");
        assert_eq!(upper_trimmed(" a "), "A");
    }
}
