use sha2::{Digest, Sha256};

use crate::model::PartFields;

/// Field separator in the hashed content.
const SEPARATOR: &str = "|";

/// The significant fields in hash order. `unit_cost` uses two decimals,
/// empty when unknown. Date and phone changes alone do not trigger updates.
fn significant_fields(fields: &PartFields) -> [String; 7] {
    [
        fields.description.clone(),
        fields.size.clone(),
        fields.product_group_id.clone(),
        fields.unit_cost.map(|c| format!("{c:.2}")).unwrap_or_default(),
        fields.vendor_name.clone(),
        fields.vendor_product_number.clone(),
        fields.vendor_product_description.clone(),
    ]
}

/// SHA-256 of the significant fields joined by `|`, as lowercase hex.
pub fn content_hash(fields: &PartFields) -> String {
    let content = significant_fields(fields).join(SEPARATOR);
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;

    fn fields(desc: &str, cost: Option<f64>) -> PartFields {
        PartFields {
            description: desc.into(),
            size: "2\"".into(),
            unit_cost: cost,
            ..Default::default()
        }
    }

    #[test]
    fn stable_and_hex() {
        let h = content_hash(&fields("BALL VALVE", Some(12.0)));
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(h, content_hash(&fields("BALL VALVE", Some(12.0))));
    }

    #[test]
    fn sensitive_to_significant_fields() {
        let base = content_hash(&fields("BALL VALVE", Some(12.0)));
        assert_ne!(base, content_hash(&fields("GATE VALVE", Some(12.0))));
        assert_ne!(base, content_hash(&fields("BALL VALVE", Some(12.5))));
        assert_ne!(base, content_hash(&fields("BALL VALVE", None)));
        // Sub-cent noise is below the stored precision.
        assert_eq!(base, content_hash(&fields("BALL VALVE", Some(12.001))));
    }

    #[test]
    fn phone_is_not_significant() {
        let mut a = fields("BALL VALVE", None);
        let base = content_hash(&a);
        a.vendor_phone = "555-0100".into();
        assert_eq!(base, content_hash(&a));
    }

    #[test]
    fn independent_of_column_order() {
        let a: RawRecord = [("description", "ELBOW"), ("size", "4"), ("vendor_name", "Acme")]
            .into_iter()
            .collect();
        let b: RawRecord = [("vendor_name", "Acme"), ("size", "4"), ("description", "ELBOW")]
            .into_iter()
            .collect();
        assert_eq!(
            content_hash(&PartFields::from_raw(&a).unwrap()),
            content_hash(&PartFields::from_raw(&b).unwrap())
        );
    }
}
