//! Data models
//!
//! Plain records shared by the stores, the wizards and the sync layer.
//! Field names are camelCase on the wire so the spreadsheet columns match
//! what the tablets have always written.

pub mod allergen;
pub mod b2b_sale;
pub mod batch_check;
pub mod complaint;
pub mod delivery;
pub mod event;
pub mod incident;
pub mod method;
pub mod record;
pub mod safety;
pub mod staff;
pub mod supplier;
pub mod transport;

// Re-exports
pub use allergen::*;
pub use b2b_sale::*;
pub use batch_check::*;
pub use complaint::*;
pub use delivery::*;
pub use event::*;
pub use incident::*;
pub use method::*;
pub use record::*;
pub use safety::*;
pub use staff::*;
pub use supplier::*;
pub use transport::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn meta() -> RecordMeta {
        RecordMeta::new("tester")
    }

    #[test]
    fn test_event_flattens_meta() {
        let event = Event {
            meta: meta(),
            name: "Sunday market".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            location: "Old Square".into(),
            kind: EventKind::Market,
            expected_covers: Some(150),
            contact: None,
            notes: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], event.meta.id.as_str());
        assert_eq!(json["createdBy"], "tester");
        assert_eq!(json["expectedCovers"], 150);
        assert_eq!(json["date"], "2024-06-02");

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.id(), event.meta.id);
    }

    #[test]
    fn test_domains_are_distinct() {
        let mut domains = vec![
            Event::DOMAIN,
            AllergenRecord::DOMAIN,
            Incident::DOMAIN,
            Complaint::DOMAIN,
            Delivery::DOMAIN,
            SupplierRecord::DOMAIN,
            Staff::DOMAIN,
            Method::DOMAIN,
            BatchCheck::DOMAIN,
            B2bSale::DOMAIN,
            TransportCheck::DOMAIN,
        ];
        let count = domains.len();
        domains.sort();
        domains.dedup();
        assert_eq!(domains.len(), count);
    }

    #[test]
    fn test_allergen_affects() {
        let record = AllergenRecord {
            meta: meta(),
            dish_name: "Al pastor taco".into(),
            ingredients: vec!["pork".into(), "pineapple".into(), "corn tortilla".into()],
            contains: vec![Allergen::Sulphites],
            may_contain: vec![Allergen::Gluten],
            notes: None,
        };
        assert!(record.affects(Allergen::Gluten));
        assert!(record.affects(Allergen::Sulphites));
        assert!(!record.affects(Allergen::Milk));
    }

    #[test]
    fn test_b2b_sale_total_and_overdue() {
        let sale = B2bSale {
            meta: meta(),
            customer: "Cafe Verde".into(),
            invoice_number: "INV-0042".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            lines: vec![
                SaleLine {
                    description: "Salsa verde 1L".into(),
                    quantity: Decimal::new(4, 0),
                    unit_price: Decimal::new(650, 2),
                },
                SaleLine {
                    description: "Tortillas x100".into(),
                    quantity: Decimal::new(2, 0),
                    unit_price: Decimal::new(1199, 2),
                },
            ],
            due_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            paid: false,
        };
        assert_eq!(sale.total(), Decimal::new(4998, 2));
        assert!(!sale.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(sale.is_overdue(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
    }

    #[test]
    fn test_method_progress_caps_at_required() {
        let batch = |n, verdict| Batch {
            number: n,
            recorded_at: Utc::now(),
            recorded_by: "tester".into(),
            reading: TemperatureReading::new(70.0),
            verdict,
            notes: None,
        };
        let method = Method {
            meta: meta(),
            name: "Barbacoa slow cook".into(),
            kind: CheckKind::Cooking,
            description: String::new(),
            required_batches: 3,
            batches: vec![batch(1, Verdict::Safe), batch(2, Verdict::Unsafe), batch(3, Verdict::Safe)],
            validated_at: None,
        };
        assert_eq!(method.passed_batches(), 2);
        assert_eq!(method.progress(), (2, 3));
        assert!(!method.is_validated());
    }

    #[test]
    fn test_method_required_batches_default() {
        let json = r#"{
            "id": "1-abcdef", "createdBy": "x", "createdAt": "2024-05-01T10:00:00Z",
            "name": "Rice cooling", "kind": "cooling"
        }"#;
        let method: Method = serde_json::from_str(json).unwrap();
        assert_eq!(method.required_batches, DEFAULT_REQUIRED_BATCHES);
        assert!(method.batches.is_empty());
    }
}
