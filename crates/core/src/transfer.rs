//! Portable export/import document types and the pure parts of the
//! reconciliation pipeline.
//!
//! The export document is id-free by design: items cross-reference their
//! category and locker by *name* and *code* so a document can be
//! re-imported into a different user, account, or database without id
//! collisions. The database-facing halves of the pipeline (the global
//! code probe and the transactional merge) live in `lockbase-db` and the
//! API layer; everything here is pure and unit-tested.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Version tag stamped on every export document and required on import.
pub const EXPORT_VERSION: &str = "2.0";

// ── Document types ───────────────────────────────────────────────────

/// A complete export document as serialized to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: Timestamp,
    /// Id of the user the document was exported from. Informational only;
    /// import always targets the authenticated caller.
    pub exported_by: DbId,
    pub data: TransferData,
}

/// The entity arrays carried by an export document or an import request.
/// Absent arrays deserialize as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferData {
    #[serde(default)]
    pub lockers: Vec<LockerRecord>,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// A locker as it appears in a transfer document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Present on export; ignored on import (QR images are re-rendered
    /// for the effective code during reconciliation).
    #[serde(default)]
    pub qr_code_url: Option<String>,
}

/// A category as it appears in a transfer document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
}

/// An item as it appears in a transfer document. References its category
/// and locker by name/code, never by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub category_name: String,
    pub locker_code: String,
}

// ── Reconciliation types ─────────────────────────────────────────────

/// One entry of the user-facing code-change report: the document's
/// original code and the code the locker was actually created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChange {
    pub original_code: String,
    pub effective_code: String,
}

/// Counters and the code-change report returned by a completed import.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub categories_created: usize,
    pub lockers_created: usize,
    pub items_created: usize,
    pub items_updated: usize,
    pub items_skipped: usize,
    pub code_changes: Vec<CodeChange>,
}

/// A locker after phase-1 code reconciliation: its effective code is
/// settled and its QR image is already rendered, so the transactional
/// merge can insert it without further network calls.
#[derive(Debug, Clone)]
pub struct PreparedLocker {
    pub original_code: String,
    pub effective_code: String,
    pub name: String,
    pub description: Option<String>,
    pub qr_code_url: String,
}

impl PreparedLocker {
    /// Whether reconciliation assigned a different code than the document
    /// carried.
    pub fn code_changed(&self) -> bool {
        self.original_code != self.effective_code
    }
}

/// Collect the code changes of a prepared locker set, in document order.
pub fn code_changes(lockers: &[PreparedLocker]) -> Vec<CodeChange> {
    lockers
        .iter()
        .filter(|l| l.code_changed())
        .map(|l| CodeChange {
            original_code: l.original_code.clone(),
            effective_code: l.effective_code.clone(),
        })
        .collect()
}

// ── Validation ───────────────────────────────────────────────────────

/// Check the version tag of an incoming document.
pub fn validate_version(version: &str) -> Result<(), CoreError> {
    if version == EXPORT_VERSION {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported export document version {version:?} (expected {EXPORT_VERSION:?})"
        )))
    }
}

/// Validate an import payload before any reconciliation work runs.
///
/// Rejects structurally broken records (blank names, negative quantities)
/// with a field-level message. Unresolvable item references are NOT an
/// error here; they are skipped and counted during the merge.
pub fn validate_import(data: &TransferData) -> Result<(), CoreError> {
    for (idx, locker) in data.lockers.iter().enumerate() {
        if locker.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "lockers[{idx}].name must not be empty"
            )));
        }
        if locker.code.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "lockers[{idx}].code must not be empty"
            )));
        }
    }
    for (idx, category) in data.categories.iter().enumerate() {
        if category.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "categories[{idx}].name must not be empty"
            )));
        }
    }
    for (idx, item) in data.items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "items[{idx}].name must not be empty"
            )));
        }
        if item.quantity < 0 {
            return Err(CoreError::Validation(format!(
                "items[{idx}].quantity must not be negative"
            )));
        }
    }
    Ok(())
}

// ── Export reference widening ────────────────────────────────────────

/// The set of locker codes referenced by at least one exported item.
pub fn referenced_locker_codes(items: &[ItemRecord]) -> HashSet<&str> {
    items.iter().map(|i| i.locker_code.as_str()).collect()
}

/// The set of category names referenced by at least one exported item.
pub fn referenced_category_names(items: &[ItemRecord]) -> HashSet<&str> {
    items.iter().map(|i| i.category_name.as_str()).collect()
}

/// Apply the smart-dependency rule: when items are part of the export,
/// narrow the locker and category arrays to exactly the entries the items
/// reference, so every cross-reference resolves inside the document.
///
/// Callers apply this ONLY when items were selected; without an item
/// selection, lockers and categories export exactly as independently
/// requested, with no filtering.
pub fn widen_to_referenced(data: &mut TransferData) {
    let codes = referenced_locker_codes(&data.items)
        .into_iter()
        .map(str::to_owned)
        .collect::<HashSet<_>>();
    let names = referenced_category_names(&data.items)
        .into_iter()
        .map(str::to_owned)
        .collect::<HashSet<_>>();
    data.lockers.retain(|l| codes.contains(&l.code));
    data.categories.retain(|c| names.contains(&c.name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, category: &str, code: &str) -> ItemRecord {
        ItemRecord {
            name: name.to_string(),
            quantity,
            description: None,
            category_name: category.to_string(),
            locker_code: code.to_string(),
        }
    }

    fn locker(code: &str, name: &str) -> LockerRecord {
        LockerRecord {
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            qr_code_url: None,
        }
    }

    #[test]
    fn absent_arrays_deserialize_empty() {
        let data: TransferData = serde_json::from_str(r#"{"lockers": []}"#).unwrap();
        assert!(data.lockers.is_empty());
        assert!(data.categories.is_empty());
        assert!(data.items.is_empty());
    }

    #[test]
    fn item_records_use_camel_case_references() {
        let json = r#"{
            "name": "Cable",
            "quantity": 3,
            "categoryName": "Electronics",
            "lockerCode": "A001"
        }"#;
        let parsed: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.category_name, "Electronics");
        assert_eq!(parsed.locker_code, "A001");

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["categoryName"], "Electronics");
        assert_eq!(back["lockerCode"], "A001");
    }

    #[test]
    fn version_check_accepts_current_and_rejects_others() {
        assert!(validate_version("2.0").is_ok());
        assert!(validate_version("1.0").is_err());
        assert!(validate_version("").is_err());
    }

    #[test]
    fn validation_rejects_blank_names_and_negative_quantities() {
        let mut data = TransferData {
            items: vec![item("Cable", 3, "Electronics", "A001")],
            ..Default::default()
        };
        assert!(validate_import(&data).is_ok());

        data.items[0].quantity = -1;
        let err = validate_import(&data).unwrap_err();
        assert!(err.to_string().contains("items[0].quantity"));

        let data = TransferData {
            lockers: vec![locker("A001", "  ")],
            ..Default::default()
        };
        let err = validate_import(&data).unwrap_err();
        assert!(err.to_string().contains("lockers[0].name"));
    }

    #[test]
    fn widening_keeps_only_referenced_lockers_and_categories() {
        let mut data = TransferData {
            lockers: vec![locker("A001", "Shelf 1"), locker("B002", "Unreferenced")],
            categories: vec![
                CategoryRecord {
                    name: "Electronics".into(),
                },
                CategoryRecord { name: "Tools".into() },
            ],
            items: vec![item("Cable", 3, "Electronics", "A001")],
        };

        widen_to_referenced(&mut data);

        assert_eq!(data.lockers.len(), 1);
        assert_eq!(data.lockers[0].code, "A001");
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Electronics");
    }

    #[test]
    fn widening_with_zero_items_references_nothing() {
        // An item selection that matched no rows references no lockers or
        // categories, so none survive the filter.
        let mut data = TransferData {
            lockers: vec![locker("A001", "Shelf 1"), locker("B002", "Shelf 2")],
            categories: vec![CategoryRecord { name: "Tools".into() }],
            items: vec![],
        };

        widen_to_referenced(&mut data);

        assert!(data.lockers.is_empty());
        assert!(data.categories.is_empty());
    }

    #[test]
    fn code_changes_report_only_changed_lockers_in_order() {
        let lockers = vec![
            PreparedLocker {
                original_code: "A001".into(),
                effective_code: "A001".into(),
                name: "Kept".into(),
                description: None,
                qr_code_url: "https://qr.test/A001".into(),
            },
            PreparedLocker {
                original_code: "B002".into(),
                effective_code: "K417".into(),
                name: "Renamed".into(),
                description: None,
                qr_code_url: "https://qr.test/K417".into(),
            },
        ];

        let changes = code_changes(&lockers);
        assert_eq!(
            changes,
            vec![CodeChange {
                original_code: "B002".into(),
                effective_code: "K417".into(),
            }]
        );
    }

    #[test]
    fn import_summary_serializes_camel_case() {
        let summary = ImportSummary {
            categories_created: 1,
            lockers_created: 2,
            items_created: 3,
            items_updated: 4,
            items_skipped: 5,
            code_changes: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["categoriesCreated"], 1);
        assert_eq!(json["itemsSkipped"], 5);
        assert!(json["codeChanges"].as_array().unwrap().is_empty());
    }
}
