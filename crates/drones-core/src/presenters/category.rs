use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::WriteMode;
use crate::error::PresentError;
use crate::fields::{require, InputFields};
use crate::links::{LinkResolver, ViewName};
use crate::lookup::RecordLookup;
use crate::models::{DroneCategory, DroneCategoryDraft, CATEGORY_NAME_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneCategoryRepresentation {
    pub url: String,
    pub pk: i64,
    pub name: String,
    /// Links to member drones, ordered by drone name. Read-only.
    pub drones: Vec<String>,
}

pub fn present_category(
    category: &DroneCategory,
    records: &impl RecordLookup,
    links: &impl LinkResolver,
) -> DroneCategoryRepresentation {
    let drones = records
        .drones_in_category(category.id)
        .iter()
        .map(|drone| links.detail_url(ViewName::DroneDetail, drone.id))
        .collect();

    DroneCategoryRepresentation {
        url: links.detail_url(ViewName::DroneCategoryDetail, category.id),
        pk: category.id,
        name: category.name.clone(),
        drones,
    }
}

/// Parse category input. Only `name` is writable; `drones` is ignored.
pub fn parse_category(
    input: &Value,
    records: &impl RecordLookup,
    mode: WriteMode<'_, DroneCategory>,
) -> Result<DroneCategoryDraft, PresentError> {
    let mut fields = InputFields::new(input, mode.is_partial())?;

    let name = fields.string("name", CATEGORY_NAME_MAX_LEN);
    if let Some(name) = name.as_deref() {
        if let Some(existing) = records.category_by_name(name) {
            if mode.instance().map(|c| c.id) != Some(existing.id) {
                fields.reject("name", "drone category with this name already exists.");
            }
        }
    }
    fields.finish()?;

    let fallback = mode.fallback();
    Ok(DroneCategoryDraft {
        name: require("name", name.or_else(|| fallback.map(|c| c.name.clone())))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenters::fixtures::{Records, TestLinks};
    use serde_json::json;

    #[test]
    fn drone_links_match_membership() {
        let records = Records::seeded();
        for category in &records.categories {
            let repr = present_category(category, &records, &TestLinks);
            let members = records
                .drones
                .iter()
                .filter(|d| d.drone_category_id == category.id)
                .count();
            assert_eq!(repr.drones.len(), members);
        }
    }

    #[test]
    fn forward_renders_links_in_name_order() {
        let records = Records::seeded();
        let repr = present_category(&records.categories[0], &records, &TestLinks);

        assert_eq!(repr.url, "http://testserver/drone-categories/1");
        assert_eq!(repr.pk, 1);
        assert_eq!(repr.name, "Quadcopter");
        // Atom (2) sorts before WonderDrone (1).
        assert_eq!(
            repr.drones,
            vec![
                "http://testserver/drones/2".to_string(),
                "http://testserver/drones/1".to_string(),
            ]
        );
    }

    #[test]
    fn empty_category_has_no_links() {
        let records = Records::seeded();
        let lonely = DroneCategory { id: 9, name: "Hexacopter".into() };
        let repr = present_category(&lonely, &records, &TestLinks);
        assert!(repr.drones.is_empty());
    }

    #[test]
    fn reverse_accepts_name_and_ignores_drones() {
        let records = Records::seeded();
        let input = json!({"name": "Hexacopter", "drones": ["http://x/drones/1"]});
        let draft = parse_category(&input, &records, WriteMode::Create).unwrap();
        assert_eq!(draft, DroneCategoryDraft { name: "Hexacopter".into() });
    }

    #[test]
    fn missing_name_fails() {
        let records = Records::seeded();
        let err = parse_category(&json!({}), &records, WriteMode::Create).unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages("name"),
            ["This field is required."]
        );
    }

    #[test]
    fn duplicate_name_fails_unless_it_is_the_same_record() {
        let records = Records::seeded();
        let input = json!({"name": "Octocopter"});

        let err = parse_category(&input, &records, WriteMode::Create).unwrap_err();
        assert!(err.validation().unwrap().contains("name"));

        let own = &records.categories[1];
        let draft = parse_category(&input, &records, WriteMode::Replace(own)).unwrap();
        assert_eq!(draft.name, "Octocopter");

        let other = &records.categories[0];
        assert!(parse_category(&input, &records, WriteMode::Patch(other)).is_err());
    }

    #[test]
    fn patch_without_name_keeps_current() {
        let records = Records::seeded();
        let current = &records.categories[0];
        let draft = parse_category(&json!({}), &records, WriteMode::Patch(current)).unwrap();
        assert_eq!(draft.name, "Quadcopter");
    }
}
