use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::WriteMode;
use crate::error::PresentError;
use crate::fields::{require, InputFields};
use crate::links::{LinkResolver, ViewName};
use crate::lookup::RecordLookup;
use crate::models::{Drone, DroneDraft, DRONE_NAME_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneRepresentation {
    pub url: String,
    pub name: String,
    /// Category name, not a link.
    pub drone_category: String,
    pub manufacturing_date: NaiveDate,
    pub has_it_competed: bool,
    pub inserted_timestamp: DateTime<Utc>,
}

pub fn present_drone(
    drone: &Drone,
    records: &impl RecordLookup,
    links: &impl LinkResolver,
) -> Result<DroneRepresentation, PresentError> {
    let category = records
        .category(drone.drone_category_id)
        .ok_or_else(|| PresentError::not_found("drone category", drone.drone_category_id))?;

    Ok(DroneRepresentation {
        url: links.detail_url(ViewName::DroneDetail, drone.id),
        name: drone.name.clone(),
        drone_category: category.name,
        manufacturing_date: drone.manufacturing_date,
        has_it_competed: drone.has_it_competed,
        inserted_timestamp: drone.inserted_timestamp,
    })
}

/// Parse drone input, resolving `drone_category` by name.
pub fn parse_drone(
    input: &Value,
    records: &impl RecordLookup,
    mode: WriteMode<'_, Drone>,
) -> Result<DroneDraft, PresentError> {
    let mut fields = InputFields::new(input, mode.is_partial())?;

    let name = fields.string("name", DRONE_NAME_MAX_LEN);
    if let Some(name) = name.as_deref() {
        if let Some(existing) = records.drone_by_name(name) {
            if mode.instance().map(|d| d.id) != Some(existing.id) {
                fields.reject("name", "drone with this name already exists.");
            }
        }
    }

    let category_id = match fields.string("drone_category", usize::MAX) {
        Some(category_name) => match records.category_by_name(&category_name) {
            Some(category) => Some(category.id),
            None => {
                fields.reject(
                    "drone_category",
                    format!("Object with name={} does not exist.", category_name),
                );
                None
            }
        },
        None => None,
    };

    let manufacturing_date = fields.date("manufacturing_date");
    let has_it_competed = fields.boolean("has_it_competed");
    fields.finish()?;

    let fallback = mode.fallback();
    Ok(DroneDraft {
        name: require("name", name.or_else(|| fallback.map(|d| d.name.clone())))?,
        drone_category_id: require(
            "drone_category",
            category_id.or_else(|| fallback.map(|d| d.drone_category_id)),
        )?,
        manufacturing_date: require(
            "manufacturing_date",
            manufacturing_date.or_else(|| fallback.map(|d| d.manufacturing_date)),
        )?,
        has_it_competed: has_it_competed
            .or_else(|| mode.instance().map(|d| d.has_it_competed))
            .unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenters::fixtures::{date, Records, TestLinks};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn forward_embeds_category_name() {
        let records = Records::seeded();
        let repr = present_drone(&records.drones[2], &records, &TestLinks).unwrap();

        assert_eq!(repr.url, "http://testserver/drones/3");
        assert_eq!(repr.name, "Octo King");
        assert_eq!(repr.drone_category, "Octocopter");
        assert_eq!(repr.manufacturing_date, date(2018, 1, 2));
        assert!(!repr.has_it_competed);
    }

    #[test]
    fn forward_json_field_set() {
        let records = Records::seeded();
        let repr = present_drone(&records.drones[0], &records, &TestLinks).unwrap();
        let value = serde_json::to_value(&repr).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "drone_category",
                "has_it_competed",
                "inserted_timestamp",
                "manufacturing_date",
                "name",
                "url"
            ]
        );
        assert_eq!(value["manufacturing_date"], "2017-07-20");
    }

    #[test]
    fn dangling_category_is_not_found() {
        let records = Records::seeded();
        let mut orphan = records.drones[0].clone();
        orphan.drone_category_id = 42;
        let err = present_drone(&orphan, &records, &TestLinks).unwrap_err();
        assert!(matches!(err, PresentError::NotFound { .. }));
    }

    #[test]
    fn falcon_round_trip() {
        let mut records = Records::seeded();
        records.categories.push(crate::models::DroneCategory {
            id: 3,
            name: "Racing".into(),
        });
        let input = json!({
            "name": "Falcon",
            "drone_category": "Racing",
            "manufacturing_date": "2020-01-01",
            "has_it_competed": false
        });

        let draft = parse_drone(&input, &records, WriteMode::Create).unwrap();
        assert_eq!(draft.drone_category_id, 3);

        let drone = draft.into_record(10, Utc::now());
        let repr = present_drone(&drone, &records, &TestLinks).unwrap();
        assert_eq!(repr.name, "Falcon");
        assert_eq!(repr.drone_category, "Racing");
        assert_eq!(repr.manufacturing_date, date(2020, 1, 1));
        assert!(!repr.has_it_competed);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let records = Records::seeded();
        let input = json!({
            "name": "Falcon",
            "drone_category": "Racing",
            "manufacturing_date": "2020-01-01"
        });
        let err = parse_drone(&input, &records, WriteMode::Create).unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages("drone_category"),
            ["Object with name=Racing does not exist."]
        );
    }

    #[test]
    fn has_it_competed_defaults_to_false() {
        let records = Records::seeded();
        let input = json!({
            "name": "Falcon",
            "drone_category": "Quadcopter",
            "manufacturing_date": "2020-01-01"
        });
        let draft = parse_drone(&input, &records, WriteMode::Create).unwrap();
        assert!(!draft.has_it_competed);
    }

    #[test]
    fn patch_changes_only_given_fields() {
        let records = Records::seeded();
        let current = &records.drones[1];
        let draft = parse_drone(
            &json!({"drone_category": "Octocopter", "inserted_timestamp": "ignored"}),
            &records,
            WriteMode::Patch(current),
        )
        .unwrap();

        assert_eq!(draft.name, "Atom");
        assert_eq!(draft.drone_category_id, 2);
        assert_eq!(draft.manufacturing_date, current.manufacturing_date);
        assert!(draft.has_it_competed);
    }

    #[test]
    fn replace_keeps_current_has_it_competed_when_absent() {
        let records = Records::seeded();
        let current = &records.drones[1];
        let input = json!({
            "name": "Atom",
            "drone_category": "Octocopter",
            "manufacturing_date": "2018-01-01"
        });
        let draft = parse_drone(&input, &records, WriteMode::Replace(current)).unwrap();
        assert!(draft.has_it_competed);
        assert_eq!(draft.drone_category_id, 2);
        assert_eq!(draft.manufacturing_date, date(2018, 1, 1));
    }

    #[test]
    fn replace_requires_all_fields() {
        let records = Records::seeded();
        let current = &records.drones[1];
        let err = parse_drone(&json!({"name": "Atom"}), &records, WriteMode::Replace(current))
            .unwrap_err();
        let errors = err.validation().unwrap();
        assert!(errors.contains("drone_category"));
        assert!(errors.contains("manufacturing_date"));
        assert!(!errors.contains("name"));
    }
}
