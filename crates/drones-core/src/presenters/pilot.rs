use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::competition::{present_competition, CompetitionRepresentation};
use super::WriteMode;
use crate::error::PresentError;
use crate::fields::{require, InputFields};
use crate::links::{LinkResolver, ViewName};
use crate::lookup::RecordLookup;
use crate::models::{Gender, Pilot, PilotDraft, PILOT_NAME_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotRepresentation {
    pub url: String,
    pub name: String,
    pub gender: Gender,
    /// Label for `gender`. Read-only, recomputed on every render.
    pub gender_description: String,
    pub races_count: i32,
    pub inserted_timestamp: DateTime<Utc>,
    /// Every competition flown, longest distance first. Read-only.
    pub competitions: Vec<CompetitionRepresentation>,
}

pub fn present_pilot(
    pilot: &Pilot,
    records: &impl RecordLookup,
    links: &impl LinkResolver,
) -> Result<PilotRepresentation, PresentError> {
    let competitions = records
        .competitions_for_pilot(pilot.id)
        .iter()
        .map(|competition| present_competition(competition, records, links))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PilotRepresentation {
        url: links.detail_url(ViewName::PilotDetail, pilot.id),
        name: pilot.name.clone(),
        gender: pilot.gender,
        gender_description: pilot.gender.label().to_string(),
        races_count: pilot.races_count,
        inserted_timestamp: pilot.inserted_timestamp,
        competitions,
    })
}

/// Parse pilot input. `gender_description` and `competitions` are ignored.
pub fn parse_pilot(
    input: &Value,
    records: &impl RecordLookup,
    mode: WriteMode<'_, Pilot>,
) -> Result<PilotDraft, PresentError> {
    let mut fields = InputFields::new(input, mode.is_partial())?;

    let name = fields.string("name", PILOT_NAME_MAX_LEN);
    if let Some(name) = name.as_deref() {
        if let Some(existing) = records.pilot_by_name(name) {
            if mode.instance().map(|p| p.id) != Some(existing.id) {
                fields.reject("name", "pilot with this name already exists.");
            }
        }
    }
    let gender = fields.choice("gender", false, Gender::from_code);
    let races_count = fields.integer("races_count", 0);
    fields.finish()?;

    let fallback = mode.fallback();
    Ok(PilotDraft {
        name: require("name", name.or_else(|| fallback.map(|p| p.name.clone())))?,
        gender: gender
            .or_else(|| mode.instance().map(|p| p.gender))
            .unwrap_or_default(),
        races_count: require(
            "races_count",
            races_count.or_else(|| fallback.map(|p| p.races_count)),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GENDER_CHOICES;
    use crate::presenters::fixtures::{Records, TestLinks};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn forward_nests_competitions_with_drones() {
        let records = Records::seeded();
        let repr = present_pilot(&records.pilots[0], &records, &TestLinks).unwrap();

        assert_eq!(repr.url, "http://testserver/pilots/1");
        assert_eq!(repr.gender, Gender::Female);
        assert_eq!(repr.gender_description, "Female");
        assert_eq!(repr.competitions.len(), 2);
        // Longest distance first.
        assert_eq!(repr.competitions[0].distance_in_feet, 2800);
        assert_eq!(repr.competitions[0].drone.name, "WonderDrone");
        assert_eq!(repr.competitions[1].drone.name, "Atom");

        let value = serde_json::to_value(&repr).unwrap();
        assert_eq!(value["gender"], "F");
        for competition in value["competitions"].as_array().unwrap() {
            assert!(competition["drone"].is_object());
            assert!(competition["drone"]["drone_category"].is_string());
        }
    }

    #[test]
    fn pilot_without_competitions() {
        let records = Records::seeded();
        let rookie = Pilot {
            id: 5,
            name: "Rookie".into(),
            gender: Gender::Male,
            races_count: 0,
            inserted_timestamp: Utc::now(),
        };
        let repr = present_pilot(&rookie, &records, &TestLinks).unwrap();
        assert!(repr.competitions.is_empty());
        assert_eq!(repr.gender_description, "Male");
    }

    #[test]
    fn every_code_gets_its_table_label() {
        let records = Records::seeded();
        for (gender, code, label) in GENDER_CHOICES {
            let input = json!({"name": "Tester", "gender": code, "races_count": 1});
            let draft = parse_pilot(&input, &records, WriteMode::Create).unwrap();
            assert_eq!(draft.gender, gender);
            let pilot = draft.into_record(9, Utc::now());
            let repr = present_pilot(&pilot, &records, &TestLinks).unwrap();
            assert_eq!(repr.gender_description, label);
        }
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let records = Records::seeded();
        let input = json!({"name": "Tester", "gender": "X", "races_count": 1});
        let err = parse_pilot(&input, &records, WriteMode::Create).unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages("gender"),
            ["\"X\" is not a valid choice."]
        );
    }

    #[test]
    fn derived_fields_in_input_are_ignored() {
        let records = Records::seeded();
        let input = json!({
            "name": "Tester",
            "gender": "M",
            "gender_description": "Female",
            "races_count": 4,
            "competitions": [{"pk": 1}]
        });
        let draft = parse_pilot(&input, &records, WriteMode::Create).unwrap();
        assert_eq!(
            draft,
            PilotDraft {
                name: "Tester".into(),
                gender: Gender::Male,
                races_count: 4,
            }
        );
        let repr = present_pilot(&draft.into_record(9, Utc::now()), &records, &TestLinks).unwrap();
        assert_eq!(repr.gender_description, "Male");
        assert!(repr.competitions.is_empty());
    }

    #[test]
    fn gender_defaults_to_male() {
        let records = Records::seeded();
        let input = json!({"name": "Tester", "races_count": 0});
        let draft = parse_pilot(&input, &records, WriteMode::Create).unwrap();
        assert_eq!(draft.gender, Gender::Male);
    }

    #[test]
    fn replace_keeps_current_gender_when_absent() {
        let records = Records::seeded();
        let current = &records.pilots[0];
        assert_eq!(current.gender, Gender::Female);
        let input = json!({"name": "Penelope Pitstop", "races_count": 12});
        let draft = parse_pilot(&input, &records, WriteMode::Replace(current)).unwrap();
        assert_eq!(
            draft,
            PilotDraft {
                name: "Penelope Pitstop".into(),
                gender: Gender::Female,
                races_count: 12,
            }
        );
    }

    #[test]
    fn writable_fields_round_trip() {
        let records = Records::seeded();
        let input = json!({"name": "Dick Dastardly", "gender": "M", "races_count": 7});
        let draft = parse_pilot(&input, &records, WriteMode::Create).unwrap();
        let pilot = draft.into_record(5, Utc::now());
        let repr = present_pilot(&pilot, &records, &TestLinks).unwrap();
        assert_eq!(repr.name, "Dick Dastardly");
        assert_eq!(repr.races_count, 7);
        assert_eq!(repr.gender, Gender::Male);

        let value = serde_json::to_value(&repr).unwrap();
        let again = parse_pilot(&value, &records, WriteMode::Replace(&pilot)).unwrap();
        assert_eq!(again.name, "Dick Dastardly");
        assert_eq!(again.races_count, 7);
        assert_eq!(again.gender, Gender::Male);
    }

    #[test]
    fn duplicate_pilot_name_fails() {
        let records = Records::seeded();
        let input = json!({"name": "Peter Perfect", "gender": "M", "races_count": 0});
        let err = parse_pilot(&input, &records, WriteMode::Create).unwrap_err();
        assert!(err.validation().unwrap().contains("name"));
    }
}
