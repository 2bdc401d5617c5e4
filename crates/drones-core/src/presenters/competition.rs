use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::drone::{present_drone, DroneRepresentation};
use super::WriteMode;
use crate::error::PresentError;
use crate::fields::{require, InputFields};
use crate::links::{LinkResolver, ViewName};
use crate::lookup::RecordLookup;
use crate::models::{Competition, CompetitionDraft, DRONE_NAME_MAX_LEN, PILOT_NAME_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionRepresentation {
    pub url: String,
    pub pk: i64,
    pub distance_in_feet: i32,
    pub distance_achievement_date: NaiveDate,
    /// The full drone representation, nested.
    pub drone: DroneRepresentation,
}

pub fn present_competition(
    competition: &Competition,
    records: &impl RecordLookup,
    links: &impl LinkResolver,
) -> Result<CompetitionRepresentation, PresentError> {
    let drone = records
        .drone(competition.drone_id)
        .ok_or_else(|| PresentError::not_found("drone", competition.drone_id))?;

    Ok(CompetitionRepresentation {
        url: links.detail_url(ViewName::CompetitionDetail, competition.id),
        pk: competition.id,
        distance_in_feet: competition.distance_in_feet,
        distance_achievement_date: competition.distance_achievement_date,
        drone: present_drone(&drone, records, links)?,
    })
}

/// Parse competition input.
///
/// Output nests the whole drone, but input names it: `drone` and `pilot`
/// are the unique names of existing records.
pub fn parse_competition(
    input: &Value,
    records: &impl RecordLookup,
    mode: WriteMode<'_, Competition>,
) -> Result<CompetitionDraft, PresentError> {
    let mut fields = InputFields::new(input, mode.is_partial())?;

    let distance_in_feet = fields.integer("distance_in_feet", 0);
    let distance_achievement_date = fields.date("distance_achievement_date");

    let pilot_id = match fields.string("pilot", PILOT_NAME_MAX_LEN) {
        Some(name) => match records.pilot_by_name(&name) {
            Some(pilot) => Some(pilot.id),
            None => {
                fields.reject("pilot", format!("Object with name={} does not exist.", name));
                None
            }
        },
        None => None,
    };

    let drone_id = match fields.string("drone", DRONE_NAME_MAX_LEN) {
        Some(name) => match records.drone_by_name(&name) {
            Some(drone) => Some(drone.id),
            None => {
                fields.reject("drone", format!("Object with name={} does not exist.", name));
                None
            }
        },
        None => None,
    };
    fields.finish()?;

    let fallback = mode.fallback();
    Ok(CompetitionDraft {
        pilot_id: require("pilot", pilot_id.or_else(|| fallback.map(|c| c.pilot_id)))?,
        drone_id: require("drone", drone_id.or_else(|| fallback.map(|c| c.drone_id)))?,
        distance_in_feet: require(
            "distance_in_feet",
            distance_in_feet.or_else(|| fallback.map(|c| c.distance_in_feet)),
        )?,
        distance_achievement_date: require(
            "distance_achievement_date",
            distance_achievement_date.or_else(|| fallback.map(|c| c.distance_achievement_date)),
        )?,
    })
}
