//! Core record types for the drone competition API.
//!
//! Records are what the store persists. They reference each other by id;
//! the presenters turn those ids into names, links, or nested objects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const CATEGORY_NAME_MAX_LEN: usize = 250;
pub const DRONE_NAME_MAX_LEN: usize = 250;
pub const PILOT_NAME_MAX_LEN: usize = 150;

/// A named group of drones (quadcopters, octocopters, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    pub id: i64,
    pub name: String,
    pub drone_category_id: i64,
    pub manufacturing_date: NaiveDate,
    pub has_it_competed: bool,
    pub inserted_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: i64,
    pub name: String,
    pub gender: Gender,
    pub races_count: i32,
    pub inserted_timestamp: DateTime<Utc>,
}

/// A distance achieved by a pilot flying a drone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub id: i64,
    pub pilot_id: i64,
    pub drone_id: i64,
    pub distance_in_feet: i32,
    pub distance_achievement_date: NaiveDate,
}

/// Pilot gender, stored and exchanged as a one-letter code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Code → label table. Order is the order choices are offered to clients.
pub static GENDER_CHOICES: [(Gender, &str, &str); 2] = [
    (Gender::Male, "M", "Male"),
    (Gender::Female, "F", "Female"),
];

impl Gender {
    pub fn from_code(code: &str) -> Option<Self> {
        GENDER_CHOICES
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(gender, _, _)| *gender)
    }

    pub fn code(self) -> &'static str {
        self.entry().1
    }

    /// Human-readable label for the code.
    pub fn label(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (Gender, &'static str, &'static str) {
        // Every variant has exactly one row in the table.
        match self {
            Gender::Male => &GENDER_CHOICES[0],
            Gender::Female => &GENDER_CHOICES[1],
        }
    }
}

/// Writable attributes of a category, produced by the reverse presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroneCategoryDraft {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroneDraft {
    pub name: String,
    pub drone_category_id: i64,
    pub manufacturing_date: NaiveDate,
    pub has_it_competed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PilotDraft {
    pub name: String,
    pub gender: Gender,
    pub races_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionDraft {
    pub pilot_id: i64,
    pub drone_id: i64,
    pub distance_in_feet: i32,
    pub distance_achievement_date: NaiveDate,
}

impl DroneCategoryDraft {
    pub fn into_record(self, id: i64) -> DroneCategory {
        DroneCategory { id, name: self.name }
    }
}

impl DroneDraft {
    pub fn into_record(self, id: i64, inserted_timestamp: DateTime<Utc>) -> Drone {
        Drone {
            id,
            name: self.name,
            drone_category_id: self.drone_category_id,
            manufacturing_date: self.manufacturing_date,
            has_it_competed: self.has_it_competed,
            inserted_timestamp,
        }
    }
}

impl PilotDraft {
    pub fn into_record(self, id: i64, inserted_timestamp: DateTime<Utc>) -> Pilot {
        Pilot {
            id,
            name: self.name,
            gender: self.gender,
            races_count: self.races_count,
            inserted_timestamp,
        }
    }
}

impl CompetitionDraft {
    pub fn into_record(self, id: i64) -> Competition {
        Competition {
            id,
            pilot_id: self.pilot_id,
            drone_id: self.drone_id,
            distance_in_feet: self.distance_in_feet,
            distance_achievement_date: self.distance_achievement_date,
        }
    }
}
