//! Record presenters.
//!
//! Each record kind has a forward function (`present_*`, record to
//! representation) and a reverse function (`parse_*`, input to draft).
//! Whether a related record is rendered as a link, a name, or a nested
//! object is fixed per field:
//!
//! | field                   | rendering        |
//! |-------------------------|------------------|
//! | category `drones`       | detail links     |
//! | drone `drone_category`  | category name    |
//! | competition `drone`     | nested drone     |
//! | pilot `competitions`    | nested list      |

pub mod category;
pub mod competition;
pub mod drone;
pub mod pilot;

pub use category::{parse_category, present_category, DroneCategoryRepresentation};
pub use competition::{parse_competition, present_competition, CompetitionRepresentation};
pub use drone::{parse_drone, present_drone, DroneRepresentation};
pub use pilot::{parse_pilot, present_pilot, PilotRepresentation};

/// What a reverse pass is producing a draft for.
#[derive(Debug)]
pub enum WriteMode<'a, T> {
    /// A new record; required fields must be present.
    Create,
    /// Full replacement of an existing record (PUT).
    Replace(&'a T),
    /// Partial update (PATCH); absent fields keep the instance's values.
    Patch(&'a T),
}

impl<T> Clone for WriteMode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WriteMode<'_, T> {}

impl<'a, T> WriteMode<'a, T> {
    /// The record being updated, if any.
    pub fn instance(&self) -> Option<&'a T> {
        match self {
            WriteMode::Create => None,
            WriteMode::Replace(instance) | WriteMode::Patch(instance) => Some(instance),
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, WriteMode::Patch(_))
    }

    /// Source of values for fields the input left out.
    pub(crate) fn fallback(&self) -> Option<&'a T> {
        match self {
            WriteMode::Patch(instance) => Some(instance),
            _ => None,
        }
    }
}
