pub mod error;
pub mod fields;
pub mod links;
pub mod lookup;
pub mod models;
pub mod presenters;

pub use error::{PresentError, ValidationErrors, NON_FIELD_ERRORS};
pub use links::{LinkResolver, ViewName};
pub use lookup::RecordLookup;
pub use models::{
    Competition, CompetitionDraft, Drone, DroneCategory, DroneCategoryDraft, DroneDraft, Gender,
    Pilot, PilotDraft, GENDER_CHOICES,
};
pub use presenters::{
    parse_category, parse_competition, parse_drone, parse_pilot, present_category,
    present_competition, present_drone, present_pilot, CompetitionRepresentation,
    DroneCategoryRepresentation, DroneRepresentation, PilotRepresentation, WriteMode,
};
