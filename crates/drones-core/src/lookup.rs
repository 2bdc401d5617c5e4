//! Read access the presenters need from the persistence layer.

use crate::models::{Competition, Drone, DroneCategory, Pilot};

/// Lookups by identity and by unique name, plus ordered back-references.
///
/// `None` means "no such record"; presenters turn that into either a field
/// validation message (input references) or a not-found error (dangling
/// references on output).
pub trait RecordLookup {
    fn category(&self, id: i64) -> Option<DroneCategory>;
    fn category_by_name(&self, name: &str) -> Option<DroneCategory>;

    fn drone(&self, id: i64) -> Option<Drone>;
    fn drone_by_name(&self, name: &str) -> Option<Drone>;

    fn pilot(&self, id: i64) -> Option<Pilot>;
    fn pilot_by_name(&self, name: &str) -> Option<Pilot>;

    /// Drones in a category, ordered by name.
    fn drones_in_category(&self, category_id: i64) -> Vec<Drone>;

    /// Competitions flown by a pilot, longest distance first.
    fn competitions_for_pilot(&self, pilot_id: i64) -> Vec<Competition>;
}

impl<T: RecordLookup + ?Sized> RecordLookup for &T {
    fn category(&self, id: i64) -> Option<DroneCategory> {
        (**self).category(id)
    }
    fn category_by_name(&self, name: &str) -> Option<DroneCategory> {
        (**self).category_by_name(name)
    }
    fn drone(&self, id: i64) -> Option<Drone> {
        (**self).drone(id)
    }
    fn drone_by_name(&self, name: &str) -> Option<Drone> {
        (**self).drone_by_name(name)
    }
    fn pilot(&self, id: i64) -> Option<Pilot> {
        (**self).pilot(id)
    }
    fn pilot_by_name(&self, name: &str) -> Option<Pilot> {
        (**self).pilot_by_name(name)
    }
    fn drones_in_category(&self, category_id: i64) -> Vec<Drone> {
        (**self).drones_in_category(category_id)
    }
    fn competitions_for_pilot(&self, pilot_id: i64) -> Vec<Competition> {
        (**self).competitions_for_pilot(pilot_id)
    }
}
