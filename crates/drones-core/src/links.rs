//! Hyperlink generation seam.
//!
//! Presenters never know where routes are mounted. They ask a
//! [`LinkResolver`] for the address of a named detail view.

use std::fmt;

/// Detail views a representation can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    DroneCategoryDetail,
    DroneDetail,
    PilotDetail,
    CompetitionDetail,
}

impl ViewName {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::DroneCategoryDetail => "dronecategory-detail",
            ViewName::DroneDetail => "drone-detail",
            ViewName::PilotDetail => "pilot-detail",
            ViewName::CompetitionDetail => "competition-detail",
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a view name and record id to an address.
pub trait LinkResolver {
    fn detail_url(&self, view: ViewName, id: i64) -> String;
}

impl<T: LinkResolver + ?Sized> LinkResolver for &T {
    fn detail_url(&self, view: ViewName, id: i64) -> String {
        (**self).detail_url(view, id)
    }
}
