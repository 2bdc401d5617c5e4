//! Absolute URLs for the mounted routes.

use drones_core::{LinkResolver, ViewName};

use crate::config::Config;

pub const CATEGORIES: &str = "drone-categories";
pub const DRONES: &str = "drones";
pub const PILOTS: &str = "pilots";
pub const COMPETITIONS: &str = "competitions";

/// Builds links rooted at the configured public base URL.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.public_base_url.clone(),
        }
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base, collection)
    }
}

impl LinkResolver for UrlBuilder {
    fn detail_url(&self, view: ViewName, id: i64) -> String {
        let collection = match view {
            ViewName::DroneCategoryDetail => CATEGORIES,
            ViewName::DroneDetail => DRONES,
            ViewName::PilotDetail => PILOTS,
            ViewName::CompetitionDetail => COMPETITIONS,
        };
        format!("{}/{}/{}", self.base, collection, id)
    }
}
