//! In-memory record store using DashMap, written through to SQLite.

use chrono::Utc;
use dashmap::DashMap;
use drones_core::models::{
    Competition, CompetitionDraft, Drone, DroneCategory, DroneCategoryDraft, DroneDraft, Pilot,
    PilotDraft,
};
use drones_core::{PresentError, RecordLookup, ValidationErrors};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::persistence::{self, Database};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Present(#[from] PresentError),
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Application state - thread-safe store for all four record kinds.
pub struct AppState {
    config: Config,
    db: Option<Database>,
    categories: DashMap<i64, DroneCategory>,
    drones: DashMap<i64, Drone>,
    pilots: DashMap<i64, Pilot>,
    competitions: DashMap<i64, Competition>,
    next_category_id: AtomicI64,
    next_drone_id: AtomicI64,
    next_pilot_id: AtomicI64,
    next_competition_id: AtomicI64,
    writes: Mutex<()>,
}

impl AppState {
    /// Memory-only state, nothing is persisted.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            db: None,
            categories: DashMap::new(),
            drones: DashMap::new(),
            pilots: DashMap::new(),
            competitions: DashMap::new(),
            next_category_id: AtomicI64::new(1),
            next_drone_id: AtomicI64::new(1),
            next_pilot_id: AtomicI64::new(1),
            next_competition_id: AtomicI64::new(1),
            writes: Mutex::new(()),
        }
    }

    pub fn with_database(db: Database, config: Config) -> Self {
        let mut state = Self::new(config);
        state.db = Some(db);
        state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fill the cache from the database and move id counters past loaded rows.
    pub async fn load_from_database(&self) -> anyhow::Result<()> {
        let Some(db) = &self.db else {
            return Ok(());
        };
        let pool = db.pool();

        let categories = persistence::categories::load_all_categories(pool).await?;
        let drones = persistence::drones::load_all_drones(pool).await?;
        let pilots = persistence::pilots::load_all_pilots(pool).await?;
        let competitions = persistence::competitions::load_all_competitions(pool).await?;

        tracing::info!(
            categories = categories.len(),
            drones = drones.len(),
            pilots = pilots.len(),
            competitions = competitions.len(),
            "Loaded records from database"
        );

        bump_past(&self.next_category_id, categories.iter().map(|c| c.id));
        bump_past(&self.next_drone_id, drones.iter().map(|d| d.id));
        bump_past(&self.next_pilot_id, pilots.iter().map(|p| p.id));
        bump_past(&self.next_competition_id, competitions.iter().map(|c| c.id));

        for category in categories {
            self.categories.insert(category.id, category);
        }
        for drone in drones {
            self.drones.insert(drone.id, drone);
        }
        for pilot in pilots {
            self.pilots.insert(pilot.id, pilot);
        }
        for competition in competitions {
            self.competitions.insert(competition.id, competition);
        }
        Ok(())
    }

    /// Serialize writers so that reference checks and writes happen together.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    // === Ordered listings ===

    pub fn list_categories(&self) -> Vec<DroneCategory> {
        let mut categories: Vec<DroneCategory> =
            self.categories.iter().map(|r| r.value().clone()).collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn list_drones(&self) -> Vec<Drone> {
        let mut drones: Vec<Drone> = self.drones.iter().map(|r| r.value().clone()).collect();
        drones.sort_by(|a, b| a.name.cmp(&b.name));
        drones
    }

    pub fn list_pilots(&self) -> Vec<Pilot> {
        let mut pilots: Vec<Pilot> = self.pilots.iter().map(|r| r.value().clone()).collect();
        pilots.sort_by(|a, b| a.name.cmp(&b.name));
        pilots
    }

    /// Competitions, longest distance first.
    pub fn list_competitions(&self) -> Vec<Competition> {
        let mut competitions: Vec<Competition> =
            self.competitions.iter().map(|r| r.value().clone()).collect();
        sort_competitions(&mut competitions);
        competitions
    }

    pub fn competition(&self, id: i64) -> Option<Competition> {
        self.competitions.get(&id).map(|r| r.value().clone())
    }

    // === Categories ===

    pub async fn create_category(
        &self,
        draft: DroneCategoryDraft,
    ) -> Result<DroneCategory, StoreError> {
        let category = draft.into_record(self.next_category_id.fetch_add(1, Ordering::SeqCst));
        if let Some(db) = &self.db {
            persistence::categories::insert_category(db.pool(), &category)
                .await
                .map_err(|err| unique_name_error(err, "drone category"))?;
        }
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i64,
        draft: DroneCategoryDraft,
    ) -> Result<DroneCategory, StoreError> {
        if !self.categories.contains_key(&id) {
            return Err(PresentError::not_found("drone category", id).into());
        }
        let category = draft.into_record(id);
        if let Some(db) = &self.db {
            persistence::categories::update_category(db.pool(), &category)
                .await
                .map_err(|err| unique_name_error(err, "drone category"))?;
        }
        self.categories.insert(id, category.clone());
        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<bool, StoreError> {
        if !self.categories.contains_key(&id) {
            return Ok(false);
        }
        if let Some(db) = &self.db {
            persistence::categories::delete_category(db.pool(), id).await?;
        }
        let drone_ids: Vec<i64> = self
            .drones
            .iter()
            .filter(|r| r.value().drone_category_id == id)
            .map(|r| *r.key())
            .collect();
        self.competitions
            .retain(|_, competition| !drone_ids.contains(&competition.drone_id));
        for drone_id in &drone_ids {
            self.drones.remove(drone_id);
        }
        self.categories.remove(&id);
        tracing::debug!(category = id, drones = drone_ids.len(), "Cascaded category delete");
        Ok(true)
    }

    // === Drones ===

    pub async fn create_drone(&self, draft: DroneDraft) -> Result<Drone, StoreError> {
        let drone = draft.into_record(self.next_drone_id.fetch_add(1, Ordering::SeqCst), Utc::now());
        if let Some(db) = &self.db {
            persistence::drones::insert_drone(db.pool(), &drone)
                .await
                .map_err(|err| unique_name_error(err, "drone"))?;
        }
        self.drones.insert(drone.id, drone.clone());
        Ok(drone)
    }

    pub async fn update_drone(&self, id: i64, draft: DroneDraft) -> Result<Drone, StoreError> {
        let inserted_timestamp = match self.drones.get(&id) {
            Some(existing) => existing.inserted_timestamp,
            None => return Err(PresentError::not_found("drone", id).into()),
        };
        let drone = draft.into_record(id, inserted_timestamp);
        if let Some(db) = &self.db {
            persistence::drones::update_drone(db.pool(), &drone)
                .await
                .map_err(|err| unique_name_error(err, "drone"))?;
        }
        self.drones.insert(id, drone.clone());
        Ok(drone)
    }

    pub async fn delete_drone(&self, id: i64) -> Result<bool, StoreError> {
        if !self.drones.contains_key(&id) {
            return Ok(false);
        }
        if let Some(db) = &self.db {
            persistence::drones::delete_drone(db.pool(), id).await?;
        }
        self.competitions.retain(|_, competition| competition.drone_id != id);
        self.drones.remove(&id);
        Ok(true)
    }

    // === Pilots ===

    pub async fn create_pilot(&self, draft: PilotDraft) -> Result<Pilot, StoreError> {
        let pilot = draft.into_record(self.next_pilot_id.fetch_add(1, Ordering::SeqCst), Utc::now());
        if let Some(db) = &self.db {
            persistence::pilots::insert_pilot(db.pool(), &pilot)
                .await
                .map_err(|err| unique_name_error(err, "pilot"))?;
        }
        self.pilots.insert(pilot.id, pilot.clone());
        Ok(pilot)
    }

    pub async fn update_pilot(&self, id: i64, draft: PilotDraft) -> Result<Pilot, StoreError> {
        let inserted_timestamp = match self.pilots.get(&id) {
            Some(existing) => existing.inserted_timestamp,
            None => return Err(PresentError::not_found("pilot", id).into()),
        };
        let pilot = draft.into_record(id, inserted_timestamp);
        if let Some(db) = &self.db {
            persistence::pilots::update_pilot(db.pool(), &pilot)
                .await
                .map_err(|err| unique_name_error(err, "pilot"))?;
        }
        self.pilots.insert(id, pilot.clone());
        Ok(pilot)
    }

    pub async fn delete_pilot(&self, id: i64) -> Result<bool, StoreError> {
        if !self.pilots.contains_key(&id) {
            return Ok(false);
        }
        if let Some(db) = &self.db {
            persistence::pilots::delete_pilot(db.pool(), id).await?;
        }
        self.competitions.retain(|_, competition| competition.pilot_id != id);
        self.pilots.remove(&id);
        Ok(true)
    }

    // === Competitions ===

    pub async fn create_competition(
        &self,
        draft: CompetitionDraft,
    ) -> Result<Competition, StoreError> {
        let competition =
            draft.into_record(self.next_competition_id.fetch_add(1, Ordering::SeqCst));
        if let Some(db) = &self.db {
            persistence::competitions::insert_competition(db.pool(), &competition).await?;
        }
        self.competitions.insert(competition.id, competition.clone());
        Ok(competition)
    }

    pub async fn update_competition(
        &self,
        id: i64,
        draft: CompetitionDraft,
    ) -> Result<Competition, StoreError> {
        if !self.competitions.contains_key(&id) {
            return Err(PresentError::not_found("competition", id).into());
        }
        let competition = draft.into_record(id);
        if let Some(db) = &self.db {
            persistence::competitions::update_competition(db.pool(), &competition).await?;
        }
        self.competitions.insert(id, competition.clone());
        Ok(competition)
    }

    pub async fn delete_competition(&self, id: i64) -> Result<bool, StoreError> {
        if !self.competitions.contains_key(&id) {
            return Ok(false);
        }
        if let Some(db) = &self.db {
            persistence::competitions::delete_competition(db.pool(), id).await?;
        }
        self.competitions.remove(&id);
        Ok(true)
    }
}

impl RecordLookup for AppState {
    fn category(&self, id: i64) -> Option<DroneCategory> {
        self.categories.get(&id).map(|r| r.value().clone())
    }

    fn category_by_name(&self, name: &str) -> Option<DroneCategory> {
        self.categories
            .iter()
            .find(|r| r.value().name == name)
            .map(|r| r.value().clone())
    }

    fn drone(&self, id: i64) -> Option<Drone> {
        self.drones.get(&id).map(|r| r.value().clone())
    }

    fn drone_by_name(&self, name: &str) -> Option<Drone> {
        self.drones
            .iter()
            .find(|r| r.value().name == name)
            .map(|r| r.value().clone())
    }

    fn pilot(&self, id: i64) -> Option<Pilot> {
        self.pilots.get(&id).map(|r| r.value().clone())
    }

    fn pilot_by_name(&self, name: &str) -> Option<Pilot> {
        self.pilots
            .iter()
            .find(|r| r.value().name == name)
            .map(|r| r.value().clone())
    }

    fn drones_in_category(&self, category_id: i64) -> Vec<Drone> {
        let mut drones: Vec<Drone> = self
            .drones
            .iter()
            .filter(|r| r.value().drone_category_id == category_id)
            .map(|r| r.value().clone())
            .collect();
        drones.sort_by(|a, b| a.name.cmp(&b.name));
        drones
    }

    fn competitions_for_pilot(&self, pilot_id: i64) -> Vec<Competition> {
        let mut competitions: Vec<Competition> = self
            .competitions
            .iter()
            .filter(|r| r.value().pilot_id == pilot_id)
            .map(|r| r.value().clone())
            .collect();
        sort_competitions(&mut competitions);
        competitions
    }
}

fn sort_competitions(competitions: &mut [Competition]) {
    competitions.sort_by(|a, b| {
        b.distance_in_feet
            .cmp(&a.distance_in_feet)
            .then(a.id.cmp(&b.id))
    });
}

fn bump_past(counter: &AtomicI64, ids: impl Iterator<Item = i64>) {
    if let Some(max) = ids.max() {
        counter.fetch_max(max + 1, Ordering::SeqCst);
    }
}

/// A UNIQUE violation on insert/update means another writer took the name.
fn unique_name_error(err: anyhow::Error, kind: &str) -> StoreError {
    if persistence::is_unique_violation(&err) {
        StoreError::Present(
            ValidationErrors::single("name", format!("{} with this name already exists.", kind))
                .into(),
        )
    } else {
        StoreError::Storage(err)
    }
}
