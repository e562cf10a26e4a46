//! Repository layer for persistence
//!
//! Each entity has its own repository trait. Two backends implement them:
//! PostgreSQL via sqlx (`Pg*Repository`) and [`memory::MemoryStore`].

pub mod equipment;
pub mod memory;
pub mod requests;
pub mod teams;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
        request::{MaintenanceRequest, NewRequest, RequestQuery},
        team::{MaintenanceTeam, UpdateTeam},
        user::{CreateUser, User},
        RequestStage,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Fails with `NotFound` when the user does not exist
    async fn get_by_id(&self, id: i32) -> AppResult<User>;

    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamsRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<MaintenanceTeam>>;

    /// Fails with `NotFound` when the team does not exist
    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceTeam>;

    /// Insert a team; `member_ids` must already be normalized
    async fn create(&self, name: &str, member_ids: &[i32]) -> AppResult<MaintenanceTeam>;

    async fn update(&self, id: i32, data: &UpdateTeam) -> AppResult<MaintenanceTeam>;

    /// Delete a team, clearing equipment and request references to it
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>>;

    /// Fails with `NotFound` when the equipment does not exist
    async fn get_by_id(&self, id: i32) -> AppResult<Equipment>;

    async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment>;

    async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment>;

    /// Delete equipment together with all of its requests
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestsRepository: Send + Sync {
    async fn list(&self, query: &RequestQuery) -> AppResult<Vec<MaintenanceRequest>>;

    /// Fails with `NotFound` when the request does not exist
    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRequest>;

    /// Insert a request with stage `new`
    async fn create(&self, data: &NewRequest) -> AppResult<MaintenanceRequest>;

    /// Set the stage of a request.
    ///
    /// With `scrap_equipment` the owning equipment is marked scrapped in the
    /// same unit of work: either both writes are visible or neither is.
    async fn update_stage(
        &self,
        id: i32,
        stage: RequestStage,
        scrap_equipment: bool,
    ) -> AppResult<MaintenanceRequest>;

    /// Number of requests raised against an equipment, in any stage
    async fn count_for_equipment(&self, equipment_id: i32) -> AppResult<i64>;
}

/// Container for all entity repositories
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersRepository>,
    pub teams: Arc<dyn TeamsRepository>,
    pub equipment: Arc<dyn EquipmentRepository>,
    pub requests: Arc<dyn RequestsRepository>,
}

impl Repository {
    /// Create PostgreSQL-backed repositories sharing one pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            teams: Arc::new(teams::PgTeamsRepository::new(pool.clone())),
            equipment: Arc::new(equipment::PgEquipmentRepository::new(pool.clone())),
            requests: Arc::new(requests::PgRequestsRepository::new(pool)),
        }
    }

    /// Create repositories backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            users: store.clone(),
            teams: store.clone(),
            equipment: store.clone(),
            requests: store,
        }
    }
}
