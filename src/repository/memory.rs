//! In-memory repository backend
//!
//! Every table lives behind a single lock, so multi-entity writes such as the
//! scrap side effect are applied atomically with respect to other readers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{EquipmentRepository, RequestsRepository, TeamsRepository, UsersRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
        request::{closed_at_after, MaintenanceRequest, NewRequest, RequestQuery},
        team::{normalize_members, MaintenanceTeam, UpdateTeam},
        user::{CreateUser, User},
        EquipmentStatus, RequestStage,
    },
};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: i32, entity: &str) -> AppResult<&T> {
        self.rows
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", entity, id)))
    }

    fn get_mut(&mut self, id: i32, entity: &str) -> AppResult<&mut T> {
        self.rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", entity, id)))
    }
}

#[derive(Default)]
struct MemoryState {
    users: Table<User>,
    teams: Table<MaintenanceTeam>,
    equipment: Table<Equipment>,
    requests: Table<MaintenanceRequest>,
}

impl MemoryState {
    fn check_user(&self, id: Option<i32>) -> AppResult<()> {
        match id {
            Some(id) => self.users.get(id, "User").map(|_| ()),
            None => Ok(()),
        }
    }

    fn check_team(&self, id: Option<i32>) -> AppResult<()> {
        match id {
            Some(id) => self.teams.get(id, "Team").map(|_| ()),
            None => Ok(()),
        }
    }

    fn check_members(&self, member_ids: &[i32]) -> AppResult<()> {
        member_ids
            .iter()
            .try_for_each(|id| self.users.get(*id, "User").map(|_| ()))
    }

    fn check_team_name(&self, name: &str, except: Option<i32>) -> AppResult<()> {
        let taken = self
            .teams
            .rows
            .values()
            .any(|t| t.name == name && Some(t.id) != except);
        if taken {
            return Err(AppError::Conflict(format!("Team name '{}' already exists", name)));
        }
        Ok(())
    }

    fn check_serial(&self, serial: &str, except: Option<i32>) -> AppResult<()> {
        let taken = self
            .equipment
            .rows
            .values()
            .any(|e| e.serial_number == serial && Some(e.id) != except);
        if taken {
            return Err(AppError::Conflict(format!(
                "Serial number '{}' already exists",
                serial
            )));
        }
        Ok(())
    }
}

/// Repository backend holding all entities in process memory
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.rows.values().cloned().collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.state.read().await.users.get(id, "User").cloned()
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.rows.values().any(|u| u.email == data.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' already exists",
                data.email
            )));
        }
        Ok(state.users.insert_with(|id| User {
            id,
            email: data.email.clone(),
            full_name: data.full_name.clone(),
            role: data.role,
            created_at: Utc::now(),
        }))
    }
}

#[async_trait]
impl TeamsRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        let state = self.state.read().await;
        let mut teams: Vec<MaintenanceTeam> = state.teams.rows.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceTeam> {
        self.state.read().await.teams.get(id, "Team").cloned()
    }

    async fn create(&self, name: &str, member_ids: &[i32]) -> AppResult<MaintenanceTeam> {
        let mut state = self.state.write().await;
        state.check_team_name(name, None)?;
        state.check_members(member_ids)?;
        Ok(state.teams.insert_with(|id| MaintenanceTeam {
            id,
            name: name.to_string(),
            member_ids: normalize_members(member_ids.to_vec()),
            created_at: Utc::now(),
        }))
    }

    async fn update(&self, id: i32, data: &UpdateTeam) -> AppResult<MaintenanceTeam> {
        let mut state = self.state.write().await;
        state.teams.get(id, "Team")?;
        if let Some(ref name) = data.name {
            state.check_team_name(name, Some(id))?;
        }
        if let Some(ref member_ids) = data.member_ids {
            state.check_members(member_ids)?;
        }

        let team = state.teams.get_mut(id, "Team")?;
        if let Some(ref name) = data.name {
            team.name = name.clone();
        }
        if let Some(ref member_ids) = data.member_ids {
            team.member_ids = normalize_members(member_ids.clone());
        }
        Ok(team.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.teams.rows.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }
        for equipment in state.equipment.rows.values_mut() {
            if equipment.assigned_team_id == Some(id) {
                equipment.assigned_team_id = None;
            }
        }
        for request in state.requests.rows.values_mut() {
            if request.team_id == Some(id) {
                request.team_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EquipmentRepository for MemoryStore {
    async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let state = self.state.read().await;
        let mut equipment: Vec<Equipment> = state
            .equipment
            .rows
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        equipment.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(equipment)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.state.read().await.equipment.get(id, "Equipment").cloned()
    }

    async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let mut state = self.state.write().await;
        state.check_serial(&data.serial_number, None)?;
        state.check_team(data.assigned_team_id)?;
        state.check_user(data.assigned_technician_id)?;
        Ok(state.equipment.insert_with(|id| Equipment {
            id,
            name: data.name.clone(),
            serial_number: data.serial_number.clone(),
            category: data.category.clone(),
            department: data.department.clone(),
            location: data.location.clone(),
            status: EquipmentStatus::Active,
            assigned_team_id: data.assigned_team_id,
            assigned_technician_id: data.assigned_technician_id,
            purchase_date: data.purchase_date,
            warranty_end_date: data.warranty_end_date,
            created_at: Utc::now(),
        }))
    }

    async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        let mut state = self.state.write().await;
        state.equipment.get(id, "Equipment")?;
        if let Some(ref serial) = data.serial_number {
            state.check_serial(serial, Some(id))?;
        }
        state.check_team(data.assigned_team_id.flatten())?;
        state.check_user(data.assigned_technician_id.flatten())?;

        let equipment = state.equipment.get_mut(id, "Equipment")?;
        data.apply_to(equipment);
        Ok(equipment.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.equipment.rows.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        state.requests.rows.retain(|_, r| r.equipment_id != id);
        Ok(())
    }
}

#[async_trait]
impl RequestsRepository for MemoryStore {
    async fn list(&self, query: &RequestQuery) -> AppResult<Vec<MaintenanceRequest>> {
        let state = self.state.read().await;
        // Newest first, matching the SQL ordering
        Ok(state
            .requests
            .rows
            .values()
            .rev()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRequest> {
        self.state.read().await.requests.get(id, "Request").cloned()
    }

    async fn create(&self, data: &NewRequest) -> AppResult<MaintenanceRequest> {
        let mut state = self.state.write().await;
        if state.equipment.get(data.equipment_id, "Equipment")?.is_scrapped() {
            return Err(AppError::InvalidState(format!(
                "Equipment {} is scrapped",
                data.equipment_id
            )));
        }
        state.check_team(data.team_id)?;
        state.check_user(data.technician_id)?;
        Ok(state.requests.insert_with(|id| MaintenanceRequest {
            id,
            subject: data.subject.clone(),
            request_type: data.request_type,
            stage: RequestStage::New,
            priority: data.priority,
            equipment_id: data.equipment_id,
            team_id: data.team_id,
            technician_id: data.technician_id,
            scheduled_date: data.scheduled_date,
            duration: data.duration,
            created_at: Utc::now(),
            closed_at: None,
        }))
    }

    async fn update_stage(
        &self,
        id: i32,
        stage: RequestStage,
        scrap_equipment: bool,
    ) -> AppResult<MaintenanceRequest> {
        let mut state = self.state.write().await;
        let equipment_id = state.requests.get(id, "Request")?.equipment_id;

        // Resolve both rows before writing either
        if scrap_equipment {
            state.equipment.get(equipment_id, "Equipment")?;
        }

        let request = state.requests.get_mut(id, "Request")?;
        request.stage = stage;
        request.closed_at = closed_at_after(stage, request.closed_at, Utc::now());
        let updated = request.clone();

        if scrap_equipment {
            state.equipment.get_mut(equipment_id, "Equipment")?.status = EquipmentStatus::Scrapped;
        }
        Ok(updated)
    }

    async fn count_for_equipment(&self, equipment_id: i32) -> AppResult<i64> {
        let state = self.state.read().await;
        let count = state
            .requests
            .rows
            .values()
            .filter(|r| r.equipment_id == equipment_id)
            .count();
        Ok(count as i64)
    }
}
