//! Maintenance request lifecycle service
//!
//! Creation resolves the team and technician (explicit values win, otherwise
//! the equipment's assignment is inherited) and enforces the request rules:
//!
//! 1. the equipment must exist and must not be scrapped,
//! 2. preventive requests need a scheduled date,
//! 3. when both a team and a technician are set, the technician must be a
//!    member of the team.
//!
//! Moving a request to the `scrap` stage scraps its equipment in the same
//! unit of work.

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        request::{CreateRequest, MaintenanceRequest, NewRequest, RequestQuery},
        RequestStage, RequestType,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List requests matching the filters
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<MaintenanceRequest>> {
        self.repository.requests.list(query).await
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRequest> {
        self.repository.requests.get_by_id(id).await
    }

    /// List the requests raised against one equipment
    pub async fn list_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceRequest>> {
        self.repository.equipment.get_by_id(equipment_id).await?;
        self.repository
            .requests
            .list(&RequestQuery::for_equipment(equipment_id))
            .await
    }

    /// Create a request with auto-filled team and technician
    pub async fn create(&self, data: &CreateRequest) -> AppResult<MaintenanceRequest> {
        data.validate()?;

        let equipment = self.repository.equipment.get_by_id(data.equipment_id).await?;
        if equipment.is_scrapped() {
            tracing::warn!("Rejected request on scrapped equipment {}", equipment.id);
            return Err(AppError::InvalidState(format!(
                "Cannot create request for scrapped equipment '{}'",
                equipment.name
            )));
        }

        if data.request_type == RequestType::Preventive && data.scheduled_date.is_none() {
            return Err(AppError::Validation(
                "Preventive requests must have a scheduled date".to_string(),
            ));
        }

        if let Some(technician_id) = data.technician_id {
            self.repository.users.get_by_id(technician_id).await?;
        }
        let team_id = data.team_id.or(equipment.assigned_team_id);
        let technician_id = data.technician_id.or(equipment.assigned_technician_id);

        if let Some(team_id) = team_id {
            let team = self.repository.teams.get_by_id(team_id).await?;
            if let Some(technician_id) = technician_id {
                if !team.has_member(technician_id) {
                    tracing::warn!(
                        "Technician {} is not a member of team {}",
                        technician_id,
                        team.id
                    );
                    return Err(AppError::Validation(format!(
                        "Technician {} is not a member of team '{}'",
                        technician_id, team.name
                    )));
                }
            }
        }

        let request = self
            .repository
            .requests
            .create(&NewRequest {
                subject: data.subject.clone(),
                request_type: data.request_type,
                priority: data.priority.unwrap_or_default(),
                equipment_id: equipment.id,
                team_id,
                technician_id,
                scheduled_date: data.scheduled_date,
                duration: data.duration.unwrap_or(0.0),
            })
            .await?;

        tracing::info!(
            "Created {} request {} on equipment {}",
            request.request_type,
            request.id,
            request.equipment_id
        );
        Ok(request)
    }

    /// Move a request to any stage; `scrap` also scraps the equipment
    pub async fn transition_stage(&self, id: i32, stage: RequestStage) -> AppResult<MaintenanceRequest> {
        let scrap_equipment = stage == RequestStage::Scrap;
        let request = self
            .repository
            .requests
            .update_stage(id, stage, scrap_equipment)
            .await?;

        tracing::info!("Request {} moved to stage {}", request.id, request.stage);
        if scrap_equipment {
            tracing::info!(
                "Equipment {} scrapped via maintenance request {}",
                request.equipment_id,
                request.id
            );
        }
        Ok(request)
    }
}
