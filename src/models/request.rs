//! Maintenance request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{RequestPriority, RequestStage, RequestType};

/// Maintenance request record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRequest {
    pub id: i32,
    pub subject: String,
    pub request_type: RequestType,
    pub stage: RequestStage,
    pub priority: RequestPriority,
    pub equipment_id: i32,
    pub team_id: Option<i32>,
    pub technician_id: Option<i32>,
    /// Required for preventive requests
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Duration in hours
    pub duration: f64,
    pub created_at: DateTime<Utc>,
    /// Set when the request reaches repaired or scrap
    pub closed_at: Option<DateTime<Utc>>,
}

/// Create maintenance request payload.
///
/// `team_id` and `technician_id` default to the equipment's assignment
/// when omitted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    pub equipment_id: i32,
    pub request_type: RequestType,
    pub priority: Option<RequestPriority>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub team_id: Option<i32>,
    pub technician_id: Option<i32>,
    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration: Option<f64>,
}

/// Fully resolved request ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub subject: String,
    pub request_type: RequestType,
    pub priority: RequestPriority,
    pub equipment_id: i32,
    pub team_id: Option<i32>,
    pub technician_id: Option<i32>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration: f64,
}

/// Stage transition payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct UpdateStage {
    pub stage: RequestStage,
}

/// Request list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct RequestQuery {
    pub stage: Option<RequestStage>,
    pub equipment_id: Option<i32>,
    pub team_id: Option<i32>,
}

impl RequestQuery {
    pub fn for_equipment(equipment_id: i32) -> Self {
        Self {
            equipment_id: Some(equipment_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, request: &MaintenanceRequest) -> bool {
        self.stage.map_or(true, |s| request.stage == s)
            && self.equipment_id.map_or(true, |e| request.equipment_id == e)
            && self.team_id.map_or(true, |t| request.team_id == Some(t))
    }
}

/// New value of `closed_at` after moving to `stage`
pub fn closed_at_after(
    stage: RequestStage,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if stage.is_closing() {
        current.or(Some(now))
    } else {
        None
    }
}
