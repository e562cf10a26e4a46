//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::EquipmentStatus;

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    /// Unique serial number
    pub serial_number: String,
    pub category: String,
    pub department: Option<String>,
    pub location: String,
    pub status: EquipmentStatus,
    /// Default team for new requests
    pub assigned_team_id: Option<i32>,
    /// Default technician for new requests
    pub assigned_technician_id: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    pub fn is_scrapped(&self) -> bool {
        self.status == EquipmentStatus::Scrapped
    }
}

/// Equipment with its request count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: Equipment,
    /// All requests raised against this equipment, closed ones included
    pub maintenance_count: i64,
}

/// Equipment list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub status: Option<EquipmentStatus>,
    pub team_id: Option<i32>,
}

impl EquipmentQuery {
    pub fn matches(&self, equipment: &Equipment) -> bool {
        self.status.map_or(true, |s| equipment.status == s)
            && self
                .team_id
                .map_or(true, |t| equipment.assigned_team_id == Some(t))
    }
}

/// Create equipment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    pub category: String,
    pub department: Option<String>,
    pub location: String,
    pub assigned_team_id: Option<i32>,
    pub assigned_technician_id: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
}

/// Update equipment request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Serial number cannot be empty"))]
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub status: Option<EquipmentStatus>,
    /// Omitted keeps the team, `null` clears it
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub assigned_team_id: Option<Option<i32>>,
    /// Omitted keeps the technician, `null` clears it
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub assigned_technician_id: Option<Option<i32>>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
}

impl UpdateEquipment {
    /// Apply the present fields onto an existing record
    pub fn apply_to(&self, equipment: &mut Equipment) {
        if let Some(ref v) = self.name {
            equipment.name = v.clone();
        }
        if let Some(ref v) = self.serial_number {
            equipment.serial_number = v.clone();
        }
        if let Some(ref v) = self.category {
            equipment.category = v.clone();
        }
        if let Some(ref v) = self.department {
            equipment.department = Some(v.clone());
        }
        if let Some(ref v) = self.location {
            equipment.location = v.clone();
        }
        if let Some(v) = self.status {
            equipment.status = v;
        }
        if let Some(v) = self.assigned_team_id {
            equipment.assigned_team_id = v;
        }
        if let Some(v) = self.assigned_technician_id {
            equipment.assigned_technician_id = v;
        }
        if let Some(v) = self.purchase_date {
            equipment.purchase_date = Some(v);
        }
        if let Some(v) = self.warranty_end_date {
            equipment.warranty_end_date = Some(v);
        }
    }
}
