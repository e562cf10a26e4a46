//! Maintenance team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Maintenance team with its member technicians
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceTeam {
    pub id: i32,
    /// Unique team name
    pub name: String,
    /// Member user IDs, sorted and unique
    pub member_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceTeam {
    pub fn has_member(&self, user_id: i32) -> bool {
        self.member_ids.binary_search(&user_id).is_ok()
    }
}

/// Create team request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeam {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<i32>,
}

/// Update team request; `member_ids` replaces the whole member set
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeam {
    #[validate(length(min = 1, message = "Team name cannot be empty"))]
    pub name: Option<String>,
    pub member_ids: Option<Vec<i32>>,
}

impl CreateTeam {
    /// Copy with surrounding whitespace stripped from the name
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            member_ids: self.member_ids.clone(),
        }
    }
}

impl UpdateTeam {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|name| name.trim().to_string()),
            member_ids: self.member_ids.clone(),
        }
    }
}

/// Sort and deduplicate a member list
pub fn normalize_members(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
