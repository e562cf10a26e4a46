//! Maintenance teams service

use validator::Validate;

use crate::{
    error::AppResult,
    models::team::{normalize_members, CreateTeam, MaintenanceTeam, UpdateTeam},
    repository::Repository,
};

#[derive(Clone)]
pub struct TeamsService {
    repository: Repository,
}

impl TeamsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        self.repository.teams.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceTeam> {
        self.repository.teams.get_by_id(id).await
    }

    /// Create a team; every member must be an existing user
    pub async fn create(&self, data: &CreateTeam) -> AppResult<MaintenanceTeam> {
        let data = data.trimmed();
        data.validate()?;
        let members = normalize_members(data.member_ids.clone());
        self.check_members(&members).await?;

        let team = self.repository.teams.create(&data.name, &members).await?;
        tracing::info!("Created team '{}' with {} members", team.name, team.member_ids.len());
        Ok(team)
    }

    /// Rename a team and/or replace its member set
    pub async fn update(&self, id: i32, data: &UpdateTeam) -> AppResult<MaintenanceTeam> {
        let data = data.trimmed();
        data.validate()?;
        if let Some(ref member_ids) = data.member_ids {
            self.check_members(member_ids).await?;
        }
        self.repository.teams.update(id, &data).await
    }

    /// Delete a team; equipment and requests keep existing without a team
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.teams.delete(id).await?;
        tracing::info!("Deleted team {}", id);
        Ok(())
    }

    async fn check_members(&self, member_ids: &[i32]) -> AppResult<()> {
        for id in member_ids {
            self.repository.users.get_by_id(*id).await?;
        }
        Ok(())
    }
}
