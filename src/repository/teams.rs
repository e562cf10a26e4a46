//! Maintenance teams repository for database operations

use async_trait::async_trait;
use sqlx::{PgExecutor, Pool, Postgres};

use super::TeamsRepository;
use crate::{
    error::{AppError, AppResult},
    models::team::{normalize_members, MaintenanceTeam, UpdateTeam},
};

const TEAM_SELECT: &str = r#"
    SELECT t.id, t.name, t.created_at,
           COALESCE(
               ARRAY_AGG(m.user_id ORDER BY m.user_id) FILTER (WHERE m.user_id IS NOT NULL),
               '{}'::int[]
           ) AS member_ids
    FROM teams t
    LEFT JOIN team_members m ON m.team_id = t.id
"#;

#[derive(Clone)]
pub struct PgTeamsRepository {
    pool: Pool<Postgres>,
}

impl PgTeamsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

async fn fetch_team<'e, E: PgExecutor<'e>>(executor: E, id: i32) -> AppResult<MaintenanceTeam> {
    let query = format!("{} WHERE t.id = $1 GROUP BY t.id", TEAM_SELECT);
    sqlx::query_as::<_, MaintenanceTeam>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
}

async fn insert_members<'e, E: PgExecutor<'e>>(
    executor: E,
    team_id: i32,
    member_ids: &[i32],
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO team_members (team_id, user_id) SELECT $1, UNNEST($2::int[])",
    )
    .bind(team_id)
    .bind(member_ids)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl TeamsRepository for PgTeamsRepository {
    async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        let query = format!("{} GROUP BY t.id ORDER BY t.name", TEAM_SELECT);
        let rows = sqlx::query_as::<_, MaintenanceTeam>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceTeam> {
        fetch_team(&self.pool, id).await
    }

    async fn create(&self, name: &str, member_ids: &[i32]) -> AppResult<MaintenanceTeam> {
        let mut tx = self.pool.begin().await?;

        let team_id: i32 = sqlx::query_scalar("INSERT INTO teams (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

        if !member_ids.is_empty() {
            insert_members(&mut *tx, team_id, member_ids).await?;
        }

        let team = fetch_team(&mut *tx, team_id).await?;
        tx.commit().await?;
        Ok(team)
    }

    async fn update(&self, id: i32, data: &UpdateTeam) -> AppResult<MaintenanceTeam> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;

        if let Some(ref name) = data.name {
            sqlx::query("UPDATE teams SET name = $2 WHERE id = $1")
                .bind(id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(ref member_ids) = data.member_ids {
            let members = normalize_members(member_ids.clone());
            sqlx::query("DELETE FROM team_members WHERE team_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if !members.is_empty() {
                insert_members(&mut *tx, id, &members).await?;
            }
        }

        let team = fetch_team(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(team)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // Foreign keys clear equipment/request references and drop memberships
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }
        Ok(())
    }
}
