//! Maintenance requests repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::RequestsRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        request::{MaintenanceRequest, NewRequest, RequestQuery},
        EquipmentStatus, RequestStage,
    },
};

#[derive(Clone)]
pub struct PgRequestsRepository {
    pool: Pool<Postgres>,
}

impl PgRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestsRepository for PgRequestsRepository {
    async fn list(&self, query: &RequestQuery) -> AppResult<Vec<MaintenanceRequest>> {
        let rows = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT * FROM maintenance_requests
            WHERE ($1::text IS NULL OR stage = $1)
              AND ($2::int IS NULL OR equipment_id = $2)
              AND ($3::int IS NULL OR team_id = $3)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(query.stage)
        .bind(query.equipment_id)
        .bind(query.team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRequest> {
        sqlx::query_as::<_, MaintenanceRequest>("SELECT * FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    async fn create(&self, data: &NewRequest) -> AppResult<MaintenanceRequest> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes against a concurrent scrap of the same equipment
        let status = sqlx::query_scalar::<_, EquipmentStatus>(
            "SELECT status FROM equipment WHERE id = $1 FOR UPDATE",
        )
        .bind(data.equipment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", data.equipment_id)))?;
        if status == EquipmentStatus::Scrapped {
            return Err(AppError::InvalidState(format!(
                "Equipment {} is scrapped",
                data.equipment_id
            )));
        }

        let row = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            INSERT INTO maintenance_requests (
                subject, request_type, stage, priority, equipment_id,
                team_id, technician_id, scheduled_date, duration, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&data.subject)
        .bind(data.request_type)
        .bind(RequestStage::New)
        .bind(data.priority)
        .bind(data.equipment_id)
        .bind(data.team_id)
        .bind(data.technician_id)
        .bind(data.scheduled_date)
        .bind(data.duration)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn update_stage(
        &self,
        id: i32,
        stage: RequestStage,
        scrap_equipment: bool,
    ) -> AppResult<MaintenanceRequest> {
        let mut tx = self.pool.begin().await?;

        // Dropping the transaction on any early return rolls it back
        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            UPDATE maintenance_requests
            SET stage = $2,
                closed_at = CASE WHEN $3 THEN COALESCE(closed_at, $4) ELSE NULL END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stage)
        .bind(stage.is_closing())
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        if scrap_equipment {
            sqlx::query("UPDATE equipment SET status = $2 WHERE id = $1")
                .bind(request.equipment_id)
                .bind(EquipmentStatus::Scrapped)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(request)
    }

    async fn count_for_equipment(&self, equipment_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM maintenance_requests
            WHERE equipment_id = $1
            "#,
        )
        .bind(equipment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
