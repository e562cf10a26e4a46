//! Equipment repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::EquipmentRepository;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
};

#[derive(Clone)]
pub struct PgEquipmentRepository {
    pool: Pool<Postgres>,
}

impl PgEquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentRepository for PgEquipmentRepository {
    async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::int IS NULL OR assigned_team_id = $2)
            ORDER BY name
            "#,
        )
        .bind(query.status)
        .bind(query.team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                name, serial_number, category, department, location,
                assigned_team_id, assigned_technician_id, purchase_date, warranty_end_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.serial_number)
        .bind(&data.category)
        .bind(&data.department)
        .bind(&data.location)
        .bind(data.assigned_team_id)
        .bind(data.assigned_technician_id)
        .bind(data.purchase_date)
        .bind(data.warranty_end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.serial_number, "serial_number");
        add_field!(data.category, "category");
        add_field!(data.department, "department");
        add_field!(data.location, "location");
        add_field!(data.status, "status");
        add_field!(data.assigned_team_id, "assigned_team_id");
        add_field!(data.assigned_technician_id, "assigned_technician_id");
        add_field!(data.purchase_date, "purchase_date");
        add_field!(data.warranty_end_date, "warranty_end_date");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE equipment SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.serial_number);
        bind_field!(data.category);
        bind_field!(data.department);
        bind_field!(data.location);
        bind_field!(data.status);
        bind_field!(data.assigned_team_id);
        bind_field!(data.assigned_technician_id);
        bind_field!(data.purchase_date);
        bind_field!(data.warranty_end_date);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // Requests are removed by ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}
