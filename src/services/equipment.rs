//! Equipment service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentDetails, EquipmentQuery, UpdateEquipment},
        EquipmentStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(query).await
    }

    /// Get equipment with its request count
    pub async fn get_details(&self, id: i32) -> AppResult<EquipmentDetails> {
        let equipment = self.repository.equipment.get_by_id(id).await?;
        let maintenance_count = self.repository.requests.count_for_equipment(id).await?;
        Ok(EquipmentDetails {
            equipment,
            maintenance_count,
        })
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.check_assignment(data.assigned_team_id, data.assigned_technician_id)
            .await?;

        let equipment = self.repository.equipment.create(data).await?;
        tracing::info!("Created equipment '{}' ({})", equipment.name, equipment.serial_number);
        Ok(equipment)
    }

    /// Update equipment fields.
    ///
    /// Status can move between active and under_maintenance only; scrapping
    /// goes through a maintenance request and cannot be undone.
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let current = self.repository.equipment.get_by_id(id).await?;

        if let Some(status) = data.status {
            if current.is_scrapped() && status != EquipmentStatus::Scrapped {
                return Err(AppError::InvalidState(format!(
                    "Equipment '{}' is scrapped",
                    current.name
                )));
            }
            if !current.is_scrapped() && status == EquipmentStatus::Scrapped {
                return Err(AppError::InvalidState(
                    "Equipment can only be scrapped through a maintenance request".to_string(),
                ));
            }
        }

        self.check_assignment(
            data.assigned_team_id.flatten(),
            data.assigned_technician_id.flatten(),
        )
        .await?;
        self.repository.equipment.update(id, data).await
    }

    /// Delete equipment and all of its requests
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        tracing::info!("Deleted equipment {}", id);
        Ok(())
    }

    async fn check_assignment(&self, team_id: Option<i32>, technician_id: Option<i32>) -> AppResult<()> {
        if let Some(team_id) = team_id {
            self.repository.teams.get_by_id(team_id).await?;
        }
        if let Some(technician_id) = technician_id {
            self.repository.users.get_by_id(technician_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use tokio_test::assert_err;

    use super::*;
    use crate::{
        models::{request::NewRequest, RequestPriority, RequestStage, RequestType},
        repository::{
            MockEquipmentRepository, MockRequestsRepository, MockTeamsRepository,
            MockUsersRepository,
        },
    };

    fn generator() -> CreateEquipment {
        CreateEquipment {
            name: "Generator X500".to_string(),
            serial_number: "GEN-2024-001".to_string(),
            category: "Heavy Machinery".to_string(),
            department: Some("Production".to_string()),
            location: "Warehouse A".to_string(),
            assigned_team_id: None,
            assigned_technician_id: None,
            purchase_date: None,
            warranty_end_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_details() {
        let repository = Repository::in_memory();
        let service = EquipmentService::new(repository.clone());
        let equipment = service.create(&generator()).await.unwrap();
        assert_eq!(equipment.status, EquipmentStatus::Active);

        for _ in 0..2 {
            repository
                .requests
                .create(&NewRequest {
                    subject: "Inspection".to_string(),
                    request_type: RequestType::Corrective,
                    priority: RequestPriority::Low,
                    equipment_id: equipment.id,
                    team_id: None,
                    technician_id: None,
                    scheduled_date: None,
                    duration: 1.5,
                })
                .await
                .unwrap();
        }

        let details = service.get_details(equipment.id).await.unwrap();
        assert_eq!(details.maintenance_count, 2);
        assert_eq!(details.equipment.serial_number, "GEN-2024-001");
    }

    #[tokio::test]
    async fn test_duplicate_serial_conflicts() {
        let service = EquipmentService::new(Repository::in_memory());
        service.create(&generator()).await.unwrap();

        let err = service.create(&generator()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_team_rejected() {
        let service = EquipmentService::new(Repository::in_memory());
        let mut data = generator();
        data.assigned_team_id = Some(5);

        let err = service.create(&data).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_direct_scrap_refused() {
        let service = EquipmentService::new(Repository::in_memory());
        let equipment = service.create(&generator()).await.unwrap();

        let err = service
            .update(
                equipment.id,
                &UpdateEquipment {
                    status: Some(EquipmentStatus::Scrapped),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let updated = service
            .update(
                equipment.id,
                &UpdateEquipment {
                    status: Some(EquipmentStatus::UnderMaintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, EquipmentStatus::UnderMaintenance);
    }

    #[tokio::test]
    async fn test_scrapped_equipment_cannot_be_revived() {
        let repository = Repository::in_memory();
        let service = EquipmentService::new(repository.clone());
        let equipment = service.create(&generator()).await.unwrap();
        let request = repository
            .requests
            .create(&NewRequest {
                subject: "Beyond repair".to_string(),
                request_type: RequestType::Corrective,
                priority: RequestPriority::High,
                equipment_id: equipment.id,
                team_id: None,
                technician_id: None,
                scheduled_date: None,
                duration: 0.0,
            })
            .await
            .unwrap();
        repository
            .requests
            .update_stage(request.id, RequestStage::Scrap, true)
            .await
            .unwrap();

        assert_err!(
            service
                .update(
                    equipment.id,
                    &UpdateEquipment {
                        status: Some(EquipmentStatus::Active),
                        ..Default::default()
                    },
                )
                .await
        );
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut equipment = MockEquipmentRepository::new();
        equipment
            .expect_delete()
            .with(eq(9))
            .times(1)
            .returning(|id| Err(AppError::NotFound(format!("Equipment {} not found", id))));
        let service = EquipmentService::new(Repository {
            users: Arc::new(MockUsersRepository::new()),
            teams: Arc::new(MockTeamsRepository::new()),
            equipment: Arc::new(equipment),
            requests: Arc::new(MockRequestsRepository::new()),
        });

        let err = service.delete(9).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
