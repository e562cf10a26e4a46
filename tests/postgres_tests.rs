//! PostgreSQL repository tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;

use gearguard_server::{
    error::AppError,
    models::{
        equipment::{CreateEquipment, UpdateEquipment},
        request::{CreateRequest, RequestQuery},
        team::{CreateTeam, UpdateTeam},
        user::CreateUser,
        EquipmentStatus, RequestStage, RequestType, UserRole,
    },
    repository::Repository,
    services::Services,
};

async fn services() -> Services {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Services::new(Repository::new(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore]
async fn test_request_lifecycle_on_postgres() {
    let services = services().await;

    let bob = services
        .users
        .create(&CreateUser {
            email: format!("{}@gearguard.com", unique("bob")),
            full_name: "Bob Fixit".to_string(),
            role: UserRole::Technician,
        })
        .await
        .expect("Failed to create user");
    let team = services
        .teams
        .create(&CreateTeam {
            name: unique("Mechanics"),
            member_ids: vec![bob.id],
        })
        .await
        .expect("Failed to create team");
    assert_eq!(team.member_ids, vec![bob.id]);

    let equipment = services
        .equipment
        .create(&CreateEquipment {
            name: "Generator X500".to_string(),
            serial_number: unique("GEN"),
            category: "Heavy Machinery".to_string(),
            department: None,
            location: "Warehouse A".to_string(),
            assigned_team_id: Some(team.id),
            assigned_technician_id: Some(bob.id),
            purchase_date: None,
            warranty_end_date: None,
        })
        .await
        .expect("Failed to create equipment");

    let request = services
        .requests
        .create(&CreateRequest {
            subject: "Oil Leak Detected".to_string(),
            equipment_id: equipment.id,
            request_type: RequestType::Corrective,
            priority: None,
            scheduled_date: None,
            team_id: None,
            technician_id: None,
            duration: Some(1.0),
        })
        .await
        .expect("Failed to create request");
    assert_eq!(request.team_id, Some(team.id));
    assert_eq!(request.technician_id, Some(bob.id));

    let scrapped = services
        .requests
        .transition_stage(request.id, RequestStage::Scrap)
        .await
        .expect("Failed to scrap");
    assert!(scrapped.closed_at.is_some());

    let details = services
        .equipment
        .get_details(equipment.id)
        .await
        .expect("Failed to fetch equipment");
    assert_eq!(details.equipment.status, EquipmentStatus::Scrapped);
    assert_eq!(details.maintenance_count, 1);

    let listed = services
        .requests
        .list(&RequestQuery::for_equipment(equipment.id))
        .await
        .expect("Failed to list");
    assert_eq!(listed.len(), 1);

    services
        .equipment
        .delete(equipment.id)
        .await
        .expect("Failed to delete equipment");
    let err = services.requests.get_by_id(request.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_constraints_on_postgres() {
    let services = services().await;
    let serial = unique("SRV");
    let data = CreateEquipment {
        name: "Dell Server Rack".to_string(),
        serial_number: serial.clone(),
        category: "Computers".to_string(),
        department: None,
        location: "Server Room".to_string(),
        assigned_team_id: None,
        assigned_technician_id: None,
        purchase_date: None,
        warranty_end_date: None,
    };
    let equipment = services.equipment.create(&data).await.expect("Failed to create");

    let err = services.equipment.create(&data).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let updated = services
        .equipment
        .update(
            equipment.id,
            &UpdateEquipment {
                status: Some(EquipmentStatus::UnderMaintenance),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update");
    assert_eq!(updated.status, EquipmentStatus::UnderMaintenance);
    assert_eq!(updated.serial_number, serial);

    let team = services
        .teams
        .create(&CreateTeam {
            name: unique("IT Support"),
            member_ids: Vec::new(),
        })
        .await
        .expect("Failed to create team");
    let err = services
        .teams
        .update(
            team.id,
            &UpdateTeam {
                name: None,
                member_ids: Some(vec![i32::MAX]),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    services.teams.delete(team.id).await.expect("Failed to delete team");
    services.equipment.delete(equipment.id).await.expect("Failed to delete");
}
