//! Demo data for local development

use chrono::Utc;

use super::Services;
use crate::{
    error::AppResult,
    models::{
        equipment::CreateEquipment,
        request::CreateRequest,
        team::CreateTeam,
        user::CreateUser,
        RequestPriority, RequestType, UserRole,
    },
};

fn user(email: &str, full_name: &str, role: UserRole) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        full_name: full_name.to_string(),
        role,
    }
}

/// Insert the demo data set unless users already exist.
///
/// Returns `false` when seeding was skipped.
pub async fn seed_demo_data(services: &Services) -> AppResult<bool> {
    if !services.users.list().await?.is_empty() {
        tracing::info!("Data already exists, skipping seed");
        return Ok(false);
    }

    tracing::info!("Seeding demo data");

    services
        .users
        .create(&user("manager@gearguard.com", "Alice Manager", UserRole::Manager))
        .await?;
    let bob = services
        .users
        .create(&user("tech1@gearguard.com", "Bob Fixit", UserRole::Technician))
        .await?;
    let charlie = services
        .users
        .create(&user("tech2@gearguard.com", "Charlie Spark", UserRole::Technician))
        .await?;

    let mechanics = services
        .teams
        .create(&CreateTeam {
            name: "Heavy Mechanics".to_string(),
            member_ids: vec![bob.id],
        })
        .await?;
    let it_support = services
        .teams
        .create(&CreateTeam {
            name: "IT Support".to_string(),
            member_ids: vec![charlie.id],
        })
        .await?;

    let generator = services
        .equipment
        .create(&CreateEquipment {
            name: "Generator X500".to_string(),
            serial_number: "GEN-2024-001".to_string(),
            category: "Heavy Machinery".to_string(),
            department: None,
            location: "Warehouse A".to_string(),
            assigned_team_id: Some(mechanics.id),
            assigned_technician_id: Some(bob.id),
            purchase_date: None,
            warranty_end_date: None,
        })
        .await?;
    services
        .equipment
        .create(&CreateEquipment {
            name: "Dell Server Rack".to_string(),
            serial_number: "SRV-2024-999".to_string(),
            category: "Computers".to_string(),
            department: None,
            location: "Server Room".to_string(),
            assigned_team_id: Some(it_support.id),
            assigned_technician_id: Some(charlie.id),
            purchase_date: None,
            warranty_end_date: None,
        })
        .await?;

    services
        .requests
        .create(&CreateRequest {
            subject: "Oil Leak Detected".to_string(),
            equipment_id: generator.id,
            request_type: RequestType::Corrective,
            priority: Some(RequestPriority::Normal),
            scheduled_date: Some(Utc::now()),
            team_id: None,
            technician_id: None,
            duration: None,
        })
        .await?;

    tracing::info!("Seeding complete");
    Ok(true)
}
