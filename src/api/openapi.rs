//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, requests, teams, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GearGuard API",
        version = "1.0.0",
        description = "Maintenance Tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        // Teams
        teams::list_teams,
        teams::get_team,
        teams::create_team,
        teams::update_team,
        teams::delete_team,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::list_equipment_requests,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::update_stage,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::UserRole,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::RequestType,
            crate::models::enums::RequestStage,
            crate::models::enums::RequestPriority,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            // Teams
            crate::models::team::MaintenanceTeam,
            crate::models::team::CreateTeam,
            crate::models::team::UpdateTeam,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Requests
            crate::models::request::MaintenanceRequest,
            crate::models::request::CreateRequest,
            crate::models::request::UpdateStage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorKind,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Managers and technicians"),
        (name = "teams", description = "Maintenance team management"),
        (name = "equipment", description = "Equipment management"),
        (name = "requests", description = "Maintenance request lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
