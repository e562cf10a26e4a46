//! Data models for GearGuard

pub mod enums;
pub mod equipment;
pub mod request;
pub mod team;
pub mod user;

// Re-export commonly used types
pub use enums::{EquipmentStatus, RequestPriority, RequestStage, RequestType, UserRole};
pub use equipment::{Equipment, EquipmentDetails};
pub use request::{MaintenanceRequest, NewRequest};
pub use team::MaintenanceTeam;
pub use user::User;
