//! Shared domain enums
//!
//! All enums are stored as TEXT columns and exchanged as snake_case strings.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Role of a user account
    pub enum UserRole {
        Manager => "manager",
        Technician => "technician",
    }
}

text_enum! {
    /// Operational status of a piece of equipment
    pub enum EquipmentStatus {
        Active => "active",
        UnderMaintenance => "under_maintenance",
        /// Terminal: no new request may target scrapped equipment
        Scrapped => "scrapped",
    }
}

text_enum! {
    /// Kind of maintenance work
    pub enum RequestType {
        Corrective => "corrective",
        /// Planned work; requires a scheduled date
        Preventive => "preventive",
    }
}

text_enum! {
    /// Lifecycle stage of a maintenance request
    pub enum RequestStage {
        New => "new",
        InProgress => "in_progress",
        Repaired => "repaired",
        Scrap => "scrap",
    }
}

text_enum! {
    pub enum RequestPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

impl RequestStage {
    /// Repaired and scrap close a request
    pub fn is_closing(&self) -> bool {
        matches!(self, RequestStage::Repaired | RequestStage::Scrap)
    }
}

impl Default for RequestStage {
    fn default() -> Self {
        RequestStage::New
    }
}

impl Default for RequestPriority {
    fn default() -> Self {
        RequestPriority::Normal
    }
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        EquipmentStatus::Active
    }
}
