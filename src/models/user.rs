use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role. `Enterprise` is the privileged role that manages shared
/// listings; `Farmer` is read-mostly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Enterprise,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Role::Farmer),
            "enterprise" => Ok(Role::Enterprise),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

pub const SOIL_TYPES: [&str; 7] = ["Clay", "Sandy", "Silty", "Peaty", "Chalky", "Loamy", "Other"];

pub fn is_known_soil_type(value: &str) -> bool {
    value.is_empty() || SOIL_TYPES.contains(&value)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub avatar: String,
    pub location: String,
    pub phone: String,
    pub land_area: String,
    pub soil_type: String,
    pub profile_completed: bool,
    pub email_notifications: bool,
    pub weather_alerts: bool,
    pub market_prices: bool,
    #[serde(skip_serializing)]
    pub reset_otp_hash: Option<String>,
    #[serde(skip_serializing)]
    pub reset_otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Rows are written through `Role::as_str`, so an unknown value means the
    /// table was edited by hand.
    pub fn role(&self) -> crate::error::Result<Role> {
        self.role.parse().map_err(|e: String| {
            tracing::error!(user_id = %self.id, role = %self.role, "stored role is invalid");
            crate::error::Error::Internal(e)
        })
    }
}

pub const USER_COLUMNS: &str = "id, name, email, password_hash, role, avatar, location, phone, \
    land_area, soil_type, profile_completed, email_notifications, weather_alerts, market_prices, \
    reset_otp_hash, reset_otp_expires_at, created_at, updated_at";
