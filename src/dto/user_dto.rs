use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub weather_alerts: bool,
    pub market_prices: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
    pub location: String,
    pub phone: String,
    pub land_area: String,
    pub soil_type: String,
    pub profile_completed: bool,
    pub notifications: NotificationSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            avatar: value.avatar,
            location: value.location,
            phone: value.phone,
            land_area: value.land_area,
            soil_type: value.soil_type,
            profile_completed: value.profile_completed,
            notifications: NotificationSettings {
                email_notifications: value.email_notifications,
                weather_alerts: value.weather_alerts,
                market_prices: value.market_prices,
            },
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Every field is optional on the wire so that a missing one is reported as
/// a 400 with a single message rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub land_area: Option<String>,
    pub soil_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub location: String,
    pub phone: String,
    pub land_area: String,
    pub soil_type: String,
}

impl UpdateProfilePayload {
    /// `None` when any field is missing or blank.
    pub fn into_complete(self) -> Option<ProfileUpdate> {
        fn present(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Some(ProfileUpdate {
            name: present(self.name)?,
            location: present(self.location)?,
            phone: present(self.phone)?,
            land_area: present(self.land_area)?,
            soil_type: present(self.soil_type)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNotificationsPayload {
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_with_blank_field_is_incomplete() {
        let payload: UpdateProfilePayload = serde_json::from_str(
            r#"{"name":"Asha","location":"Pune","phone":"  ","landArea":"2 acres","soilType":"Loamy"}"#,
        )
        .unwrap();
        assert!(payload.into_complete().is_none());
    }

    #[test]
    fn profile_with_all_fields_is_complete() {
        let payload: UpdateProfilePayload = serde_json::from_str(
            r#"{"name":"Asha","location":"Pune","phone":"98200","landArea":"2 acres","soilType":"Loamy"}"#,
        )
        .unwrap();
        let update = payload.into_complete().unwrap();
        assert_eq!(update.land_area, "2 acres");
        assert_eq!(update.soil_type, "Loamy");
    }

    #[test]
    fn notifications_use_camel_case() {
        let payload: UpdateNotificationsPayload = serde_json::from_str(
            r#"{"notifications":{"emailNotifications":false,"weatherAlerts":true,"marketPrices":true}}"#,
        )
        .unwrap();
        assert!(!payload.notifications.email_notifications);
        assert!(payload.notifications.market_prices);
    }
}
