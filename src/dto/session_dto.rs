use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::session::Session;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(deserialize_with = "deserialize_date_time")]
    pub date_time: DateTime<Utc>,
    #[validate(length(min = 1, message = "Meeting link is required"))]
    pub meet_link: String,
}

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses RFC 3339, or a `datetime-local` value without an offset (minutes or
/// seconds precision), which is taken as UTC.
pub fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_date_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_time(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid dateTime `{}`", raw))
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date_time: DateTime<Utc>,
    pub meet_link: String,
    pub created_by: Uuid,
    pub is_active: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(value: Session) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            date_time: value.date_time,
            meet_link: value.meet_link,
            created_by: value.created_by,
            is_active: value.is_active,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn payload(date_time: &str) -> serde_json::Result<SessionPayload> {
        serde_json::from_value(json!({
            "title": "Mock interview",
            "description": "Round one",
            "dateTime": date_time,
            "meetLink": "https://meet.example.com/abc"
        }))
    }

    #[test]
    fn datetime_local_values_are_read_as_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap();
        assert_eq!(payload("2025-03-14T10:00").unwrap().date_time, expected);
        assert_eq!(payload("2025-03-14T10:00:00").unwrap().date_time, expected);
    }

    #[test]
    fn rfc3339_offsets_are_honoured() {
        let parsed = payload("2025-03-14T15:30:00+05:30").unwrap();
        assert_eq!(
            parsed.date_time,
            Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
        );
        assert!(payload("2025-03-14T10:00:00Z").is_ok());
    }

    #[test]
    fn unparseable_date_time_is_rejected() {
        assert!(payload("next tuesday").is_err());
        assert!(payload("2025-03-14").is_err());
    }
}
