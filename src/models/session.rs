use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
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

pub const SESSION_COLUMNS: &str =
    "id, title, description, date_time, meet_link, created_by, is_active, status, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Upcoming,
    Past,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Upcoming => "Upcoming",
            SessionStatus::Past => "Past",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Upcoming" => Ok(SessionStatus::Upcoming),
            "Past" => Ok(SessionStatus::Past),
            other => Err(format!("unknown session status: {}", other)),
        }
    }
}

/// Derived fields stamped onto a session row at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub is_active: bool,
    pub status: SessionStatus,
}

/// Status rule applied on every create and update.
///
/// A session scheduled before `now` becomes `Past` and inactive. Otherwise it
/// is `Upcoming` and `is_active` keeps whatever it was before the write, so a
/// session that once went inactive stays inactive even if it is rescheduled
/// into the future.
pub fn resolve_on_write(
    date_time: DateTime<Utc>,
    previous_is_active: bool,
    now: DateTime<Utc>,
) -> Resolution {
    if date_time < now {
        Resolution {
            is_active: false,
            status: SessionStatus::Past,
        }
    } else {
        Resolution {
            is_active: previous_is_active,
            status: SessionStatus::Upcoming,
        }
    }
}

/// Listing filter evaluated against the query's own `now`, independent of the
/// stored `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Upcoming,
    Past,
}

impl StatusFilter {
    /// Unknown or missing values list everything.
    pub fn from_query(status: Option<&str>) -> Self {
        match status.map(str::parse::<SessionStatus>) {
            Some(Ok(SessionStatus::Upcoming)) => StatusFilter::Upcoming,
            Some(Ok(SessionStatus::Past)) => StatusFilter::Past,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, date_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Upcoming => date_time > now,
            StatusFilter::Past => date_time <= now,
        }
    }

    /// SQL predicate on `date_time`, with `$1` bound to `now`.
    pub fn sql_predicate(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Upcoming => Some("date_time > $1"),
            StatusFilter::Past => Some("date_time <= $1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, h, 0, 0).unwrap()
    }

    #[test]
    fn past_date_at_write_time_is_past_and_inactive() {
        let r = resolve_on_write(at(9), true, at(10));
        assert_eq!(r.status, SessionStatus::Past);
        assert!(!r.is_active);
    }

    #[test]
    fn future_date_at_write_time_is_upcoming() {
        let r = resolve_on_write(at(11), true, at(10));
        assert_eq!(r.status, SessionStatus::Upcoming);
        assert!(r.is_active);
    }

    #[test]
    fn exact_instant_is_upcoming_on_write_but_past_in_listing() {
        let now = at(10);
        let r = resolve_on_write(now, true, now);
        assert_eq!(r.status, SessionStatus::Upcoming);
        assert!(!StatusFilter::Upcoming.matches(now, now));
        assert!(StatusFilter::Past.matches(now, now));
    }

    #[test]
    fn rescheduling_into_the_future_does_not_reactivate() {
        let r = resolve_on_write(at(12), false, at(10));
        assert_eq!(r.status, SessionStatus::Upcoming);
        assert!(!r.is_active);
    }

    #[test]
    fn stored_status_diverges_from_live_filter_without_resave() {
        let created_at = at(10);
        let scheduled = created_at + Duration::hours(1);
        let stored = resolve_on_write(scheduled, true, created_at);
        assert_eq!(stored.status, SessionStatus::Upcoming);
        assert!(StatusFilter::Upcoming.matches(scheduled, created_at));

        let later = scheduled + Duration::minutes(1);
        // nothing re-saved the row, so the column still says Upcoming
        assert_eq!(stored.status, SessionStatus::Upcoming);
        assert!(!StatusFilter::Upcoming.matches(scheduled, later));
        assert!(StatusFilter::Past.matches(scheduled, later));
    }

    #[test]
    fn filter_parsing_is_case_sensitive_and_defaults_to_all() {
        assert_eq!(StatusFilter::from_query(Some("Upcoming")), StatusFilter::Upcoming);
        assert_eq!(StatusFilter::from_query(Some("Past")), StatusFilter::Past);
        assert_eq!(StatusFilter::from_query(Some("upcoming")), StatusFilter::All);
        assert_eq!(StatusFilter::from_query(None), StatusFilter::All);
    }

    #[test]
    fn sql_predicates_follow_matches() {
        assert_eq!(StatusFilter::All.sql_predicate(), None);
        assert_eq!(StatusFilter::Upcoming.sql_predicate(), Some("date_time > $1"));
        assert_eq!(StatusFilter::Past.sql_predicate(), Some("date_time <= $1"));
    }
}
