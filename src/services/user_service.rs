use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::{normalize_email, RegisterPayload};
use crate::dto::user_dto::{NotificationSettings, ProfileUpdate};
use crate::error::{Error, Result};
use crate::models::user::{Role, User, USER_COLUMNS};
use crate::utils::{crypto, token};

/// Outcome of a credential check against an existing account.
#[derive(Debug, Clone)]
pub struct CredentialCheck {
    pub user: User,
    pub matches: bool,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        let role: Role = payload
            .role
            .parse()
            .map_err(|_| Error::BadRequest("Role must be farmer or enterprise".to_string()))?;
        let email = normalize_email(&payload.email);

        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("User already exists".to_string()));
        }

        let password_hash = crypto::hash_password(&payload.password)?;
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(payload.name.trim())
            .bind(&email)
            .bind(&password_hash)
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match Error::from(e) {
                Error::Conflict(_) => Error::Conflict("User already exists".to_string()),
                other => other,
            })?;

        tracing::info!(user_id = %user.id, role = %role, "user registered");
        Ok(user)
    }

    /// Looks the account up by email and compares the password. Unknown
    /// emails fail with `NotFound`; callers decide how much of that to expose.
    pub async fn verify(&self, email: &str, password: &str) -> Result<CredentialCheck> {
        let user = self
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        let matches = crypto::verify_password(password, &user.password_hash)?;
        Ok(CredentialCheck { user, matches })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        let query = format!(
            r#"
            UPDATE users
            SET name = $2, location = $3, phone = $4, land_area = $5, soil_type = $6,
                profile_completed = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.location)
            .bind(&update.phone)
            .bind(&update.land_area)
            .bind(&update.soil_type)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn set_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<User>> {
        let query = format!(
            "UPDATE users SET avatar = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(avatar)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn update_notifications(
        &self,
        id: Uuid,
        settings: NotificationSettings,
    ) -> Result<User> {
        let query = format!(
            r#"
            UPDATE users
            SET email_notifications = $2, weather_alerts = $3, market_prices = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(settings.email_notifications)
            .bind(settings.weather_alerts)
            .bind(settings.market_prices)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Generates a reset code for the account and stores its digest. Returns
    /// the plain code for delivery.
    pub async fn issue_reset_code(
        &self,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<(User, String)> {
        let email = normalize_email(email);
        let otp = token::generate_otp();
        let digest = crypto::digest_otp(&otp);
        let query = format!(
            r#"
            UPDATE users
            SET reset_otp_hash = $2, reset_otp_expires_at = $3, updated_at = NOW()
            WHERE email = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&email)
            .bind(&digest)
            .bind(now + ttl)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        tracing::info!(user_id = %user.id, "password reset code issued");
        Ok((user, otp))
    }

    pub async fn check_reset_code(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let user = self
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid_otp)?;
        if !reset_code_is_valid(&user, otp, now) {
            return Err(invalid_otp());
        }
        Ok(user)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let user = self.check_reset_code(email, otp, now).await?;
        let password_hash = crypto::hash_password(new_password)?;
        let query = format!(
            r#"
            UPDATE users
            SET password_hash = $2, reset_otp_hash = NULL, reset_otp_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(user)
    }
}

fn invalid_otp() -> Error {
    Error::BadRequest("Invalid or expired OTP".to_string())
}

pub fn reset_code_is_valid(user: &User, otp: &str, now: DateTime<Utc>) -> bool {
    match (&user.reset_otp_hash, user.reset_otp_expires_at) {
        (Some(digest), Some(expires_at)) => expires_at > now && crypto::otp_matches(otp, digest),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::auth_dto::RegisterPayload;
    use sqlx::postgres::PgPoolOptions;

    fn user_with_code(otp: Option<&str>, expires_at: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password_hash: String::new(),
            role: "farmer".into(),
            avatar: String::new(),
            location: String::new(),
            phone: String::new(),
            land_area: String::new(),
            soil_type: String::new(),
            profile_completed: false,
            email_notifications: true,
            weather_alerts: true,
            market_prices: false,
            reset_otp_hash: otp.map(crypto::digest_otp),
            reset_otp_expires_at: expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn reset_code_must_match_and_be_unexpired() {
        let now = Utc::now();
        let user = user_with_code(Some("123456"), Some(now + Duration::minutes(10)));
        assert!(reset_code_is_valid(&user, "123456", now));
        assert!(!reset_code_is_valid(&user, "654321", now));
        assert!(!reset_code_is_valid(&user, "123456", now + Duration::minutes(10)));
    }

    #[test]
    fn no_stored_code_never_validates() {
        let user = user_with_code(None, None);
        assert!(!reset_code_is_valid(&user, "123456", Utc::now()));
    }

    async fn setup_test_db() -> PgPool {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to create test pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn register_then_verify() {
        let service = UserService::new(setup_test_db().await);
        let email = format!("verify_{}@example.com", Uuid::new_v4());
        let user = service
            .register(RegisterPayload {
                name: "Asha".into(),
                email: email.to_uppercase(),
                password: "placement-2025".into(),
                role: "enterprise".into(),
            })
            .await
            .unwrap();
        assert_eq!(user.email, email);
        assert_ne!(user.password_hash, "placement-2025");

        let ok = service.verify(&email, "placement-2025").await.unwrap();
        assert!(ok.matches);
        assert_eq!(ok.user.role().unwrap(), Role::Enterprise);

        let bad = service.verify(&email, "wrong-password").await.unwrap();
        assert!(!bad.matches);

        let missing = service
            .verify("nobody@example.com", "placement-2025")
            .await
            .unwrap_err();
        assert!(matches!(missing, Error::NotFound(_)));

        let dup = service
            .register(RegisterPayload {
                name: "Asha".into(),
                email: email.clone(),
                password: "another-pass".into(),
                role: "farmer".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(dup, Error::Conflict(_)));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn reset_flow_replaces_password_and_clears_code() {
        let service = UserService::new(setup_test_db().await);
        let email = format!("reset_{}@example.com", Uuid::new_v4());
        service
            .register(RegisterPayload {
                name: "Ravi".into(),
                email: email.clone(),
                password: "old-password".into(),
                role: "farmer".into(),
            })
            .await
            .unwrap();

        let now = Utc::now();
        let (_, otp) = service
            .issue_reset_code(&email, Duration::minutes(10), now)
            .await
            .unwrap();
        assert!(service.check_reset_code(&email, &otp, now).await.is_ok());
        assert!(service
            .check_reset_code(&email, &otp, now + Duration::minutes(11))
            .await
            .is_err());

        let user = service
            .reset_password(&email, &otp, "new-password", now)
            .await
            .unwrap();
        assert!(user.reset_otp_hash.is_none());
        assert!(service.verify(&email, "new-password").await.unwrap().matches);
        assert!(service.check_reset_code(&email, &otp, now).await.is_err());
    }
}
