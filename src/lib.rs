pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::middleware::policy::AccessPolicy;
use crate::services::{
    company_service::CompanyService, dsa_service::DsaService, game_service::GameService,
    notification_service::NotificationService, session_service::SessionService,
    token_service::TokenService, user_service::UserService,
};
use crate::utils::time::{Clock, SystemClock};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub policy: AccessPolicy,
    pub clock: Arc<dyn Clock>,
    pub user_service: UserService,
    pub session_service: SessionService,
    pub company_service: CompanyService,
    pub dsa_service: DsaService,
    pub game_service: GameService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: PgPool, config: Config, clock: Arc<dyn Clock>) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.jwt_ttl_hours),
        );
        let user_service = UserService::new(pool.clone());
        let session_service = SessionService::new(pool.clone(), clock.clone());
        let company_service = CompanyService::new(pool.clone());
        let dsa_service = DsaService::new(pool.clone());
        let game_service = GameService::new(pool.clone());
        let notification_service = NotificationService::new(config.otp_webhook_url.clone());

        Self {
            pool,
            config: Arc::new(config),
            tokens,
            policy: AccessPolicy::default(),
            clock,
            user_service,
            session_service,
            company_service,
            dsa_service,
            game_service,
            notification_service,
        }
    }
}
