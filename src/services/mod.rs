pub mod company_service;
pub mod dsa_service;
pub mod game_service;
pub mod notification_service;
pub mod session_service;
pub mod token_service;
pub mod user_service;
