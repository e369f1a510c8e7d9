pub mod auth_dto;
pub mod company_dto;
pub mod dsa_dto;
pub mod game_dto;
pub mod session_dto;
pub mod user_dto;
