pub mod company;
pub mod dsa_topic;
pub mod game;
pub mod session;
pub mod user;
