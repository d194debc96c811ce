pub mod database;
pub mod email;
pub mod jwt;
pub mod meeting;
pub mod rate_limit;
