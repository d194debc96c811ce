pub mod admin;
pub mod auth;
pub mod bootstrap_admin;
pub mod chat_request;
pub mod comment;
pub mod devis;
pub mod email;
pub mod forum;
pub mod meeting;
pub mod moderation;
pub mod user;
pub mod visit;
