pub mod admin;
pub mod auth;
pub mod chat_request;
pub mod comment;
pub mod devis;
pub mod forum;
pub mod user;
