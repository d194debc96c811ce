pub mod cookie;
pub mod image;
pub mod jwt;
pub mod password;
pub mod sanitize;

pub use jwt::encode_access_token;
pub use password::{hash_password, verify_password};
