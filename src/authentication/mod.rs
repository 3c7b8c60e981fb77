mod password;
mod token;

pub use password::{compute_password_hash, verify_password_hash, CredentialsError};
pub use token::{generate_token, hash_token, IssuedToken};
