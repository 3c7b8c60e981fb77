mod access_token;
mod hotel;
mod password_reset_token;
mod user;

pub use access_token::*;
pub use hotel::*;
pub use password_reset_token::*;
pub use user::*;
