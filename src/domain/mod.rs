mod email_address;
mod hotel;
mod new_password;
mod new_user;
mod price;
mod text;
mod user_name;
mod validation;

pub use email_address::EmailAddress;
pub use hotel::{HotelChanges, NewHotel};
pub use new_password::NewPassword;
pub use new_user::NewUser;
pub use price::Price;
pub use text::{optional_text, required_text, MAX_STRING_LENGTH};
pub use user_name::UserName;
pub use validation::ValidationErrors;
