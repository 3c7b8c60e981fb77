use crate::domain::{EmailAddress, NewPassword, UserName};

pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: NewPassword,
}
