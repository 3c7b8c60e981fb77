use secrecy::{ExposeSecret, Secret};

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;

#[derive(Debug)]
pub struct NewPassword(Secret<String>);

impl NewPassword {
    /// Checks length and that `confirmation` repeats the password exactly.
    pub fn parse(password: Secret<String>, confirmation: Option<&str>) -> Result<Self, String> {
        let length = password.expose_secret().chars().count();
        if length == 0 {
            return Err("The password field is required.".to_string());
        }
        if length < MIN_LENGTH {
            return Err(format!(
                "The password field must be at least {} characters.",
                MIN_LENGTH
            ));
        }
        if length > MAX_LENGTH {
            return Err(format!(
                "The password field must not be greater than {} characters.",
                MAX_LENGTH
            ));
        }
        if confirmation != Some(password.expose_secret().as_str()) {
            return Err("The password field confirmation does not match.".to_string());
        }
        Ok(Self(password))
    }
}

impl ExposeSecret<String> for NewPassword {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
