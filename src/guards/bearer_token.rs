use anyhow::{anyhow, Context};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::{ExposeSecret, Secret};

/// The opaque credential of an `Authorization: Bearer <token>` header.
#[derive(Debug)]
pub struct BearerToken {
    token: Secret<String>,
}

impl BearerToken {
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match from_header(request.headers().get_one("Authorization")) {
            Ok(token) => Outcome::Success(token),
            Err(e) => Outcome::Error((Status::Unauthorized, e)),
        }
    }
}

fn from_header(header_value: Option<&str>) -> Result<BearerToken, anyhow::Error> {
    let header_value = header_value.context("The 'Authorization' header was missing")?;

    let (scheme, token) = header_value
        .trim()
        .split_once(' ')
        .context("The 'Authorization' header is malformed.")?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(anyhow!("The authorization scheme was not 'Bearer'."));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(anyhow!("A token must be provided in 'Bearer' auth."));
    }

    Ok(BearerToken {
        token: Secret::new(token.to_string()),
    })
}
