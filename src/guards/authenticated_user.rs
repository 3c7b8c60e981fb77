use crate::authentication::hash_token;
use crate::guards::{BearerToken, OrStatus};
use crate::models::{AccessToken, User};
use crate::startup::HotelDbConn;
use anyhow::anyhow;
use chrono::Utc;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

/// A user authenticated by a live personal access token.
pub struct AuthenticatedUser {
    pub user: User,
    /// The token used for this request; logout revokes it.
    pub token_id: i64,
    // prevents construction outside of this module
    _private: (),
}

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let bearer = match request.guard::<BearerToken>().await {
            Outcome::Success(bearer) => bearer,
            _ => {
                return Outcome::Error((
                    Status::Unauthorized,
                    anyhow!("User has not been authenticated."),
                ))
            }
        };
        let conn = match request.guard::<HotelDbConn>().await {
            Outcome::Success(conn) => conn,
            _ => {
                return Outcome::Error((
                    Status::InternalServerError,
                    anyhow!("Failed to retrieve a connection from the DB pool."),
                ))
            }
        };

        match from_request_result(bearer, conn).await {
            Ok(user) => Outcome::Success(user),
            Err((status, e)) => {
                tracing::info!(error.cause_chain = ?e, "Rejected bearer token.");
                Outcome::Error((status, e))
            }
        }
    }
}

async fn from_request_result(
    bearer: BearerToken,
    conn: HotelDbConn,
) -> Result<AuthenticatedUser, (Status, anyhow::Error)> {
    let digest = hash_token(bearer.expose());
    conn.run(move |conn: &mut PgConnection| {
        use crate::schema::{personal_access_tokens as tokens, users};

        let now = Utc::now();
        let (token, user) = tokens::table
            .inner_join(users::table)
            .filter(tokens::token_hash.eq(digest.as_str()))
            .select((AccessToken::as_select(), User::as_select()))
            .first::<(AccessToken, User)>(conn)
            .optional()
            .or_status(
                Status::InternalServerError,
                "Failed to perform a query to validate the access token.",
            )?
            .or_status(Status::Unauthorized, "Unknown access token.")?;

        if token.is_expired(now) {
            return Err((Status::Unauthorized, anyhow!("The access token has expired.")));
        }

        diesel::update(tokens::table.find(token.id))
            .set(tokens::last_used_at.eq(now))
            .execute(conn)
            .or_status(
                Status::InternalServerError,
                "Failed to record the access token use.",
            )?;

        Ok(AuthenticatedUser {
            user,
            token_id: token.id,
            _private: (),
        })
    })
    .await
}
