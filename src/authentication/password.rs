use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, Secret};

/// Verified when the email is unknown, so both branches take as long.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[derive(thiserror::Error, Debug)]
pub enum CredentialsError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[tracing::instrument(name = "Compute password hash", skip(password))]
pub async fn compute_password_hash(password: Secret<String>) -> Result<String, anyhow::Error> {
    spawn_blocking_with_tracing(move || hash_blocking(password))
        .await
        .context("Failed to spawn blocking task.")?
}

/// Checks `candidate` against `expected_hash`, or against a dummy hash when
/// there is no stored hash to compare with.
#[tracing::instrument(name = "Verify password hash", skip(expected_hash, candidate))]
pub async fn verify_password_hash(
    expected_hash: Option<String>,
    candidate: Secret<String>,
) -> Result<(), CredentialsError> {
    let known_user = expected_hash.is_some();
    let expected_hash = Secret::new(expected_hash.unwrap_or_else(|| DUMMY_PASSWORD_HASH.into()));

    spawn_blocking_with_tracing(move || verify_blocking(expected_hash, candidate))
        .await
        .context("Failed to spawn blocking task.")??;

    if known_user {
        Ok(())
    } else {
        Err(CredentialsError::InvalidCredentials(anyhow::anyhow!(
            "Unknown email."
        )))
    }
}

fn hash_blocking(password: Secret<String>) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).context("Invalid Argon2 parameters.")?,
    )
    .hash_password(password.expose_secret().as_bytes(), &salt)
    .context("Failed to hash password.")?
    .to_string();
    Ok(password_hash)
}

fn verify_blocking(expected_hash: Secret<String>, candidate: Secret<String>) -> Result<(), CredentialsError> {
    let expected_hash = PasswordHash::new(expected_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(candidate.expose_secret().as_bytes(), &expected_hash)
        .context("Invalid password.")
        .map_err(CredentialsError::InvalidCredentials)
}
