use rand::distributions::Alphanumeric;
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

const TOKEN_LENGTH: usize = 40;

/// A freshly generated token: the plaintext goes to the client exactly once,
/// only the digest is stored.
pub struct IssuedToken {
    pub plaintext: Secret<String>,
    pub digest: String,
}

pub fn generate_token() -> IssuedToken {
    let mut rng = rand::thread_rng();
    let plaintext: String = std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(TOKEN_LENGTH)
        .collect();
    let digest = hash_token(&plaintext);
    IssuedToken {
        plaintext: Secret::new(plaintext),
        digest,
    }
}

/// Hex-encoded SHA-256 digest used to look tokens up.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

impl IssuedToken {
    pub fn expose(&self) -> &str {
        self.plaintext.expose_secret()
    }
}
