use crate::schema::password_reset_tokens;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = password_reset_tokens)]
pub struct PasswordResetToken {
    pub email: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        self.created_at + lifetime <= now
    }

    /// Whether a new token for the same address must still wait.
    pub fn recently_created(&self, now: DateTime<Utc>, throttle: Duration) -> bool {
        now < self.created_at + throttle
    }
}
