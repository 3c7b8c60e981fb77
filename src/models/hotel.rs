use crate::schema::hotels;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = hotels)]
pub struct Hotel {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    /// Relative path on the public disk, or an absolute URL.
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = hotels)]
pub struct NewHotelRecord<'a> {
    pub user_id: i64,
    pub name: &'a str,
    pub address: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub price_cents: i64,
    pub currency: &'a str,
    pub photo: Option<&'a str>,
}

// `None` skips a column; `Some(None)` writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = hotels)]
pub struct HotelChangeset {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub photo: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}
