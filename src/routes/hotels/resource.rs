use crate::domain::Price;
use crate::models::Hotel;
use crate::storage::PublicDisk;
use anyhow::anyhow;
use chrono::{DateTime, Utc};

/// JSON shape of a hotel. `photo` is always a public URL, never a storage
/// path.
#[derive(serde::Serialize, Debug)]
pub struct HotelResource {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub price: Price,
    pub currency: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HotelResource {
    /// Fails when the stored price is outside the range a `Price` holds.
    pub fn new(hotel: Hotel, disk: &PublicDisk) -> Result<Self, anyhow::Error> {
        let price = Price::try_from(hotel.price_cents)
            .map_err(|e| anyhow!("Hotel {} has an invalid stored price: {}", hotel.id, e))?;
        Ok(Self {
            id: hotel.id,
            user_id: hotel.user_id,
            name: hotel.name,
            address: hotel.address,
            email: hotel.email,
            phone: hotel.phone,
            price,
            currency: hotel.currency,
            photo: hotel.photo.as_deref().map(|path| disk.url(path)),
            created_at: hotel.created_at,
            updated_at: hotel.updated_at,
        })
    }
}
