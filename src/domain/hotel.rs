use crate::domain::{EmailAddress, Price};

/// A fully validated hotel ready to be stored for its owner.
#[derive(Debug)]
pub struct NewHotel {
    pub name: String,
    pub address: String,
    pub email: Option<EmailAddress>,
    pub phone: Option<String>,
    pub price: Price,
    pub currency: String,
}

/// A partial update. `None` leaves a column untouched; for the nullable
/// columns `Some(None)` clears the stored value.
#[derive(Debug, Default)]
pub struct HotelChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<Option<EmailAddress>>,
    pub phone: Option<Option<String>>,
    pub price: Option<Price>,
    pub currency: Option<String>,
}
