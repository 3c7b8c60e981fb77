use crate::domain::{
    optional_text, required_text, EmailAddress, HotelChanges, NewHotel, Price, ValidationErrors,
};
use rocket::form;
use rocket::fs::TempFile;

/// Multipart (or urlencoded) hotel form. Every field is optional at the
/// parsing layer so that missing fields surface as field-level validation
/// errors instead of a bare 422 from the form guard.
#[derive(FromForm)]
pub struct HotelForm<'r> {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub photo: form::Result<'r, TempFile<'r>>,
}

pub struct HotelFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
}

impl<'r> HotelForm<'r> {
    pub fn split(self) -> (HotelFields, form::Result<'r, TempFile<'r>>) {
        let fields = HotelFields {
            name: self.name,
            address: self.address,
            email: self.email,
            phone: self.phone,
            price: self.price,
            currency: self.currency,
        };
        (fields, self.photo)
    }
}

impl TryFrom<HotelFields> for NewHotel {
    type Error = ValidationErrors;

    fn try_from(fields: HotelFields) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", fields.name);
        let address = required_text(&mut errors, "address", fields.address);
        let email = optional_email(&mut errors, fields.email).flatten();
        let phone = optional_text(&mut errors, "phone", fields.phone).flatten();
        let price = required_price(&mut errors, fields.price);
        let currency = required_text(&mut errors, "currency", fields.currency);

        match (name, address, price, currency) {
            (Some(name), Some(address), Some(price), Some(currency)) if errors.is_empty() => {
                Ok(NewHotel {
                    name,
                    address,
                    email,
                    phone,
                    price,
                    currency,
                })
            }
            _ => Err(errors),
        }
    }
}

impl TryFrom<HotelFields> for HotelChanges {
    type Error = ValidationErrors;

    fn try_from(fields: HotelFields) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        // Submitted fields obey the creation rules; absent ones are skipped.
        let changes = HotelChanges {
            name: fields
                .name
                .and_then(|v| required_text(&mut errors, "name", Some(v))),
            address: fields
                .address
                .and_then(|v| required_text(&mut errors, "address", Some(v))),
            email: optional_email(&mut errors, fields.email),
            phone: optional_text(&mut errors, "phone", fields.phone),
            price: fields
                .price
                .and_then(|v| required_price(&mut errors, Some(v))),
            currency: fields
                .currency
                .and_then(|v| required_text(&mut errors, "currency", Some(v))),
        };
        errors.into_result(changes)
    }
}

fn optional_email(
    errors: &mut ValidationErrors,
    value: Option<String>,
) -> Option<Option<EmailAddress>> {
    match optional_text(errors, "email", value)? {
        None => Some(None),
        Some(email) => match EmailAddress::parse(email) {
            Ok(email) => Some(Some(email)),
            Err(_) => {
                errors.add("email", "The email field must be a valid email address.");
                None
            }
        },
    }
}

fn required_price(errors: &mut ValidationErrors, value: Option<String>) -> Option<Price> {
    match Price::parse(value.as_deref().unwrap_or_default()) {
        Ok(price) => Some(price),
        Err(message) => {
            errors.add("price", message);
            None
        }
    }
}
