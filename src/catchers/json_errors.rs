use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

// Failures raised by Rocket itself (unmatched routes, guards that reject a
// body) get the same JSON shape as handler errors.

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "Bad request." }))
}

#[catch(403)]
pub fn forbidden(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "This action is unauthorized." }))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "Not found." }))
}

#[catch(413)]
pub fn payload_too_large(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "The uploaded content is too large." }))
}

#[catch(415)]
pub fn unsupported_media_type(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "Unsupported content type." }))
}

#[catch(422)]
pub fn unprocessable_entity(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "The given data was invalid." }))
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<Value> {
    Json(json!({ "message": "Server Error" }))
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request) -> Json<Value> {
    Json(json!({ "message": status.reason().unwrap_or("Unexpected error.") }))
}
