use rocket::serde::json::Json;
use serde_json::{json, Value};

/// The dashboard pings this before every auth call. Bearer tokens need no
/// CSRF cookie, so there is nothing to set.
#[get("/sanctum/csrf-cookie")]
pub fn csrf_cookie() -> Json<Value> {
    Json(json!({ "message": "CSRF cookie set" }))
}
