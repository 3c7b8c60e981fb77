use crate::domain::ValidationErrors;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Map, Value};

/// `{"message": ...}` with the given status.
pub fn json_message(status: Status, message: &str) -> (Status, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

impl<'r> Responder<'r, 'static> for ValidationErrors {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut errors = Map::new();
        for field in self.fields() {
            let messages = self
                .messages_for(field)
                .into_iter()
                .map(|m| Value::String(m.to_string()))
                .collect();
            errors.insert(field.to_string(), Value::Array(messages));
        }
        let body = json!({
            "message": self.to_string(),
            "errors": errors,
        });
        (Status::UnprocessableEntity, Json(body)).respond_to(request)
    }
}
