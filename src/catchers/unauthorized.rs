use rocket::http::Header;
use rocket::serde::json::Json;
use serde_json::{json, Value};

#[catch(401)]
pub fn unauthorized_request_token() -> RequestBearerToken {
    RequestBearerToken::new()
}

struct RequestBearerTokenHeader;

impl<'h> From<RequestBearerTokenHeader> for Header<'h> {
    fn from(_: RequestBearerTokenHeader) -> Self {
        Header::new("WWW-Authenticate", r#"Bearer realm="api""#)
    }
}

#[derive(Responder)]
#[response(status = 401)]
pub struct RequestBearerToken {
    inner: Json<Value>,
    bearer: RequestBearerTokenHeader,
}

impl RequestBearerToken {
    fn new() -> RequestBearerToken {
        RequestBearerToken {
            inner: Json(json!({ "message": "Unauthenticated." })),
            bearer: RequestBearerTokenHeader,
        }
    }
}

impl Default for RequestBearerToken {
    fn default() -> Self {
        Self::new()
    }
}
