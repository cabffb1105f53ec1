use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID carried through handlers as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Attaches a request ID to every request and echoes it on the response.
///
/// A caller-supplied `x-request-id` header wins; otherwise a fresh `UUIDv4`
/// is minted. Handlers read it back via `Extension<RequestId>` for the
/// response meta.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(supplied) => supplied.to_owned(),
        None => Uuid::new_v4().to_string(),
    };
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
