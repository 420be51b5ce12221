use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};

/// Builds the `{ success, data | error }` envelope for a finished response body.
pub fn wrap_payload(status: StatusCode, is_json: bool, bytes: &[u8]) -> Value {
    if !is_json {
        // Plain text or empty body
        let msg = String::from_utf8_lossy(bytes).to_string();
        return if status.is_success() {
            if msg.is_empty() {
                json!({ "success": true, "data": null })
            } else {
                json!({ "success": true, "data": msg })
            }
        } else {
            json!({
                "success": false,
                "error": if msg.is_empty() { status.to_string() } else { msg }
            })
        };
    }

    let data: Value = serde_json::from_slice(bytes).unwrap_or(Value::Null);

    // Error bodies from PantryChefError are already enveloped
    if data.as_object().map_or(false, |obj| obj.contains_key("success")) {
        return data;
    }

    if status.is_success() {
        json!({ "success": true, "data": data })
    } else {
        let error = data
            .as_str()
            .or_else(|| data.get("error").and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        json!({ "success": false, "error": error })
    }
}

pub async fn wrap_response_middleware(req: Request, next: Next) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;

    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !path.starts_with("/api") || path == "/api/ping" {
        return Ok(res);
    }

    let status = res.status();
    let is_json = content_type.contains("application/json");
    let (mut parts, body) = res.into_parts();

    let bytes: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::error!("Failed to read response body for {}: {}", path, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let wrapped = wrap_payload(status, is_json, &bytes);
    let new_bytes = serde_json::to_vec(&wrapped).map_err(|e| {
        tracing::error!("Failed to encode response envelope: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(new_bytes.len()));

    Ok(Response::from_parts(parts, Body::from(new_bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_json_is_wrapped_as_data() {
        let wrapped = wrap_payload(StatusCode::OK, true, br#"{"name":"Milk"}"#);
        assert_eq!(wrapped, json!({ "success": true, "data": { "name": "Milk" } }));
    }

    #[test]
    fn unit_json_becomes_null_data() {
        let wrapped = wrap_payload(StatusCode::OK, true, b"null");
        assert_eq!(wrapped, json!({ "success": true, "data": null }));
    }

    #[test]
    fn existing_envelope_passes_through() {
        let body = br#"{"success":false,"error":"Pantry item 'x' not found"}"#;
        let wrapped = wrap_payload(StatusCode::NOT_FOUND, true, body);
        assert_eq!(wrapped["error"], "Pantry item 'x' not found");
    }

    #[test]
    fn plain_text_errors_keep_their_message() {
        let wrapped = wrap_payload(
            StatusCode::UNPROCESSABLE_ENTITY,
            false,
            b"Failed to deserialize the JSON body",
        );
        assert_eq!(wrapped["success"], false);
        assert_eq!(wrapped["error"], "Failed to deserialize the JSON body");

        let empty = wrap_payload(StatusCode::METHOD_NOT_ALLOWED, false, b"");
        assert_eq!(empty["error"], "405 Method Not Allowed");
    }
}
