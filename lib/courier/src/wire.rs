//! Conversion between courier messages and `http` messages.
//!
//! - the request URL is resolved against the client base URL like a link in
//!   a page at that address, so `users/1` extends the base path and `/users/1`
//!   replaces it;
//! - query values are rendered as text, `null` values are skipped;
//! - headers are sent in request order, with a default `User-Agent`;
//! - a text body is sent as is, an object body as a form, any other value as
//!   JSON, and any request with files as `multipart/form-data`.

use bytes::Bytes;
use courier_core::{
    ContentType, Error, HttpRequest, HttpResponse, Result, form_pairs, render_value, to_form,
    to_json,
};
use http::header::{CONTENT_TYPE, USER_AGENT};
use http_body_util::Full;
use serde_json::Value;
use url::Url;

use crate::multipart::Form;

/// Parse a base URL, making sure its path ends with a slash.
pub fn base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve `url` against `base`; an empty URL is the base itself.
pub fn join_url(base: &Url, url: &str) -> Result<Url> {
    if url.is_empty() {
        return Ok(base.clone());
    }
    Ok(base.join(url)?)
}

/// Encoded body with the content type it implies, if any.
fn encode_body(request: &HttpRequest) -> Result<Option<(Option<String>, Bytes)>> {
    if !request.files.is_empty() {
        let fields = match &request.body {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(Error::invalid_request(
                    "a request with files needs an object body",
                ));
            }
        };
        let (content_type, body) = Form::from_request(fields, &request.files).into_body();
        return Ok(Some((Some(content_type), body)));
    }

    let encoded = match &request.body {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some((None, Bytes::from(text.clone()))),
        Some(Value::Object(map)) => Some((
            Some(ContentType::FormUrlEncoded.to_string()),
            to_form(&form_pairs(map))?,
        )),
        Some(other) => Some((Some(ContentType::Json.to_string()), to_json(other)?)),
    };
    Ok(encoded)
}

/// Build the wire request for `request` sent by a client at `base`.
pub fn build_request(
    request: &HttpRequest,
    base: &Url,
    user_agent: &str,
) -> Result<http::Request<Full<Bytes>>> {
    let mut url = join_url(base, &request.url)?;
    let mut query = request
        .query_params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .peekable();
    if query.peek().is_some() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query {
            pairs.append_pair(name, &render_value(value));
        }
    }

    let mut builder = http::Request::builder()
        .method(http::Method::from(request.method))
        .uri(url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if request.header(USER_AGENT.as_str()).is_none() {
        builder = builder.header(USER_AGENT, user_agent);
    }

    let body = match encode_body(request)? {
        Some((content_type, bytes)) => {
            if let Some(content_type) = content_type
                && request.header(CONTENT_TYPE.as_str()).is_none()
            {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            Full::new(bytes)
        }
        None => Full::default(),
    };

    builder
        .body(body)
        .map_err(|e| Error::invalid_request(e.to_string()))
}

/// Response head with an unloaded body.
pub fn response_head(parts: &http::response::Parts, url: impl Into<String>) -> HttpResponse {
    let mut response = HttpResponse::new(
        parts.status.as_u16(),
        parts.status.canonical_reason().unwrap_or_default(),
    )
    .with_url(url);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            response.headers.push((name.to_string(), value.to_string()));
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use courier_core::{FileData, Method};
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;

    fn base() -> Url {
        base_url("https://api.example.com/v1").expect("base url")
    }

    async fn body_of(request: http::Request<Full<Bytes>>) -> Bytes {
        request
            .into_body()
            .collect()
            .await
            .expect("infallible body")
            .to_bytes()
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        check!(base().as_str() == "https://api.example.com/v1/");
        let_assert!(Ok(url) = base_url("http://localhost:8080"));
        check!(url.as_str() == "http://localhost:8080/");
        check!(let Err(Error::InvalidUrl(_)) = base_url("not a url"));
    }

    #[test]
    fn join_relative_and_absolute_paths() {
        let base = base();
        check!(join_url(&base, "").expect("join").as_str() == "https://api.example.com/v1/");
        check!(join_url(&base, "users/1").expect("join").as_str() == "https://api.example.com/v1/users/1");
        check!(join_url(&base, "/users/1").expect("join").as_str() == "https://api.example.com/users/1");
        check!(
            join_url(&base, "https://other.example.com/x").expect("join").as_str()
                == "https://other.example.com/x"
        );
    }

    #[tokio::test]
    async fn query_headers_and_json_body() {
        let request = HttpRequest::new()
            .with_method(Method::Post)
            .with_url("users")
            .with_query("page", json!(2))
            .with_query("tag", json!("a b"))
            .with_query("skip", Value::Null)
            .with_header("X-Trace", "1")
            .with_body(json!([1, 2]));

        let wire = build_request(&request, &base(), "test/1").expect("request");
        check!(wire.method() == http::Method::POST);
        check!(wire.uri() == "https://api.example.com/v1/users?page=2&tag=a+b");
        check!(wire.headers()["x-trace"] == "1");
        check!(wire.headers()[USER_AGENT] == "test/1");
        check!(wire.headers()[CONTENT_TYPE] == "application/json");
        check!(body_of(wire).await == Bytes::from_static(b"[1,2]"));
    }

    #[tokio::test]
    async fn text_body_keeps_its_content_type() {
        let request = HttpRequest::new()
            .with_method(Method::Put)
            .with_header("Content-Type", "application/json")
            .with_header("User-Agent", "custom")
            .with_body(json!(r#"{"a":1}"#));

        let wire = build_request(&request, &base(), "test/1").expect("request");
        check!(wire.headers().get_all(CONTENT_TYPE).iter().count() == 1);
        check!(wire.headers()[USER_AGENT] == "custom");
        check!(body_of(wire).await == Bytes::from_static(br#"{"a":1}"#));
    }

    #[tokio::test]
    async fn object_body_is_a_form() {
        let request = HttpRequest::new()
            .with_method(Method::Post)
            .with_body(json!({"name": "Ada", "admin": true, "note": null}));

        let wire = build_request(&request, &base(), "test/1").expect("request");
        check!(wire.headers()[CONTENT_TYPE] == "application/x-www-form-urlencoded");
        check!(body_of(wire).await == Bytes::from_static(b"admin=true&name=Ada"));
    }

    #[tokio::test]
    async fn files_make_a_multipart_body() {
        let request = HttpRequest::new()
            .with_method(Method::Post)
            .with_body(json!({"title": "report"}))
            .with_file(
                "file",
                FileData {
                    contents: Some(Bytes::from_static(b"a,b")),
                    filename: Some("r.csv".to_string()),
                    content_type: None,
                },
            );

        let wire = build_request(&request, &base(), "test/1").expect("request");
        let content_type = wire.headers()[CONTENT_TYPE].to_str().expect("ascii").to_string();
        check!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8(body_of(wire).await.to_vec()).expect("utf-8");
        check!(body.contains("name=\"title\"\r\n\r\nreport\r\n"));
        check!(body.contains("name=\"file\"; filename=\"r.csv\"\r\nContent-Type: text/csv\r\n"));
    }

    #[test]
    fn files_reject_a_scalar_body() {
        let request = HttpRequest::new()
            .with_body(json!(1))
            .with_file("f", FileData::default());
        check!(let Err(Error::InvalidRequest(_)) = build_request(&request, &base(), "test/1"));
    }

    #[test]
    fn no_body_for_a_bare_get() {
        let request = HttpRequest::new().with_url("ping");
        let wire = build_request(&request, &base(), "test/1").expect("request");
        check!(wire.method() == http::Method::GET);
        check!(wire.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn head_from_parts() {
        let (parts, ()) = http::Response::builder()
            .status(404)
            .header("X-Id", "7")
            .body(())
            .expect("response")
            .into_parts();
        let head = response_head(&parts, "https://api.example.com/v1/x");
        check!(head.status_code == 404);
        check!(head.status_text == "Not Found");
        check!(head.url == "https://api.example.com/v1/x");
        check!(head.header("x-id") == Some("7"));
        check!(!head.body.is_loaded());
    }
}
