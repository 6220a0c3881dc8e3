//! JSON-RPC 2.0 envelope transformers.
//!
//! The request side writes the id and method name as extras, then
//! [`PackJsonRpc`] wraps the body into the envelope. The response side checks
//! the id and the `error` member, then [`UnpackJsonRpc`] keeps `result`.
//!
//! ```
//! use courier_core::{
//!     CallArgs, HttpRequest, JsonRpcIdGenerator, JsonRpcMethod, PackJsonRpc, RequestTransformer,
//! };
//! use serde_json::json;
//!
//! let args = CallArgs::detached([("a", json!(1))]);
//! let stages: [&dyn RequestTransformer; 3] = [
//!     &JsonRpcIdGenerator::with(|| "1".to_string()),
//!     &JsonRpcMethod::new("sum"),
//!     &PackJsonRpc,
//! ];
//! let mut request = HttpRequest::new().with_body(json!([1, 2]));
//! for stage in stages {
//!     request = stage.transform_request(request, &[], &[], &args).expect("stage");
//! }
//! assert_eq!(
//!     request.body,
//!     Some(json!({"jsonrpc": "2.0", "id": "1", "method": "sum", "params": [1, 2]}))
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::transformer::{request_transformers, response_transformers};
use crate::{
    CallArgs, Error, FieldDestination, FieldIn, FieldOut, HttpRequest, HttpResponse,
    RequestTransformer, ResponseBody, ResponseTransformer, Result, TypeHint,
};

/// Extra holding the request id.
pub const REQUEST_ID_EXTRA: &str = "JsonRPC.request_id";

/// Extra holding the method name.
pub const METHOD_EXTRA: &str = "JsonRPC.method";

/// Protocol version written in every envelope.
pub const JSON_RPC_VERSION: &str = "2.0";

type IdFn = dyn Fn() -> String + Send + Sync;

// ============================================================================
// Request side
// ============================================================================

/// Generates the request id, a random UUID unless configured otherwise.
#[derive(Clone)]
pub struct JsonRpcIdGenerator {
    generate: Arc<IdFn>,
}

impl JsonRpcIdGenerator {
    /// UUID v4 ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with(|| uuid::Uuid::new_v4().to_string())
    }

    /// Ids produced by `generate`.
    pub fn with(generate: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            generate: Arc::new(generate),
        }
    }
}

impl Default for JsonRpcIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JsonRpcIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRpcIdGenerator").finish_non_exhaustive()
    }
}

impl RequestTransformer for JsonRpcIdGenerator {
    fn transform_fields(&self, _fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        vec![FieldOut::named(
            REQUEST_ID_EXTRA,
            FieldDestination::Extra,
            TypeHint::string(),
        )]
    }

    fn transform_request(
        &self,
        request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        _args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        Ok(request.with_extra(REQUEST_ID_EXTRA, Value::String((self.generate)())))
    }
}

impl fmt::Display for JsonRpcIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonRpcIdGenerator")
    }
}

/// Names the remote method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRpcMethod {
    name: String,
}

impl JsonRpcMethod {
    /// Call the remote method `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Remote method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RequestTransformer for JsonRpcMethod {
    fn transform_fields(&self, _fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        vec![FieldOut::named(
            METHOD_EXTRA,
            FieldDestination::Extra,
            TypeHint::string(),
        )]
    }

    fn transform_request(
        &self,
        request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        _args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        Ok(request.with_extra(METHOD_EXTRA, Value::String(self.name.clone())))
    }
}

impl fmt::Display for JsonRpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonRpcMethod({})", self.name)
    }
}

/// Wraps the body into `{jsonrpc, id, method, params}`.
///
/// `params` is left out when there is no body or the body is `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackJsonRpc;

impl RequestTransformer for PackJsonRpc {
    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        _args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        let extra = |name| request.get_extra(name).cloned().unwrap_or(Value::Null);
        let mut envelope = Map::new();
        envelope.insert("jsonrpc".to_string(), Value::from(JSON_RPC_VERSION));
        envelope.insert("id".to_string(), extra(REQUEST_ID_EXTRA));
        envelope.insert("method".to_string(), extra(METHOD_EXTRA));
        if let Some(params) = request.body.take().filter(|body| !body.is_null()) {
            envelope.insert("params".to_string(), params);
        }
        request.body = Some(Value::Object(envelope));
        Ok(request)
    }
}

impl fmt::Display for PackJsonRpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PackJsonRpc")
    }
}

request_transformers!(JsonRpcIdGenerator, JsonRpcMethod, PackJsonRpc);

// ============================================================================
// Response side
// ============================================================================

/// Fails on an id mismatch or a non-null `error` member.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRpcErrorRaiser;

impl ResponseTransformer for JsonRpcErrorRaiser {
    fn need_response_body(&self, _response: &HttpResponse) -> bool {
        true
    }

    fn transform_response(
        &self,
        request: &HttpRequest,
        mut response: HttpResponse,
    ) -> Result<HttpResponse> {
        let envelope = response.body.to_value()?;
        let expected = request
            .get_extra(REQUEST_ID_EXTRA)
            .cloned()
            .unwrap_or(Value::Null);
        let actual = envelope.get("id").cloned().unwrap_or(Value::Null);
        if actual != expected {
            return Err(Error::JsonRpcIdMismatch { expected, actual });
        }

        if let Some(error) = envelope.get("error").filter(|error| !error.is_null()) {
            return Err(rpc_error(error));
        }

        response.body = ResponseBody::Value(envelope);
        Ok(response)
    }
}

/// Error object to [`Error::JsonRpc`]; one without an integer `code` and a
/// string `message` is a codec error.
fn rpc_error(error: &Value) -> Error {
    let code = error.get("code").and_then(Value::as_i64);
    let message = error.get("message").and_then(Value::as_str);
    let (Some(code), Some(message)) = (code, message) else {
        return Error::codec(format!("malformed JSON-RPC error object: {error}"));
    };
    Error::JsonRpc {
        code,
        message: message.to_string(),
        data: error.get("data").filter(|data| !data.is_null()).cloned(),
    }
}

impl fmt::Display for JsonRpcErrorRaiser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonRpcErrorRaiser")
    }
}

/// Replaces the envelope with its `result` member (`null` when absent).
#[derive(Debug, Clone, Copy, Default)]
pub struct UnpackJsonRpc;

impl ResponseTransformer for UnpackJsonRpc {
    fn need_response_body(&self, _response: &HttpResponse) -> bool {
        true
    }

    fn transform_response(
        &self,
        _request: &HttpRequest,
        mut response: HttpResponse,
    ) -> Result<HttpResponse> {
        let result = match response.body.to_value()? {
            Value::Object(mut envelope) => envelope.remove("result").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        response.body = ResponseBody::Value(result);
        Ok(response)
    }
}

impl fmt::Display for UnpackJsonRpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnpackJsonRpc")
    }
}

response_transformers!(JsonRpcErrorRaiser, UnpackJsonRpc);

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    fn no_args() -> CallArgs<'static> {
        CallArgs::detached(Vec::<(String, Value)>::new())
    }

    fn packed(body: Option<Value>) -> Value {
        let mut request = HttpRequest::new()
            .with_extra(REQUEST_ID_EXTRA, json!("some_id"))
            .with_extra(METHOD_EXTRA, json!("some_method"));
        request.body = body;
        PackJsonRpc
            .transform_request(request, &[], &[], &no_args())
            .expect("pack")
            .body
            .expect("envelope")
    }

    #[test]
    fn pack_without_body_omits_params() {
        let expected = json!({"id": "some_id", "method": "some_method", "jsonrpc": "2.0"});
        check!(packed(None) == expected);
        check!(packed(Some(Value::Null)) == expected);
    }

    #[test]
    fn pack_with_body() {
        check!(
            packed(Some(json!({"param1": "value1"})))
                == json!({
                    "id": "some_id",
                    "method": "some_method",
                    "jsonrpc": "2.0",
                    "params": {"param1": "value1"},
                })
        );
    }

    #[test]
    fn id_generator_writes_extra() {
        let generator = JsonRpcIdGenerator::new();
        let out = generator.transform_fields(&mut []);
        check!(out == vec![FieldOut::named(REQUEST_ID_EXTRA, FieldDestination::Extra, TypeHint::string())]);

        let request = generator
            .transform_request(HttpRequest::new(), &[], &out, &no_args())
            .expect("id");
        let_assert!(Some(Value::String(id)) = request.get_extra(REQUEST_ID_EXTRA));
        check!(uuid::Uuid::parse_str(id).is_ok());

        let fixed = JsonRpcIdGenerator::with(|| "fixed".to_string());
        let request = fixed
            .transform_request(HttpRequest::new(), &[], &[], &no_args())
            .expect("id");
        check!(request.get_extra(REQUEST_ID_EXTRA) == Some(&json!("fixed")));
    }

    #[test]
    fn method_writes_extra() {
        let method = JsonRpcMethod::new("eth_blockNumber");
        let request = method
            .transform_request(HttpRequest::new(), &[], &[], &no_args())
            .expect("method");
        check!(request.get_extra(METHOD_EXTRA) == Some(&json!("eth_blockNumber")));
        check!(method.to_string() == "JsonRpcMethod(eth_blockNumber)");
    }

    fn rpc_response(body: Value) -> HttpResponse {
        HttpResponse::new(200, "OK").with_body(ResponseBody::Value(body))
    }

    fn rpc_request(id: &str) -> HttpRequest {
        HttpRequest::new().with_extra(REQUEST_ID_EXTRA, json!(id))
    }

    #[test]
    fn error_raiser_passes_result() {
        let response = JsonRpcErrorRaiser
            .transform_response(&rpc_request("1"), rpc_response(json!({"jsonrpc": "2.0", "id": "1", "result": 3})))
            .expect("valid");
        let unpacked = UnpackJsonRpc
            .transform_response(&rpc_request("1"), response)
            .expect("unpack");
        check!(unpacked.body == ResponseBody::Value(json!(3)));
    }

    #[test]
    fn error_raiser_parses_raw_body() {
        let raw = Bytes::from_static(br#"{"jsonrpc":"2.0","id":"1","result":[1]}"#);
        let response = HttpResponse::new(200, "OK").with_body(ResponseBody::Raw(raw));
        check!(JsonRpcErrorRaiser.need_response_body(&response));
        let response = JsonRpcErrorRaiser
            .transform_response(&rpc_request("1"), response)
            .expect("valid");
        check!(response.body == ResponseBody::Value(json!({"jsonrpc": "2.0", "id": "1", "result": [1]})));
    }

    #[test]
    fn error_raiser_detects_id_mismatch() {
        let result = JsonRpcErrorRaiser.transform_response(
            &rpc_request("1"),
            rpc_response(json!({"jsonrpc": "2.0", "id": "2", "result": 3})),
        );
        let_assert!(Err(Error::JsonRpcIdMismatch { expected, actual }) = result);
        check!(expected == json!("1"));
        check!(actual == json!("2"));
    }

    #[test]
    fn error_raiser_raises_error_member() {
        let result = JsonRpcErrorRaiser.transform_response(
            &rpc_request("1"),
            rpc_response(json!({
                "jsonrpc": "2.0",
                "id": "1",
                "error": {"code": -32601, "message": "Method not found", "data": {"method": "nope"}},
            })),
        );
        let_assert!(Err(Error::JsonRpc { code, message, data }) = result);
        check!(code == -32601);
        check!(message == "Method not found");
        check!(data == Some(json!({"method": "nope"})));
    }

    #[test]
    fn error_without_data() {
        let result = JsonRpcErrorRaiser.transform_response(
            &rpc_request("1"),
            rpc_response(json!({"jsonrpc": "2.0", "id": "1", "error": {"code": 1, "message": "boom"}})),
        );
        let_assert!(Err(Error::JsonRpc { data: None, .. }) = result);
    }

    #[test]
    fn null_error_member_is_absent() {
        let response = JsonRpcErrorRaiser
            .transform_response(
                &rpc_request("1"),
                rpc_response(json!({"jsonrpc": "2.0", "id": "1", "result": 1, "error": null})),
            )
            .expect("no error");
        let unpacked = UnpackJsonRpc
            .transform_response(&rpc_request("1"), response)
            .expect("unpack");
        check!(unpacked.body == ResponseBody::Value(json!(1)));
    }

    #[test]
    fn malformed_error_member() {
        for error in [json!({"message": "no code"}), json!({"code": 1}), json!("boom")] {
            let result = JsonRpcErrorRaiser.transform_response(
                &rpc_request("1"),
                rpc_response(json!({"jsonrpc": "2.0", "id": "1", "error": error})),
            );
            let_assert!(Err(Error::Codec(message)) = result);
            check!(message.starts_with("malformed JSON-RPC error object"));
        }
    }

    #[test]
    fn unpack_missing_result_is_null() {
        let response = UnpackJsonRpc
            .transform_response(&HttpRequest::new(), rpc_response(json!({"jsonrpc": "2.0", "id": null})))
            .expect("unpack");
        check!(response.body == ResponseBody::Value(Value::Null));
    }
}
