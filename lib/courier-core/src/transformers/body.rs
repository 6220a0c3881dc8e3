//! Body, file, method and dump transformers.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::transformer::request_transformers;
use crate::{
    CallArgs, ContentType, Dumper, FieldDestination, FieldIn, FieldOut, FileData, HttpRequest,
    Method, RequestTransformer, Result, TransformerId, TypeHint, consume_fields, find_field,
};

/// Routes one parameter to the request body.
///
/// A parameter name with no matching field claims nothing and declares no
/// body slot; at call time a missing argument leaves the body untouched.
#[derive(Debug, Clone)]
pub struct Body {
    id: TransformerId,
    arg: String,
}

impl Body {
    /// Body taken from the parameter `arg`.
    pub fn new(arg: impl Into<String>) -> Self {
        Self {
            id: TransformerId::next(),
            arg: arg.into(),
        }
    }

    /// Identity used to claim fields.
    #[must_use]
    pub const fn id(&self) -> TransformerId {
        self.id
    }

    /// Parameter routed to the body.
    #[must_use]
    pub fn arg(&self) -> &str {
        &self.arg
    }
}

impl RequestTransformer for Body {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        let Some(type_hint) = find_field(fields_in, &self.arg).map(FieldIn::type_hint) else {
            return Vec::new();
        };
        consume_fields(fields_in, [self.arg.as_str()], self.id);
        vec![FieldOut::new(None, FieldDestination::Body, type_hint)]
    }

    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        if let Some(value) = args.get(&self.arg) {
            request.body = Some(value.clone());
        }
        Ok(request)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({})", self.arg)
    }
}

// ============================================================================
// File
// ============================================================================

/// Attaches one parameter as a multipart file.
///
/// String values are sent as UTF-8, arrays of bytes as-is, `null` leaves the
/// contents empty (the transport then skips the file) and any other value is
/// sent as JSON text.
///
/// # Example
///
/// ```ignore
/// File::new("report").field("attachment").filename("report.csv").content_type("text/csv")
/// ```
#[derive(Debug, Clone)]
pub struct File {
    id: TransformerId,
    arg: String,
    field: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl File {
    /// File taken from the parameter `arg`, sent under the same name.
    pub fn new(arg: impl Into<String>) -> Self {
        Self {
            id: TransformerId::next(),
            arg: arg.into(),
            field: None,
            filename: None,
            content_type: None,
        }
    }

    /// Multipart field name.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Filename of the part.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// MIME type of the part.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Identity used to claim fields.
    #[must_use]
    pub const fn id(&self) -> TransformerId {
        self.id
    }

    fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.arg)
    }
}

fn file_contents(value: &Value) -> Result<Option<Bytes>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(Bytes::from(s.clone().into_bytes()))),
        Value::Array(items) if items.iter().all(|item| item.as_u64().is_some_and(|b| b <= 255)) => {
            Ok(Some(Bytes::from(crate::from_value::<Vec<u8>>(value.clone())?)))
        }
        other => Ok(Some(crate::to_json(other)?)),
    }
}

impl RequestTransformer for File {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        let type_hint = find_field(fields_in, &self.arg).map_or(TypeHint::Any, FieldIn::type_hint);
        consume_fields(fields_in, [self.arg.as_str()], self.id);
        vec![FieldOut::named(
            self.field_name(),
            FieldDestination::File,
            type_hint,
        )]
    }

    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        if let Some(value) = args.get(&self.arg) {
            request.files.push((
                self.field_name().to_string(),
                FileData {
                    contents: file_contents(value)?,
                    filename: self.filename.clone(),
                    content_type: self.content_type.clone(),
                },
            ));
        }
        Ok(request)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File({}", self.arg)?;
        if let Some(field) = &self.field {
            write!(f, ", field={field}")?;
        }
        if let Some(filename) = &self.filename {
            write!(f, ", filename={filename}")?;
        }
        if let Some(content_type) = &self.content_type {
            write!(f, ", content_type={content_type}")?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// Skip / Method
// ============================================================================

/// Claims a parameter without sending it anywhere.
#[derive(Debug, Clone)]
pub struct Skip {
    id: TransformerId,
    arg: Option<String>,
}

impl Skip {
    /// Claim nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TransformerId::next(),
            arg: None,
        }
    }

    /// Claim the parameter `arg`.
    pub fn arg(arg: impl Into<String>) -> Self {
        Self {
            id: TransformerId::next(),
            arg: Some(arg.into()),
        }
    }

    /// Identity used to claim fields.
    #[must_use]
    pub const fn id(&self) -> TransformerId {
        self.id
    }
}

impl Default for Skip {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTransformer for Skip {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        if let Some(arg) = &self.arg {
            consume_fields(fields_in, [arg.as_str()], self.id);
        }
        Vec::new()
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "Skip({arg})"),
            None => f.write_str("Skip"),
        }
    }
}

/// Sets the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMethod(pub Method);

impl RequestTransformer for SetMethod {
    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        _args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        request.method = self.0;
        Ok(request)
    }
}

impl fmt::Display for SetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self.0)
    }
}

// ============================================================================
// Dumps
// ============================================================================

fn describe_dumper(dumper: Option<&Arc<dyn Dumper>>) -> String {
    dumper.map_or_else(|| "client".to_string(), |dumper| format!("{dumper:?}"))
}

/// Dumps the body with the type declared by the body slot.
///
/// Without a dumper of its own the receiving client's request body dumper is
/// used; with neither the body is left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BodyModelDump {
    dumper: Option<Arc<dyn Dumper>>,
}

impl BodyModelDump {
    /// Dump with `dumper`.
    pub fn new(dumper: Arc<dyn Dumper>) -> Self {
        Self {
            dumper: Some(dumper),
        }
    }

    /// Dump with the receiving client's dumper.
    #[must_use]
    pub fn from_client() -> Self {
        Self::default()
    }
}

impl RequestTransformer for BodyModelDump {
    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        let Some(body) = request.body.take() else {
            return Ok(request);
        };
        let dumper = self
            .dumper
            .as_deref()
            .or_else(|| args.client().and_then(|client| client.request_body_dumper()));
        request.body = Some(match dumper {
            Some(dumper) => {
                let type_hint = fields_out
                    .iter()
                    .find(|out| out.dest() == FieldDestination::Body)
                    .map_or(TypeHint::Any, FieldOut::type_hint);
                dumper.dump(body, &type_hint)?
            }
            None => body,
        });
        Ok(request)
    }
}

impl fmt::Display for BodyModelDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyModelDump({})", describe_dumper(self.dumper.as_ref()))
    }
}

/// Dumps every query value with the type declared by its query slot.
///
/// Values with no matching slot are dumped as [`TypeHint::Any`]. Falls back
/// to the receiving client's query dumper like [`BodyModelDump`].
#[derive(Debug, Clone, Default)]
pub struct QueryModelDump {
    dumper: Option<Arc<dyn Dumper>>,
}

impl QueryModelDump {
    /// Dump with `dumper`.
    pub fn new(dumper: Arc<dyn Dumper>) -> Self {
        Self {
            dumper: Some(dumper),
        }
    }

    /// Dump with the receiving client's dumper.
    #[must_use]
    pub fn from_client() -> Self {
        Self::default()
    }
}

impl RequestTransformer for QueryModelDump {
    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        let dumper = self
            .dumper
            .as_deref()
            .or_else(|| args.client().and_then(|client| client.query_param_dumper()));
        let Some(dumper) = dumper else {
            return Ok(request);
        };
        request.query_params = std::mem::take(&mut request.query_params)
            .into_iter()
            .map(|(name, value)| {
                let type_hint = fields_out
                    .iter()
                    .find(|out| out.dest() == FieldDestination::Query && out.name() == Some(name.as_str()))
                    .map_or(TypeHint::Any, FieldOut::type_hint);
                Ok((name, dumper.dump(value, &type_hint)?))
            })
            .collect::<Result<_>>()?;
        Ok(request)
    }
}

impl fmt::Display for QueryModelDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryModelDump({})", describe_dumper(self.dumper.as_ref()))
    }
}

/// Serializes the body to JSON text and sets `Content-Type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDump;

impl RequestTransformer for JsonDump {
    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        _args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        if let Some(body) = request.body.take() {
            request.body = Some(Value::String(serde_json::to_string(&body)?));
            request
                .headers
                .push(("Content-Type".to_string(), ContentType::Json.to_string()));
        }
        Ok(request)
    }
}

impl fmt::Display for JsonDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonDump")
    }
}

request_transformers!(Body, File, Skip, SetMethod, BodyModelDump, QueryModelDump, JsonDump);
