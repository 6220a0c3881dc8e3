//! Definition-time method resolution.
//!
//! A [`Resolution`] starts from a [`Signature`] and runs each request
//! transformer's [`RequestTransformer::transform_fields`] as it is added, so
//! fields are claimed and output slots declared in list order. Builders add
//! their own stages on top and then freeze the result into a [`MethodSpec`],
//! which is immutable and shared by every call.

use std::fmt;
use std::sync::Arc;

use crate::{
    Error, FieldDestination, FieldIn, FieldOut, RequestTransformer, ResponseTransformer, Result,
    Signature, Transformer, TypeHint,
};

/// Frozen description of one client method.
#[derive(Clone)]
pub struct MethodSpec {
    signature: Signature,
    fields_in: Vec<FieldIn>,
    fields_out: Vec<FieldOut>,
    request_transformers: Vec<Arc<dyn RequestTransformer>>,
    response_transformers: Vec<Arc<dyn ResponseTransformer>>,
}

impl MethodSpec {
    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.signature.name()
    }

    /// Documentation, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.signature.documentation()
    }

    /// Declared signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Fields with their final consumption.
    #[must_use]
    pub fn fields_in(&self) -> &[FieldIn] {
        &self.fields_in
    }

    /// Request slots written by the request transformers.
    #[must_use]
    pub fn fields_out(&self) -> &[FieldOut] {
        &self.fields_out
    }

    /// Declared result type.
    #[must_use]
    pub const fn result_type(&self) -> TypeHint {
        self.signature.result_type()
    }

    /// Request stages in application order.
    #[must_use]
    pub fn request_transformers(&self) -> &[Arc<dyn RequestTransformer>] {
        &self.request_transformers
    }

    /// Response stages in application order.
    #[must_use]
    pub fn response_transformers(&self) -> &[Arc<dyn ResponseTransformer>] {
        &self.response_transformers
    }

    /// Descriptions of the request stages, e.g. `["Url(/users)", "Method(GET)"]`.
    #[must_use]
    pub fn request_chain(&self) -> Vec<String> {
        self.request_transformers
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Descriptions of the response stages.
    #[must_use]
    pub fn response_chain(&self) -> Vec<String> {
        self.response_transformers
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name())
            .field("fields_in", &self.fields_in)
            .field("fields_out", &self.fields_out)
            .field("request_transformers", &self.request_chain())
            .field("response_transformers", &self.response_chain())
            .finish()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// A [`MethodSpec`] under construction.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use courier_core::{Body, Resolution, Signature};
///
/// let signature = Signature::new("create").param::<String>("a").param::<String>("b");
/// let mut resolution = Resolution::new(signature).expect("valid signature");
/// resolution.add_request(Arc::new(Body::new("a"))).expect("first body");
/// assert!(resolution.add_request(Arc::new(Body::new("b"))).is_err());
/// ```
pub struct Resolution {
    spec: MethodSpec,
    body_owner: Option<String>,
}

impl Resolution {
    /// Start from the unclaimed fields of `signature`.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is invalid (see [`Signature::validate`]).
    pub fn new(signature: Signature) -> Result<Self> {
        signature.validate()?;
        Ok(Self {
            spec: MethodSpec {
                fields_in: signature.fields(),
                signature,
                fields_out: Vec::new(),
                request_transformers: Vec::new(),
                response_transformers: Vec::new(),
            },
            body_owner: None,
        })
    }

    /// Add a stage of either direction.
    ///
    /// # Errors
    ///
    /// See [`Resolution::add_request`].
    pub fn add(&mut self, transformer: Transformer) -> Result<()> {
        match transformer {
            Transformer::Request(stage) => self.add_request(stage),
            Transformer::Response(stage) => {
                self.add_response(stage);
                Ok(())
            }
        }
    }

    /// Claim fields for `stage` and append it to the request side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MultipleBody`] if `stage` declares a body slot when
    /// one already exists.
    pub fn add_request(&mut self, stage: Arc<dyn RequestTransformer>) -> Result<()> {
        let fields_out = stage.transform_fields(&mut self.spec.fields_in);
        for field in &fields_out {
            if field.dest() != FieldDestination::Body {
                continue;
            }
            if let Some(existing) = &self.body_owner {
                return Err(Error::multiple_body(existing.clone(), stage.to_string()));
            }
            self.body_owner = Some(stage.to_string());
        }
        self.spec.fields_out.extend(fields_out);
        self.spec.request_transformers.push(stage);
        Ok(())
    }

    /// Append a response stage.
    pub fn add_response(&mut self, stage: Arc<dyn ResponseTransformer>) {
        self.spec.response_transformers.push(stage);
    }

    /// Returns `true` once a body slot is declared.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.body_owner.is_some()
    }

    /// Type of the body slot, [`TypeHint::Any`] without one.
    #[must_use]
    pub fn body_type(&self) -> TypeHint {
        self.spec
            .fields_out
            .iter()
            .find(|field| field.dest() == FieldDestination::Body)
            .map_or(TypeHint::Any, FieldOut::type_hint)
    }

    /// Names of the fields no stage has claimed, in declaration order.
    #[must_use]
    pub fn unclaimed(&self) -> Vec<String> {
        self.spec
            .fields_in
            .iter()
            .filter(|field| !field.is_consumed())
            .map(|field| field.name().to_string())
            .collect()
    }

    /// Declared result type.
    #[must_use]
    pub const fn result_type(&self) -> TypeHint {
        self.spec.result_type()
    }

    /// Freeze into the shared spec.
    #[must_use]
    pub fn finish(self) -> MethodSpec {
        self.spec
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("spec", &self.spec)
            .field("body_owner", &self.body_owner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{Body, ErrorRaiser, Query, Url, consumed_fields};

    fn signature() -> Signature {
        Signature::new("create")
            .param::<u64>("id")
            .param::<String>("a")
            .param::<String>("b")
    }

    #[test]
    fn claims_in_list_order() {
        let url = Url::new("/items/{id}");
        let query = Query::new("a");
        let (url_id, query_id) = (url.id(), query.id());

        let mut resolution = Resolution::new(signature()).expect("signature");
        resolution.add(url.into()).expect("url");
        resolution.add(query.into()).expect("query");
        resolution.add(ErrorRaiser::new().into()).expect("raiser");

        check!(resolution.unclaimed() == vec!["b".to_string()]);
        check!(!resolution.has_body());

        let spec = resolution.finish();
        check!(consumed_fields(spec.fields_in(), url_id) == vec!["id"]);
        check!(consumed_fields(spec.fields_in(), query_id) == vec!["a"]);
        check!(spec.fields_out().len() == 2);
        check!(spec.request_chain() == vec!["Url(/items/{id})", "Query(a)"]);
        check!(spec.response_chain() == vec!["ErrorRaiser"]);
    }

    #[test]
    fn second_body_is_rejected() {
        let mut resolution = Resolution::new(signature()).expect("signature");
        resolution.add_request(Arc::new(Body::new("a"))).expect("first");
        check!(resolution.has_body());
        check!(resolution.body_type() == TypeHint::of::<String>());

        let result = resolution.add_request(Arc::new(Body::new("b")));
        let_assert!(Err(Error::MultipleBody { existing, new }) = result);
        check!(existing == "Body(a)");
        check!(new == "Body(b)");
    }

    #[test]
    fn body_within_pipe_is_rejected() {
        let mut resolution = Resolution::new(signature()).expect("signature");
        let result = resolution.add((Body::new("a") | Body::new("b")).into());
        check!(let Err(Error::MultipleBody { .. }) = result);
    }

    #[test]
    fn invalid_signature() {
        let signature = Signature::new("dup").param::<u8>("x").param::<u8>("x");
        check!(let Err(Error::InvalidArguments(_)) = Resolution::new(signature));
    }
}
