//! Explicit method signatures.
//!
//! A [`Signature`] declares what a client method accepts: its name, its
//! parameters with their types and defaults, and its result type. Fields are
//! derived from it in declaration order, and call arguments are bound against
//! it.
//!
//! # Example
//!
//! ```
//! use courier_core::{Signature, args};
//! use serde_json::json;
//!
//! let signature = Signature::new("list_posts")
//!     .doc("List posts of a user")
//!     .param::<u64>("user_id")
//!     .param_with_default::<u32>("page", 1)
//!     .returns::<Vec<serde_json::Value>>();
//!
//! let bound = signature.bind(&args!(7)).expect("bind");
//! assert_eq!(bound, vec![("user_id".to_string(), json!(7)), ("page".to_string(), json!(1))]);
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::{Args, Error, FieldIn, Result, TypeHint};

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    type_hint: TypeHint,
    default: Option<Value>,
}

impl Parameter {
    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn type_hint(&self) -> TypeHint {
        self.type_hint
    }

    /// Value used when the caller omits the argument.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns `true` if the caller must supply a value.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Name, parameters and result type of a client method.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    name: String,
    doc: Option<String>,
    params: Vec<Parameter>,
    returns: TypeHint,
    errors: Vec<String>,
}

impl Signature {
    /// Signature with no parameters returning any value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach documentation.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Declare a required parameter of type `T`.
    #[must_use]
    pub fn param<T: ?Sized + 'static>(mut self, name: impl Into<String>) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            type_hint: TypeHint::of::<T>(),
            default: None,
        });
        self
    }

    /// Declare a parameter of type `T` with a default value.
    ///
    /// A default that fails to serialize is reported when the method is
    /// declared.
    #[must_use]
    pub fn param_with_default<T: Serialize + 'static>(
        mut self,
        name: impl Into<String>,
        default: T,
    ) -> Self {
        let name = name.into();
        match serde_json::to_value(default) {
            Ok(value) => self.params.push(Parameter {
                name,
                type_hint: TypeHint::of::<T>(),
                default: Some(value),
            }),
            Err(e) => self.errors.push(format!("default of `{name}`: {e}")),
        }
        self
    }

    /// Declare the result type.
    #[must_use]
    pub fn returns<R: ?Sized + 'static>(mut self) -> Self {
        self.returns = TypeHint::of::<R>();
        self
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Result type.
    #[must_use]
    pub const fn result_type(&self) -> TypeHint {
        self.returns
    }

    /// Unclaimed fields, one per parameter.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldIn> {
        self.params
            .iter()
            .map(|param| FieldIn::new(param.name.clone(), param.type_hint))
            .collect()
    }

    /// Report declaration problems.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArguments`] if a default failed to serialize
    /// or a parameter is declared twice.
    pub fn validate(&self) -> Result<()> {
        if let Some(error) = self.errors.first() {
            return Err(Error::invalid_arguments(format!("{}: {error}", self.name)));
        }
        for (i, param) in self.params.iter().enumerate() {
            if self.params.iter().skip(i + 1).any(|other| other.name == param.name) {
                return Err(Error::invalid_arguments(format!(
                    "{}: parameter `{}` declared twice",
                    self.name, param.name
                )));
            }
        }
        Ok(())
    }

    /// Bind call arguments to the parameters, in declaration order.
    ///
    /// Positional values fill parameters from the left, keyword values by
    /// name, and declared defaults fill what is left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArguments`] for too many positional values, an
    /// unknown keyword, a parameter given twice, a missing required argument,
    /// or a value that failed to serialize.
    pub fn bind(&self, args: &Args) -> Result<Vec<(String, Value)>> {
        if let Some(error) = args.errors().first() {
            return Err(self.invalid(error));
        }
        if args.positional().len() > self.params.len() {
            return Err(self.invalid(&format!(
                "takes {} arguments but {} were given",
                self.params.len(),
                args.positional().len()
            )));
        }

        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in slots.iter_mut().zip(args.positional()) {
            *slot = Some(value.clone());
        }
        for (name, value) in args.keyword() {
            let slot = self
                .params
                .iter()
                .position(|param| &param.name == name)
                .and_then(|i| slots.get_mut(i))
                .ok_or_else(|| self.invalid(&format!("unexpected keyword argument `{name}`")))?;
            if slot.is_some() {
                return Err(self.invalid(&format!("got multiple values for argument `{name}`")));
            }
            *slot = Some(value.clone());
        }

        self.params
            .iter()
            .zip(slots)
            .map(|(param, slot)| {
                slot.or_else(|| param.default.clone())
                    .map(|value| (param.name.clone(), value))
                    .ok_or_else(|| {
                        self.invalid(&format!("missing required argument `{}`", param.name))
                    })
            })
            .collect()
    }

    fn invalid(&self, message: &str) -> Error {
        Error::invalid_arguments(format!("{}: {message}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::args;

    fn signature() -> Signature {
        Signature::new("update")
            .param::<u64>("id")
            .param::<String>("name")
            .param_with_default::<bool>("notify", false)
    }

    fn message(result: Result<Vec<(String, Value)>>) -> String {
        let_assert!(Err(Error::InvalidArguments(message)) = result);
        message
    }

    #[test]
    fn fields_follow_declaration_order() {
        let fields = signature().fields();
        let names: Vec<_> = fields.iter().map(FieldIn::name).collect();
        check!(names == vec!["id", "name", "notify"]);
        check!(fields.iter().all(|field| !field.is_consumed()));
        check!(fields.first().map(FieldIn::type_hint) == Some(TypeHint::of::<u64>()));
    }

    #[test]
    fn bind_positional_keyword_and_defaults() {
        let bound = signature().bind(&args!(1, "x")).expect("bind");
        check!(
            bound
                == vec![
                    ("id".to_string(), json!(1)),
                    ("name".to_string(), json!("x")),
                    ("notify".to_string(), json!(false)),
                ]
        );

        let bound = signature()
            .bind(&Args::new().arg(1).kwarg("notify", true).kwarg("name", "y"))
            .expect("bind");
        check!(bound.get(2) == Some(&("notify".to_string(), json!(true))));
        check!(bound.get(1) == Some(&("name".to_string(), json!("y"))));
    }

    #[test]
    fn bind_errors() {
        check!(message(signature().bind(&args!(1, "x", true, 4))).contains("takes 3 arguments but 4 were given"));
        check!(message(signature().bind(&args!(id = 1, other = 2))).contains("unexpected keyword argument `other`"));
        check!(message(signature().bind(&Args::new().arg(1).kwarg("id", 2))).contains("multiple values for argument `id`"));
        check!(message(signature().bind(&args!(id = 1))).contains("missing required argument `name`"));
    }

    #[test]
    fn validate_rejects_duplicates() {
        let duplicated = Signature::new("dup").param::<u8>("a").param::<u8>("a");
        check!(duplicated.validate().is_err());
        check!(signature().validate().is_ok());
    }

    #[test]
    fn metadata() {
        let signature = Signature::new("get_user").doc("Fetch a user").returns::<String>();
        check!(signature.name() == "get_user");
        check!(signature.documentation() == Some("Fetch a user"));
        check!(signature.result_type() == TypeHint::of::<String>());
        check!(Signature::new("any").result_type().is_any());
    }
}
