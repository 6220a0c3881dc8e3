//! Input fields, output slots and their destinations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;

use crate::TypeHint;

/// Process-unique identity of a field-claiming transformer.
///
/// Allocated when the transformer is constructed; clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformerId(u64);

impl TransformerId {
    /// Allocate a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TransformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared method parameter, as seen by the transformers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIn {
    name: String,
    type_hint: TypeHint,
    consumed_by: Vec<TransformerId>,
}

impl FieldIn {
    /// Create an unclaimed field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_hint: TypeHint) -> Self {
        Self {
            name: name.into(),
            type_hint,
            consumed_by: Vec::new(),
        }
    }

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

    /// Transformers that claimed this field, in claim order.
    #[must_use]
    pub fn consumed_by(&self) -> &[TransformerId] {
        &self.consumed_by
    }

    /// Returns `true` once any transformer claimed the field.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        !self.consumed_by.is_empty()
    }

    /// Record that `by` claimed this field. Claiming twice is a no-op.
    pub fn consume(&mut self, by: TransformerId) {
        if !self.consumed_by.contains(&by) {
            self.consumed_by.push(by);
        }
    }
}

/// Claim every field named in `names` for `by`.
///
/// Names with no matching field are ignored.
pub fn consume_fields<'a>(
    fields_in: &mut [FieldIn],
    names: impl IntoIterator<Item = &'a str>,
    by: TransformerId,
) {
    for name in names {
        for field in fields_in.iter_mut().filter(|field| field.name == name) {
            field.consume(by);
        }
    }
}

/// Names of the fields claimed by `by`, in declaration order.
#[must_use]
pub fn consumed_fields(fields_in: &[FieldIn], by: TransformerId) -> Vec<&str> {
    fields_in
        .iter()
        .filter(|field| field.consumed_by.contains(&by))
        .map(FieldIn::name)
        .collect()
}

/// Find a field by name.
#[must_use]
pub fn find_field<'a>(fields_in: &'a [FieldIn], name: &str) -> Option<&'a FieldIn> {
    fields_in.iter().find(|field| field.name == name)
}

/// Where a request slot ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FieldDestination {
    /// Request URL.
    #[display("url")]
    Url,
    /// Request header.
    #[display("header")]
    Header,
    /// Request body.
    #[display("body")]
    Body,
    /// Multipart file.
    #[display("file")]
    File,
    /// Query string parameter.
    #[display("query")]
    Query,
    /// Side-channel metadata, never sent.
    #[display("extra")]
    Extra,
}

/// A request slot declared by a transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOut {
    name: Option<String>,
    dest: FieldDestination,
    type_hint: TypeHint,
}

impl FieldOut {
    /// Create a slot.
    #[must_use]
    pub fn new(name: Option<String>, dest: FieldDestination, type_hint: TypeHint) -> Self {
        Self {
            name,
            dest,
            type_hint,
        }
    }

    /// Create a named slot.
    #[must_use]
    pub fn named(name: impl Into<String>, dest: FieldDestination, type_hint: TypeHint) -> Self {
        Self::new(Some(name.into()), dest, type_hint)
    }

    /// Slot name; `None` for the URL and the body.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Slot destination.
    #[must_use]
    pub const fn dest(&self) -> FieldDestination {
        self.dest
    }

    /// Declared type of the value written to the slot.
    #[must_use]
    pub const fn type_hint(&self) -> TypeHint {
        self.type_hint
    }
}
