//! Declared types of parameters, slots and results.

use std::any::{TypeId, type_name};
use std::fmt;

use serde_json::Value;

/// Type annotation attached to a field or a method result.
///
/// Captured at compile time with [`TypeHint::of`]; codecs receive it to
/// decide how a value should be shaped. [`TypeHint::Any`] stands for an
/// absent annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeHint {
    /// No annotation.
    #[default]
    Any,
    /// A concrete Rust type.
    Type {
        /// Fully qualified type name.
        name: &'static str,
        /// Identity of the type.
        id: TypeId,
    },
}

impl TypeHint {
    /// Hint for the type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Hint used by string templates.
    #[must_use]
    pub fn string() -> Self {
        Self::of::<String>()
    }

    /// Returns `true` if this hint names exactly `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        match self {
            Self::Any => false,
            Self::Type { id, .. } => *id == TypeId::of::<T>(),
        }
    }

    /// Returns `true` for [`TypeHint::Any`] and for an untyped JSON value,
    /// both of which skip typed decoding.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any) || self.is::<Value>()
    }

    /// Type name, `any` for [`TypeHint::Any`].
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Type { name, .. } => *name,
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
