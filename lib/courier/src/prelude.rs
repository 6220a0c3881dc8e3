//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and macros
//! for easy glob importing:
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use courier_core::prelude::*;
pub use serde::{Deserialize, Serialize};

pub use crate::{BlockingHyperClient, ClientConfig, HyperClient, HyperClientBuilder, StatusCode};
