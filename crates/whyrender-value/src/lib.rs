//! Value model for whyrender.
//!
//! Attribute maps handed to the change detector are built from [`Value`]s.
//! Composite values (objects, arrays) and functions are shared handles, so
//! cloning a value keeps its identity while building a new one does not.
//! This is what lets the detector tell "same reference" apart from "same
//! structure".
//!
//! # Key Types
//!
//! - [`Value`] — A dynamically typed attribute value
//! - [`ObjectRef`] — Shared, insertion-ordered object or array
//! - [`FunctionRef`] — Shared callable, carried as its name and source text
//! - [`ValueKind`] — Up-front classification used to dispatch diffs
//! - [`JsonLoader`] — Builds values from JSON documents

pub mod equality;
pub mod error;
pub mod json;
pub mod kind;
pub mod value;

mod inspect;

pub use error::{LoadError, SerializationError};
pub use json::JsonLoader;
pub use kind::{PrimitiveKind, ValueKind};
pub use value::{FunctionRef, ObjectKind, ObjectRef, Value};
