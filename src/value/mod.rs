//! Argument values: the dynamic input model and its bounded output form.
//!
//! ## Contents
//! - [`Value`], [`Array`], [`Object`], [`HostObject`] what callers log
//! - [`SafeValue`] and the sentinel constants what subscribers receive
//! - [`inspect`] console-style rendering used by the default sinks

mod inspect;
mod safe;
#[allow(clippy::module_inception)]
mod value;

pub use inspect::{format_args, inspect};
pub use safe::{
    omitted_summary, SafeValue, CIRCULAR_REFERENCE, ERROR_ACCESSING_PROPERTY, MAX_DEPTH_REACHED,
    OMITTED_KEY,
};
pub use value::{Array, HostObject, Object, Value};
