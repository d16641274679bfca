//! Automatic argument injection
//!
//! A [`ClassDef`] is a name, an initializer and a table of [`Method`]s, each
//! with an explicit [`Signature`]. Decorating it with
//! [`Decorate::directed_inputs`] yields a [`DirectedClass`] whose instances
//! ([`Directed`]) carry an [`InputContext`](crate::context::InputContext).
//! On every call to a public instance method the caller's arguments are bound
//! first; each omitted parameter is then resolved from inputs, and only what
//! is still unbound falls back to the declared default.

mod binder;
mod class;
mod method;
mod signature;

pub use binder::{BoundArguments, CallArgs, bind_partial};
pub use class::{
    CONFIG_KWARG, ClassDef, Decorate, Directed, DirectedClass, DirectedInputsMetadata, Initializer,
    RUNTIME_LOGGING_KWARG, RUNTIME_SETTINGS_KWARG,
};
pub use method::{AsyncBody, Method, MethodBody, MethodKind, SyncBody};
pub use signature::{Param, ParamKind, Signature};
