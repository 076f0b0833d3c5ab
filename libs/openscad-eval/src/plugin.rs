//! # Plugin Resolution Hook
//!
//! The evaluator has no notion of a plugin registry itself (that lives in
//! `openscad-engine`, which depends on this crate, not the other way
//! around); it only defines the extension point. A host embedding the
//! evaluator implements [`PluginResolver`] and attaches it to an
//! [`crate::visitor::EvalContext`] via [`crate::visitor::EvalContext::with_plugins`].
//!
//! Per §4.3's module-call resolution order (user-defined modules, then
//! built-ins, then plugin-registered extensions, then "unknown module"),
//! the resolver is consulted last, only for names that matched nothing else.

use crate::geometry::GeometryNode;
use crate::value::Value;

/// A host-registered source of additional module constructors, consulted
/// after built-ins and user-defined modules fail to match a call.
pub trait PluginResolver: Send + Sync {
    /// Attempt to build geometry for `name`, called with its already
    /// evaluated positional argument values. Returns `None` if this
    /// resolver does not recognize `name`, letting the evaluator fall
    /// through to an "unknown module" warning.
    fn resolve(&self, name: &str, args: &[Value]) -> Option<GeometryNode>;
}
