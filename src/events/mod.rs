//! Event publication and hook subscription.
//!
//! Card behavior attaches to the engine by registering [`Hook`]s with the
//! [`EventDispatcher`]; the resolution rules publish named topics at fixed
//! points and read any values handlers wrote back into the shared
//! [`EventContext`].

mod context;
mod dispatcher;
pub mod topics;

pub use context::EventContext;
pub use dispatcher::{EventDispatcher, Handler, Hook, HookId};
