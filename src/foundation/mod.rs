pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod events;
pub(crate) mod guard;
