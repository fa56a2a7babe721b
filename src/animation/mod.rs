pub(crate) mod controller;
pub(crate) mod ease;
pub(crate) mod preset;
pub(crate) mod segment;
pub(crate) mod spec;
