pub(crate) mod remap;
