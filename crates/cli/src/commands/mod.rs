pub(crate) mod migrate;
pub(crate) mod reconcile;
pub(crate) mod serve;
