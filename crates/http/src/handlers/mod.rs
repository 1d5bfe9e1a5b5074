#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod profile;
pub mod reconcile;
pub mod sessions;
