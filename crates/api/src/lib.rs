//! HTTP host adapter: drives the gate from an axum request pipeline.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
