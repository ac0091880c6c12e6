//! HTTP surfaces for the collaborator binaries.
//!
//! Two small axum apps live here: the REST backend that implements the
//! actual tool logic, and the tool gateway that exposes the registry to
//! remote orchestrators. The core never imports this module.

pub mod backend;
pub mod gateway;
