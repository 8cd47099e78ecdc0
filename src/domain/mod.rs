//! Domain types and ports.
//!
//! Everything here is transport-agnostic: provider modules, the registry that owns them,
//! the request builder and the typed payment outcome.

pub mod payment;
pub mod ports;
pub mod provider;
pub mod registry;
pub mod request;
