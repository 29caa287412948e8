//! Server Module
//!
//! Everything outside the deterministic rules: persistence, configuration,
//! the wire protocol, and the async service that ties them together.
//!
//! ## Module Structure
//!
//! - `store`: Typed-arena entity store
//! - `config`: Engine configuration
//! - `protocol`: JSON request/response bodies
//! - `service`: Game lifecycle, order submission, turn barrier

pub mod store;
pub mod config;
pub mod protocol;
pub mod service;

pub use config::EngineConfig;
pub use protocol::WireMessage;
pub use service::GameService;
pub use store::{Store, Table};
