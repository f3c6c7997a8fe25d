//! The adderls language server.
//!
//! [`dispatch::serve`] reads framed JSON-RPC off a transport, routes each
//! message into a [`session::Session`], and writes replies and pushed
//! notifications back. The session delegates Python analysis to an
//! [`engine::Engine`]; the production engine is [`bridge::PythonBridge`],
//! a helper interpreter process, and the type checker runs separately via
//! [`mypy`].

pub mod bridge;
pub mod codec;
pub mod dispatch;
pub mod engine;
pub mod mypy;
pub mod protocol;
pub mod rpc;
pub mod session;

pub use bridge::PythonBridge;
pub use dispatch::serve;
pub use engine::{Engine, EngineError};
pub use session::Session;
