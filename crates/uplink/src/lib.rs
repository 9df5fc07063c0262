//! Network boundary: wire messages, session binding, and the simulator
//! link.
//!
//! Framing is newline-delimited JSON over TCP, one object per line,
//! tagged by an `"event"` field. A reader thread parses inbound lines
//! and feeds a channel; the console drains it on the main thread each
//! frame, so all store mutation stays on one thread. Reconnection policy
//! is out of scope; a dropped link is surfaced only as a connection
//! status the UI reflects.

pub mod client;
pub mod messages;
pub mod session;

pub use client::*;
pub use messages::*;
pub use session::*;
