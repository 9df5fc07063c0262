//! Core state and timing for the OpenGCS operator console.
//!
//! Everything here is plain data and single-threaded logic: the shared
//! state store, the telemetry data model, the trail ring buffer, camera
//! mode state, the status edge detector, and the frame/tick clocks.
//! No GPU, no sockets, no audio.

pub mod alerts;
pub mod camera;
pub mod clock;
pub mod store;
pub mod telemetry;
pub mod trail;

pub use alerts::*;
pub use camera::*;
pub use clock::*;
pub use store::*;
pub use telemetry::*;
pub use trail::*;

// Re-export commonly used math types
pub use glam::{Mat4, Quat, Vec2, Vec3};
