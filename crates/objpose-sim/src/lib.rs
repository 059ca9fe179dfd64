#![deny(missing_docs)]
//! Physics simulator session used to visualize and validate estimated poses.
//!
//! The physics engine itself lives behind the [`backend::PhysicsBackend`] trait; the
//! session owns the bodies it creates.

/// The physics engine boundary.
pub mod backend;

/// Error types for the simulator module.
pub mod error;

/// Description of a mesh model to add to the world.
pub mod model;

/// Static scene snapshots.
pub mod scene;

/// Simulator sessions.
pub mod session;

pub use crate::error::SimError;
pub use crate::session::{SimSession, UpAxis};
