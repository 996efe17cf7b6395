#![forbid(unsafe_code)]

//! Core types for surfswitch.
//!
//! # Role in surfswitch
//! `surfswitch-core` holds the data every other crate agrees on: pixel
//! geometry, surface handles and their lifecycle events, the
//! [`SurfaceRegistry`] that tracks which surfaces are usable, and the
//! [`SelectionState`] the operator cycles through.
//!
//! Nothing in this crate talks to a platform or a renderer; those seams live
//! in `surfswitch-backend`.

pub mod geometry;
pub mod registry;
pub mod selection;
pub mod surface;

pub use geometry::{Rect, Size};
pub use registry::SurfaceRegistry;
pub use selection::SelectionState;
pub use surface::{InputSlot, SurfaceEvent, SurfaceHandle, SurfaceRole};
