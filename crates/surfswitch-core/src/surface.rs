#![forbid(unsafe_code)]

//! Surface identifiers and lifecycle events.
//!
//! The platform owns every surface. The core only ever holds a
//! [`SurfaceHandle`], a copyable identifier that the platform's surface host
//! resolves when something needs to be drawn. Whether a handle is usable is
//! tracked by the [`SurfaceRegistry`](crate::registry::SurfaceRegistry) from
//! the lifecycle events below.

use std::fmt;

use crate::geometry::Size;

/// Opaque identifier of a platform surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceHandle(pub u64);

impl SurfaceHandle {
    /// Create a handle from a raw platform id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw platform id.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// One of the two selectable input surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputSlot {
    A,
    B,
}

impl InputSlot {
    /// Both slots, in draw order.
    pub const ALL: [InputSlot; 2] = [InputSlot::A, InputSlot::B];

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

impl fmt::Display for InputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the three harness surfaces an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// Where composited frames are presented.
    Output,
    /// A selectable source surface.
    Input(InputSlot),
}

impl fmt::Display for SurfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => f.write_str("output"),
            Self::Input(slot) => write!(f, "input-{slot}"),
        }
    }
}

/// Platform surface lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface became drawable.
    Created(SurfaceHandle),
    /// Format or dimensions changed. Acknowledged, no core behavior.
    Changed { handle: SurfaceHandle, size: Size },
    /// The surface is gone; any reference to it is stale.
    Destroyed(SurfaceHandle),
}

impl SurfaceEvent {
    /// The handle the event refers to.
    #[must_use]
    pub const fn handle(&self) -> SurfaceHandle {
        match *self {
            Self::Created(handle) | Self::Destroyed(handle) => handle,
            Self::Changed { handle, .. } => handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_display() {
        assert_eq!(SurfaceHandle::new(7).to_string(), "surface#7");
        assert_eq!(SurfaceHandle::new(7).raw(), 7);
    }

    #[test]
    fn role_display() {
        assert_eq!(SurfaceRole::Output.to_string(), "output");
        assert_eq!(SurfaceRole::Input(InputSlot::B).to_string(), "input-b");
    }

    #[test]
    fn event_handle_covers_all_variants() {
        let h = SurfaceHandle::new(3);
        assert_eq!(SurfaceEvent::Created(h).handle(), h);
        assert_eq!(SurfaceEvent::Destroyed(h).handle(), h);
        let changed = SurfaceEvent::Changed {
            handle: h,
            size: Size::new(640, 480),
        };
        assert_eq!(changed.handle(), h);
    }

    #[test]
    fn slots_in_draw_order() {
        assert_eq!(InputSlot::ALL, [InputSlot::A, InputSlot::B]);
    }
}
