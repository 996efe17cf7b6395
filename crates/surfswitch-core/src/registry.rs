#![forbid(unsafe_code)]

//! Registry of the harness's three surfaces.
//!
//! The registry is the only place surface references live. It is written by
//! lifecycle callbacks and read by the selector and the overlay loop, all on
//! the same execution context, so it is a plain struct with no interior
//! mutability. Absence is a normal value: nothing here can fail.

use crate::surface::{InputSlot, SurfaceHandle, SurfaceRole};

/// Current references to the output surface and both input surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceRegistry {
    output: Option<SurfaceHandle>,
    input_a: Option<SurfaceHandle>,
    input_b: Option<SurfaceHandle>,
}

impl SurfaceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            output: None,
            input_a: None,
            input_b: None,
        }
    }

    /// Record or clear the output target.
    pub fn set_output_surface(&mut self, handle: Option<SurfaceHandle>) {
        self.output = handle;
    }

    /// Record or clear one of the input targets.
    pub fn set_input_surface(&mut self, slot: InputSlot, handle: Option<SurfaceHandle>) {
        *self.slot_mut(slot) = handle;
    }

    /// Current output target.
    #[inline]
    #[must_use]
    pub const fn output(&self) -> Option<SurfaceHandle> {
        self.output
    }

    /// Current handle for `slot`, if any.
    #[inline]
    #[must_use]
    pub const fn get(&self, slot: InputSlot) -> Option<SurfaceHandle> {
        match slot {
            InputSlot::A => self.input_a,
            InputSlot::B => self.input_b,
        }
    }

    /// True iff a live handle is on file for `slot`.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self, slot: InputSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Handle on file for any role.
    #[must_use]
    pub const fn get_role(&self, role: SurfaceRole) -> Option<SurfaceHandle> {
        match role {
            SurfaceRole::Output => self.output,
            SurfaceRole::Input(slot) => self.get(slot),
        }
    }

    /// Record `handle` for any role.
    pub fn set_role(&mut self, role: SurfaceRole, handle: Option<SurfaceHandle>) {
        match role {
            SurfaceRole::Output => self.set_output_surface(handle),
            SurfaceRole::Input(slot) => self.set_input_surface(slot, handle),
        }
    }

    /// Drop the reference held for `role` if it is `handle`.
    ///
    /// A destruction notice for a handle that has already been replaced is
    /// stale and leaves the newer reference in place. Returns `true` when a
    /// reference was cleared.
    pub fn revoke(&mut self, role: SurfaceRole, handle: SurfaceHandle) -> bool {
        if self.get_role(role) == Some(handle) {
            self.set_role(role, None);
            true
        } else {
            false
        }
    }

    /// Drop every reference.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn slot_mut(&mut self, slot: InputSlot) -> &mut Option<SurfaceHandle> {
        match slot {
            InputSlot::A => &mut self.input_a,
            InputSlot::B => &mut self.input_b,
        }
    }
}
