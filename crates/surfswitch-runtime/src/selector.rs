#![forbid(unsafe_code)]

//! Input selection state machine.
//!
//! The operator cycles the renderer's input through `A -> B -> None -> A`.
//! Each advance resolves the new state against a registry snapshot and makes
//! exactly one `set_input_surface` call. A target that is not ready resolves
//! to `None`, which the renderer treats as idle. There is no re-resolution
//! when surfaces come and go later; the operator advances again instead.
//!
//! The one exception is priming: before the first advance, input A becoming
//! ready is forwarded so the harness starts out consuming A.

use surfswitch_backend::RendererFacade;
use surfswitch_core::registry::SurfaceRegistry;
use surfswitch_core::selection::SelectionState;
use surfswitch_core::surface::{InputSlot, SurfaceHandle};

/// Record of one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SelectionState,
    pub to: SelectionState,
    /// What was forwarded to the renderer.
    pub input: Option<SurfaceHandle>,
}

/// Cyclic three-state input selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSelector {
    state: SelectionState,
    transitions: u64,
}

impl InputSelector {
    /// Selector in the initial `A` state.
    pub const fn new() -> Self {
        Self {
            state: SelectionState::A,
            transitions: 0,
        }
    }

    #[inline]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    /// Operator-facing label for the current state.
    #[inline]
    pub const fn label(&self) -> &'static str {
        self.state.label()
    }

    /// Number of advances performed.
    #[inline]
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Advance to the next state and point the renderer at its surface.
    pub fn advance<R>(&mut self, registry: &SurfaceRegistry, renderer: &mut R) -> Transition
    where
        R: RendererFacade + ?Sized,
    {
        let from = self.state;
        let to = from.next();
        let input = to.slot().and_then(|slot| registry.get(slot));

        self.state = to;
        self.transitions += 1;
        renderer.set_input_surface(input);

        tracing::debug!(
            from = from.label(),
            to = to.label(),
            input = ?input,
            "input selection advanced"
        );
        Transition { from, to, input }
    }

    /// Forward input A once it becomes ready, if no advance has happened yet.
    ///
    /// Returns the forwarded handle, or `None` when priming does not apply.
    pub fn prime<R>(&mut self, registry: &SurfaceRegistry, renderer: &mut R) -> Option<SurfaceHandle>
    where
        R: RendererFacade + ?Sized,
    {
        if self.transitions > 0 || self.state != SelectionState::A {
            return None;
        }
        let handle = registry.get(InputSlot::A)?;
        renderer.set_input_surface(Some(handle));
        tracing::debug!(input = %handle, "initial input primed");
        Some(handle)
    }
}
