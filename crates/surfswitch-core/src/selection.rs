#![forbid(unsafe_code)]

//! The three-way input selection.

use std::fmt;

use crate::surface::InputSlot;

/// Which input surface, if any, feeds the renderer.
///
/// Advancing is cyclic and total: `A -> B -> None -> A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionState {
    #[default]
    A,
    B,
    None,
}

impl SelectionState {
    /// The state reached by one operator advance.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::None,
            Self::None => Self::A,
        }
    }

    /// The input slot backing this state.
    #[must_use]
    pub const fn slot(self) -> Option<InputSlot> {
        match self {
            Self::A => Some(InputSlot::A),
            Self::B => Some(InputSlot::B),
            Self::None => None,
        }
    }

    /// Operator-facing label, named after the marker color of the source.
    ///
    /// This is a projection only; state is never recovered from it.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "RED",
            Self::B => "BLUE",
            Self::None => "NULL",
        }
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
