//! Single-expansion accordion state.
//!
//! The list container owns this state; cards receive a read-only view
//! and report clicks through `toggle`, the only mutation entry point.
//! Invariant: at most one card is expanded at any time.

use uuid::Uuid;

/// Which card, if any, is currently expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    expanded: Option<Uuid>,
}

/// Outcome of a toggle, for the presentation layer to animate the
/// height/opacity transition between the two visual states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionChange {
    /// Card that left the expanded state
    pub collapsed: Option<Uuid>,
    /// Card that entered the expanded state
    pub expanded: Option<Uuid>,
}

impl Accordion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently expanded card id, if any
    pub fn expanded(&self) -> Option<Uuid> {
        self.expanded
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded == Some(id)
    }

    /// Toggle a card: collapses it when it is the expanded one, otherwise
    /// expands it and collapses whatever was open. Self-inverse.
    pub fn toggle(&mut self, id: Uuid) -> AccordionChange {
        if self.expanded == Some(id) {
            self.expanded = None;
            AccordionChange {
                collapsed: Some(id),
                expanded: None,
            }
        } else {
            let collapsed = self.expanded.replace(id);
            AccordionChange {
                collapsed,
                expanded: Some(id),
            }
        }
    }

    /// Collapse everything (list reload)
    pub fn reset(&mut self) {
        self.expanded = None;
    }
}
