//! Edit-mode selection
//!
//! Tracks which unit currently has focus in the layout editor. Selecting
//! validates the target against the store; an unknown id fails and leaves
//! the previous selection untouched. Structural removals clear any
//! selection they orphan.

use crate::error::{FloorError, FloorResult};
use crate::layout::LayoutStore;
use shared::floor::UnitKind;

/// The focused unit, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub kind: UnitKind,
    pub section_id: String,
    pub item_id: String,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    current: Option<Selection>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus a unit, validating that it exists with the stated kind
    pub fn select(
        &mut self,
        store: &LayoutStore,
        kind: UnitKind,
        section_id: &str,
        item_id: &str,
    ) -> FloorResult<()> {
        let section = store
            .section(section_id)
            .ok_or_else(|| FloorError::not_found("section", section_id))?;
        let unit = section
            .unit(item_id)
            .ok_or_else(|| FloorError::not_found("unit", item_id))?;
        if unit.kind() != kind {
            return Err(FloorError::not_found("unit", item_id));
        }

        self.current = Some(Selection {
            kind,
            section_id: section_id.to_string(),
            item_id: item_id.to_string(),
        });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Clear the selection if it points into the given section
    pub fn drop_if_in_section(&mut self, section_id: &str) {
        if self
            .current
            .as_ref()
            .is_some_and(|s| s.section_id == section_id)
        {
            self.current = None;
        }
    }

    /// Clear the selection if it points at the given unit
    pub fn drop_if_item(&mut self, item_id: &str) {
        if self.current.as_ref().is_some_and(|s| s.item_id == item_id) {
            self.current = None;
        }
    }
}
