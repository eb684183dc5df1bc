//! LayoutStore - canonical in-memory sections for the active session
//!
//! Mutations take effect immediately in memory and never persist
//! automatically; the manager decides when a snapshot goes to the save
//! worker. All lookups address entities by id, never by index.

use super::seed::{SEED_TABLE_COUNTER, default_layout};
use crate::error::{FloorError, FloorResult};
use shared::floor::{BarItem, Orientation, Position, Seatable, Section, Size, TableItem};

/// Canonical in-memory list of sections plus the monotonic table counter
/// used to name newly added tables.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    sections: Vec<Section>,
    table_counter: u64,
}

impl LayoutStore {
    /// Wrap an already-hydrated layout
    pub fn new(sections: Vec<Section>, table_counter: u64) -> Self {
        Self {
            sections,
            table_counter,
        }
    }

    /// Start from the default seed (first-time user, or load degraded)
    pub fn seeded() -> Self {
        Self::new(default_layout(), SEED_TABLE_COUNTER)
    }

    /// Current snapshot, read-only
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn table_counter(&self) -> u64 {
        self.table_counter
    }

    /// Bulk replace after a successful load. Caller guarantees invariants.
    pub fn replace_sections(&mut self, sections: Vec<Section>, table_counter: u64) {
        self.sections = sections;
        self.table_counter = table_counter;
    }

    /// Apply a structural change to exactly one section
    pub fn mutate_section<F>(&mut self, section_id: &str, updater: F) -> FloorResult<()>
    where
        F: FnOnce(&mut Section),
    {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| FloorError::not_found("section", section_id))?;
        updater(section);
        Ok(())
    }

    // ========== Structural Edits ==========

    /// Add a new empty section, returns its id
    pub fn add_section(&mut self, name: impl Into<String>, position: Position, size: Size) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sections
            .push(Section::new(id.clone(), name, position, size));
        id
    }

    /// Add a table named from the persisted counter, returns its id
    pub fn add_table(&mut self, section_id: &str, position: Position) -> FloorResult<String> {
        let n = self.table_counter;
        let id = format!("table-{}", n);
        let table = TableItem::new(id.clone(), format!("Mesa {}", n), position);
        self.mutate_section(section_id, |section| section.tables.push(table))?;
        self.table_counter += 1;
        Ok(id)
    }

    /// Add a bar, returns its id
    pub fn add_bar(
        &mut self,
        section_id: &str,
        position: Position,
        size: Size,
        orientation: Orientation,
    ) -> FloorResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let bar = BarItem::new(id.clone(), "Barra", position, size, orientation);
        self.mutate_section(section_id, |section| section.bars.push(bar))?;
        Ok(id)
    }

    /// Move a unit within its section
    pub fn move_unit(
        &mut self,
        section_id: &str,
        unit_id: &str,
        position: Position,
    ) -> FloorResult<()> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| FloorError::not_found("section", section_id))?;
        if let Some(table) = section.tables.iter_mut().find(|t| t.id == unit_id) {
            table.position = position;
            return Ok(());
        }
        if let Some(bar) = section.bars.iter_mut().find(|b| b.id == unit_id) {
            bar.position = position;
            return Ok(());
        }
        Err(FloorError::not_found("unit", unit_id))
    }

    /// Remove a unit from its section (its account history goes with it)
    pub fn remove_unit(&mut self, section_id: &str, unit_id: &str) -> FloorResult<()> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| FloorError::not_found("section", section_id))?;
        let before = section.tables.len() + section.bars.len();
        section.tables.retain(|t| t.id != unit_id);
        section.bars.retain(|b| b.id != unit_id);
        if section.tables.len() + section.bars.len() == before {
            return Err(FloorError::not_found("unit", unit_id));
        }
        Ok(())
    }

    /// Remove a whole section and everything it owns
    pub fn remove_section(&mut self, section_id: &str) -> FloorResult<()> {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != section_id);
        if self.sections.len() == before {
            return Err(FloorError::not_found("section", section_id));
        }
        Ok(())
    }

    // ========== Lookups ==========

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Find a unit anywhere on the floor
    pub fn unit(&self, unit_id: &str) -> Option<&dyn Seatable> {
        self.sections.iter().find_map(|s| s.unit(unit_id))
    }

    /// Find a unit anywhere on the floor, mutably
    pub fn unit_mut(&mut self, unit_id: &str) -> Option<&mut dyn Seatable> {
        self.sections.iter_mut().find_map(|s| s.unit_mut(unit_id))
    }

    /// Find the unit that owns the given account
    pub fn unit_with_account_mut(&mut self, account_id: &str) -> Option<&mut dyn Seatable> {
        for section in &mut self.sections {
            for table in &mut section.tables {
                if table.accounts.iter().any(|a| a.id == account_id) {
                    return Some(table);
                }
            }
            for bar in &mut section.bars {
                if bar.accounts.iter().any(|a| a.id == account_id) {
                    return Some(bar);
                }
            }
        }
        None
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutate_section_unknown_id() {
        let mut store = LayoutStore::seeded();
        let result = store.mutate_section("missing", |_| {});
        assert!(matches!(result, Err(FloorError::NotFound(_))));
    }

    #[test]
    fn test_add_table_uses_counter() {
        let mut store = LayoutStore::seeded();
        assert_eq!(store.table_counter(), 13);

        let id = store
            .add_table("section-1", Position::new(500.0, 500.0))
            .unwrap();
        assert_eq!(id, "table-13");
        assert_eq!(store.unit(&id).unwrap().name(), "Mesa 13");
        assert_eq!(store.table_counter(), 14);
    }

    #[test]
    fn test_add_table_unknown_section_keeps_counter() {
        let mut store = LayoutStore::seeded();
        assert!(store.add_table("missing", Position::default()).is_err());
        assert_eq!(store.table_counter(), 13);
    }

    #[test]
    fn test_replace_sections_installs_loaded_layout() {
        let mut store = LayoutStore::seeded();
        let mut sections = default_layout();
        sections[0].name = "Salón renovado".to_string();

        store.replace_sections(sections.clone(), 20);
        assert_eq!(store.sections(), &sections[..]);
        assert_eq!(store.table_counter(), 20);
    }

    #[test]
    fn test_remove_unit() {
        let mut store = LayoutStore::seeded();
        store.remove_unit("section-1", "table-3").unwrap();
        assert!(store.unit("table-3").is_none());
        assert!(
            store
                .remove_unit("section-1", "table-3")
                .is_err()
        );
    }

    #[test]
    fn test_remove_section_deletes_contained_units() {
        let mut store = LayoutStore::seeded();
        store.remove_section("section-1").unwrap();
        assert!(store.sections().is_empty());
        assert!(store.unit("table-1").is_none());
    }

    #[test]
    fn test_move_unit() {
        let mut store = LayoutStore::seeded();
        store
            .move_unit("section-1", "bar-1", Position::new(10.0, 20.0))
            .unwrap();
        let section = store.section("section-1").unwrap();
        assert_eq!(section.bars[0].position, Position::new(10.0, 20.0));
    }
}
