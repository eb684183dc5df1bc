//! Floor plan sections
//!
//! A section is a named rectangular zone owning its tables and bars
//! exclusively. Deleting a section deletes everything inside it.

use super::geometry::{Position, Size};
use super::unit::{BarItem, Seatable, TableItem};
use serde::{Deserialize, Serialize};

/// A named zone of the floor plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub tables: Vec<TableItem>,
    #[serde(default)]
    pub bars: Vec<BarItem>,
}

impl Section {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            size,
            tables: Vec::new(),
            bars: Vec::new(),
        }
    }

    /// Find a unit (table or bar) by id
    pub fn unit(&self, unit_id: &str) -> Option<&dyn Seatable> {
        if let Some(table) = self.tables.iter().find(|t| t.id == unit_id) {
            return Some(table);
        }
        self.bars
            .iter()
            .find(|b| b.id == unit_id)
            .map(|b| b as &dyn Seatable)
    }

    /// Find a unit (table or bar) by id, mutably
    pub fn unit_mut(&mut self, unit_id: &str) -> Option<&mut dyn Seatable> {
        if let Some(table) = self.tables.iter_mut().find(|t| t.id == unit_id) {
            return Some(table);
        }
        self.bars
            .iter_mut()
            .find(|b| b.id == unit_id)
            .map(|b| b as &mut dyn Seatable)
    }

    /// Iterate all units in layout order (tables first, then bars)
    pub fn units(&self) -> impl Iterator<Item = &dyn Seatable> {
        self.tables
            .iter()
            .map(|t| t as &dyn Seatable)
            .chain(self.bars.iter().map(|b| b as &dyn Seatable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::geometry::Orientation;

    #[test]
    fn test_unit_lookup_covers_tables_and_bars() {
        let mut section = Section::new(
            "section-1",
            "Salón",
            Position::new(0.0, 0.0),
            Size::new(800.0, 600.0),
        );
        section
            .tables
            .push(TableItem::new("table-1", "Mesa 1", Position::new(10.0, 10.0)));
        section.bars.push(BarItem::new(
            "bar-1",
            "Barra",
            Position::new(400.0, 10.0),
            Size::new(200.0, 60.0),
            Orientation::Horizontal,
        ));

        assert_eq!(section.unit("table-1").unwrap().name(), "Mesa 1");
        assert_eq!(section.unit("bar-1").unwrap().name(), "Barra");
        assert!(section.unit("missing").is_none());
        assert_eq!(section.units().count(), 2);
    }
}
