//! Default floor plan seed
//!
//! Used when a user has no persisted layout. This is a usability default,
//! not a domain rule; ids and positions are fixed so tests and first
//! sessions are deterministic.

use shared::floor::{BarItem, Orientation, Position, Section, Size, TableItem};

/// Next table number after the seeded twelve
pub const SEED_TABLE_COUNTER: u64 = 13;

const GRID_COLS: usize = 4;
const GRID_ORIGIN_X: f64 = 60.0;
const GRID_ORIGIN_Y: f64 = 80.0;
const GRID_STEP: f64 = 160.0;

/// Build the default layout: one section with twelve free tables in a
/// 4×3 grid and one horizontal bar.
pub fn default_layout() -> Vec<Section> {
    let mut section = Section::new(
        "section-1",
        "Salón principal",
        Position::new(0.0, 0.0),
        Size::new(1000.0, 700.0),
    );

    for n in 1..=12usize {
        let col = (n - 1) % GRID_COLS;
        let row = (n - 1) / GRID_COLS;
        section.tables.push(TableItem::new(
            format!("table-{}", n),
            format!("Mesa {}", n),
            Position::new(
                GRID_ORIGIN_X + col as f64 * GRID_STEP,
                GRID_ORIGIN_Y + row as f64 * GRID_STEP,
            ),
        ));
    }

    section.bars.push(BarItem::new(
        "bar-1",
        "Barra",
        Position::new(740.0, 560.0),
        Size::new(220.0, 80.0),
        Orientation::Horizontal,
    ));

    vec![section]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::floor::UnitStatus;

    #[test]
    fn test_seed_is_deterministic() {
        let a = default_layout();
        let b = default_layout();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_shape() {
        let sections = default_layout();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "section-1");
        assert_eq!(sections[0].tables.len(), 12);
        assert_eq!(sections[0].bars.len(), 1);
        assert!(
            sections[0]
                .units()
                .all(|u| u.status() == UnitStatus::Libre)
        );
    }
}
