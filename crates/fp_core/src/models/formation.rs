//! Pitch layouts for formation codes.
//!
//! Known codes come from a fixed table of hand-tuned coordinates; anything
//! else falls back to a generated layout: goalkeeper fixed, remaining rows
//! evenly spaced by the counts parsed from the hyphen-separated code.
//! Coordinates are normalized (x across the pitch, y from own goal line).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One placed slot of a formation layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCoords {
    pub slot: u8,
    pub label: String,
    pub x: f32,
    pub y: f32,
}

impl SlotCoords {
    fn new(slot: u8, label: &str, x: f32, y: f32) -> Self {
        Self { slot, label: label.to_string(), x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationLayout {
    pub code: String,
    pub positions: Vec<SlotCoords>,
}

static KNOWN_LAYOUTS: Lazy<HashMap<&'static str, Vec<SlotCoords>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "4-4-2",
        vec![
            SlotCoords::new(0, "GK", 0.5, 0.05),
            SlotCoords::new(1, "LB", 0.2, 0.2),
            SlotCoords::new(2, "CB", 0.4, 0.2),
            SlotCoords::new(3, "CB", 0.6, 0.2),
            SlotCoords::new(4, "RB", 0.8, 0.2),
            SlotCoords::new(5, "LM", 0.15, 0.5),
            SlotCoords::new(6, "CM", 0.4, 0.5),
            SlotCoords::new(7, "CM", 0.6, 0.5),
            SlotCoords::new(8, "RM", 0.85, 0.5),
            SlotCoords::new(9, "ST", 0.35, 0.8),
            SlotCoords::new(10, "ST", 0.65, 0.8),
        ],
    );
    m.insert(
        "4-3-3",
        vec![
            SlotCoords::new(0, "GK", 0.5, 0.05),
            SlotCoords::new(1, "LB", 0.2, 0.2),
            SlotCoords::new(2, "CB", 0.4, 0.2),
            SlotCoords::new(3, "CB", 0.6, 0.2),
            SlotCoords::new(4, "RB", 0.8, 0.2),
            SlotCoords::new(5, "CM", 0.35, 0.45),
            SlotCoords::new(6, "CM", 0.5, 0.45),
            SlotCoords::new(7, "CM", 0.65, 0.45),
            SlotCoords::new(8, "LW", 0.15, 0.8),
            SlotCoords::new(9, "ST", 0.5, 0.85),
            SlotCoords::new(10, "RW", 0.85, 0.8),
        ],
    );
    m.insert(
        "4-5-1",
        vec![
            SlotCoords::new(0, "GK", 0.5, 0.05),
            SlotCoords::new(1, "LB", 0.2, 0.2),
            SlotCoords::new(2, "CB", 0.4, 0.2),
            SlotCoords::new(3, "CB", 0.6, 0.2),
            SlotCoords::new(4, "RB", 0.8, 0.2),
            SlotCoords::new(5, "LM", 0.15, 0.5),
            SlotCoords::new(6, "CM", 0.35, 0.5),
            SlotCoords::new(7, "CM", 0.5, 0.5),
            SlotCoords::new(8, "CM", 0.65, 0.5),
            SlotCoords::new(9, "RM", 0.85, 0.5),
            SlotCoords::new(10, "ST", 0.5, 0.8),
        ],
    );
    m.insert(
        "4-2-3-1",
        vec![
            SlotCoords::new(0, "GK", 0.5, 0.05),
            SlotCoords::new(1, "LB", 0.2, 0.2),
            SlotCoords::new(2, "CB", 0.4, 0.2),
            SlotCoords::new(3, "CB", 0.6, 0.2),
            SlotCoords::new(4, "RB", 0.8, 0.2),
            SlotCoords::new(5, "DM", 0.4, 0.4),
            SlotCoords::new(6, "DM", 0.6, 0.4),
            SlotCoords::new(7, "LM", 0.2, 0.6),
            SlotCoords::new(8, "AM", 0.5, 0.62),
            SlotCoords::new(9, "RM", 0.8, 0.6),
            SlotCoords::new(10, "ST", 0.5, 0.85),
        ],
    );
    m.insert(
        "3-5-2",
        vec![
            SlotCoords::new(0, "GK", 0.5, 0.05),
            SlotCoords::new(1, "CB", 0.3, 0.2),
            SlotCoords::new(2, "CB", 0.5, 0.2),
            SlotCoords::new(3, "CB", 0.7, 0.2),
            SlotCoords::new(4, "LM", 0.1, 0.5),
            SlotCoords::new(5, "CM", 0.35, 0.5),
            SlotCoords::new(6, "CM", 0.5, 0.5),
            SlotCoords::new(7, "CM", 0.65, 0.5),
            SlotCoords::new(8, "RM", 0.9, 0.5),
            SlotCoords::new(9, "ST", 0.35, 0.8),
            SlotCoords::new(10, "ST", 0.65, 0.8),
        ],
    );
    m
});

/// Layout for a formation code, generated when the code is not in the table.
pub fn layout_for(code: &str) -> FormationLayout {
    if let Some(positions) = KNOWN_LAYOUTS.get(code) {
        return FormationLayout { code: code.to_string(), positions: positions.clone() };
    }
    generated_layout(code)
}

/// Fallback layout: parse the hyphen-separated row counts, keep the keeper
/// at the goal line, spread each row evenly across the pitch.
fn generated_layout(code: &str) -> FormationLayout {
    let rows: Vec<usize> =
        code.split('-').filter_map(|part| part.trim().parse::<usize>().ok()).filter(|n| *n > 0).collect();

    // Unparseable codes degrade to 4-4-2 so callers always get eleven slots.
    if rows.is_empty() || rows.iter().sum::<usize>() != 10 {
        log::warn!("unknown formation code '{}', using 4-4-2 layout", code);
        let mut layout = layout_for("4-4-2");
        layout.code = code.to_string();
        return layout;
    }

    let mut positions = vec![SlotCoords::new(0, "GK", 0.5, 0.05)];
    let mut slot = 1u8;
    let row_count = rows.len();
    for (row_idx, &count) in rows.iter().enumerate() {
        let label = row_label(row_idx, row_count);
        let y = 0.2 + 0.65 * (row_idx as f32) / (row_count.max(2) - 1) as f32;
        for i in 0..count {
            let x = (i as f32 + 1.0) / (count as f32 + 1.0);
            positions.push(SlotCoords::new(slot, label, x, y));
            slot += 1;
        }
    }

    FormationLayout { code: code.to_string(), positions }
}

fn row_label(row_idx: usize, row_count: usize) -> &'static str {
    if row_idx == 0 {
        "DF"
    } else if row_idx + 1 == row_count {
        "FW"
    } else {
        "MF"
    }
}
