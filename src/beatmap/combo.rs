use crate::beatmap::model::HitObject;
use crate::foundation::core::{DEFAULT_COMBO_COLOURS, Rgba8};

/// Per-object combo colour slot and on-screen number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComboAssignment {
    /// Monotonic colour counter; resolve against a palette with [`combo_colour`].
    pub colour_index: usize,
    /// 1-based number within the current combo.
    pub number: u32,
}

impl ComboAssignment {
    /// True when this object opens a combo.
    pub fn starts_combo(self) -> bool {
        self.number == 1
    }
}

/// Single linear pass over `objects`.
///
/// The first object and any object flagged `new_combo` open a combo, as does the object
/// right after a spinner. Opening a combo advances the colour counter by one plus the
/// object's `combo_skip`.
pub fn assign_combos(objects: &[HitObject]) -> Vec<ComboAssignment> {
    let mut out = Vec::with_capacity(objects.len());
    let mut colour_index = 0usize;
    let mut number = 0u32;
    let mut prev_spinner = false;

    for (i, obj) in objects.iter().enumerate() {
        let opens = i == 0 || obj.new_combo || prev_spinner;
        if opens {
            if i > 0 {
                colour_index += 1;
            }
            colour_index += obj.combo_skip as usize;
            number = 1;
        } else {
            number += 1;
        }
        out.push(ComboAssignment {
            colour_index,
            number,
        });
        prev_spinner = obj.is_spinner();
    }
    out
}

/// Palette lookup with wrap-around; an empty palette uses the default colours.
pub fn combo_colour(palette: &[Rgba8], assignment: ComboAssignment) -> Rgba8 {
    if palette.is_empty() {
        return DEFAULT_COMBO_COLOURS[assignment.colour_index % DEFAULT_COMBO_COLOURS.len()];
    }
    palette[assignment.colour_index % palette.len()]
}

#[cfg(test)]
#[path = "../../tests/unit/beatmap/combo.rs"]
mod tests;
