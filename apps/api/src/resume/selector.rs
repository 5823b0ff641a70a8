//! Description Selector: picks the description to show for an entity.

use crate::models::filter::FilterState;
use crate::models::resume::Description;
use crate::resume::scoring::score;

/// Scores at or below this are never shown.
pub const SELECTION_FLOOR: f64 = 0.0;

/// Returns the best-scoring description under `filter`.
///
/// Candidates must strictly beat the running maximum, which starts at
/// `SELECTION_FLOOR`, so the first of several equal scores wins and an
/// entity whose descriptions all score at or below zero shows nothing.
pub fn select_best_description<'a>(
    descriptions: &'a [Description],
    filter: Option<&FilterState>,
) -> Option<&'a Description> {
    let mut best = None;
    let mut max_score = SELECTION_FLOOR;
    for description in descriptions {
        let candidate = score(description, filter);
        if candidate > max_score {
            best = Some(description);
            max_score = candidate;
        }
    }
    best
}

/// Text of the best description, or an empty string when none qualifies.
pub fn best_description_text(descriptions: &[Description], filter: Option<&FilterState>) -> String {
    select_best_description(descriptions, filter)
        .map(|d| d.text.clone())
        .unwrap_or_default()
}
