use crate::models::filter::FilterState;
use crate::models::resume::Description;

/// Descriptions shorter than this earn a brevity bonus.
const BREVITY_LIMIT: usize = 200;
/// Bonus per character under `BREVITY_LIMIT`.
const BREVITY_DIVISOR: f64 = 100.0;
/// Charged once when an active tag filter meets a tagged description.
const TAG_FILTER_PENALTY: f64 = 10.0;
/// Earned for every active filter tag the description carries.
const TAG_MATCH_BONUS: f64 = 40.0;

/// Scores a description for the given filter state.
///
/// `importance + (200 - length) / 100` for short text; under an active tag
/// filter a tagged description pays 10 and earns 40 per matching tag, so a
/// tagged description that matches nothing lands below its importance.
pub fn score(description: &Description, filter: Option<&FilterState>) -> f64 {
    let mut score = description.importance as f64;

    if description.length < BREVITY_LIMIT {
        score += (BREVITY_LIMIT - description.length) as f64 / BREVITY_DIVISOR;
    }

    if let Some(filter) = filter {
        if !filter.tags.is_empty() && !description.tags.is_empty() {
            score -= TAG_FILTER_PENALTY;
            for tag in &filter.tags {
                if description.tags.iter().any(|t| t.id == *tag) {
                    score += TAG_MATCH_BONUS;
                }
            }
        }
    }

    score
}
