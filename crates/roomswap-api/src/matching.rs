//! Preference-overlap scoring for the available-swaps list.

use std::collections::BTreeSet;

/// Score when there is nothing to compare.
pub const BASELINE_SCORE: u8 = 60;
pub const MAX_SCORE: u8 = 100;

/// Similarity of two comma-separated preference lists, scaled into
/// `BASELINE_SCORE..=MAX_SCORE`. Deterministic and symmetric; items are
/// compared case-insensitively after trimming.
pub fn match_score(mine: Option<&str>, theirs: Option<&str>) -> u8 {
    let mine = preference_set(mine);
    let theirs = preference_set(theirs);
    if mine.is_empty() || theirs.is_empty() {
        return BASELINE_SCORE;
    }

    let shared = mine.intersection(&theirs).count();
    let total = mine.union(&theirs).count();
    let span = usize::from(MAX_SCORE - BASELINE_SCORE);

    BASELINE_SCORE + (span * shared / total) as u8
}

fn preference_set(raw: Option<&str>) -> BTreeSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_preferences_score_max() {
        let prefs = Some("Non-smoking, Quiet study hours");
        assert_eq!(match_score(prefs, Some("quiet study hours ,non-smoking")), MAX_SCORE);
    }

    #[test]
    fn missing_preferences_score_baseline() {
        assert_eq!(match_score(None, Some("Quiet")), BASELINE_SCORE);
        assert_eq!(match_score(Some(" , "), Some("Quiet")), BASELINE_SCORE);
    }

    #[test]
    fn partial_overlap_lands_in_between() {
        // 1 shared of 3 distinct: 60 + 40 / 3
        let score = match_score(Some("quiet, early sleeper"), Some("quiet, night owl"));
        assert_eq!(score, 73);
        assert_eq!(
            score,
            match_score(Some("quiet, night owl"), Some("quiet, early sleeper"))
        );
    }

    #[test]
    fn disjoint_preferences_score_baseline() {
        assert_eq!(match_score(Some("quiet"), Some("loud")), BASELINE_SCORE);
    }
}
