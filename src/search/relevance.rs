//! Relevance scoring of a search term against a single text field.
//!
//! A candidate falls into exactly one tier, checked in priority order:
//!
//! | Tier          | Condition                               | Base |
//! |---------------|-----------------------------------------|------|
//! | Exact         | candidate equals the term               | 100  |
//! | Prefix        | candidate starts with the term          | 75   |
//! | Word boundary | term appears as a whole word            | 50   |
//! | Substring     | term appears anywhere                   | 25   |
//!
//! Matches get a specificity bonus of `max(0, 50 - len(candidate)) * 0.1`,
//! then the sum is multiplied by the field weight.

pub const EXACT_SCORE: f64 = 100.0;
pub const PREFIX_SCORE: f64 = 75.0;
pub const WORD_BOUNDARY_SCORE: f64 = 50.0;
pub const SUBSTRING_SCORE: f64 = 25.0;

/// Candidates at least this long get no specificity bonus.
const BONUS_LENGTH: usize = 50;
const BONUS_PER_CHAR: f64 = 0.1;

/// Scores a candidate field against a search term.
///
/// Implementations must return 0 for non-matches and must be linear in
/// `weight`.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, term: &str, candidate: &str, weight: f64) -> f64;
}

/// The exact/prefix/word-boundary/substring tier scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredScorer;

impl RelevanceScorer for TieredScorer {
    fn score(&self, term: &str, candidate: &str, weight: f64) -> f64 {
        score(term, candidate, weight)
    }
}

pub fn score(term: &str, candidate: &str, weight: f64) -> f64 {
    let term = term.to_lowercase();
    let candidate = candidate.to_lowercase();
    if term.is_empty() {
        return 0.0;
    }

    let base = if candidate == term {
        EXACT_SCORE
    } else if candidate.starts_with(&term) {
        PREFIX_SCORE
    } else if contains_word(&candidate, &term) {
        WORD_BOUNDARY_SCORE
    } else if candidate.contains(&term) {
        SUBSTRING_SCORE
    } else {
        return 0.0;
    };

    let length = candidate.chars().count();
    let bonus = BONUS_LENGTH.saturating_sub(length) as f64 * BONUS_PER_CHAR;
    (base + bonus) * weight
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A word boundary sits between a word character and a non-word character
/// (or either end of the text).
fn is_boundary(before: Option<char>, after: Option<char>) -> bool {
    before.is_some_and(is_word_char) != after.is_some_and(is_word_char)
}

/// True when `needle` occurs in `haystack` with a word boundary on both
/// sides, the way `\bneedle\b` would match.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let first = needle.chars().next();
    let last = needle.chars().next_back();

    haystack.char_indices().any(|(start, _)| {
        let rest = &haystack[start..];
        if !rest.starts_with(needle) {
            return false;
        }
        let before = haystack[..start].chars().next_back();
        let after = rest[needle.len()..].chars().next();
        is_boundary(before, first) && is_boundary(last, after)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn exact_match() {
        assert!(approx(score("rock", "Rock", 1.0), 104.6));
    }

    #[test]
    fn prefix_match() {
        // 18 chars: bonus 3.2
        assert!(approx(score("rock", "Rock and Roll Hall", 1.0), 78.2));
    }

    #[test]
    fn word_boundary_match() {
        // 12 chars: bonus 3.8
        assert!(approx(score("rock", "Classic Rock", 1.0), 53.8));
        assert!(approx(score("rock", "soft-rock hits", 1.0), 53.6));
    }

    #[test]
    fn substring_match() {
        // 11 chars: bonus 3.9
        assert!(approx(score("rock", "The Rockets", 1.0), 28.9));
    }

    #[test]
    fn no_match_scores_zero() {
        assert_eq!(score("rock", "Jazz", 1.0), 0.0);
        assert_eq!(score("rock", "", 1.0), 0.0);
        assert_eq!(score("", "Rock", 1.0), 0.0);
    }

    #[test]
    fn long_candidates_get_no_bonus() {
        let long = format!("rock {}", "x".repeat(60));
        assert!(approx(score("rock", &long, 1.0), PREFIX_SCORE));
    }

    #[test]
    fn tiers_rank_in_order() {
        let candidates = ["Rock", "Classic Rock", "Rock and Roll Hall"];
        let mut scored: Vec<(&str, f64)> = candidates
            .iter()
            .map(|c| (*c, score("rock", c, 1.0)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let order: Vec<&str> = scored.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, vec!["Rock", "Rock and Roll Hall", "Classic Rock"]);
    }

    #[test]
    fn exact_beats_prefix_for_same_term() {
        let long = "z".repeat(70);
        for term in ["a", "rock", "hip hop", "ñandú", long.as_str()] {
            let exact = score(term, term, 1.0);
            let prefix = score(term, &format!("{}x", term), 1.0);
            assert!(exact > prefix, "term {:?}: {} <= {}", term, exact, prefix);
        }
    }

    #[test]
    fn weight_is_linear() {
        let cases = [
            ("rock", "Rock"),
            ("rock", "Classic Rock"),
            ("miles", "Miles Davis"),
            ("blue", "Kind of Blue"),
            ("ock", "The Rockets"),
        ];
        for (term, candidate) in cases {
            let unit = score(term, candidate, 1.0);
            for w in [0.6, 0.8, 2.5] {
                assert!(approx(score(term, candidate, w), w * unit));
            }
        }
    }

    #[test]
    fn word_boundaries_follow_word_characters() {
        assert!(contains_word("classic rock", "rock"));
        assert!(contains_word("rock_n_roll and rock", "rock"));
        assert!(!contains_word("rock_n_roll", "rock_n"));
        assert!(!contains_word("the rockets", "rock"));
        assert!(!contains_word("a & b", "&"));
        assert!(contains_word("a&b", "&"));
        assert!(contains_word("rock & roll", "rock & roll"));
        assert!(contains_word("live at café rouge", "café"));
    }

    #[test]
    fn scorer_trait_delegates() {
        let scorer: &dyn RelevanceScorer = &TieredScorer;
        assert_eq!(
            scorer.score("rock", "Classic Rock", 0.8),
            score("rock", "Classic Rock", 0.8)
        );
    }
}
