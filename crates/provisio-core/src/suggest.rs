// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! "Did you mean?" suggestions using Jaro-Winkler string similarity.

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches typos like `Spansh` -> `Spanish` while filtering noise.
pub const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Suggest the candidate closest to `unknown`.
///
/// Comparison ignores case. Returns the best match above
/// [`SUGGESTION_THRESHOLD`], or `None` if nothing is close enough.
pub fn suggest<'a, I>(unknown: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let unknown = unknown.to_lowercase();
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for candidate in candidates {
        let score = strsim::jaro_winkler(&unknown, &candidate.to_lowercase());
        if score > best_score {
            best_score = score;
            best_match = Some(candidate);
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_name() {
        let names = ["English", "Spanish", "French"];
        assert_eq!(suggest("Spansh", names), Some("Spanish"));
        assert_eq!(suggest("frnech", names), Some("French"));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest("zzzzzz", ["English", "Spanish"]), None);
    }

    #[test]
    fn no_suggestion_without_candidates() {
        assert_eq!(suggest("English", std::iter::empty()), None);
    }
}
