//! Fuzzy string scoring
//!
//! Subsequence scoring with typo tolerance. Both sides are case folded, so
//! the score never depends on capitalisation. Each query character found in
//! order earns points; hits directly after the previous hit or at the start
//! of a word earn more. With `fuzziness > 0` a missing character lowers the
//! score instead of zeroing it.

/// Fuzziness used by task and tab search
pub const DEFAULT_FUZZINESS: f64 = 0.5;

/// Scores above this count as a fuzzy match
pub const MATCH_THRESHOLD: f64 = 0.4;

const CONSECUTIVE_HIT: f64 = 0.7;
const SCATTERED_HIT: f64 = 0.1;
const WORD_START_BONUS: f64 = 0.8;
const HIT_BONUS: f64 = 0.1;
const FIRST_CHAR_BONUS: f64 = 0.15;

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Score `query` against `candidate`, returning a value in `[0, 1]`
pub fn score(candidate: &str, query: &str, fuzziness: f64) -> f64 {
    let candidate = fold(candidate);
    let query = fold(query);

    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    if candidate == query {
        return 1.0;
    }

    let fuzziness = fuzziness.clamp(0.0, 1.0);
    let mut running = 0.0;
    let mut fuzzies = 1.0;
    let mut start = 0;

    for ch in &query {
        let found = candidate[start..]
            .iter()
            .position(|c| c == ch)
            .map(|offset| start + offset);

        let Some(index) = found else {
            if fuzziness > 0.0 {
                fuzzies += 1.0 - fuzziness;
                continue;
            }
            return 0.0;
        };

        let mut hit = if index == start {
            CONSECUTIVE_HIT
        } else if index > 0 && candidate[index - 1] == ' ' {
            SCATTERED_HIT + WORD_START_BONUS
        } else {
            SCATTERED_HIT
        };
        hit += HIT_BONUS;

        running += hit;
        start = index + 1;
    }

    let candidate_len = candidate.len() as f64;
    let query_len = query.len() as f64;
    let mut total = 0.5 * (running / candidate_len + running / query_len) / fuzzies;

    if query[0] == candidate[0] && total < 0.85 {
        total += FIRST_CHAR_BONUS;
    }

    total.clamp(0.0, 1.0)
}

/// Case-insensitive containment
pub fn substring_match(candidate: &str, query: &str) -> bool {
    candidate.to_lowercase().contains(&query.to_lowercase())
}

/// The predicate used for both task names and tab titles
pub fn is_match(candidate: &str, query: &str) -> bool {
    substring_match(candidate, query) || score(candidate, query, DEFAULT_FUZZINESS) > MATCH_THRESHOLD
}
