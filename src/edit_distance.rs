//! Levenshtein edit distance, the similarity measure behind fuzzy allergen matches.

/// Calculate the Levenshtein distance between two strings
///
/// Counts the minimum number of single-character insertions, deletions and
/// substitutions needed to turn `s1` into `s2`. Characters are Unicode scalar
/// values, so "crème" and "creme" are one substitution apart.
///
/// # Examples
///
/// ```rust
/// use allergen_scanner::edit_distance::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("almond", "almnd"), 1);
/// assert_eq!(levenshtein_distance("", "milk"), 4);
/// ```
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    #[allow(clippy::needless_range_loop)]
    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[len1][len2]
}

/// Maximum distance tolerated for a term of the given length
///
/// `max(min_threshold, term_length / divisor)` with integer division. A zero
/// divisor is treated as one.
pub fn fuzzy_threshold(term_length: usize, divisor: usize, min_threshold: usize) -> usize {
    min_threshold.max(term_length / divisor.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("wheat", ""), 5);
        assert_eq!(levenshtein_distance("", "wheat"), 5);
    }

    #[test]
    fn test_classic_examples() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("almond", "almnd"), 1);
        assert_eq!(levenshtein_distance("sesame", "sesarne"), 2);
    }

    #[test]
    fn test_identity_and_symmetry() {
        let words = ["milk", "mlik", "shellfish", "shelfish", "crème", "creme", ""];
        for a in words {
            assert_eq!(levenshtein_distance(a, a), 0);
            for b in words {
                assert_eq!(
                    levenshtein_distance(a, b),
                    levenshtein_distance(b, a),
                    "asymmetric for {:?} / {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_unicode_is_counted_per_character() {
        assert_eq!(levenshtein_distance("crème", "creme"), 1);
        assert_eq!(levenshtein_distance("noix", "noïx"), 1);
    }

    #[test]
    fn test_fuzzy_threshold() {
        // Default rule set: length / 4, floor 1
        assert_eq!(fuzzy_threshold(4, 4, 1), 1);
        assert_eq!(fuzzy_threshold(6, 4, 1), 1);
        assert_eq!(fuzzy_threshold(9, 4, 1), 2);
        // Revised rule set: length / 3, floor 2
        assert_eq!(fuzzy_threshold(6, 3, 2), 2);
        assert_eq!(fuzzy_threshold(12, 3, 2), 4);
        // Zero divisor never panics
        assert_eq!(fuzzy_threshold(5, 0, 1), 5);
    }
}
