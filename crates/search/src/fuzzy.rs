//! Edit distance primitives.

/// Calculate Levenshtein edit distance between two strings.
///
/// Distances are counted in Unicode scalar values, not bytes.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Use two rows for space optimization
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Length of a string in characters.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Edit budget for a query of `len` characters.
///
/// `floor(ratio * len)`. A candidate is accepted when its distance is at most
/// this value, so exact matches always pass regardless of length.
pub fn edit_budget(len: usize, ratio: f64) -> usize {
    // Both operands are small non-negative values; the cast truncates.
    (ratio * len as f64).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_same() {
        assert_eq!(levenshtein_distance("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein_distance("hello", "hallo"), 1);
    }

    #[test]
    fn test_levenshtein_insert() {
        assert_eq!(levenshtein_distance("helo", "hello"), 1);
    }

    #[test]
    fn test_levenshtein_delete() {
        assert_eq!(levenshtein_distance("hello", "helo"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein_distance("", "salt"), 4);
        assert_eq!(levenshtein_distance("salt", ""), 4);
    }

    #[test]
    fn test_levenshtein_counts_chars() {
        assert_eq!(levenshtein_distance("crème", "creme"), 1);
    }

    #[test]
    fn test_levenshtein_phrase() {
        assert_eq!(levenshtein_distance("oliv oyl", "olive oil"), 2);
    }

    #[test]
    fn test_edit_budget() {
        assert_eq!(edit_budget(4, 0.2), 0);
        assert_eq!(edit_budget(5, 0.2), 1);
        assert_eq!(edit_budget(9, 0.2), 1);
        assert_eq!(edit_budget(16, 0.2), 3);
        assert_eq!(edit_budget(10, 0.0), 0);
    }
}
