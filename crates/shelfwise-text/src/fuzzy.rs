//! Edit-distance matching of a partial query against title windows.

pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(ca != cb);
            cur[j + 1] = sub.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Best normalised similarity between `query` and any window of `title` that
/// starts at a word boundary and is one char shorter, equal, or one longer
/// than the query. `1 - distance / max(len)`, in `[0, 1]`.
pub fn best_window_similarity(query: &[char], title: &[char]) -> f32 {
    if query.is_empty() || title.is_empty() { return 0.0; }
    let starts = (0..title.len()).filter(|&i| !title[i].is_whitespace() && (i == 0 || title[i - 1].is_whitespace()));
    let mut best = 0.0f32;
    for s in starts {
        for len in [query.len().saturating_sub(1), query.len(), query.len() + 1] {
            let end = (s + len).min(title.len());
            if len == 0 || end <= s { continue; }
            let window = &title[s..end];
            let d = levenshtein(query, window);
            let sim = 1.0 - d as f32 / query.len().max(window.len()) as f32;
            best = best.max(sim);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> { s.chars().collect() }

    #[test]
    fn classic_distances() {
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("same"), &chars("same")), 0);
    }

    #[test]
    fn typo_matches_a_later_word() {
        let sim = best_window_similarity(&chars("hobit"), &chars("the hobbit"));
        assert!((sim - (1.0 - 1.0 / 6.0)).abs() < 1e-6, "sim={sim}");
    }

    #[test]
    fn unrelated_text_scores_low() {
        assert!(best_window_similarity(&chars("zzzz"), &chars("pride and prejudice")) < 0.3);
    }
}
