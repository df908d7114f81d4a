//! Fuzzy subsequence matching for tag suggestions.
//!
//! A candidate matches when every character of the query appears in it, in
//! order, though not necessarily next to each other. There is no scoring:
//! callers keep candidates in their original order and only filter.

/// Check whether `query` is a case-insensitive subsequence of `target`.
///
/// An empty query matches every target.
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let query = query.to_lowercase();
    let mut wanted = query.chars().peekable();

    for c in target.to_lowercase().chars() {
        match wanted.peek() {
            Some(&q) if q == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    wanted.peek().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference definition: greedy subsequence search on lower-cased chars.
    fn is_subsequence(q: &str, t: &str) -> bool {
        let t: Vec<char> = t.to_lowercase().chars().collect();
        let mut pos = 0;
        for c in q.to_lowercase().chars() {
            match t[pos..].iter().position(|&x| x == c) {
                Some(offset) => pos += offset + 1,
                None => return false,
            }
        }
        true
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(fuzzy_match("", "React"));
        assert!(fuzzy_match("", ""));
        assert!(fuzzy_match("", "C++"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(fuzzy_match("REACT", "React"));
        assert!(fuzzy_match("react", "REACT"));
        assert!(fuzzy_match("tS", "TypeScript"));
    }

    #[test]
    fn test_subsequence_not_substring() {
        assert!(fuzzy_match("tsc", "TypeScript"));
        assert!(fuzzy_match("dkr", "Docker"));
        assert!(!fuzzy_match("rc", "Docker"));
    }

    #[test]
    fn test_order_matters() {
        assert!(fuzzy_match("type", "TypeScript"));
        assert!(!fuzzy_match("epyt", "TypeScript"));
    }

    #[test]
    fn test_query_longer_than_target() {
        assert!(!fuzzy_match("reactive", "React"));
    }

    #[test]
    fn test_exact_length_match() {
        assert!(fuzzy_match("react", "react"));
    }

    #[test]
    fn test_special_characters() {
        assert!(fuzzy_match("c", "C++"));
        assert!(fuzzy_match("c", "C#"));
        assert!(fuzzy_match("c#", "C#"));
        assert!(fuzzy_match("n.j", "Node.js"));
        assert!(!fuzzy_match("c", "Node.js"));
    }

    #[test]
    fn test_no_match() {
        assert!(!fuzzy_match("xyz", "React"));
        assert!(!fuzzy_match("xyz", "TypeScript"));
        assert!(!fuzzy_match("a", ""));
    }

    #[test]
    fn test_repeated_characters_consume_in_order() {
        assert!(fuzzy_match("ss", "Kubernetes Secrets"));
        assert!(!fuzzy_match("sss", "class"));
        assert!(fuzzy_match("ss", "class"));
    }

    #[test]
    fn test_agrees_with_subsequence_definition() {
        let targets = ["React", "TypeScript", "Docker", "Kubernetes", "AWS", "Python", "C++", ""];
        let queries = ["", "r", "re", "tt", "py", "ks", "aws", "Dr", "xyz", "+", "ee", "tpt"];
        for t in targets {
            for q in queries {
                assert_eq!(
                    fuzzy_match(q, t),
                    is_subsequence(q, t),
                    "query {q:?} against {t:?}"
                );
            }
        }
    }
}
