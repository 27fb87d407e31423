//! Correction candidates by edit distance

/// Largest edit distance still offered as a suggestion.
const MAX_DISTANCE: usize = 2;

/// Levenshtein distance between two words, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn match_case(word: &str, candidate: &str) -> String {
    let mut chars = word.chars();
    let first_upper = chars.next().map_or(false, char::is_uppercase);
    let all_upper = first_upper && word.chars().all(|c| !c.is_lowercase());

    if all_upper && word.chars().count() > 1 {
        candidate.to_uppercase()
    } else if first_upper {
        let mut out = String::with_capacity(candidate.len());
        let mut cs = candidate.chars();
        if let Some(first) = cs.next() {
            out.extend(first.to_uppercase());
        }
        out.extend(cs);
        out
    } else {
        candidate.to_string()
    }
}

/// Up to `limit` known words within [`MAX_DISTANCE`] of `word`, closest first.
///
/// Ties are broken alphabetically so the order is deterministic.
pub(super) fn suggestions<'a>(
    word: &str,
    known: impl Iterator<Item = &'a String>,
    limit: usize,
) -> Vec<String> {
    let needle = word.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let len = needle.chars().count();

    let mut scored: Vec<(usize, &str)> = known
        .filter(|candidate| candidate.as_str() != needle)
        .filter(|candidate| candidate.chars().count().abs_diff(len) <= MAX_DISTANCE)
        .filter_map(|candidate| {
            let distance = edit_distance(&needle, candidate);
            (distance <= MAX_DISTANCE).then_some((distance, candidate.as_str()))
        })
        .collect();

    scored.sort_unstable();
    scored.dedup();
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| match_case(word.trim(), candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
        assert_eq!(edit_distance("helo", "hello"), 1);
    }

    #[test]
    fn test_suggestions_keep_capitalization() {
        let known: Vec<String> = vec!["writer".into(), "waiter".into()];
        let found = suggestions("Writr", known.iter(), 5);
        assert_eq!(found[0], "Writer");
    }

    #[test]
    fn test_suggestions_respect_limit_and_distance() {
        let known: Vec<String> = ["cat", "bat", "hat", "mat", "elephant"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let found = suggestions("zat", known.iter(), 2);
        assert_eq!(found, vec!["bat".to_string(), "cat".to_string()]);
    }
}
