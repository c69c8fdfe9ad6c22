//! "Did you mean" suggestions for failed attribute lookups.

/// Default number of suggestions offered for a missing attribute.
pub const MAX_SUGGESTIONS: usize = 3;

/// Compute Levenshtein (edit) distance between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        row[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Similarity in `[0, 1]`: one minus the edit distance over the longer length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Up to `n` candidates with similarity at least `cutoff`, best first, ties
/// alphabetical. A cutoff of zero always returns the best `n`, however poor.
pub fn close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|c| (similarity(word, c), c))
        .filter(|(score, _)| *score >= cutoff)
        .collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.total_cmp(sa).then_with(|| a.cmp(b)));
    scored.dedup_by(|(_, a), (_, b)| a == b);
    scored
        .into_iter()
        .take(n)
        .map(|(_, c)| c.to_string())
        .collect()
}

/// What a missing-attribute message says: the owner's type name and the
/// attribute that was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAttribute {
    pub type_name: String,
    pub attribute: String,
}

/// Parses `'Console' object has no attribute 'sprint'` (and the
/// `module 'x' has no attribute 'y'` variant).
pub fn parse_missing_attribute(message: &str) -> Option<MissingAttribute> {
    let quoted: Vec<&str> = message.split('\'').skip(1).step_by(2).collect();
    if quoted.len() < 2 || !message.contains("has no attribute") {
        return None;
    }
    Some(MissingAttribute {
        type_name: quoted[0].to_string(),
        attribute: quoted[1].to_string(),
    })
}

pub fn format_suggestions(suggestions: &[String]) -> String {
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{}'", s)).collect();
    format!("Perhaps you meant: [{}]", quoted.join(", "))
}
