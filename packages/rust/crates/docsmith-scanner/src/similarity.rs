//! Keyword-set similarity.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

fn normalize(word: &str) -> String {
    word.nfkc().collect::<String>().to_lowercase()
}

/// Jaccard overlap of two keyword collections, in `[0, 1]`.
///
/// Words are compared after NFKC normalisation and lowercasing. Either side
/// being empty yields `0.0`.
#[must_use]
pub fn jaccard<A, B>(a: A, b: B) -> f64
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
{
    let left: HashSet<String> = a.into_iter().map(|w| normalize(w.as_ref())).collect();
    let right: HashSet<String> = b.into_iter().map(|w| normalize(w.as_ref())).collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    #[allow(clippy::cast_precision_loss)]
    let score = intersection as f64 / union as f64;
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sets_score_one() {
        assert!((jaccard(["API", "缓存"], ["api", "缓存"]) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_and_empty_score_zero() {
        assert!(jaccard(["a"], ["b"]).abs() < f64::EPSILON);
        assert!(jaccard(Vec::<String>::new(), ["b"]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fullwidth_normalised() {
        assert!((jaccard(["ＡＰＩ"], ["api"]) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_overlap_is_symmetric() {
        let ab = jaccard(["a", "b", "c"], ["b", "c", "d"]);
        let ba = jaccard(["b", "c", "d"], ["a", "b", "c"]);
        assert!((ab - 0.5).abs() < f64::EPSILON);
        assert!((ab - ba).abs() < f64::EPSILON);
    }
}
