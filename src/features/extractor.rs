//! URL string → raw lexical features. Total over any input, no side effects.

use super::{FeatureVector, FEATURE_DIM};

/// Keywords counted case-insensitively, at most once each.
pub const SUSPICIOUS_KEYWORDS: [&str; 5] = ["login", "bank", "verify", "secure", "update"];

/// Extract `[char length, has '@', has '-', keyword hits]` from a URL.
pub fn extract(url: &str) -> FeatureVector {
    let lower = url.to_lowercase();
    let keyword_hits = SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|k| lower.contains(**k))
        .count();

    let values = vec![
        url.chars().count() as f64,
        flag(url.contains('@')),
        flag(url.contains('-')),
        keyword_hits as f64,
    ];
    debug_assert_eq!(values.len(), FEATURE_DIM);
    FeatureVector::new(values)
}

fn flag(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

/// Stateless extractor handle; batch helper for training.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFeatureExtractor;

impl UrlFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn dim(&self) -> usize {
        FEATURE_DIM
    }

    pub fn extract(&self, url: &str) -> FeatureVector {
        extract(url)
    }

    pub fn extract_all<'a, I>(&self, urls: I) -> Vec<FeatureVector>
    where
        I: IntoIterator<Item = &'a str>,
    {
        urls.into_iter().map(extract).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_all_zero() {
        assert_eq!(extract("").values, vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn counts_each_keyword_once() {
        let url = "http://secure-login@bank.com";
        let fv = extract(url);
        assert_eq!(fv.values, vec![url.len() as f64, 1.0, 1.0, 3.0]);

        let fv = extract("loginloginLOGIN");
        assert_eq!(fv.values[3], 1.0);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let fv = extract("HTTPS://UPDATE.VERIFY.example");
        assert_eq!(fv.values[3], 2.0);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let fv = extract("http://bücher.de");
        assert_eq!(fv.values[0], 16.0);
    }

    #[test]
    fn batch_matches_single() {
        let ex = UrlFeatureExtractor::new();
        let out = ex.extract_all(["a-b", "x@y"]);
        assert_eq!(out, vec![extract("a-b"), extract("x@y")]);
        assert_eq!(ex.dim(), FEATURE_DIM);
    }
}
