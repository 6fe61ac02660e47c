//! Benchmark selection for `-e` expressions
//!
//! Supports:
//! - Substrings: `-e bwaves,mcf` (directory name contains the term)
//! - Regex patterns: `-e /^5\d\d\./`
//! - Negation: `-e '!test'` or `-e '!/_s$/'`
//!
//! Exclusion wins over inclusion. Without include terms every benchmark is
//! selected unless excluded.

use crate::error::{AnalyzerError, Result};
use regex::Regex;

#[derive(Debug, Clone)]
enum Pattern {
    Substring(String),
    Regex(Regex),
}

impl Pattern {
    fn parse(term: &str) -> Result<Self> {
        if !term.starts_with('/') {
            return Ok(Pattern::Substring(term.to_string()));
        }

        if term.len() < 2 || !term.ends_with('/') {
            return Err(AnalyzerError::Filter(format!("unterminated regex {term}")));
        }

        let body = &term[1..term.len() - 1];
        let regex = Regex::new(body)
            .map_err(|e| AnalyzerError::Filter(format!("bad regex {term}: {e}")))?;
        Ok(Pattern::Regex(regex))
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Pattern::Substring(s) => name.contains(s.as_str()),
            Pattern::Regex(re) => re.is_match(name),
        }
    }
}

/// Byte offset just past the closing `/` of a regex term starting at `start`
///
/// The closing slash is the first one followed by a comma or the end of the
/// expression, so `{1,3}` quantifiers survive.
fn regex_term_end(expr: &str, start: usize) -> Option<usize> {
    expr[start + 1..]
        .match_indices('/')
        .map(|(i, _)| start + 1 + i)
        .find(|&slash| {
            let rest = expr[slash + 1..].trim_start();
            rest.is_empty() || rest.starts_with(',')
        })
        .map(|slash| slash + 1)
}

/// Split an expression into terms, keeping `/regex/` terms whole
fn split_terms(expr: &str) -> Result<Vec<&str>> {
    let mut terms = Vec::new();
    let mut rest = expr;

    loop {
        let term_start = rest.trim_start();
        let body = term_start.strip_prefix('!').unwrap_or(term_start).trim_start();

        let end = if body.starts_with('/') {
            let slash = term_start.len() - body.len();
            regex_term_end(term_start, slash).ok_or_else(|| {
                AnalyzerError::Filter(format!("unterminated regex {}", term_start.trim()))
            })?
        } else {
            term_start.find(',').unwrap_or(term_start.len())
        };

        terms.push(term_start[..end].trim());

        match term_start[end..].trim_start().strip_prefix(',') {
            Some(next) => rest = next,
            None => return Ok(terms),
        }
    }
}

/// Filter that determines which benchmark directories to analyze
#[derive(Debug, Clone, Default)]
pub struct BenchmarkFilter {
    /// Include patterns (None = all benchmarks)
    include: Option<Vec<Pattern>>,
    exclude: Vec<Pattern>,
}

impl BenchmarkFilter {
    /// Create a filter that selects every benchmark
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a comma-separated filter expression
    pub fn from_expr(expr: &str) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for term in split_terms(expr)?.into_iter().filter(|t| !t.is_empty()) {
            if let Some(negated) = term.strip_prefix('!') {
                let negated = negated.trim();
                if negated.is_empty() {
                    return Err(AnalyzerError::Filter(
                        "'!' must be followed by a name or /regex/".to_string(),
                    ));
                }
                exclude.push(Pattern::parse(negated)?);
            } else {
                include.push(Pattern::parse(term)?);
            }
        }

        Ok(Self {
            include: if include.is_empty() { None } else { Some(include) },
            exclude,
        })
    }

    /// Check if a benchmark directory name should be analyzed
    pub fn should_analyze(&self, name: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(name)) {
            return false;
        }

        match &self.include {
            None => true,
            Some(patterns) => patterns.iter().any(|p| p.matches(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_all_selects_everything() {
        let filter = BenchmarkFilter::all();
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(filter.should_analyze("anything"));
    }

    #[test]
    fn test_filter_substring() {
        let filter = BenchmarkFilter::from_expr("bwaves").unwrap();
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(!filter.should_analyze("505.mcf_r"));
    }

    #[test]
    fn test_filter_allow_list() {
        let filter = BenchmarkFilter::from_expr("bwaves, mcf").unwrap();
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(filter.should_analyze("505.mcf_r"));
        assert!(!filter.should_analyze("519.lbm_r"));
    }

    #[test]
    fn test_filter_regex() {
        let filter = BenchmarkFilter::from_expr(r"/^5\d\d\./").unwrap();
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(!filter.should_analyze("603.bwaves_s"));
    }

    #[test]
    fn test_filter_negation_only() {
        let filter = BenchmarkFilter::from_expr("!mcf").unwrap();
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(!filter.should_analyze("505.mcf_r"));
    }

    #[test]
    fn test_filter_exclusion_wins() {
        let filter = BenchmarkFilter::from_expr("bwaves,!/_s$/").unwrap();
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(!filter.should_analyze("603.bwaves_s"));
    }

    #[test]
    fn test_filter_empty_expression_selects_all() {
        let filter = BenchmarkFilter::from_expr(" , ").unwrap();
        assert!(filter.should_analyze("503.bwaves_r"));
    }

    #[test]
    fn test_filter_invalid_regex() {
        let err = BenchmarkFilter::from_expr("/[unclosed/").unwrap_err();
        assert!(matches!(err, AnalyzerError::Filter(_)));
    }

    #[test]
    fn test_filter_bare_negation() {
        assert!(BenchmarkFilter::from_expr("bwaves,!").is_err());
    }

    #[test]
    fn test_filter_regex_with_comma_quantifier() {
        let filter = BenchmarkFilter::from_expr("/^a{1,3}$/").unwrap();
        assert!(filter.should_analyze("aa"));
        assert!(!filter.should_analyze("aaaa"));
    }

    #[test]
    fn test_filter_regex_with_comma_among_terms() {
        let filter = BenchmarkFilter::from_expr("mcf, /^5\\d{2,3}\\.bw/ ,!/_s{1,2}$/").unwrap();
        assert!(filter.should_analyze("505.mcf_r"));
        assert!(filter.should_analyze("503.bwaves_r"));
        assert!(!filter.should_analyze("503.bwaves_s"));
        assert!(!filter.should_analyze("519.lbm_r"));
    }

    #[test]
    fn test_filter_unterminated_regex() {
        for expr in ["/", "/^bw", "bwaves,/^a{1,3}", "!/x"] {
            let err = BenchmarkFilter::from_expr(expr).unwrap_err();
            assert!(matches!(err, AnalyzerError::Filter(_)), "{expr}");
        }
    }
}
