//! Exclusion of files by glob pattern

use glob::{MatchOptions, Pattern};
use log::debug;

use super::FileCoverage;
use crate::error::GateError;

/// `*` stays inside one path segment, `**` spans segments
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of exclusion patterns
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| GateError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// A pattern matches when it matches the whole path or any suffix that
    /// starts right after a `/`
    pub fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| path_suffixes(path).any(|s| pattern.matches_with(s, MATCH_OPTIONS)))
    }
}

fn path_suffixes(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once(path).chain(
        path.char_indices()
            .filter(|&(_, c)| c == '/')
            .map(move |(idx, _)| &path[idx + 1..])
            .filter(|s| !s.is_empty()),
    )
}

/// Drop every file whose path matches one of the patterns
pub fn filter(files: &[FileCoverage], exclude: &ExcludeSet) -> Vec<FileCoverage> {
    let kept: Vec<FileCoverage> = files
        .iter()
        .filter(|file| {
            let excluded = exclude.matches(&file.path);
            if excluded {
                debug!("Excluding {}", file.path);
            }
            !excluded
        })
        .cloned()
        .collect();

    debug!(
        "Exclusion kept {} of {} files ({} patterns)",
        kept.len(),
        files.len(),
        exclude.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files(paths: &[&str]) -> Vec<FileCoverage> {
        paths.iter().map(|p| FileCoverage::new(*p)).collect()
    }

    fn paths(files: &[FileCoverage]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    const BLOC: &str = "/Users/dev/bloc/packages/bloc/lib/src/bloc_observer.dart";

    #[test]
    fn test_double_star_matches_absolute_paths() {
        let set = ExcludeSet::new(["**/*_observer.dart"]).unwrap();
        assert!(set.matches(BLOC));
        assert!(set.matches("bloc_observer.dart"));
        assert!(!set.matches("/Users/dev/bloc/lib/src/bloc.dart"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let set = ExcludeSet::new(["lib/*.dart"]).unwrap();
        assert!(set.matches("/repo/lib/main.dart"));
        assert!(!set.matches("/repo/lib/src/main.dart"));
    }

    #[test]
    fn test_double_star_spans_segments() {
        let set = ExcludeSet::new(["lib/**/*.g.dart"]).unwrap();
        assert!(set.matches("/repo/lib/model.g.dart"));
        assert!(set.matches("/repo/lib/a/b/model.g.dart"));
        assert!(!set.matches("/repo/lib/a/model.dart"));
    }

    #[test]
    fn test_suffix_anchoring_respects_segments() {
        let set = ExcludeSet::new(["bar.rs"]).unwrap();
        assert!(set.matches("src/bar.rs"));
        assert!(!set.matches("src/foobar.rs"));
    }

    #[test]
    fn test_no_patterns_is_identity() {
        let input = files(&["a.rs", "b/c.rs"]);
        let out = filter(&input, &ExcludeSet::default());
        assert_eq!(out, input);
    }

    #[test]
    fn test_filter_keeps_order() {
        let input = files(&["src/a.rs", "src/gen/b.rs", "src/c.rs", "tests/d.rs"]);
        let set = ExcludeSet::new(["gen/**", "tests/*.rs"]).unwrap();
        let out = filter(&input, &set);
        assert_eq!(paths(&out), vec!["src/a.rs", "src/c.rs"]);
        // input untouched
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn test_filter_is_idempotent_and_order_independent() {
        let input = files(&["a/x.rs", "a/y.ts", "b/z.rs", "b/w.py"]);
        let forward = ExcludeSet::new(["*.rs", "b/*"]).unwrap();
        let backward = ExcludeSet::new(["b/*", "*.rs"]).unwrap();

        let once = filter(&input, &forward);
        let twice = filter(&once, &forward);
        assert_eq!(once, twice);
        assert_eq!(once, filter(&input, &backward));
        assert_eq!(paths(&once), vec!["a/y.ts"]);
    }

    #[test]
    fn test_everything_excluded() {
        let input = files(&["a.rs", "b.rs"]);
        let set = ExcludeSet::new(["*.rs"]).unwrap();
        assert!(filter(&input, &set).is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ExcludeSet::new(["src/[.rs"]).unwrap_err();
        assert!(matches!(err, GateError::InvalidPattern { ref pattern, .. } if pattern == "src/[.rs"));
    }
}
