//! Glob ignore matching over POSIX-style relative paths.
//!
//! Patterns are split on `/` and matched segment by segment:
//! - `**` matches zero or more whole segments
//! - `*` matches any run of characters inside one segment
//! - `?` matches exactly one character inside one segment
//!
//! Matching is case-sensitive. A path is ignored when the path itself or
//! any of its ancestor directories matches a pattern, so `**/repos` hides
//! everything below a `repos` directory at any depth.
//!
//! Wildcards also match dot-prefixed segments: `*` matches `.env` and `**`
//! descends into `.github`, unlike picomatch's default `dot: false`.

/// One compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`
    AnyDepth,
    /// Literal text or a wildcard pattern within a single segment.
    Glob(Vec<char>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    fn compile(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
        let trimmed = trimmed.trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        let mut segments: Vec<Segment> = Vec::new();
        for part in trimmed.split('/').filter(|p| !p.is_empty()) {
            let segment = if part == "**" {
                Segment::AnyDepth
            } else {
                Segment::Glob(part.chars().collect())
            };
            // Consecutive `**` are equivalent to one.
            if segment == Segment::AnyDepth && segments.last() == Some(&Segment::AnyDepth) {
                continue;
            }
            segments.push(segment);
        }
        Some(Self { segments })
    }

    fn matches(&self, path: &[&str]) -> bool {
        match_segments(&self.segments, path)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((Segment::Glob(glob), rest)) => match path.split_first() {
            Some((head, tail)) => {
                let text: Vec<char> = head.chars().collect();
                match_wildcard(glob, &text) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// Iterative wildcard match with single-star backtracking.
fn match_wildcard(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

/// A compiled set of ignore patterns.
///
/// Compile once per diff or copy operation and query with
/// [`IgnoreMatcher::is_ignored`].
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    /// Compile a list of glob patterns. Blank patterns are dropped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .filter_map(|p| Pattern::compile(p.as_ref()))
                .collect(),
        }
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `relative_path` (forward-slash separated) is ignored.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let parts: Vec<&str> = relative_path
            .split('/')
            .filter(|p| !p.is_empty() && *p != ".")
            .collect();

        // Check the path and each ancestor directory, shortest first.
        (1..=parts.len()).any(|len| {
            let prefix = &parts[..len];
            self.patterns.iter().any(|p| p.matches(prefix))
        })
    }
}
