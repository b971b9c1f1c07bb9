//! Changed-file filtering against configured glob patterns.
//!
//! Patterns use shell-style syntax: `*` matches any run of characters
//! except `/`, `?` matches a single non-`/` character, `[...]` is a class
//! (`[^...]` negates it) and `\` escapes the next character. Runs of `*`
//! are one wildcard, so `**` never crosses `/`. Patterns are rewritten into
//! [`glob`] syntax before compiling. A malformed pattern never matches.

use std::iter::Peekable;
use std::str::Chars;

use glob::{MatchOptions, Pattern};
use revstat_core::ReviewConfig;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassItem {
    Single(char),
    Range(char, char),
}

/// Characters glob gives meaning to inside a class, in ascending order.
const CLASS_SPECIALS: [char; 3] = ['!', '-', ']'];

/// Compile one ignore pattern, returning why it is malformed on failure.
fn compile(pattern: &str) -> Result<Pattern, String> {
    let translated = translate(pattern).map_err(str::to_string)?;
    Pattern::new(&translated).map_err(|e| e.to_string())
}

/// Rewrite a `filepath.Match` pattern as an equivalent glob pattern.
fn translate(pattern: &str) -> Result<String, &'static str> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                while chars.next_if_eq(&'*').is_some() {}
                out.push('*');
            }
            '?' => out.push('?'),
            '\\' => {
                let escaped = chars.next().ok_or("trailing backslash")?;
                push_literal(&mut out, escaped);
            }
            '[' => {
                let (negated, items) = parse_class(&mut chars)?;
                push_class(&mut out, negated, items);
            }
            c => push_literal(&mut out, c),
        }
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    match c {
        '*' | '?' | '[' => {
            out.push('[');
            out.push(c);
            out.push(']');
        }
        c => out.push(c),
    }
}

/// Parse a class body after its opening `[`, through the closing `]`.
fn parse_class(chars: &mut Peekable<Chars<'_>>) -> Result<(bool, Vec<ClassItem>), &'static str> {
    let negated = chars.next_if_eq(&'^').is_some();
    let mut items = Vec::new();
    loop {
        if !items.is_empty() && chars.next_if_eq(&']').is_some() {
            return Ok((negated, items));
        }
        let lo = class_char(chars)?;
        if chars.next_if_eq(&'-').is_some() {
            let hi = class_char(chars)?;
            items.push(ClassItem::Range(lo, hi));
        } else {
            items.push(ClassItem::Single(lo));
        }
    }
}

fn class_char(chars: &mut Peekable<Chars<'_>>) -> Result<char, &'static str> {
    match chars.next() {
        None => Err("unterminated character class"),
        Some('-') | Some(']') => Err("unescaped '-' or ']' in character class"),
        Some('\\') => chars.next().ok_or("unterminated character class"),
        Some(c) => Ok(c),
    }
}

/// Members of a class, with glob's special characters pulled out as flags.
#[derive(Default)]
struct ClassParts {
    bang: bool,
    dash: bool,
    close: bool,
    rest: Vec<ClassItem>,
}

impl ClassParts {
    fn mark(&mut self, c: char) {
        match c {
            '!' => self.bang = true,
            '-' => self.dash = true,
            _ => self.close = true,
        }
    }

    fn add(&mut self, item: ClassItem) {
        let (lo, hi) = match item {
            ClassItem::Single(c) => (c, c),
            ClassItem::Range(lo, hi) => (lo, hi),
        };
        if lo > hi {
            // Empty range: matches nothing.
            self.rest.push(ClassItem::Range('b', 'a'));
            return;
        }
        self.add_range(lo, hi);
    }

    fn add_range(&mut self, lo: char, hi: char) {
        for special in CLASS_SPECIALS {
            if lo <= special && special <= hi {
                self.mark(special);
                // Specials are ASCII, so their neighbours are valid chars.
                let below = (special as u8 - 1) as char;
                let above = (special as u8 + 1) as char;
                if lo < special {
                    self.add_range(lo, below);
                }
                if special < hi {
                    self.add_range(above, hi);
                }
                return;
            }
        }
        self.rest.push(if lo == hi {
            ClassItem::Single(lo)
        } else {
            ClassItem::Range(lo, hi)
        });
    }
}

/// Emit a class in glob syntax.
///
/// glob ends a class at the first `]` after its first member, reads any
/// `x-y` as a range and treats a leading `!` as negation. So `]` goes
/// first, `-` goes last and `!` never leads an unnegated class.
fn push_class(out: &mut String, negated: bool, items: Vec<ClassItem>) {
    if let (false, [ClassItem::Single(c)]) = (negated, items.as_slice()) {
        push_literal(out, *c);
        return;
    }

    let mut parts = ClassParts::default();
    for item in items {
        parts.add(item);
    }

    if !negated && !parts.close && parts.rest.is_empty() {
        match (parts.bang, parts.dash) {
            (true, true) => out.push_str("[-!]"),
            (true, false) => out.push('!'),
            _ => out.push('-'),
        }
        return;
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    if parts.close {
        out.push(']');
    }
    for item in &parts.rest {
        match *item {
            ClassItem::Single(c) => out.push(c),
            ClassItem::Range(lo, hi) => {
                out.push(lo);
                out.push('-');
                out.push(hi);
            }
        }
    }
    if parts.bang {
        out.push('!');
    }
    if parts.dash {
        out.push('-');
    }
    out.push(']');
}

/// Check `filename` against `patterns` in order, returning `true` on the
/// first match.
///
/// Malformed patterns are skipped rather than reported.
///
/// # Examples
///
/// ```
/// use revstat_difflens::filter::should_ignore;
///
/// assert!(should_ignore("vendor/lib.go", &["vendor/*"]));
/// assert!(!should_ignore("main.go", &["vendor/*"]));
/// ```
pub fn should_ignore<S: AsRef<str>>(filename: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|pat| {
        let pat: &str = pat.as_ref();
        match compile(pat) {
            Ok(p) => p.matches_with(filename, MATCH_OPTIONS),
            Err(e) => {
                tracing::warn!(pattern = pat, error = %e, "skipping malformed ignore pattern");
                false
            }
        }
    })
}

/// A precompiled set of ignore patterns.
///
/// Equivalent to calling [`should_ignore`] with the same pattern list, but
/// compiles each pattern once. Malformed patterns are dropped.
///
/// # Examples
///
/// ```
/// use revstat_core::ReviewConfig;
/// use revstat_difflens::filter::IgnoreFilter;
///
/// let config = ReviewConfig {
///     ignore_patterns: vec!["*.pb.go".into()],
///     ..ReviewConfig::default()
/// };
/// let filter = IgnoreFilter::from_config(&config);
/// assert!(filter.is_ignored("api.pb.go"));
/// assert!(!filter.is_ignored("api.go"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    /// Each pattern as configured, next to its compiled form.
    patterns: Vec<(String, Pattern)>,
}

impl IgnoreFilter {
    /// Compile `patterns` in order, skipping any that are malformed.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pat in patterns {
            let pat: &str = pat.as_ref();
            match compile(pat) {
                Ok(p) => compiled.push((pat.to_string(), p)),
                Err(e) => {
                    tracing::warn!(pattern = pat, error = %e, "skipping malformed ignore pattern");
                }
            }
        }
        Self { patterns: compiled }
    }

    /// Build a filter from the review configuration's ignore patterns.
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::new(&config.ignore_patterns)
    }

    /// Returns `true` if any pattern matches `filename`.
    pub fn is_ignored(&self, filename: &str) -> bool {
        self.matching_pattern(filename).is_some()
    }

    /// The first pattern that matches `filename`, as configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use revstat_difflens::filter::IgnoreFilter;
    ///
    /// let filter = IgnoreFilter::new(&["docs/*", "*.md"]);
    /// assert_eq!(filter.matching_pattern("docs/a.md"), Some("docs/*"));
    /// ```
    pub fn matching_pattern(&self, filename: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, p)| p.matches_with(filename, MATCH_OPTIONS))
            .map(|(original, _)| original.as_str())
    }

    /// Number of usable (well-formed) patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if the filter has no usable patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
