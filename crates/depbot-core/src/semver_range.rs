//! npm-style version ranges over [`semver::Version`].
//!
//! Supported grammar: `||` unions, space-separated comparator sets,
//! `<`, `<=`, `>`, `>=`, `=`, caret, tilde, x-ranges, hyphen ranges
//! and partial versions. Build metadata is ignored when comparing.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use semver::{Prerelease, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionRangeError {
    #[error("Invalid version '{version}'")]
    InvalidVersion { version: String },

    #[error("Invalid version range '{range}'")]
    InvalidRange { range: String },
}

/// Parse a version, accepting a leading `v` or `=`.
pub fn parse_version(raw: &str) -> Result<Version, VersionRangeError> {
    let trimmed = raw.trim().trim_start_matches(['=', 'v', 'V']);
    Version::parse(trimmed).map_err(|_| VersionRangeError::InvalidVersion {
        version: raw.to_string(),
    })
}

/// Precedence comparison, build metadata excluded.
pub fn compare_versions(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, major: u64, minor: u64, patch: u64) -> Self {
        Self {
            op,
            version: Version::new(major, minor, patch),
        }
    }

    fn with_version(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Matches nothing but prereleases of 0.0.0, which the prerelease rule rejects.
    fn nothing() -> Self {
        Self::new(Op::Lt, 0, 0, 0)
    }

    fn matches(&self, version: &Version) -> bool {
        let ordering = compare_versions(version, &self.version);
        match self.op {
            Op::Eq => ordering == Ordering::Equal,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
        }
    }
}

/// Version with optional components (`1`, `1.2`, `1.x`, `*`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_start_matches(['=', 'v', 'V']);
        let raw = raw.split('+').next().unwrap_or_default();
        let (core, pre) = match raw.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (raw, None),
        };

        let parts: Vec<&str> = if core.is_empty() {
            vec![]
        } else {
            core.split('.').collect()
        };
        if parts.len() > 3 {
            return None;
        }

        let mut components = [None; 3];
        let mut wildcard = false;
        for (idx, part) in parts.iter().enumerate() {
            match *part {
                "x" | "X" | "*" => wildcard = true,
                digits => {
                    let value: u64 = digits.parse().ok()?;
                    // `1.x.3` is read as `1.x`
                    if !wildcard {
                        components[idx] = Some(value);
                    }
                }
            }
        }

        let [major, minor, patch] = components;
        let pre = match (pre, patch) {
            (Some(pre), Some(_)) => Prerelease::new(pre).ok()?,
            (Some(_), None) => return None,
            (None, _) => Prerelease::EMPTY,
        };

        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Lowest version of the partial.
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }
}

fn split_operator(token: &str) -> (&str, &str) {
    for op in [">=", "<=", "~>", ">", "<", "=", "^", "~"] {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }

    ("", token)
}

fn parse_comparator(token: &str) -> Option<Vec<Comparator>> {
    let (op, rest) = split_operator(token);
    let partial = Partial::parse(rest)?;
    let floor = partial.floor();

    let comparators = match (op, partial.major, partial.minor, partial.patch) {
        ("" | "=", None, _, _) | ("^" | "~" | "~>" | ">=" | "<=", None, _, _) => vec![],
        (">" | "<", None, _, _) => vec![Comparator::nothing()],

        ("" | "=" | "^" | "~" | "~>", Some(major), None, _) => vec![
            Comparator::new(Op::Gte, major, 0, 0),
            Comparator::new(Op::Lt, major.checked_add(1)?, 0, 0),
        ],
        ("" | "=", Some(major), Some(minor), None) => vec![
            Comparator::new(Op::Gte, major, minor, 0),
            Comparator::new(Op::Lt, major, minor.checked_add(1)?, 0),
        ],
        ("" | "=", Some(_), Some(_), Some(_)) => {
            vec![Comparator::with_version(Op::Eq, floor)]
        }

        ("^", Some(major), Some(minor), patch) => {
            let upper = if major > 0 {
                Comparator::new(Op::Lt, major.checked_add(1)?, 0, 0)
            } else if minor > 0 || patch.is_none() {
                Comparator::new(Op::Lt, 0, minor.checked_add(1)?, 0)
            } else {
                Comparator::new(Op::Lt, 0, 0, patch.unwrap_or(0).checked_add(1)?)
            };
            vec![Comparator::with_version(Op::Gte, floor), upper]
        }

        ("~" | "~>", Some(major), Some(minor), _) => vec![
            Comparator::with_version(Op::Gte, floor),
            Comparator::new(Op::Lt, major, minor.checked_add(1)?, 0),
        ],

        (">", Some(major), None, _) => {
            vec![Comparator::new(Op::Gte, major.checked_add(1)?, 0, 0)]
        }
        (">", Some(major), Some(minor), None) => {
            vec![Comparator::new(Op::Gte, major, minor.checked_add(1)?, 0)]
        }
        (">", Some(_), Some(_), Some(_)) => vec![Comparator::with_version(Op::Gt, floor)],

        (">=", Some(_), _, _) => vec![Comparator::with_version(Op::Gte, floor)],
        ("<", Some(_), _, _) => vec![Comparator::with_version(Op::Lt, floor)],

        ("<=", Some(major), None, _) => {
            vec![Comparator::new(Op::Lt, major.checked_add(1)?, 0, 0)]
        }
        ("<=", Some(major), Some(minor), None) => {
            vec![Comparator::new(Op::Lt, major, minor.checked_add(1)?, 0)]
        }
        ("<=", Some(_), Some(_), Some(_)) => vec![Comparator::with_version(Op::Lte, floor)],

        _ => return None,
    };

    Some(comparators)
}

fn parse_hyphen(from: &str, to: &str) -> Option<Vec<Comparator>> {
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;
    let mut comparators = vec![];

    if from.major.is_some() {
        comparators.push(Comparator::with_version(Op::Gte, from.floor()));
    }

    match (to.major, to.minor, to.patch) {
        (None, _, _) => (),
        (Some(major), None, _) => {
            comparators.push(Comparator::new(Op::Lt, major.checked_add(1)?, 0, 0))
        }
        (Some(major), Some(minor), None) => {
            comparators.push(Comparator::new(Op::Lt, major, minor.checked_add(1)?, 0))
        }
        (Some(_), Some(_), Some(_)) => comparators.push(Comparator::with_version(Op::Lte, to.floor())),
    }

    Some(comparators)
}

fn parse_set(raw: &str) -> Option<Vec<Comparator>> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some((from, to)) = normalized.split_once(" - ") {
        return parse_hyphen(from, to);
    }

    // Glue lone operators to their version (`>= 1.2.3`)
    let mut tokens: Vec<String> = vec![];
    let mut pending_operator = String::new();
    for part in normalized.split(' ').filter(|p| !p.is_empty()) {
        if part.chars().all(|c| matches!(c, '<' | '>' | '=' | '^' | '~')) {
            pending_operator.push_str(part);
        } else {
            tokens.push(format!("{pending_operator}{part}"));
            pending_operator.clear();
        }
    }
    if !pending_operator.is_empty() {
        return None;
    }

    let mut comparators = vec![];
    for token in tokens {
        comparators.extend(parse_comparator(&token)?);
    }

    Some(comparators)
}

fn set_matches(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }

    // A prerelease only matches a set naming a prerelease of the same tuple
    version.pre.is_empty()
        || set.iter().any(|c| {
            !c.version.pre.is_empty()
                && (c.version.major, c.version.minor, c.version.patch)
                    == (version.major, version.minor, version.patch)
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Below,
    Above,
}

/// Union of comparator sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    sets: Vec<Vec<Comparator>>,
}

impl VersionRange {
    pub fn parse(raw: &str) -> Result<Self, VersionRangeError> {
        let sets = raw
            .split("||")
            .map(parse_set)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| VersionRangeError::InvalidRange {
                range: raw.to_string(),
            })?;

        Ok(Self {
            raw: raw.to_string(),
            sets,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set_matches(set, version))
    }

    /// Lowest version satisfying the range.
    pub fn min_version(&self) -> Option<Version> {
        let zero = Version::new(0, 0, 0);
        if self.satisfies(&zero) {
            return Some(zero);
        }

        let mut zero_pre = zero;
        zero_pre.pre = Prerelease::new("0").ok()?;
        if self.satisfies(&zero_pre) {
            return Some(zero_pre);
        }

        let mut min_version: Option<Version> = None;
        for set in &self.sets {
            let mut set_min: Option<Version> = None;
            for comparator in set {
                let candidate = match comparator.op {
                    Op::Gt => {
                        let mut version = comparator.version.clone();
                        if version.pre.is_empty() {
                            version.patch = version.patch.checked_add(1)?;
                        } else {
                            version.pre = Prerelease::new(&format!("{}.0", version.pre)).ok()?;
                        }
                        version
                    }
                    Op::Eq | Op::Gte => comparator.version.clone(),
                    Op::Lt | Op::Lte => continue,
                };

                if set_min
                    .as_ref()
                    .map_or(true, |m| compare_versions(&candidate, m) == Ordering::Greater)
                {
                    set_min = Some(candidate);
                }
            }

            if let Some(set_min) = set_min {
                if min_version
                    .as_ref()
                    .map_or(true, |m| compare_versions(m, &set_min) == Ordering::Greater)
                {
                    min_version = Some(set_min);
                }
            }
        }

        min_version.filter(|v| self.satisfies(v))
    }

    /// The version is lower than every version of the range.
    pub fn is_below(&self, version: &Version) -> bool {
        self.outside(version, Direction::Below)
    }

    /// The version is greater than every version of the range.
    pub fn is_above(&self, version: &Version) -> bool {
        self.outside(version, Direction::Above)
    }

    fn outside(&self, version: &Version, direction: Direction) -> bool {
        if self.satisfies(version) {
            return false;
        }

        let (toward, inclusive_toward) = match direction {
            Direction::Above => (Op::Gt, Op::Gte),
            Direction::Below => (Op::Lt, Op::Lte),
        };
        // `further(a, b)`: a is further than b in the direction
        let further = |a: &Version, b: &Version| match direction {
            Direction::Above => compare_versions(a, b) == Ordering::Greater,
            Direction::Below => compare_versions(a, b) == Ordering::Less,
        };

        for set in &self.sets {
            let any = [Comparator::new(Op::Gte, 0, 0, 0)];
            let set = if set.is_empty() { &any[..] } else { &set[..] };

            let mut high = &set[0];
            let mut low = &set[0];
            for comparator in set {
                if further(&comparator.version, &high.version) {
                    high = comparator;
                } else if further(&low.version, &comparator.version) {
                    low = comparator;
                }
            }

            // The edge of the set is open in the direction
            if high.op == toward || high.op == inclusive_toward {
                return false;
            }

            if (low.op == Op::Eq || low.op == toward) && !further(version, &low.version) {
                return false;
            } else if low.op == inclusive_toward && further(&low.version, version) {
                return false;
            }
        }

        true
    }
}

impl FromStr for VersionRange {
    type Err = VersionRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn v(raw: &str) -> Version {
        parse_version(raw).unwrap()
    }

    fn range(raw: &str) -> VersionRange {
        VersionRange::parse(raw).unwrap()
    }

    #[test]
    fn lenient_versions() {
        assert_eq!(v("v1.2.3"), Version::new(1, 2, 3));
        assert_eq!(v("=1.2.3"), Version::new(1, 2, 3));
        assert!(parse_version("1.2").is_err());
        assert_eq!(
            compare_versions(&v("1.2.3+build.1"), &v("1.2.3+build.2")),
            Ordering::Equal
        );
    }

    #[test]
    fn caret_and_tilde() {
        assert!(range("^1.2.0").satisfies(&v("1.2.0")));
        assert!(range("^1.2.0").satisfies(&v("1.9.9")));
        assert!(!range("^1.2.0").satisfies(&v("2.0.0")));
        assert!(range("^0.2.3").satisfies(&v("0.2.9")));
        assert!(!range("^0.2.3").satisfies(&v("0.3.0")));
        assert!(!range("^0.0.3").satisfies(&v("0.0.4")));
        assert!(range("~1.2.3").satisfies(&v("1.2.9")));
        assert!(!range("~1.2.3").satisfies(&v("1.3.0")));
        assert!(range("~1").satisfies(&v("1.8.0")));
    }

    #[test]
    fn x_ranges_unions_and_hyphens() {
        let union = range("1.x || >=3.0.0 <4");
        assert!(union.satisfies(&v("1.9.9")));
        assert!(union.satisfies(&v("3.5.0")));
        assert!(!union.satisfies(&v("2.0.0")));
        assert!(!union.satisfies(&v("4.0.0")));

        assert!(range("*").satisfies(&v("42.0.0")));
        assert!(range("").satisfies(&v("0.0.1")));
        assert!(range(">= 1.2.3").satisfies(&v("1.2.3")));

        let hyphen = range("1.2 - 2.3.4");
        assert!(hyphen.satisfies(&v("1.2.0")));
        assert!(hyphen.satisfies(&v("2.3.4")));
        assert!(!hyphen.satisfies(&v("2.3.5")));
        assert!(range("1.2.3 - 2").satisfies(&v("2.9.9")));
        assert!(!range("1.2.3 - 2").satisfies(&v("3.0.0")));
    }

    #[test]
    fn prereleases() {
        assert!(range("^1.2.3-beta.1").satisfies(&v("1.2.3-beta.2")));
        assert!(!range("^1.2.3-beta.1").satisfies(&v("1.2.4-beta.1")));
        assert!(range("^1.2.3-beta.1").satisfies(&v("1.2.4")));
        assert!(!range("^1.0.0").satisfies(&v("1.5.0-rc.1")));
    }

    #[test]
    fn invalid_ranges() {
        assert!(VersionRange::parse("not-a-range").is_err());
        assert!(VersionRange::parse("latest").is_err());
        assert!(VersionRange::parse("github:user/repo").is_err());
        assert!(VersionRange::parse(">=").is_err());
    }

    #[test]
    fn out_of_bounds_components_are_invalid() {
        assert!(VersionRange::parse("^18446744073709551615.0.0").is_err());
        assert!(VersionRange::parse("~1.18446744073709551615").is_err());
        assert!(VersionRange::parse("<=18446744073709551615").is_err());
        assert!(VersionRange::parse("1.0.0 - 18446744073709551615.x").is_err());
        assert!(VersionRange::parse("18446744073709551616").is_err());

        // Exact bounds stay representable
        assert!(range(">=18446744073709551615.0.0").satisfies(&v("18446744073709551615.0.0")));
        assert_eq!(
            range(">18446744073709551615.18446744073709551615.18446744073709551615").min_version(),
            None
        );
    }

    #[test]
    fn min_version() {
        assert_eq!(range("^1.0.0").min_version(), Some(v("1.0.0")));
        assert_eq!(range(">1.2.3").min_version(), Some(v("1.2.4")));
        assert_eq!(range("~1.2").min_version(), Some(v("1.2.0")));
        assert_eq!(range("<2.0.0").min_version(), Some(v("0.0.0")));
        assert_eq!(range("2.x || ^1.4.0").min_version(), Some(v("1.4.0")));
        assert_eq!(range(">1.2.3-beta.1").min_version(), Some(v("1.2.3-beta.1.0")));
    }

    #[test]
    fn below_and_above() {
        assert!(range("^3.0.0").is_below(&v("1.2.0")));
        assert!(!range("^3.0.0").is_above(&v("1.2.0")));
        assert!(range("^1.2.0").is_above(&v("2.0.0")));
        assert!(!range("^1.2.0").is_below(&v("2.0.0")));
        assert!(!range("^1.2.0").is_below(&v("1.5.0")));
        assert!(!range("^1.2.0").is_above(&v("1.5.0")));
        assert!(!range(">=1.0.0").is_above(&v("9.0.0")));
        assert!(!range("<2.0.0").is_below(&v("0.1.0")));

        // In a gap between sets
        let gaps = range("<1.0.0 || >2.0.0");
        assert!(!gaps.is_below(&v("1.5.0")));
        assert!(!gaps.is_above(&v("1.5.0")));
    }
}
