//! npm-style version range algebra.
//!
//! A range is parsed into a union of intervals over [`semver::Version`].
//! X-ranges, tilde, caret and hyphen ranges are widened the way npm does,
//! with upper bounds of the form `X.Y.Z-0` so that prereleases of the next
//! version fall outside. Prerelease opt-in rules (a `1.2.3-beta` only
//! matching comparators on `1.2.3`) are not modelled: prereleases are
//! ordered like any other version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

/// Errors from parsing a version range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// A version component is not a number or wildcard.
    #[error("invalid version `{0}`")]
    InvalidVersion(String),

    /// A hyphen range is missing one side.
    #[error("incomplete hyphen range in `{0}`")]
    IncompleteHyphen(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
    Unbounded,
    Inclusive(Version),
    Exclusive(Version),
}

impl Bound {
    fn version(&self) -> Option<&Version> {
        match self {
            Self::Unbounded => None,
            Self::Inclusive(v) | Self::Exclusive(v) => Some(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Interval {
    lower: Bound,
    upper: Bound,
}

impl Interval {
    const ANY: Self = Self {
        lower: Bound::Unbounded,
        upper: Bound::Unbounded,
    };

    fn at_least(v: Version) -> Self {
        Self {
            lower: Bound::Inclusive(v),
            upper: Bound::Unbounded,
        }
    }

    fn between(low: Version, high: Version) -> Self {
        Self {
            lower: Bound::Inclusive(low),
            upper: Bound::Exclusive(high),
        }
    }

    fn nothing() -> Self {
        Self {
            lower: Bound::Exclusive(floor(0, 0, 0)),
            upper: Bound::Exclusive(floor(0, 0, 0)),
        }
    }

    fn intersect(&self, other: &Self) -> Self {
        Self {
            lower: tighter_lower(&self.lower, &other.lower),
            upper: tighter_upper(&self.upper, &other.upper),
        }
    }

    fn is_empty(&self) -> bool {
        let (Some(low), Some(high)) = (self.lower.version(), self.upper.version()) else {
            return false;
        };
        match low.cmp(high) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !matches!(
                (&self.lower, &self.upper),
                (Bound::Inclusive(_), Bound::Inclusive(_))
            ),
        }
    }

    fn contains(&self, v: &Version) -> bool {
        let above = match &self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(low) => v >= low,
            Bound::Exclusive(low) => v > low,
        };
        let below = match &self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(high) => v <= high,
            Bound::Exclusive(high) => v < high,
        };
        above && below
    }
}

fn tighter_lower(a: &Bound, b: &Bound) -> Bound {
    match (a.version(), b.version()) {
        (None, _) => b.clone(),
        (_, None) => a.clone(),
        (Some(x), Some(y)) => match x.cmp(y) {
            Ordering::Greater => a.clone(),
            Ordering::Less => b.clone(),
            Ordering::Equal if matches!(a, Bound::Exclusive(_)) => a.clone(),
            Ordering::Equal => b.clone(),
        },
    }
}

fn tighter_upper(a: &Bound, b: &Bound) -> Bound {
    match (a.version(), b.version()) {
        (None, _) => b.clone(),
        (_, None) => a.clone(),
        (Some(x), Some(y)) => match x.cmp(y) {
            Ordering::Less => a.clone(),
            Ordering::Greater => b.clone(),
            Ordering::Equal if matches!(a, Bound::Exclusive(_)) => a.clone(),
            Ordering::Equal => b.clone(),
        },
    }
}

/// `major.minor.patch-0`: the lowest version of that triple.
fn floor(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: Prerelease::new("0").unwrap_or_default(),
        build: BuildMetadata::EMPTY,
    }
}

/// A version with possibly missing (wildcard) components.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(text: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidVersion(text.to_string());
        let trimmed = text.trim_start_matches(['=', 'v', 'V']);
        let core = trimmed.split_once('+').map_or(trimmed, |(core, _)| core);
        let (core, pre) = core.split_once('-').map_or((core, None), |(c, p)| (c, Some(p)));

        let mut parts = core.split('.');
        let mut component = || -> Result<Option<u64>, RangeError> {
            match parts.next() {
                None | Some("x" | "X" | "*") => Ok(None),
                Some(n) => n.parse::<u64>().map(Some).map_err(|_| invalid()),
            }
        };
        let major = component()?;
        let minor = component()?.filter(|_| major.is_some());
        let patch = component()?.filter(|_| minor.is_some());
        if parts.next().is_some() {
            return Err(invalid());
        }

        let pre = match (patch, pre) {
            (Some(_), Some(p)) => Prerelease::new(p).map_err(|_| invalid())?,
            _ => Prerelease::EMPTY,
        };
        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// The lowest version matching this partial.
    fn low(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
            build: BuildMetadata::EMPTY,
        }
    }

    /// The exclusive ceiling of an x-range: the next version past the
    /// last specified component. `None` for a full version or `*`.
    fn ceiling(&self) -> Option<Version> {
        match (self.major, self.minor, self.patch) {
            (Some(major), None, _) => Some(floor(major.saturating_add(1), 0, 0)),
            (Some(major), Some(minor), None) => Some(floor(major, minor.saturating_add(1), 0)),
            _ => None,
        }
    }

    fn is_any(&self) -> bool {
        self.major.is_none()
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Exact,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Tilde,
    Caret,
}

const OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterEq),
    ("<=", Operator::LessEq),
    ("~>", Operator::Tilde),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("~", Operator::Tilde),
    ("^", Operator::Caret),
    ("=", Operator::Exact),
];

fn split_operator(token: &str) -> (Operator, &str) {
    OPERATORS
        .iter()
        .find_map(|(prefix, op)| token.strip_prefix(prefix).map(|rest| (*op, rest)))
        .unwrap_or((Operator::Exact, token))
}

fn comparator(token: &str) -> Result<Interval, RangeError> {
    let (op, rest) = split_operator(token);
    let v = Partial::parse(rest)?;
    if v.is_any() {
        return Ok(match op {
            Operator::Greater | Operator::Less => Interval::nothing(),
            _ => Interval::ANY,
        });
    }
    let interval = match op {
        Operator::Exact => match v.ceiling() {
            Some(ceiling) => Interval::between(v.low(), ceiling),
            None => Interval {
                lower: Bound::Inclusive(v.low()),
                upper: Bound::Inclusive(v.low()),
            },
        },
        Operator::GreaterEq => Interval::at_least(v.low()),
        Operator::Greater => match v.ceiling() {
            Some(ceiling) => Interval::at_least(ceiling),
            None => Interval {
                lower: Bound::Exclusive(v.low()),
                upper: Bound::Unbounded,
            },
        },
        Operator::Less => Interval {
            lower: Bound::Unbounded,
            upper: Bound::Exclusive(if v.is_full() {
                v.low()
            } else {
                floor(v.low().major, v.low().minor, 0)
            }),
        },
        Operator::LessEq => Interval {
            lower: Bound::Unbounded,
            upper: match v.ceiling() {
                Some(ceiling) => Bound::Exclusive(ceiling),
                None => Bound::Inclusive(v.low()),
            },
        },
        Operator::Tilde => {
            let low = v.low();
            let ceiling = match v.minor {
                Some(minor) => floor(low.major, minor.saturating_add(1), 0),
                None => floor(low.major.saturating_add(1), 0, 0),
            };
            Interval::between(low, ceiling)
        }
        Operator::Caret => {
            let low = v.low();
            let ceiling = match (v.major, v.minor, v.patch) {
                (Some(0), Some(0), Some(patch)) => floor(0, 0, patch.saturating_add(1)),
                (Some(0), Some(minor), _) => floor(0, minor.saturating_add(1), 0),
                _ => floor(low.major.saturating_add(1), 0, 0),
            };
            Interval::between(low, ceiling)
        }
    };
    Ok(interval)
}

fn hyphen(from: &str, to: &str) -> Result<Interval, RangeError> {
    let low = Partial::parse(from)?;
    let high = Partial::parse(to)?;
    let upper = if high.is_any() {
        Bound::Unbounded
    } else {
        match high.ceiling() {
            Some(ceiling) => Bound::Exclusive(ceiling),
            None => Bound::Inclusive(high.low()),
        }
    };
    Ok(Interval {
        lower: Bound::Inclusive(low.low()),
        upper,
    })
}

/// Splits a comparator set into tokens, gluing a bare operator to the
/// version that follows it (`>= 1.2` becomes `>=1.2`).
fn tokens(set: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut pending = String::new();
    for word in set.split_whitespace() {
        if OPERATORS.iter().any(|(op, _)| *op == word) {
            pending.push_str(word);
            continue;
        }
        out.push(format!("{pending}{word}"));
        pending.clear();
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

fn comparator_set(set: &str) -> Result<Interval, RangeError> {
    let words = tokens(set);
    let mut interval = Interval::ANY;
    let mut i = 0;
    while i < words.len() {
        let next = if words.get(i + 1).map(String::as_str) == Some("-") {
            let to = words
                .get(i + 2)
                .ok_or_else(|| RangeError::IncompleteHyphen(set.to_string()))?;
            let part = hyphen(&words[i], to)?;
            i += 3;
            part
        } else if words[i] == "-" {
            return Err(RangeError::IncompleteHyphen(set.to_string()));
        } else {
            let part = comparator(&words[i])?;
            i += 1;
            part
        };
        interval = interval.intersect(&next);
    }
    Ok(interval)
}

/// A parsed version range: a union of intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    source: String,
    intervals: Vec<Interval>,
}

impl VersionRange {
    /// Parses an npm range such as `^1.2.0`, `>=1 <3 || 4.x` or `1 - 2`.
    ///
    /// An empty string matches everything.
    ///
    /// # Errors
    ///
    /// Returns an error for anything that is not a version range, such as
    /// dist-tags or `git+https:` URLs.
    pub fn parse(text: &str) -> Result<Self, RangeError> {
        let intervals = text
            .split("||")
            .map(comparator_set)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|interval| !interval.is_empty())
            .collect();
        Ok(Self {
            source: text.trim().to_string(),
            intervals,
        })
    }

    /// Returns true if no version satisfies the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns true if some version satisfies both ranges.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intervals.iter().any(|a| {
            other
                .intervals
                .iter()
                .any(|b| !a.intersect(b).is_empty())
        })
    }

    /// Returns true if `version` satisfies the range.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.intervals.iter().any(|i| i.contains(version))
    }
}

impl FromStr for VersionRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
