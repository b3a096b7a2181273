//! Version tags and previous-tag selection

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A `vX.Y.Z[-pre]` tag
///
/// Ordering follows the numeric components; a pre-release sorts before the
/// release it precedes, and pre-releases of the same version compare per
/// dot-separated identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl FromStr for Version {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let raw = tag.strip_prefix('v').unwrap_or(tag);
        let (core, pre) = match raw.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return Err(tag.to_string()),
            None => (raw, None),
        };

        let parts = core
            .split('.')
            .map(|part| part.parse::<u64>().map_err(|_| tag.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(Version {
                major: *major,
                minor: *minor,
                patch: *patch,
                pre,
            }),
            _ => Err(tag.to_string()),
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => cmp_pre_release(a, b),
            })
    }
}

/// Compare pre-release suffixes identifier by identifier
///
/// Numeric identifiers compare as numbers and sort before alphanumeric ones,
/// so `rc.2 < rc.10` and `1 < alpha`. A shorter suffix sorts first when it is
/// a prefix of the other.
fn cmp_pre_release(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (x.parse::<u64>(), y.parse::<u64>()) {
                // `01` and `1` stay distinct
                (Ok(n), Ok(m)) => n.cmp(&m).then_with(|| x.cmp(y)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => x.cmp(y),
            },
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// The tag immediately preceding `current` among `tags`
///
/// Tags that are not versions are ignored. Returns `None` when `current` is
/// the lowest version, i.e. the first release.
pub fn previous_tag<'a, I>(tags: I, current: &Version) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter_map(|tag| match tag.parse::<Version>() {
            Ok(version) => Some((version, tag)),
            Err(_) => {
                debug!("Ignoring non-version tag {}", tag);
                None
            }
        })
        .filter(|(version, _)| version < current)
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, tag)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(tag: &str) -> Version {
        tag.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            v("v1.2.3"),
            Version {
                major: 1,
                minor: 2,
                patch: 3,
                pre: None
            }
        );
        assert_eq!(v("0.10.0"), v("v0.10.0"));
        assert_eq!(v("v2.0.0-rc.1").pre.as_deref(), Some("rc.1"));
        assert_eq!(v("v2.0.0-rc.1").to_string(), "v2.0.0-rc.1");

        for bad in ["latest", "v1.2", "v1.2.3.4", "v1.x.3", "v1.2.3-", ""] {
            assert!(bad.parse::<Version>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(v("v0.10.0") > v("v0.9.9"));
        assert!(v("v1.0.0") > v("v1.0.0-rc.2"));
        assert!(v("v1.0.0-rc.2") > v("v1.0.0-rc.1"));
    }

    #[test]
    fn test_pre_release_identifiers_compare_numerically() {
        assert!(v("v1.0.0-rc.10") > v("v1.0.0-rc.2"));
        assert!(v("v1.0.0-beta") > v("v1.0.0-alpha.5"));
        assert!(v("v1.0.0-rc.1") > v("v1.0.0-rc"));
        assert!(v("v1.0.0-alpha") > v("v1.0.0-1"));

        let tags = ["v1.0.0-rc.1", "v1.0.0-rc.2", "v1.0.0-rc.9", "v1.0.0-rc.10"];
        assert_eq!(
            previous_tag(tags, &v("v1.0.0-rc.10")).as_deref(),
            Some("v1.0.0-rc.9")
        );
        assert_eq!(previous_tag(tags, &v("v1.0.0")).as_deref(), Some("v1.0.0-rc.10"));
    }

    #[test]
    fn test_previous_tag_is_immediate_predecessor() {
        let tags = ["v0.1.0", "v0.2.0", "v0.10.0", "v0.9.0", "nightly", "v1.0.0"];
        assert_eq!(previous_tag(tags, &v("v0.10.0")).as_deref(), Some("v0.9.0"));
        assert_eq!(previous_tag(tags, &v("v1.0.0")).as_deref(), Some("v0.10.0"));
    }

    #[test]
    fn test_previous_tag_ignores_later_tags() {
        // Re-tagging an older release must not pick up newer history
        let tags = ["v0.1.0", "v0.2.0", "v0.3.0"];
        assert_eq!(previous_tag(tags, &v("v0.2.0")).as_deref(), Some("v0.1.0"));
    }

    #[test]
    fn test_first_release_has_no_previous_tag() {
        assert_eq!(previous_tag(["v0.1.0"], &v("v0.1.0")), None);
        assert_eq!(previous_tag([], &v("v0.1.0")), None);
    }
}
