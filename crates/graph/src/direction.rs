//! Direction of a foreign key crossing.

use core::fmt;

/// How a foreign key is crossed.
///
/// `Unresolved` is only meaningful as a request ("infer it for me"); a
/// constructed `Step` never stores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// From the table declaring the field to the table it references.
    TowardReference,
    /// From the referenced table back to the table declaring the field.
    AwayFromReference,
    /// Not known, or mixed when aggregated over several fields.
    Unresolved,
}

impl Direction {
    /// Returns `TowardReference` if `foreign`, `AwayFromReference` otherwise.
    #[inline]
    pub fn from_foreign(foreign: bool) -> Self {
        if foreign {
            Direction::TowardReference
        } else {
            Direction::AwayFromReference
        }
    }

    /// Returns the direction crossing the same field the other way.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Direction::TowardReference => Direction::AwayFromReference,
            Direction::AwayFromReference => Direction::TowardReference,
            Direction::Unresolved => Direction::Unresolved,
        }
    }

    /// Returns true unless this is `Unresolved`.
    #[inline]
    pub fn is_resolved(self) -> bool {
        self != Direction::Unresolved
    }

    /// Returns `Some(true)` for `TowardReference`, `Some(false)` for
    /// `AwayFromReference`.
    #[inline]
    pub fn is_foreign(self) -> Option<bool> {
        match self {
            Direction::TowardReference => Some(true),
            Direction::AwayFromReference => Some(false),
            Direction::Unresolved => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::TowardReference => "TOWARD_REFERENCE",
            Direction::AwayFromReference => "AWAY_FROM_REFERENCE",
            Direction::Unresolved => "UNRESOLVED",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_is_involution() {
        for dir in [
            Direction::TowardReference,
            Direction::AwayFromReference,
            Direction::Unresolved,
        ] {
            assert_eq!(dir.reverse().reverse(), dir);
        }
        assert_eq!(
            Direction::TowardReference.reverse(),
            Direction::AwayFromReference
        );
    }

    #[test]
    fn test_from_foreign() {
        assert_eq!(Direction::from_foreign(true), Direction::TowardReference);
        assert_eq!(Direction::from_foreign(false), Direction::AwayFromReference);
        assert_eq!(Direction::Unresolved.is_foreign(), None);
        assert!(!Direction::Unresolved.is_resolved());
    }
}
