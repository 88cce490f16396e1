use std::collections::TryReserveError;
use std::fmt;

/// Errors reported by the fallible operations of `TreeMap`.
///
/// A call that returns an error leaves the map exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The map already holds as many nodes as its index type can address.
    CapacityExceeded,
    /// The allocator refused to grow the node storage.
    AllocFailed(TryReserveError),
    /// A `Position` was used after the map it came from was restructured.
    StalePosition {
        /// Generation recorded in the position
        expected: u64,
        /// Current generation of the map
        found: u64,
    },
    /// A `Position` was used on a map other than the one it came from.
    ForeignPosition,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded => f.write_str("reached maximum number of nodes"),
            Error::AllocFailed(err) => write!(f, "failed to allocate a tree node: {err}"),
            Error::StalePosition { expected, found } => write!(
                f,
                "position is stale: taken at generation {expected}, map is at generation {found}"
            ),
            Error::ForeignPosition => f.write_str("position belongs to another map"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AllocFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::AllocFailed(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stale_position_message_names_both_generations() {
        let err = Error::StalePosition {
            expected: 3,
            found: 5,
        };
        assert_eq!(
            err.to_string(),
            "position is stale: taken at generation 3, map is at generation 5"
        );
    }

    #[test]
    fn foreign_position_has_no_source() {
        assert_eq!(
            Error::ForeignPosition.to_string(),
            "position belongs to another map"
        );
        assert!(std::error::Error::source(&Error::ForeignPosition).is_none());
    }

    #[test]
    fn alloc_failure_exposes_source() {
        let reserve = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let err = Error::from(reserve);
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&Error::CapacityExceeded).is_none());
    }
}
