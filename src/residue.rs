//! Filepath: src/residue.rs
//!
//! Residue classes modulo [`BUCKET_COUNT`] and the key routing function.
//!
//! Every key belongs to exactly one residue class, `key mod 3`, computed
//! with the Euclidean remainder so negative keys also land in `0..3`. The
//! residue is both the bucket a key is stored in and the partition a
//! writer is assigned under [`PartitionedAccess`](crate::PartitionedAccess).

use std::fmt as StdFmt;

/// Number of buckets in every table. A structural constant, not a knob.
pub const BUCKET_COUNT: usize = 3;

/// Bucket index for `key`: `key mod 3`, always in `0..BUCKET_COUNT`.
///
/// ```rust
/// use residue_table::residue::bucket_index;
///
/// assert_eq!(bucket_index(9), 0);
/// assert_eq!(bucket_index(7), 1);
/// assert_eq!(bucket_index(5), 2);
/// assert_eq!(bucket_index(-1), 2);
/// ```
#[inline]
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rem_euclid(3) is in 0..3"
)]
pub const fn bucket_index(key: i64) -> usize {
    key.rem_euclid(BUCKET_COUNT as i64) as usize
}

// ============================================================================
//  ResidueError
// ============================================================================

/// Errors from constructing a [`Residue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResidueError {
    /// The value is not a residue modulo [`BUCKET_COUNT`].
    OutOfRange(usize),
}

impl StdFmt::Display for ResidueError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::OutOfRange(r) => {
                write!(f, "residue {r} is out of range (expected 0..{BUCKET_COUNT})")
            }
        }
    }
}

impl std::error::Error for ResidueError {}

// ============================================================================
//  Residue
// ============================================================================

/// A residue class modulo [`BUCKET_COUNT`], guaranteed in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Residue(u8);

impl Residue {
    /// All residue classes, in bucket order.
    pub const ALL: [Self; BUCKET_COUNT] = [Self(0), Self(1), Self(2)];

    /// Validate a caller-supplied residue.
    ///
    /// # Errors
    /// [`ResidueError::OutOfRange`] if `r >= BUCKET_COUNT`.
    pub const fn new(r: usize) -> Result<Self, ResidueError> {
        match r {
            0 => Ok(Self(0)),
            1 => Ok(Self(1)),
            2 => Ok(Self(2)),
            _ => Err(ResidueError::OutOfRange(r)),
        }
    }

    /// The residue class `key` belongs to.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "bucket_index is < 3")]
    pub const fn of(key: i64) -> Self {
        Self(bucket_index(key) as u8)
    }

    /// The bucket index this residue routes to.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether `key` belongs to this residue class.
    #[inline]
    #[must_use]
    pub const fn contains(self, key: i64) -> bool {
        bucket_index(key) == self.index()
    }

    /// The keys of this class within `range`, ascending.
    ///
    /// Convenience for handing a writer its partition of a key range.
    pub fn keys_in(self, range: std::ops::RangeInclusive<i64>) -> impl Iterator<Item = i64> {
        range.filter(move |&k| self.contains(k))
    }
}

impl TryFrom<usize> for Residue {
    type Error = ResidueError;

    fn try_from(r: usize) -> Result<Self, Self::Error> {
        Self::new(r)
    }
}

impl StdFmt::Display for Residue {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        write!(f, "{} (mod {BUCKET_COUNT})", self.0)
    }
}
