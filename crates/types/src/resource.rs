//! Fixed-length resource vectors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Units of a single resource type
pub type Units = u64;

/// One count per resource type.
///
/// The length is fixed at construction; there is no way to push or pop
/// entries afterwards. The same type stands for total availability, a
/// process's maximum demand, its current allocation or its remaining need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Box<[Units]>);

impl ResourceVector {
    /// Create a vector from per-resource unit counts
    #[must_use]
    pub fn new(units: impl Into<Box<[Units]>>) -> Self {
        Self(units.into())
    }

    /// Vector of `len` zero entries
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0; len].into_boxed_slice())
    }

    /// Number of resource types
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Units> + '_ {
        self.0.iter().copied()
    }

    /// Component-wise `self <= other`
    #[must_use]
    pub fn fits_within(&self, other: &Self) -> bool {
        self.first_shortfall(other).is_none()
    }

    /// First resource index where `self` exceeds `other`, with both values
    #[must_use]
    pub fn first_shortfall(&self, other: &Self) -> Option<(usize, Units, Units)> {
        debug_assert_eq!(self.len(), other.len());
        self.0
            .iter()
            .zip(other.0.iter())
            .enumerate()
            .find(|(_, (wanted, free))| wanted > free)
            .map(|(resource, (&wanted, &free))| (resource, wanted, free))
    }

    /// Component-wise subtraction clamped at zero
    #[must_use]
    pub fn saturating_sub(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.saturating_sub(*b))
            .collect::<Vec<_>>()
            .into()
    }

    /// Component-wise addition, reporting the first resource that overflows
    ///
    /// # Errors
    ///
    /// Returns the index of the first resource whose sum exceeds [`Units::MAX`].
    pub fn try_add_assign(&mut self, other: &Self) -> Result<(), usize> {
        debug_assert_eq!(self.len(), other.len());
        for (resource, (acc, add)) in self.0.iter_mut().zip(other.0.iter()).enumerate() {
            *acc = acc.checked_add(*add).ok_or(resource)?;
        }
        Ok(())
    }
}

impl AddAssign<&ResourceVector> for ResourceVector {
    /// Saturating component-wise addition.
    ///
    /// Validated snapshots never reach the saturation point.
    fn add_assign(&mut self, other: &ResourceVector) {
        debug_assert_eq!(self.len(), other.len());
        for (acc, add) in self.0.iter_mut().zip(other.0.iter()) {
            *acc = acc.saturating_add(*add);
        }
    }
}

impl From<Vec<Units>> for ResourceVector {
    fn from(units: Vec<Units>) -> Self {
        Self(units.into_boxed_slice())
    }
}

impl<const N: usize> From<[Units; N]> for ResourceVector {
    fn from(units: [Units; N]) -> Self {
        Self(Box::from(units))
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, units) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{units}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        let need = ResourceVector::from([1, 2, 2]);
        assert!(need.fits_within(&ResourceVector::from([3, 3, 2])));
        assert!(!need.fits_within(&ResourceVector::from([3, 1, 2])));
        assert_eq!(
            need.first_shortfall(&ResourceVector::from([3, 1, 1])),
            Some((1, 2, 1))
        );
    }

    #[test]
    fn test_sub() {
        let max = ResourceVector::from([7, 5, 3]);
        let alloc = ResourceVector::from([0, 1, 0]);
        assert_eq!(max.saturating_sub(&alloc), ResourceVector::from([7, 4, 3]));
        assert_eq!(alloc.saturating_sub(&max), ResourceVector::zeroed(3));
    }

    #[test]
    fn test_add() {
        let mut work = ResourceVector::from([3, 3, 2]);
        work += &ResourceVector::from([2, 0, 0]);
        assert_eq!(work, ResourceVector::from([5, 3, 2]));

        let mut edge = ResourceVector::from([Units::MAX, 0]);
        assert_eq!(edge.try_add_assign(&ResourceVector::from([0, 1])), Ok(()));
        assert_eq!(edge.try_add_assign(&ResourceVector::from([1, 0])), Err(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceVector::from([3, 3, 2]).to_string(), "[3, 3, 2]");
        assert_eq!(ResourceVector::zeroed(0).to_string(), "[]");
    }

    #[test]
    fn test_serde_transparent() {
        let v: ResourceVector = serde_json::from_str("[1, 0, 4]").unwrap();
        assert_eq!(v, ResourceVector::from([1, 0, 4]));
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1,0,4]");
    }
}
