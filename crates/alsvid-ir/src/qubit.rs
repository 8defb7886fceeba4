//! Qubit and classical bit index types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The position as a row index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Position of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The position as a row index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

impl From<usize> for ClbitId {
    fn from(id: usize) -> Self {
        ClbitId(u32::try_from(id).expect("ClbitId overflow: exceeds u32::MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(12)), "q12");
    }

    #[test]
    fn test_clbit_display() {
        assert_eq!(format!("{}", ClbitId(3)), "c3");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(QubitId::from(4u32), QubitId(4));
        assert_eq!(QubitId::from(4usize), QubitId(4));
        assert_eq!(ClbitId::from(7usize).index(), 7);
    }

    #[test]
    fn test_ordering() {
        let mut ids = vec![QubitId(3), QubitId(0), QubitId(2)];
        ids.sort();
        assert_eq!(ids, vec![QubitId(0), QubitId(2), QubitId(3)]);
    }
}
