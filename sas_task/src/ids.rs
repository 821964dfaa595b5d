use std::fmt;
use std::ops::Add;

/// Index of a state variable, `0..num_variables`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub u32);

/// Index of an operator, stable across the SAS⁺ and STRIPS⁺ representations:
/// operators preserve their input order and their indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(pub usize);

/// Dense index of a fact in a `StripsTask`'s fact table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A (variable, value) pair — the atomic proposition of the STRIPS⁺ relaxation.
///
/// Ordered by `(var, val)`: the LM-cut precondition-chooser tie rule picks
/// the lexicographically larger fact among ties, so `Fact`'s derived `Ord`
/// is relied upon directly at that call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fact {
    pub var: VarId,
    pub val: u32,
}

impl Fact {
    pub fn new(var: u32, val: u32) -> Self {
        Fact { var: VarId(var), val }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}={})", self.var, self.val)
    }
}

/// A non-negative cost with an explicit point at infinity, absorbing under `+`
/// and maximal under `Ord`.
///
/// A bare `u32::MAX` sentinel was considered and rejected: repeated addition
/// across several LM-cut iterations could silently wrap or saturate into a
/// finite-looking value, which a dedicated `Infinite` variant rules out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cost {
    Finite(u32),
    Infinite,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0);

    pub fn is_finite(self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    pub fn finite(self) -> Option<u32> {
        match self {
            Cost::Finite(v) => Some(v),
            Cost::Infinite => None,
        }
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => Cost::Finite(a + b),
            _ => Cost::Infinite,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(v) => write!(f, "{v}"),
            Cost::Infinite => write!(f, "inf"),
        }
    }
}
