use std::fmt;

/// De Bruijn index
///
/// Counts the number of binders between a variable occurrence and the binder
/// it refers to. Indices are used in terms because they are stable under
/// weakening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Idx(pub usize);

/// De Bruijn level
///
/// Counts the number of binders between the root of a term and the binder a
/// variable refers to. Levels are used in values because they are stable
/// under strengthening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Lvl(pub usize);

impl Lvl {
    /// Convert a level to an index relative to a context of depth `depth`.
    pub fn to_idx(self, depth: Lvl) -> Idx {
        Idx(depth.0 - self.0 - 1)
    }

    pub fn succ(self) -> Lvl {
        Lvl(self.0 + 1)
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Lvl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lvl_to_idx() {
        assert_eq!(Lvl(0).to_idx(Lvl(1)), Idx(0));
        assert_eq!(Lvl(0).to_idx(Lvl(3)), Idx(2));
        assert_eq!(Lvl(2).to_idx(Lvl(3)), Idx(0));
    }
}
