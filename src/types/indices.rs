//! Index newtypes for time steps and collocation nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generates an index newtype with conversions and a labelled Display.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Increment index by one.
            #[inline]
            pub fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }
    };
}

define_index!(
    /// Index of a time step within a run (0-based).
    ///
    /// ```
    /// use sdc_rs::types::StepIndex;
    ///
    /// let step = StepIndex::new(4);
    /// assert_eq!(step.next().get(), 5);
    /// ```
    StepIndex,
    "step"
);

define_index!(
    /// Index of a collocation node within a step (0-based).
    NodeIndex,
    "node"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_display() {
        assert_eq!(StepIndex::new(3).to_string(), "step 3");
        assert_eq!(NodeIndex::new(0).to_string(), "node 0");
    }

    #[test]
    fn test_next_and_ordering() {
        let first = NodeIndex::ZERO;
        assert_eq!(first.next(), NodeIndex::new(1));
        assert!(first < first.next());
    }

    #[test]
    fn test_conversions() {
        let step: StepIndex = 7.into();
        let raw: usize = step.into();
        assert_eq!(raw, 7);
    }
}
