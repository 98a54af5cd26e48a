//! Strongly-typed index types.
//!
//! Step and collocation-node indices travel together through error
//! reports and per-step diagnostics; distinct newtypes keep them from
//! being swapped.
//!
//! # Example
//!
//! ```
//! use sdc_rs::types::{NodeIndex, StepIndex};
//!
//! let step = StepIndex::new(2);
//! let node = NodeIndex::new(1);
//! assert_eq!(format!("{step}/{node}"), "step 2/node 1");
//! ```

mod indices;

pub use indices::{NodeIndex, StepIndex};
