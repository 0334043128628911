//! Overflow policies for the record queue
//!
//! When the bounded queue is full, the policy decides whether a producer waits
//! for the dispatch thread or gives the record up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for handling a full record queue
///
/// # Example
///
/// ```
/// use rust_async_logger::OverflowPolicy;
///
/// // Default behavior: producers wait, nothing is lost
/// assert_eq!(OverflowPolicy::default(), OverflowPolicy::Block);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Block the producer until the dispatch thread frees a slot
    ///
    /// Producers slow down to the handler's write rate. No timeout.
    #[default]
    Block,

    /// Discard the new record and count it in the dropped metric
    DropNewest,
}

impl fmt::Display for OverflowPolicy {
    /// Same spelling as the configuration file
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverflowPolicy::Block => "block",
            OverflowPolicy::DropNewest => "drop_newest",
        })
    }
}
