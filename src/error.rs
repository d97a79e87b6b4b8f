//! Lookup failures.

use log::error;
use thiserror::Error;

/// Returned by `ChainedHashTable::get` when the key is absent.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LookupError {
    /// The key is not reachable from its bucket. `empty_bucket` tells
    /// whether the bucket had no chain at all or the chain was exhausted.
    #[error("{}", miss_message(.empty_bucket))]
    NotFound { key: String, empty_bucket: bool },
}

fn miss_message(empty_bucket: &bool) -> &'static str {
    if *empty_bucket {
        "item not found"
    } else {
        "key not found"
    }
}

impl LookupError {
    pub fn key(&self) -> &str {
        match self {
            LookupError::NotFound { key, .. } => key,
        }
    }
}

/// Report `err` the way the reference program does and terminate with
/// status 1.
pub(crate) fn fatal(err: &LookupError) -> ! {
    error!("lookup of {:?} failed: {}", err.key(), err);
    println!("fatal: {}", err);
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_distinguishes_empty_bucket() {
        let empty = LookupError::NotFound {
            key: "k".to_string(),
            empty_bucket: true,
        };
        let exhausted = LookupError::NotFound {
            key: "k".to_string(),
            empty_bucket: false,
        };
        assert_eq!(empty.to_string(), "item not found");
        assert_eq!(exhausted.to_string(), "key not found");
        assert_eq!(empty.key(), "k");
    }
}
