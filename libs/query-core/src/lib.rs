//! Query primitives shared by the storage layer and the services:
//! the page descriptor, the page container and the argument errors
//! raised while building queries.

pub mod page;

pub use page::{Page, PageRequest};

use serde::{Deserialize, Serialize};

/// Direction of one ordering key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn is_desc(self) -> bool {
        matches!(self, SortDir::Desc)
    }

    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Errors raised while building or applying a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required argument was absent.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
}
