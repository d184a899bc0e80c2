//! Navigation between the list view and the detail view.
//!
//! The client has exactly two places to be: the list, or the detail of one record (which may be
//! a record that does not exist yet). Routes are plain values; every transition returns a new
//! route rather than mutating shared state.

use std::fmt;

/// Reserved id that opens the detail view in creation mode.
pub const NEW_SENTINEL: &str = "new";

/// Which record the detail view is showing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DetailTarget {
    /// A record being created.
    New,
    /// A stored record, by id.
    Existing(String),
}

impl DetailTarget {
    /// Maps the sentinel to [`DetailTarget::New`] and anything else to an existing id.
    pub fn parse(id: &str) -> Self {
        if id == NEW_SENTINEL {
            DetailTarget::New
        } else {
            DetailTarget::Existing(id.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DetailTarget::New => NEW_SENTINEL,
            DetailTarget::Existing(id) => id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, DetailTarget::New)
    }
}

impl fmt::Display for DetailTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    List,
    Detail(DetailTarget),
}

impl Route {
    /// Open the detail view for `id` (the sentinel opens creation mode).
    pub fn view(&self, id: &str) -> Route {
        Route::Detail(DetailTarget::parse(id))
    }

    /// Open the detail view in creation mode.
    pub fn add(&self) -> Route {
        Route::Detail(DetailTarget::New)
    }

    pub fn back(&self) -> Route {
        Route::List
    }

    pub fn detail_target(&self) -> Option<&DetailTarget> {
        match self {
            Route::List => None,
            Route::Detail(target) => Some(target),
        }
    }
}
