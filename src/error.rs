// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiError;
use crate::models::RowId;
use crate::validate::ValidationError;
use std::fmt;
use thiserror::Error;

/// The four user actions a controller can run, each with its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Edit,
    Delete,
    Search,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Search => "search",
        })
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("a {0} is already in progress")]
    Busy(Action),
    #[error("{kind} {id} is not in the current view")]
    NotInView { kind: &'static str, id: RowId },
    #[error("{kind} {id} left the view before the server answered")]
    Stale { kind: &'static str, id: RowId },
    #[error("{0}")]
    Rejected(String),
}

impl SyncError {
    /// True when the action never reached the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SyncError::Validation(_) | SyncError::Busy(_) | SyncError::NotInView { .. }
        )
    }

    /// Text for the error banner. Server messages are shown without the
    /// status prefix.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_errors_are_told_apart() {
        assert!(SyncError::Busy(Action::Edit).is_local());
        assert!(SyncError::NotInView { kind: "debt", id: 1 }.is_local());
        assert!(!SyncError::Stale { kind: "debt", id: 1 }.is_local());
        assert!(!SyncError::Rejected("no".into()).is_local());
    }

    #[test]
    fn banner_text_drops_status_prefix() {
        let err = SyncError::from(ApiError::Status {
            status: 500,
            message: "database is locked".into(),
        });
        assert_eq!(err.to_string(), "server returned 500: database is locked");
        assert_eq!(err.user_message(), "database is locked");
        let bare = SyncError::from(ApiError::Status {
            status: 502,
            message: String::new(),
        });
        assert_eq!(bare.user_message(), "server returned 502: ");
        let busy = SyncError::Busy(Action::Edit);
        assert_eq!(busy.user_message(), busy.to_string());
    }
}
