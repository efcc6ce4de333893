use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::form::FieldErrors;
use crate::Id;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Represents an SQL error. The transaction it occurred in has
    /// been rolled back.
    #[error("An error occurred and the change could not be saved")]
    Sqlx { source: sqlx::Error },

    /// The in-memory store was poisoned by a panicking writer.
    #[error("An error occurred and the change could not be saved")]
    StorePoisoned,

    /// One or more submitted fields failed validation. Nothing was
    /// persisted.
    #[error("Some fields were invalid")]
    Validation(FieldErrors),

    /// The requested record does not exist.
    #[error("{kind} {id} does not exist")]
    NotFound { kind: RecordKind, id: Id },

    /// A show referred to a venue or artist that does not exist.
    #[error("Cannot list a show for {kind} {id}, which does not exist")]
    UnresolvedReference { kind: RecordKind, id: Id },
}

impl BookingError {
    pub fn not_found(kind: RecordKind, id: Id) -> Self {
        BookingError::NotFound { kind, id }
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(source: sqlx::Error) -> Self {
        BookingError::Sqlx { source }
    }
}

/// The kinds of record kept in the directory.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Venue,
    Artist,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Venue => "Venue",
            RecordKind::Artist => "Artist",
        };

        f.write_str(name)
    }
}
