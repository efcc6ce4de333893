use std::time::Duration;

use serde::Serialize;
use warp::reject;

use crate::errors::BookingError;
use crate::form::{FieldErrors, RawForm};
use crate::Id;

/// A failed request: what was being attempted, and why it failed.
#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BookingError,
    /// How long the handler ran before failing, once known.
    pub(crate) elapsed: Option<Duration>,
}

impl Rejection {
    pub fn new(context: Context, error: BookingError) -> Self {
        Rejection {
            context,
            error,
            elapsed: None,
        }
    }

    pub fn timed(self, elapsed: Duration) -> Self {
        Rejection {
            elapsed: Some(elapsed),
            ..self
        }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        let errors = match &self.error {
            BookingError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };

        FlattenedRejection {
            success: false,
            context: self.context.clone(),
            message: format!("{}", self.error),
            errors,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    pub(crate) success: bool,
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<FieldErrors>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Context {
    Venues,
    SearchVenues { search_term: String },
    Venue { id: Id },
    CreateVenue { submitted: RawForm },
    EditVenue { id: Id, submitted: Option<RawForm> },
    DeleteVenue { id: Id },
    Artists,
    SearchArtists { search_term: String },
    Artist { id: Id },
    CreateArtist { submitted: RawForm },
    EditArtist { id: Id, submitted: Option<RawForm> },
    DeleteArtist { id: Id },
    Shows,
    CreateShow { submitted: RawForm },
}

impl Context {
    pub fn venues() -> Context {
        Context::Venues
    }

    pub fn search_venues(search_term: String) -> Context {
        Context::SearchVenues { search_term }
    }

    pub fn venue(id: Id) -> Context {
        Context::Venue { id }
    }

    pub fn create_venue(submitted: RawForm) -> Context {
        Context::CreateVenue { submitted }
    }

    /// `submitted` is absent when the edit form itself was requested.
    pub fn edit_venue(id: Id, submitted: Option<RawForm>) -> Context {
        Context::EditVenue { id, submitted }
    }

    pub fn delete_venue(id: Id) -> Context {
        Context::DeleteVenue { id }
    }

    pub fn artists() -> Context {
        Context::Artists
    }

    pub fn search_artists(search_term: String) -> Context {
        Context::SearchArtists { search_term }
    }

    pub fn artist(id: Id) -> Context {
        Context::Artist { id }
    }

    pub fn create_artist(submitted: RawForm) -> Context {
        Context::CreateArtist { submitted }
    }

    pub fn edit_artist(id: Id, submitted: Option<RawForm>) -> Context {
        Context::EditArtist { id, submitted }
    }

    pub fn delete_artist(id: Id) -> Context {
        Context::DeleteArtist { id }
    }

    pub fn shows() -> Context {
        Context::Shows
    }

    pub fn create_show(submitted: RawForm) -> Context {
        Context::CreateShow { submitted }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Context, Rejection};
    use crate::errors::{BookingError, RecordKind};
    use crate::form::{FieldErrors, RawForm};

    #[test]
    fn validation_failures_carry_the_submission() {
        let mut submitted = RawForm::default();
        submitted.push("name", "");
        let mut errors = FieldErrors::default();
        errors.add("name", "This field is required.");

        let rejection = Rejection::new(
            Context::create_venue(submitted),
            BookingError::Validation(errors),
        );

        assert_eq!(
            serde_json::to_value(&rejection.flatten()).expect("serialize rejection"),
            json!({
                "success": false,
                "operation": "create_venue",
                "submitted": { "name": [""] },
                "message": "Some fields were invalid",
                "errors": { "name": ["This field is required."] },
            })
        );
    }

    #[test]
    fn other_failures_have_no_field_errors() {
        let rejection = Rejection::new(
            Context::delete_artist(3),
            BookingError::not_found(RecordKind::Artist, 3),
        );

        assert_eq!(
            serde_json::to_value(&rejection.flatten()).expect("serialize rejection"),
            json!({
                "success": false,
                "operation": "delete_artist",
                "id": 3,
                "message": "Artist 3 does not exist",
            })
        );
    }
}
