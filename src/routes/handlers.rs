use std::time::{Duration, Instant};

use bytes::Bytes;
use log::debug;
use url::Url;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::{BookingError, RecordKind};
use crate::form::{self, Choices, RawForm};
use crate::routes::{
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::schedule::classify;
use crate::search::SearchResults;
use crate::venue::{group_by_location, VenuePage};
use crate::{artist::ArtistPage, Id};

pub(super) const SERVER_TIMING_HEADER: &str = "server-timing";
const SEARCH_TERM_FIELD: &str = "search_term";

type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($body:tt)+) => {{
        let start = Instant::now();

        let result: Result<_, Rejection> = async { Ok({ $($body)+ }) }.await;

        match result {
            Ok(reply) => Ok(Box::new(with_header(
                reply,
                SERVER_TIMING_HEADER,
                format_server_timing(start.elapsed()),
            )) as Box<dyn Reply>),
            // `format_rejection` adds the header from the recorded time
            Err(rejection) => Err(reject::custom(rejection.timed(start.elapsed()))),
        }
    }};
}

pub async fn home(environment: Environment) -> RouteResult {
    timed! {
        let urls = &environment.urls;

        json(&SuccessResponse::Home {
            version: info::VERSION,
            venues: urls.venues(),
            artists: urls.artists(),
            shows: urls.shows(),
        })
    }
}

pub async fn venues(environment: Environment) -> RouteResult {
    timed! {
        let venues = environment
            .db
            .list_venues()
            .await
            .map_err(|e| Rejection::new(Context::venues(), e))?;

        json(&SuccessResponse::Areas {
            areas: group_by_location(&venues),
        })
    }
}

pub async fn search_venues(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let search_term = read_search_term(&body);
        debug!(environment.logger, "Searching venues..."; "search_term" => &search_term);

        let venues = environment
            .db
            .search_venues(&search_term)
            .await
            .map_err(|e| Rejection::new(Context::search_venues(search_term.clone()), e))?;

        json(&SuccessResponse::VenueSearch {
            search_term,
            results: SearchResults::new(venues.iter().map(|v| v.summary()).collect()),
        })
    }
}

pub async fn venue(environment: Environment, id: Id) -> RouteResult {
    timed! {
        let error_handler = |e: BookingError| Rejection::new(Context::venue(id), e);

        let venue = environment
            .db
            .retrieve_venue(id)
            .await
            .map_err(error_handler)?
            .ok_or_else(|| error_handler(BookingError::not_found(RecordKind::Venue, id)))?;

        let shows = environment
            .db
            .venue_shows(id)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Venue(VenuePage {
            venue,
            shows: classify(shows, environment.now()),
        }))
    }
}

pub async fn venue_create_form(_environment: Environment) -> RouteResult {
    timed! {
        json(&SuccessResponse::Form {
            id: None,
            form: RawForm::default(),
            choices: Some(Choices::default()),
        })
    }
}

pub async fn create_venue(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let submitted = RawForm::parse(&body);
        let error_handler = |e: BookingError| Rejection::new(Context::create_venue(submitted.clone()), e);

        let details = form::parse_venue(&submitted)
            .map_err(|errors| error_handler(BookingError::Validation(errors)))?;
        let name = details.name.clone();

        debug!(environment.logger, "Listing venue..."; "name" => &name);
        let id = environment
            .db
            .create_venue(details)
            .await
            .map_err(error_handler)?;

        listed(
            format!("Venue {} was successfully listed!", name),
            id,
            environment.urls.venue(id),
        )
    }
}

pub async fn edit_venue_form(environment: Environment, id: Id) -> RouteResult {
    timed! {
        let error_handler = |e: BookingError| Rejection::new(Context::edit_venue(id, None), e);

        let venue = environment
            .db
            .retrieve_venue(id)
            .await
            .map_err(error_handler)?
            .ok_or_else(|| error_handler(BookingError::not_found(RecordKind::Venue, id)))?;

        json(&SuccessResponse::Form {
            id: Some(id),
            form: form::venue_form(&venue),
            choices: Some(Choices::default()),
        })
    }
}

pub async fn edit_venue(environment: Environment, id: Id, body: Bytes) -> RouteResult {
    timed! {
        let submitted = RawForm::parse(&body);
        let error_handler =
            |e: BookingError| Rejection::new(Context::edit_venue(id, Some(submitted.clone())), e);

        let details = form::parse_venue(&submitted)
            .map_err(|errors| error_handler(BookingError::Validation(errors)))?;
        let name = details.name.clone();

        debug!(environment.logger, "Updating venue..."; "id" => id);
        environment
            .db
            .update_venue(id, details)
            .await
            .map_err(error_handler)?;

        listed(
            format!("Venue {} was successfully updated!", name),
            id,
            environment.urls.venue(id),
        )
    }
}

pub async fn delete_venue(environment: Environment, id: Id) -> RouteResult {
    timed! {
        debug!(environment.logger, "Deleting venue..."; "id" => id);

        environment
            .db
            .delete_venue(id)
            .await
            .map_err(|e| Rejection::new(Context::delete_venue(id), e))?;

        json(&SuccessResponse::Deleted { success: true })
    }
}

pub async fn artists(environment: Environment) -> RouteResult {
    timed! {
        let artists = environment
            .db
            .list_artists()
            .await
            .map_err(|e| Rejection::new(Context::artists(), e))?;

        json(&SuccessResponse::Artists {
            artists: artists.iter().map(|a| a.summary()).collect(),
        })
    }
}

pub async fn search_artists(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let search_term = read_search_term(&body);
        debug!(environment.logger, "Searching artists..."; "search_term" => &search_term);

        let artists = environment
            .db
            .search_artists(&search_term)
            .await
            .map_err(|e| Rejection::new(Context::search_artists(search_term.clone()), e))?;

        json(&SuccessResponse::ArtistSearch {
            search_term,
            results: SearchResults::new(artists.iter().map(|a| a.summary()).collect()),
        })
    }
}

pub async fn artist(environment: Environment, id: Id) -> RouteResult {
    timed! {
        let error_handler = |e: BookingError| Rejection::new(Context::artist(id), e);

        let artist = environment
            .db
            .retrieve_artist(id)
            .await
            .map_err(error_handler)?
            .ok_or_else(|| error_handler(BookingError::not_found(RecordKind::Artist, id)))?;

        let shows = environment
            .db
            .artist_shows(id)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Artist(ArtistPage {
            artist,
            shows: classify(shows, environment.now()),
        }))
    }
}

pub async fn artist_create_form(_environment: Environment) -> RouteResult {
    timed! {
        json(&SuccessResponse::Form {
            id: None,
            form: RawForm::default(),
            choices: Some(Choices::default()),
        })
    }
}

pub async fn create_artist(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let submitted = RawForm::parse(&body);
        let error_handler = |e: BookingError| Rejection::new(Context::create_artist(submitted.clone()), e);

        let details = form::parse_artist(&submitted)
            .map_err(|errors| error_handler(BookingError::Validation(errors)))?;
        let name = details.name.clone();

        debug!(environment.logger, "Listing artist..."; "name" => &name);
        let id = environment
            .db
            .create_artist(details)
            .await
            .map_err(error_handler)?;

        listed(
            format!("Artist {} was successfully listed!", name),
            id,
            environment.urls.artist(id),
        )
    }
}

pub async fn edit_artist_form(environment: Environment, id: Id) -> RouteResult {
    timed! {
        let error_handler = |e: BookingError| Rejection::new(Context::edit_artist(id, None), e);

        let artist = environment
            .db
            .retrieve_artist(id)
            .await
            .map_err(error_handler)?
            .ok_or_else(|| error_handler(BookingError::not_found(RecordKind::Artist, id)))?;

        json(&SuccessResponse::Form {
            id: Some(id),
            form: form::artist_form(&artist),
            choices: Some(Choices::default()),
        })
    }
}

pub async fn edit_artist(environment: Environment, id: Id, body: Bytes) -> RouteResult {
    timed! {
        let submitted = RawForm::parse(&body);
        let error_handler =
            |e: BookingError| Rejection::new(Context::edit_artist(id, Some(submitted.clone())), e);

        let details = form::parse_artist(&submitted)
            .map_err(|errors| error_handler(BookingError::Validation(errors)))?;
        let name = details.name.clone();

        debug!(environment.logger, "Updating artist..."; "id" => id);
        environment
            .db
            .update_artist(id, details)
            .await
            .map_err(error_handler)?;

        listed(
            format!("Artist {} was successfully updated!", name),
            id,
            environment.urls.artist(id),
        )
    }
}

pub async fn delete_artist(environment: Environment, id: Id) -> RouteResult {
    timed! {
        debug!(environment.logger, "Deleting artist..."; "id" => id);

        environment
            .db
            .delete_artist(id)
            .await
            .map_err(|e| Rejection::new(Context::delete_artist(id), e))?;

        json(&SuccessResponse::Deleted { success: true })
    }
}

pub async fn shows(environment: Environment) -> RouteResult {
    timed! {
        let shows = environment
            .db
            .list_shows()
            .await
            .map_err(|e| Rejection::new(Context::shows(), e))?;

        json(&SuccessResponse::Shows { shows })
    }
}

pub async fn show_create_form(_environment: Environment) -> RouteResult {
    timed! {
        json(&SuccessResponse::Form {
            id: None,
            form: RawForm::default(),
            choices: None,
        })
    }
}

pub async fn create_show(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let submitted = RawForm::parse(&body);
        let error_handler = |e: BookingError| Rejection::new(Context::create_show(submitted.clone()), e);

        let show = form::parse_show(&submitted)
            .map_err(|errors| error_handler(BookingError::Validation(errors)))?;

        debug!(environment.logger, "Listing show..."; "venue_id" => show.venue_id, "artist_id" => show.artist_id);
        let id = environment
            .db
            .create_show(show)
            .await
            .map_err(error_handler)?;

        listed("Show was successfully listed!".to_owned(), id, environment.urls.shows())
    }
}

/// A `303 See Other` pointing at `location`, with a body confirming
/// the change.
fn listed(message: String, id: Id, location: Url) -> impl Reply {
    let response = SuccessResponse::Listed {
        success: true,
        message,
        id,
    };

    with_header(
        with_status(json(&response), StatusCode::SEE_OTHER),
        "location",
        location.as_str(),
    )
}

fn read_search_term(body: &[u8]) -> String {
    RawForm::parse(body)
        .first(SEARCH_TERM_FIELD)
        .map(crate::normalization::normalize_text)
        .unwrap_or_default()
}

pub(super) fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
