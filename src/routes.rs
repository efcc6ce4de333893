use std::sync::Arc;

use log::{debug, error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_header, with_status};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::BookingError;

pub mod admin;
mod handlers;
mod rejection;
mod response;

pub use internal::*;

/// The largest form body accepted.
const MAX_CONTENT_LENGTH: u64 = 64 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<Box<dyn warp::Reply>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        let status = status_code_for(e);

        if status.is_server_error() {
            error!(logger, "Request failed"; "context" => ?r.context, "error" => ?e, "status" => %status);
        } else {
            debug!(logger, "Request refused"; "context" => ?r.context, "status" => %status, "message" => %e);
        }

        let reply = with_status(json(&r.flatten()), status);
        let reply: Box<dyn warp::Reply> = match r.elapsed {
            Some(elapsed) => Box::new(with_header(
                reply,
                handlers::SERVER_TIMING_HEADER,
                handlers::format_server_timing(elapsed),
            )),
            None => Box::new(reply),
        };

        return Ok(reply);
    }

    if rej.is_not_found() {
        let response = UnknownRoute {
            success: false,
            message: "Not found",
        };

        return Ok(Box::new(with_status(json(&response), StatusCode::NOT_FOUND)));
    }

    Err(rej)
}

#[derive(serde::Serialize)]
struct UnknownRoute {
    success: bool,
    message: &'static str,
}

fn status_code_for(e: &BookingError) -> StatusCode {
    use BookingError::*;

    match e {
        Validation(..) => StatusCode::BAD_REQUEST,
        NotFound { .. } => StatusCode::NOT_FOUND,
        UnresolvedReference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Sqlx { .. } | StorePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Every directory route, with failures rendered as JSON.
pub fn make_directory_routes(
    environment: Environment,
) -> impl Filter<Extract = (impl warp::Reply,), Error = reject::Rejection> + Clone {
    let logger = environment.logger.clone();

    make_home_route(environment.clone())
        .or(make_venues_route(environment.clone()))
        .or(make_search_venues_route(environment.clone()))
        .or(make_venue_create_form_route(environment.clone()))
        .or(make_create_venue_route(environment.clone()))
        .or(make_venue_route(environment.clone()))
        .or(make_edit_venue_form_route(environment.clone()))
        .or(make_edit_venue_route(environment.clone()))
        .or(make_delete_venue_route(environment.clone()))
        .or(make_artists_route(environment.clone()))
        .or(make_search_artists_route(environment.clone()))
        .or(make_artist_create_form_route(environment.clone()))
        .or(make_create_artist_route(environment.clone()))
        .or(make_artist_route(environment.clone()))
        .or(make_edit_artist_form_route(environment.clone()))
        .or(make_edit_artist_route(environment.clone()))
        .or(make_delete_artist_route(environment.clone()))
        .or(make_shows_route(environment.clone()))
        .or(make_show_create_form_route(environment.clone()))
        .or(make_create_show_route(environment))
        .recover(move |r| format_rejection(logger.clone(), r))
}

mod internal {
    use bytes::Bytes;
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::reject;
    use warp::Filter;
    use warp::Reply;
    use warp::{delete, get as g, path as p, path::param as par, post};

    use super::{handlers, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;
    use crate::Id;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    fn form_body() -> impl Filter<Extract = (Bytes,), Error = reject::Rejection> + Clone {
        warp::body::content_length_limit(MAX_CONTENT_LENGTH).and(warp::body::bytes())
    }

    macro_rules! route_filter {
        ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
        ($route_variable:ident; $first:expr, $($rest:expr),+) => (
            let $route_variable = $route_variable.and($first);
            route_filter!($route_variable; $($rest),+);
        )
    }

    macro_rules! route {
        ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
            pub fn $name(environment: Environment) -> Route {
                let $route_variable = warp::any().map(move || environment.clone());

                route_filter!($route_variable; $($filters),+);

                $route_variable.and_then(handlers::$handler)
                    .boxed()
            }
        );
    }

    route!(make_home_route => home, rt; end(), g());

    route!(make_venues_route => venues, rt; p("venues"), end(), g());
    route!(make_search_venues_route => search_venues, rt; p("venues"), p("search"), end(), post(), form_body());
    route!(make_venue_create_form_route => venue_create_form, rt; p("venues"), p("create"), end(), g());
    route!(make_create_venue_route => create_venue, rt; p("venues"), p("create"), end(), post(), form_body());
    route!(make_venue_route => venue, rt; p("venues"), par::<Id>(), end(), g());
    route!(make_edit_venue_form_route => edit_venue_form, rt; p("venues"), par::<Id>(), p("edit"), end(), g());
    route!(make_edit_venue_route => edit_venue, rt; p("venues"), par::<Id>(), p("edit"), end(), post(), form_body());
    route!(make_delete_venue_route => delete_venue, rt; p("venues"), par::<Id>(), end(), delete());

    route!(make_artists_route => artists, rt; p("artists"), end(), g());
    route!(make_search_artists_route => search_artists, rt; p("artists"), p("search"), end(), post(), form_body());
    route!(make_artist_create_form_route => artist_create_form, rt; p("artists"), p("create"), end(), g());
    route!(make_create_artist_route => create_artist, rt; p("artists"), p("create"), end(), post(), form_body());
    route!(make_artist_route => artist, rt; p("artists"), par::<Id>(), end(), g());
    route!(make_edit_artist_form_route => edit_artist_form, rt; p("artists"), par::<Id>(), p("edit"), end(), g());
    route!(make_edit_artist_route => edit_artist, rt; p("artists"), par::<Id>(), p("edit"), end(), post(), form_body());
    route!(make_delete_artist_route => delete_artist, rt; p("artists"), par::<Id>(), end(), delete());

    route!(make_shows_route => shows, rt; p("shows"), end(), g());
    route!(make_show_create_form_route => show_create_form, rt; p("shows"), p("create"), end(), g());
    route!(make_create_show_route => create_show, rt; p("shows"), p("create"), end(), post(), form_body());
}
