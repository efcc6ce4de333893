use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::{info, trace};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, Reply};
use warp::Filter;

use super::response::SuccessResponse;
use crate::environment::Environment;

pub fn make_healthz_route(
    environment: Environment,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    let logger = environment.logger;

    warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || {
            trace!(logger, "Health check");

            json(&SuccessResponse::Healthz {
                revision: info::REVISION,
                timestamp: info::BUILD_TIMESTAMP,
                version: info::VERSION,
            })
        })
}

type TerminationFuture = BoxFuture<'static, ()>;

pub type TerminationFunctionWrapper = Arc<dyn Fn() -> TerminationFuture + Send + Sync>;

pub fn make_termination_route(
    environment: Environment,
    terminate: TerminationFunctionWrapper,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    let logger = environment.logger;

    let handler = move || -> BoxFuture<'static, Result<StatusCode, std::convert::Infallible>> {
        let terminate = terminate.clone();
        let logger = logger.clone();

        async move {
            info!(logger, "Termination requested");
            terminate().await;
            Ok(StatusCode::NO_CONTENT)
        }
        .boxed()
    };

    warp::path("terminate")
        .and(warp::path::end())
        .and(warp::post())
        .and_then(handler)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::future::FutureExt;

    use super::{make_healthz_route, make_termination_route};
    use crate::db::MemoryDb;
    use crate::environment::Environment;
    use crate::urls::Urls;

    fn environment() -> Environment {
        Environment::with_system_clock(
            Arc::new(log::discarding_logger()),
            Arc::new(MemoryDb::new()),
            Arc::new(Urls::new("http://localhost:8000")),
        )
    }

    #[tokio::test]
    async fn healthz_reports_version() {
        let response = warp::test::request()
            .path("/healthz")
            .reply(&make_healthz_route(environment()))
            .await;

        assert_eq!(response.status(), 200);

        let body: serde_json::Value =
            serde_json::from_slice(response.body()).expect("parse response as JSON");
        assert_eq!(body["version"], info::VERSION);
    }

    #[tokio::test]
    async fn terminate_calls_back() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let terminate = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {}.boxed()
        });

        let response = warp::test::request()
            .method("POST")
            .path("/terminate")
            .reply(&make_termination_route(environment(), terminate))
            .await;

        assert_eq!(response.status(), 204);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
