use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use tokio::sync::mpsc;
use warp::Filter;

use fyyur::config::{get_optional_variable, get_port, get_variable};
use fyyur::db::{MemoryDb, PgDb};
use fyyur::environment::{Environment, SafeDb};
use fyyur::routes;
use fyyur::routes::admin::TerminationFunctionWrapper;
use fyyur::urls::Urls;
use log::{info, initialize_logger, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port = get_port("FYYUR_PORT");
    let admin_port = get_port("FYYUR_ADMIN_PORT");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let db: Arc<SafeDb> = match get_optional_variable("FYYUR_DB_CONNECTION_STRING") {
        Some(connection_string) => {
            info!(logger, "Creating database pool...");
            let pool = sqlx::PgPool::connect(&connection_string).await?;

            Arc::new(PgDb::new(pool))
        }
        None => {
            warn!(
                logger,
                "FYYUR_DB_CONNECTION_STRING is not set; records will be kept in memory and lost on exit"
            );

            Arc::new(MemoryDb::new())
        }
    };

    let urls = Arc::new(Urls::new(get_variable("FYYUR_BASE_URL")));
    let environment = Environment::with_system_clock(logger.clone(), db, urls);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate: TerminationFunctionWrapper = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            // a closed channel means shutdown is already under way
            termination_sender.send(()).await.ok();
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let routes = routes::make_directory_routes(environment.clone());

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
