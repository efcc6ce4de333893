use std::error::Error;

use dotenv::dotenv;
use log::{info, initialize_logger};
use structopt::StructOpt;

use fyyur::config::get_variable;
use fyyur::db::PgDb;
use fyyur::sample;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "seed-directory",
    about = "List the sample venues, artists and shows in a database"
)]
struct Opt {
    /// The database to seed. Defaults to FYYUR_DB_CONNECTION_STRING.
    #[structopt(long)]
    connection_string: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = initialize_logger();

    let connection_string = opt
        .connection_string
        .unwrap_or_else(|| get_variable("FYYUR_DB_CONNECTION_STRING"));
    let pool = sqlx::PgPool::connect(&connection_string).await?;
    let db = PgDb::new(pool);

    info!(logger, "Seeding directory...");

    let seeded = sample::seed(&db).await?;

    info!(
        logger,
        "Seeded directory";
        "venues" => format!("{:?}", seeded.venues),
        "artists" => format!("{:?}", seeded.artists),
        "shows" => format!("{:?}", seeded.shows)
    );

    Ok(())
}
