//! Store tests against a real database. Each test builds the schema
//! from the migrations in a schema of its own, and is skipped when
//! `FYYUR_DB_CONNECTION_STRING` is not set.

use std::sync::atomic::{AtomicUsize, Ordering};

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use time::{Duration, OffsetDateTime};

use fyyur::config::get_optional_variable;
use fyyur::db::{Db, PgDb};
use fyyur::errors::{BookingError, RecordKind};
use fyyur::sample;
use fyyur::show::NewShow;

const MIGRATION: &str = include_str!("../migrations/2021-03-06-120000_create_directory/up.sql");

static SCHEMAS: AtomicUsize = AtomicUsize::new(0);

struct TestDb {
    db: PgDb,
    connection_string: String,
    schema: String,
}

impl TestDb {
    async fn new() -> Option<Self> {
        dotenv::dotenv().ok();

        let connection_string = match get_optional_variable("FYYUR_DB_CONNECTION_STRING") {
            Some(connection_string) => connection_string,
            None => {
                eprintln!("FYYUR_DB_CONNECTION_STRING is not set; skipping");
                return None;
            }
        };

        let schema = format!(
            "fyyur_test_{}_{}",
            std::process::id(),
            SCHEMAS.fetch_add(1, Ordering::SeqCst)
        );

        let setup = PgPool::connect(&connection_string)
            .await
            .expect("connect to database");
        setup
            .execute(format!("DROP SCHEMA IF EXISTS {0} CASCADE; CREATE SCHEMA {0}", schema).as_str())
            .await
            .expect("create schema");
        setup.close().await;

        let search_path = format!("SET search_path TO {}", schema);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn| {
                let search_path = search_path.clone();

                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&connection_string)
            .await
            .expect("connect to database");

        pool.execute(MIGRATION).await.expect("apply migration");

        Some(TestDb {
            db: PgDb::new(pool),
            connection_string,
            schema,
        })
    }

    async fn finish(self) {
        let pool = PgPool::connect(&self.connection_string)
            .await
            .expect("connect to database");

        pool.execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await
            .expect("drop schema");
    }
}

fn at(offset_days: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_615_032_000) + Duration::days(offset_days)
}

#[tokio::test]
async fn created_records_read_back_unchanged() {
    let test_db = match TestDb::new().await {
        Some(test_db) => test_db,
        None => return,
    };
    let db = &test_db.db;

    for details in sample::venues() {
        let id = db.create_venue(details.clone()).await.expect("create venue");
        let venue = db.retrieve_venue(id).await.expect("retrieve venue");

        assert_eq!(venue.map(|v| v.details), Some(details));
    }

    for details in sample::artists() {
        let id = db.create_artist(details.clone()).await.expect("create artist");
        let artist = db.retrieve_artist(id).await.expect("retrieve artist");

        assert_eq!(artist.map(|a| a.details), Some(details));
    }

    assert_eq!(db.retrieve_venue(999).await.expect("retrieve venue"), None);

    test_db.finish().await;
}

#[tokio::test]
async fn updates_overwrite_or_report_missing_records() {
    let test_db = match TestDb::new().await {
        Some(test_db) => test_db,
        None => return,
    };
    let db = &test_db.db;

    let mut details = sample::venues().remove(0);
    let id = db.create_venue(details.clone()).await.expect("create venue");

    details.genres = vec!["Pop".to_owned()];
    details.phone = None;
    db.update_venue(id, details.clone()).await.expect("update venue");

    let venue = db
        .retrieve_venue(id)
        .await
        .expect("retrieve venue")
        .expect("venue exists");
    assert_eq!(venue.details, details);

    match db.update_venue(id + 1, details).await {
        Err(BookingError::NotFound { kind, id: missing }) => {
            assert_eq!(kind, RecordKind::Venue);
            assert_eq!(missing, id + 1);
        }
        other => panic!("expected not found, got {:?}", other),
    }

    let result = db.update_artist(42, sample::artists().remove(0)).await;
    assert!(matches!(result, Err(BookingError::NotFound { kind: RecordKind::Artist, .. })));

    let mut artist = sample::artists().remove(0);
    artist.genres.clear();
    let result = db.create_artist(artist).await;
    assert!(matches!(result, Err(BookingError::Validation(..))));
    assert!(db.list_artists().await.expect("list artists").is_empty());

    test_db.finish().await;
}

#[tokio::test]
async fn deleting_removes_every_related_show() {
    let test_db = match TestDb::new().await {
        Some(test_db) => test_db,
        None => return,
    };
    let db = &test_db.db;

    let seeded = sample::seed(db).await.expect("seed directory");
    let busiest = seeded.venues[2];

    let shows = db.list_shows().await.expect("list shows");
    assert_eq!(shows.len(), 5);
    assert!(shows.windows(2).all(|w| w[0].start_time <= w[1].start_time));

    db.delete_venue(busiest).await.expect("delete venue");

    let shows = db.list_shows().await.expect("list shows");
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].venue_id, seeded.venues[0]);
    assert!(db.venue_shows(busiest).await.expect("venue shows").is_empty());
    assert!(db.artist_shows(seeded.artists[2]).await.expect("artist shows").is_empty());
    assert_eq!(db.retrieve_venue(busiest).await.expect("retrieve venue"), None);

    db.delete_artist(seeded.artists[0]).await.expect("delete artist");
    assert!(db.list_shows().await.expect("list shows").is_empty());

    let result = db.delete_venue(busiest).await;
    assert!(matches!(result, Err(BookingError::NotFound { kind: RecordKind::Venue, .. })));

    test_db.finish().await;
}

#[tokio::test]
async fn shows_need_both_ends() {
    let test_db = match TestDb::new().await {
        Some(test_db) => test_db,
        None => return,
    };
    let db = &test_db.db;

    let venue_id = db
        .create_venue(sample::venues().remove(0))
        .await
        .expect("create venue");
    let artist_id = db
        .create_artist(sample::artists().remove(0))
        .await
        .expect("create artist");

    // the venue is checked first
    let result = db
        .create_show(NewShow {
            venue_id: venue_id + 10,
            artist_id: artist_id + 10,
            start_time: at(1),
        })
        .await;
    assert!(matches!(
        result,
        Err(BookingError::UnresolvedReference { kind: RecordKind::Venue, .. })
    ));

    let result = db
        .create_show(NewShow {
            venue_id,
            artist_id: artist_id + 10,
            start_time: at(1),
        })
        .await;
    assert!(matches!(
        result,
        Err(BookingError::UnresolvedReference { kind: RecordKind::Artist, .. })
    ));
    assert!(db.list_shows().await.expect("list shows").is_empty());

    db.create_show(NewShow {
        venue_id,
        artist_id,
        start_time: at(1),
    })
    .await
    .expect("create show");

    let shows = db.venue_shows(venue_id).await.expect("venue shows");
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].artist_id, artist_id);
    assert_eq!(shows[0].start_time, at(1));

    test_db.finish().await;
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let test_db = match TestDb::new().await {
        Some(test_db) => test_db,
        None => return,
    };
    let db = &test_db.db;

    let template = sample::venues().remove(0);
    for name in &["100% Jazz", "Club_House", "Clubhouse"] {
        let mut details = template.clone();
        details.name = (*name).to_owned();
        db.create_venue(details).await.expect("create venue");
    }

    let names = |term: &'static str| async move {
        db.search_venues(term)
            .await
            .expect("search venues")
            .into_iter()
            .map(|v| v.details.name)
            .collect::<Vec<_>>()
    };

    assert_eq!(names("%").await, vec!["100% Jazz".to_owned()]);
    assert_eq!(names("_").await, vec!["Club_House".to_owned()]);
    assert_eq!(
        names("CLUB").await,
        vec!["Club_House".to_owned(), "Clubhouse".to_owned()]
    );
    assert_eq!(names("").await.len(), 3);

    for details in sample::artists() {
        db.create_artist(details).await.expect("create artist");
    }
    let artists = db.search_artists("band").await.expect("search artists");
    assert_eq!(artists.len(), 1);
    assert_eq!(artists[0].details.name, "The Wild Sax Band");

    test_db.finish().await;
}
