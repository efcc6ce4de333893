use futures::future::BoxFuture;

use crate::artist::{Artist, ArtistDetails};
use crate::errors::BookingError;
use crate::form::FieldErrors;
use crate::show::{ArtistShow, NewShow, ShowListing, VenueShow};
use crate::venue::{Venue, VenueDetails};
use crate::Id;

mod memory;

pub use self::memory::MemoryDb;

/// The record store. Every mutating method is atomic: it is either
/// fully applied or leaves no trace.
///
/// Venues and artists must have at least one genre; an empty list
/// fails with [`BookingError::Validation`] before anything is written.
pub trait Db {
    fn list_venues(&self) -> BoxFuture<Result<Vec<Venue>, BookingError>>;

    /// Venues whose name contains `term`, ignoring case.
    fn search_venues(&self, term: &str) -> BoxFuture<Result<Vec<Venue>, BookingError>>;

    fn retrieve_venue(&self, id: Id) -> BoxFuture<Result<Option<Venue>, BookingError>>;

    fn create_venue(&self, details: VenueDetails) -> BoxFuture<Result<Id, BookingError>>;

    /// Overwrites every field of the venue.
    fn update_venue(&self, id: Id, details: VenueDetails) -> BoxFuture<Result<(), BookingError>>;

    /// Deletes the venue along with every show it hosts.
    fn delete_venue(&self, id: Id) -> BoxFuture<Result<(), BookingError>>;

    fn venue_shows(&self, id: Id) -> BoxFuture<Result<Vec<VenueShow>, BookingError>>;

    fn list_artists(&self) -> BoxFuture<Result<Vec<Artist>, BookingError>>;

    /// Artists whose name contains `term`, ignoring case.
    fn search_artists(&self, term: &str) -> BoxFuture<Result<Vec<Artist>, BookingError>>;

    fn retrieve_artist(&self, id: Id) -> BoxFuture<Result<Option<Artist>, BookingError>>;

    fn create_artist(&self, details: ArtistDetails) -> BoxFuture<Result<Id, BookingError>>;

    /// Overwrites every field of the artist.
    fn update_artist(&self, id: Id, details: ArtistDetails)
        -> BoxFuture<Result<(), BookingError>>;

    /// Deletes the artist along with every show it plays.
    fn delete_artist(&self, id: Id) -> BoxFuture<Result<(), BookingError>>;

    fn artist_shows(&self, id: Id) -> BoxFuture<Result<Vec<ArtistShow>, BookingError>>;

    fn list_shows(&self) -> BoxFuture<Result<Vec<ShowListing>, BookingError>>;

    /// Lists a show after checking that its venue and then its artist
    /// exist. Fails with [`BookingError::UnresolvedReference`] for the
    /// first one that does not.
    fn create_show(&self, show: NewShow) -> BoxFuture<Result<Id, BookingError>>;
}

/// An empty genre list would be stored as one blank genre.
fn require_genres(genres: &[String]) -> Result<(), BookingError> {
    if genres.is_empty() {
        let mut errors = FieldErrors::default();
        errors.add("genres", "This field is required.");

        return Err(BookingError::Validation(errors));
    }

    Ok(())
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };

    use crate::artist::{Artist, ArtistDetails};
    use crate::errors::{BookingError, RecordKind};
    use crate::genres;
    use crate::search::like_pattern;
    use crate::show::{ArtistShow, NewShow, ShowListing, VenueShow};
    use crate::venue::{Venue, VenueDetails};
    use crate::Id;

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn list_venues(&self) -> BoxFuture<Result<Vec<Venue>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/list_venues.sql"));

                let venues = query
                    .try_map(|row: PgRow| venue_from_row(&row))
                    .fetch_all(&self.pool)
                    .await?;

                Ok(venues)
            }
            .boxed()
        }

        fn search_venues(&self, term: &str) -> BoxFuture<Result<Vec<Venue>, BookingError>> {
            let pattern = like_pattern(term);

            async move {
                let query = sqlx::query(include_str!("queries/search_venues.sql"));

                let venues = query
                    .bind(pattern)
                    .try_map(|row: PgRow| venue_from_row(&row))
                    .fetch_all(&self.pool)
                    .await?;

                Ok(venues)
            }
            .boxed()
        }

        fn retrieve_venue(&self, id: Id) -> BoxFuture<Result<Option<Venue>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve_venue.sql"));

                let venue = query
                    .bind(id)
                    .try_map(|row: PgRow| venue_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(venue)
            }
            .boxed()
        }

        fn create_venue(&self, details: VenueDetails) -> BoxFuture<Result<Id, BookingError>> {
            async move {
                super::require_genres(&details.genres)?;

                let query = sqlx::query_as(include_str!("queries/create_venue.sql"));

                let (id,): (Id,) = query
                    .bind(&details.name)
                    .bind(&details.city)
                    .bind(&details.state)
                    .bind(&details.address)
                    .bind(&details.phone)
                    .bind(genres::encode(&details.genres))
                    .bind(&details.image_link)
                    .bind(&details.facebook_link)
                    .bind(&details.website)
                    .bind(details.seeking_talent)
                    .bind(&details.seeking_description)
                    .fetch_one(&self.pool)
                    .await?;

                Ok(id)
            }
            .boxed()
        }

        fn update_venue(
            &self,
            id: Id,
            details: VenueDetails,
        ) -> BoxFuture<Result<(), BookingError>> {
            async move {
                super::require_genres(&details.genres)?;

                let query = sqlx::query(include_str!("queries/update_venue.sql"));

                let count = query
                    .bind(id)
                    .bind(&details.name)
                    .bind(&details.city)
                    .bind(&details.state)
                    .bind(&details.address)
                    .bind(&details.phone)
                    .bind(genres::encode(&details.genres))
                    .bind(&details.image_link)
                    .bind(&details.facebook_link)
                    .bind(&details.website)
                    .bind(details.seeking_talent)
                    .bind(&details.seeking_description)
                    .execute(&self.pool)
                    .await?
                    .rows_affected();

                if count == 0 {
                    Err(BookingError::not_found(RecordKind::Venue, id))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }

        fn delete_venue(&self, id: Id) -> BoxFuture<Result<(), BookingError>> {
            async move {
                // dropping the transaction without committing rolls it back
                let mut transaction = self.pool.begin().await?;

                sqlx::query(include_str!("queries/delete_venue_shows.sql"))
                    .bind(id)
                    .execute(&mut transaction)
                    .await?;

                let count = sqlx::query(include_str!("queries/delete_venue.sql"))
                    .bind(id)
                    .execute(&mut transaction)
                    .await?
                    .rows_affected();

                if count == 0 {
                    return Err(BookingError::not_found(RecordKind::Venue, id));
                }

                transaction.commit().await?;

                Ok(())
            }
            .boxed()
        }

        fn venue_shows(&self, id: Id) -> BoxFuture<Result<Vec<VenueShow>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/venue_shows.sql"));

                let shows = query
                    .bind(id)
                    .try_map(|row: PgRow| {
                        Ok(VenueShow {
                            artist_id: try_get(&row, "artist_id")?,
                            artist_name: try_get(&row, "artist_name")?,
                            artist_image_link: try_get(&row, "artist_image_link")?,
                            start_time: try_get(&row, "start_time")?,
                        })
                    })
                    .fetch_all(&self.pool)
                    .await?;

                Ok(shows)
            }
            .boxed()
        }

        fn list_artists(&self) -> BoxFuture<Result<Vec<Artist>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/list_artists.sql"));

                let artists = query
                    .try_map(|row: PgRow| artist_from_row(&row))
                    .fetch_all(&self.pool)
                    .await?;

                Ok(artists)
            }
            .boxed()
        }

        fn search_artists(&self, term: &str) -> BoxFuture<Result<Vec<Artist>, BookingError>> {
            let pattern = like_pattern(term);

            async move {
                let query = sqlx::query(include_str!("queries/search_artists.sql"));

                let artists = query
                    .bind(pattern)
                    .try_map(|row: PgRow| artist_from_row(&row))
                    .fetch_all(&self.pool)
                    .await?;

                Ok(artists)
            }
            .boxed()
        }

        fn retrieve_artist(&self, id: Id) -> BoxFuture<Result<Option<Artist>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve_artist.sql"));

                let artist = query
                    .bind(id)
                    .try_map(|row: PgRow| artist_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(artist)
            }
            .boxed()
        }

        fn create_artist(&self, details: ArtistDetails) -> BoxFuture<Result<Id, BookingError>> {
            async move {
                super::require_genres(&details.genres)?;

                let query = sqlx::query_as(include_str!("queries/create_artist.sql"));

                let (id,): (Id,) = query
                    .bind(&details.name)
                    .bind(&details.city)
                    .bind(&details.state)
                    .bind(&details.phone)
                    .bind(genres::encode(&details.genres))
                    .bind(&details.image_link)
                    .bind(&details.facebook_link)
                    .bind(&details.website)
                    .bind(details.seeking_venue)
                    .bind(&details.seeking_description)
                    .fetch_one(&self.pool)
                    .await?;

                Ok(id)
            }
            .boxed()
        }

        fn update_artist(
            &self,
            id: Id,
            details: ArtistDetails,
        ) -> BoxFuture<Result<(), BookingError>> {
            async move {
                super::require_genres(&details.genres)?;

                let query = sqlx::query(include_str!("queries/update_artist.sql"));

                let count = query
                    .bind(id)
                    .bind(&details.name)
                    .bind(&details.city)
                    .bind(&details.state)
                    .bind(&details.phone)
                    .bind(genres::encode(&details.genres))
                    .bind(&details.image_link)
                    .bind(&details.facebook_link)
                    .bind(&details.website)
                    .bind(details.seeking_venue)
                    .bind(&details.seeking_description)
                    .execute(&self.pool)
                    .await?
                    .rows_affected();

                if count == 0 {
                    Err(BookingError::not_found(RecordKind::Artist, id))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }

        fn delete_artist(&self, id: Id) -> BoxFuture<Result<(), BookingError>> {
            async move {
                let mut transaction = self.pool.begin().await?;

                sqlx::query(include_str!("queries/delete_artist_shows.sql"))
                    .bind(id)
                    .execute(&mut transaction)
                    .await?;

                let count = sqlx::query(include_str!("queries/delete_artist.sql"))
                    .bind(id)
                    .execute(&mut transaction)
                    .await?
                    .rows_affected();

                if count == 0 {
                    return Err(BookingError::not_found(RecordKind::Artist, id));
                }

                transaction.commit().await?;

                Ok(())
            }
            .boxed()
        }

        fn artist_shows(&self, id: Id) -> BoxFuture<Result<Vec<ArtistShow>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/artist_shows.sql"));

                let shows = query
                    .bind(id)
                    .try_map(|row: PgRow| {
                        Ok(ArtistShow {
                            venue_id: try_get(&row, "venue_id")?,
                            venue_name: try_get(&row, "venue_name")?,
                            venue_image_link: try_get(&row, "venue_image_link")?,
                            start_time: try_get(&row, "start_time")?,
                        })
                    })
                    .fetch_all(&self.pool)
                    .await?;

                Ok(shows)
            }
            .boxed()
        }

        fn list_shows(&self) -> BoxFuture<Result<Vec<ShowListing>, BookingError>> {
            async move {
                let query = sqlx::query(include_str!("queries/list_shows.sql"));

                let shows = query
                    .try_map(|row: PgRow| {
                        Ok(ShowListing {
                            id: try_get(&row, "id")?,
                            venue_id: try_get(&row, "venue_id")?,
                            venue_name: try_get(&row, "venue_name")?,
                            artist_id: try_get(&row, "artist_id")?,
                            artist_name: try_get(&row, "artist_name")?,
                            artist_image_link: try_get(&row, "artist_image_link")?,
                            start_time: try_get(&row, "start_time")?,
                        })
                    })
                    .fetch_all(&self.pool)
                    .await?;

                Ok(shows)
            }
            .boxed()
        }

        fn create_show(&self, show: NewShow) -> BoxFuture<Result<Id, BookingError>> {
            async move {
                let mut transaction = self.pool.begin().await?;

                let venue: Option<(Id,)> = sqlx::query_as(include_str!("queries/lock_venue.sql"))
                    .bind(show.venue_id)
                    .fetch_optional(&mut transaction)
                    .await?;

                if venue.is_none() {
                    return Err(BookingError::UnresolvedReference {
                        kind: RecordKind::Venue,
                        id: show.venue_id,
                    });
                }

                let artist: Option<(Id,)> =
                    sqlx::query_as(include_str!("queries/lock_artist.sql"))
                        .bind(show.artist_id)
                        .fetch_optional(&mut transaction)
                        .await?;

                if artist.is_none() {
                    return Err(BookingError::UnresolvedReference {
                        kind: RecordKind::Artist,
                        id: show.artist_id,
                    });
                }

                let (id,): (Id,) = sqlx::query_as(include_str!("queries/create_show.sql"))
                    .bind(show.start_time)
                    .bind(show.venue_id)
                    .bind(show.artist_id)
                    .fetch_one(&mut transaction)
                    .await?;

                transaction.commit().await?;

                Ok(id)
            }
            .boxed()
        }
    }

    fn venue_from_row(row: &PgRow) -> Result<Venue, sqlx::Error> {
        let genres: String = try_get(row, "genres")?;

        let details = VenueDetails {
            name: try_get(row, "name")?,
            city: try_get(row, "city")?,
            state: try_get(row, "state")?,
            address: try_get(row, "address")?,
            phone: try_get(row, "phone")?,
            genres: genres::decode(&genres),
            image_link: try_get(row, "image_link")?,
            facebook_link: try_get(row, "facebook_link")?,
            website: try_get(row, "website")?,
            seeking_talent: try_get(row, "seeking_talent")?,
            seeking_description: try_get(row, "seeking_description")?,
        };

        Ok(Venue::new(try_get(row, "id")?, details))
    }

    fn artist_from_row(row: &PgRow) -> Result<Artist, sqlx::Error> {
        let genres: String = try_get(row, "genres")?;

        let details = ArtistDetails {
            name: try_get(row, "name")?,
            city: try_get(row, "city")?,
            state: try_get(row, "state")?,
            phone: try_get(row, "phone")?,
            genres: genres::decode(&genres),
            image_link: try_get(row, "image_link")?,
            facebook_link: try_get(row, "facebook_link")?,
            website: try_get(row, "website")?,
            seeking_venue: try_get(row, "seeking_venue")?,
            seeking_description: try_get(row, "seeking_description")?,
        };

        Ok(Artist::new(try_get(row, "id")?, details))
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }
}
