use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::{self, BoxFuture, FutureExt};

use crate::artist::{Artist, ArtistDetails};
use crate::errors::{BookingError, RecordKind};
use crate::genres;
use crate::search::name_matches;
use crate::show::{ArtistShow, NewShow, ShowListing, VenueShow};
use crate::venue::{Venue, VenueDetails};
use crate::Id;

/// A store that keeps everything in process memory. Genres are kept
/// in their encoded form, as in the database. Every mutation happens
/// under one write lock after all of its checks have passed, so a
/// failed operation changes nothing.
#[derive(Default)]
pub struct MemoryDb {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    venues: BTreeMap<Id, Stored<VenueDetails>>,
    artists: BTreeMap<Id, Stored<ArtistDetails>>,
    shows: BTreeMap<Id, NewShow>,
    last_venue_id: Id,
    last_artist_id: Id,
    last_show_id: Id,
}

trait WithGenres: Clone {
    fn genres_mut(&mut self) -> &mut Vec<String>;
}

impl WithGenres for VenueDetails {
    fn genres_mut(&mut self) -> &mut Vec<String> {
        &mut self.genres
    }
}

impl WithGenres for ArtistDetails {
    fn genres_mut(&mut self) -> &mut Vec<String> {
        &mut self.genres
    }
}

struct Stored<T> {
    record: T,
    genres: String,
}

impl<T: WithGenres> Stored<T> {
    fn new(mut record: T) -> Self {
        let genres = genres::encode(record.genres_mut().as_slice());
        record.genres_mut().clear();

        Stored { record, genres }
    }

    fn load(&self) -> T {
        let mut record = self.record.clone();
        *record.genres_mut() = genres::decode(&self.genres);

        record
    }
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<State>, BookingError> {
        self.state.read().map_err(|_| BookingError::StorePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<State>, BookingError> {
        self.state.write().map_err(|_| BookingError::StorePoisoned)
    }
}

impl State {
    fn venues(&self, term: &str) -> Vec<Venue> {
        self.venues
            .iter()
            .map(|(id, stored)| Venue::new(*id, stored.load()))
            .filter(|venue| name_matches(&venue.details.name, term))
            .collect()
    }

    fn artists(&self, term: &str) -> Vec<Artist> {
        self.artists
            .iter()
            .map(|(id, stored)| Artist::new(*id, stored.load()))
            .filter(|artist| name_matches(&artist.details.name, term))
            .collect()
    }

    /// Shows in start order, ties broken by ID.
    fn shows_where(&self, predicate: impl Fn(&NewShow) -> bool) -> Vec<(Id, &NewShow)> {
        let mut shows: Vec<(Id, &NewShow)> = self
            .shows
            .iter()
            .filter(|(_, show)| predicate(show))
            .map(|(id, show)| (*id, show))
            .collect();

        // stable, so equal start times stay in ID order
        shows.sort_by_key(|(_, show)| show.start_time);

        shows
    }
}

impl super::Db for MemoryDb {
    fn list_venues(&self) -> BoxFuture<Result<Vec<Venue>, BookingError>> {
        let result = self.read().map(|state| state.venues(""));

        future::ready(result).boxed()
    }

    fn search_venues(&self, term: &str) -> BoxFuture<Result<Vec<Venue>, BookingError>> {
        let result = self.read().map(|state| state.venues(term));

        future::ready(result).boxed()
    }

    fn retrieve_venue(&self, id: Id) -> BoxFuture<Result<Option<Venue>, BookingError>> {
        let result = self.read().map(|state| {
            state
                .venues
                .get(&id)
                .map(|stored| Venue::new(id, stored.load()))
        });

        future::ready(result).boxed()
    }

    fn create_venue(&self, details: VenueDetails) -> BoxFuture<Result<Id, BookingError>> {
        let result = super::require_genres(&details.genres)
            .and_then(|_| self.write())
            .map(|mut state| {
                state.last_venue_id += 1;
                let id = state.last_venue_id;
                state.venues.insert(id, Stored::new(details));

                id
            });

        future::ready(result).boxed()
    }

    fn update_venue(&self, id: Id, details: VenueDetails) -> BoxFuture<Result<(), BookingError>> {
        let result = super::require_genres(&details.genres)
            .and_then(|_| self.write())
            .and_then(|mut state| {
                let stored = state
                    .venues
                    .get_mut(&id)
                    .ok_or_else(|| BookingError::not_found(RecordKind::Venue, id))?;
                *stored = Stored::new(details);

                Ok(())
            });

        future::ready(result).boxed()
    }

    fn delete_venue(&self, id: Id) -> BoxFuture<Result<(), BookingError>> {
        let result = self.write().and_then(|mut state| {
            if state.venues.remove(&id).is_none() {
                return Err(BookingError::not_found(RecordKind::Venue, id));
            }

            state.shows.retain(|_, show| show.venue_id != id);

            Ok(())
        });

        future::ready(result).boxed()
    }

    fn venue_shows(&self, id: Id) -> BoxFuture<Result<Vec<VenueShow>, BookingError>> {
        let result = self.read().map(|state| {
            state
                .shows_where(|show| show.venue_id == id)
                .into_iter()
                .filter_map(|(_, show)| {
                    let artist = state.artists.get(&show.artist_id)?;

                    Some(VenueShow {
                        artist_id: show.artist_id,
                        artist_name: artist.record.name.clone(),
                        artist_image_link: artist.record.image_link.clone(),
                        start_time: show.start_time,
                    })
                })
                .collect()
        });

        future::ready(result).boxed()
    }

    fn list_artists(&self) -> BoxFuture<Result<Vec<Artist>, BookingError>> {
        let result = self.read().map(|state| state.artists(""));

        future::ready(result).boxed()
    }

    fn search_artists(&self, term: &str) -> BoxFuture<Result<Vec<Artist>, BookingError>> {
        let result = self.read().map(|state| state.artists(term));

        future::ready(result).boxed()
    }

    fn retrieve_artist(&self, id: Id) -> BoxFuture<Result<Option<Artist>, BookingError>> {
        let result = self.read().map(|state| {
            state
                .artists
                .get(&id)
                .map(|stored| Artist::new(id, stored.load()))
        });

        future::ready(result).boxed()
    }

    fn create_artist(&self, details: ArtistDetails) -> BoxFuture<Result<Id, BookingError>> {
        let result = super::require_genres(&details.genres)
            .and_then(|_| self.write())
            .map(|mut state| {
                state.last_artist_id += 1;
                let id = state.last_artist_id;
                state.artists.insert(id, Stored::new(details));

                id
            });

        future::ready(result).boxed()
    }

    fn update_artist(
        &self,
        id: Id,
        details: ArtistDetails,
    ) -> BoxFuture<Result<(), BookingError>> {
        let result = super::require_genres(&details.genres)
            .and_then(|_| self.write())
            .and_then(|mut state| {
                let stored = state
                    .artists
                    .get_mut(&id)
                    .ok_or_else(|| BookingError::not_found(RecordKind::Artist, id))?;
                *stored = Stored::new(details);

                Ok(())
            });

        future::ready(result).boxed()
    }

    fn delete_artist(&self, id: Id) -> BoxFuture<Result<(), BookingError>> {
        let result = self.write().and_then(|mut state| {
            if state.artists.remove(&id).is_none() {
                return Err(BookingError::not_found(RecordKind::Artist, id));
            }

            state.shows.retain(|_, show| show.artist_id != id);

            Ok(())
        });

        future::ready(result).boxed()
    }

    fn artist_shows(&self, id: Id) -> BoxFuture<Result<Vec<ArtistShow>, BookingError>> {
        let result = self.read().map(|state| {
            state
                .shows_where(|show| show.artist_id == id)
                .into_iter()
                .filter_map(|(_, show)| {
                    let venue = state.venues.get(&show.venue_id)?;

                    Some(ArtistShow {
                        venue_id: show.venue_id,
                        venue_name: venue.record.name.clone(),
                        venue_image_link: venue.record.image_link.clone(),
                        start_time: show.start_time,
                    })
                })
                .collect()
        });

        future::ready(result).boxed()
    }

    fn list_shows(&self) -> BoxFuture<Result<Vec<ShowListing>, BookingError>> {
        let result = self.read().map(|state| {
            state
                .shows_where(|_| true)
                .into_iter()
                .filter_map(|(id, show)| {
                    let venue = state.venues.get(&show.venue_id)?;
                    let artist = state.artists.get(&show.artist_id)?;

                    Some(ShowListing {
                        id,
                        venue_id: show.venue_id,
                        venue_name: venue.record.name.clone(),
                        artist_id: show.artist_id,
                        artist_name: artist.record.name.clone(),
                        artist_image_link: artist.record.image_link.clone(),
                        start_time: show.start_time,
                    })
                })
                .collect()
        });

        future::ready(result).boxed()
    }

    fn create_show(&self, show: NewShow) -> BoxFuture<Result<Id, BookingError>> {
        let result = self.write().and_then(|mut state| {
            if !state.venues.contains_key(&show.venue_id) {
                return Err(BookingError::UnresolvedReference {
                    kind: RecordKind::Venue,
                    id: show.venue_id,
                });
            }

            if !state.artists.contains_key(&show.artist_id) {
                return Err(BookingError::UnresolvedReference {
                    kind: RecordKind::Artist,
                    id: show.artist_id,
                });
            }

            state.last_show_id += 1;
            let id = state.last_show_id;
            state.shows.insert(id, show);

            Ok(id)
        });

        future::ready(result).boxed()
    }
}
