//! A small directory of venues, artists and shows, used to seed a
//! fresh database and in tests.

use time::OffsetDateTime;

use crate::artist::ArtistDetails;
use crate::environment::SafeDb;
use crate::errors::BookingError;
use crate::show::NewShow;
use crate::venue::VenueDetails;
use crate::Id;

/// A show between the venue and artist at the given positions in
/// [`venues`] and [`artists`].
#[derive(Clone, Copy, Debug)]
pub struct SampleShow {
    pub venue: usize,
    pub artist: usize,
    pub start_time: i64,
}

/// The IDs assigned while seeding, in sample order.
#[derive(Debug, Default)]
pub struct Seeded {
    pub venues: Vec<Id>,
    pub artists: Vec<Id>,
    pub shows: Vec<Id>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|&v| v.to_owned()).collect()
}

fn some(value: &str) -> Option<String> {
    Some(value.to_owned())
}

pub fn venues() -> Vec<VenueDetails> {
    vec![
        VenueDetails {
            name: "The Musical Hop".to_owned(),
            city: "San Francisco".to_owned(),
            state: "CA".to_owned(),
            address: "1015 Folsom Street".to_owned(),
            phone: some("123-123-1234"),
            genres: owned(&["Jazz", "Reggae", "Swing", "Classical", "Folk"]),
            image_link: some("https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60"),
            facebook_link: some("https://www.facebook.com/TheMusicalHop"),
            website: some("https://www.themusicalhop.com"),
            seeking_talent: true,
            seeking_description: some("We are on the lookout for a local artist to play every two weeks. Please call us."),
        },
        VenueDetails {
            name: "The Dueling Pianos Bar".to_owned(),
            city: "New York".to_owned(),
            state: "NY".to_owned(),
            address: "335 Delancey Street".to_owned(),
            phone: some("914-003-1132"),
            genres: owned(&["Classical", "R&B", "Hip-Hop"]),
            image_link: some("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?ixlib=rb-1.2.1&auto=format&fit=crop&w=750&q=80"),
            facebook_link: some("https://www.facebook.com/theduelingpianos"),
            website: some("https://www.theduelingpianos.com"),
            seeking_talent: false,
            seeking_description: None,
        },
        VenueDetails {
            name: "Park Square Live Music & Coffee".to_owned(),
            city: "San Francisco".to_owned(),
            state: "CA".to_owned(),
            address: "34 Whiskey Moore Ave".to_owned(),
            phone: some("415-000-1234"),
            genres: owned(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            image_link: some("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?ixlib=rb-1.2.1&auto=format&fit=crop&w=747&q=80"),
            facebook_link: some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
            website: some("https://www.parksquarelivemusicandcoffee.com"),
            seeking_talent: false,
            seeking_description: None,
        },
    ]
}

pub fn artists() -> Vec<ArtistDetails> {
    vec![
        ArtistDetails {
            name: "Guns N Petals".to_owned(),
            city: "San Francisco".to_owned(),
            state: "CA".to_owned(),
            phone: some("326-123-5000"),
            genres: owned(&["Rock n Roll"]),
            image_link: some("https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80"),
            facebook_link: some("https://www.facebook.com/GunsNPetals"),
            website: some("https://www.gunsnpetalsband.com"),
            seeking_venue: true,
            seeking_description: some("Looking for shows to perform at in the San Francisco Bay Area!"),
        },
        ArtistDetails {
            name: "Matt Quevedo".to_owned(),
            city: "New York".to_owned(),
            state: "NY".to_owned(),
            phone: some("300-400-5000"),
            genres: owned(&["Jazz"]),
            image_link: some("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?ixlib=rb-1.2.1&auto=format&fit=crop&w=334&q=80"),
            facebook_link: some("https://www.facebook.com/mattquevedo923251523"),
            website: None,
            seeking_venue: false,
            seeking_description: None,
        },
        ArtistDetails {
            name: "The Wild Sax Band".to_owned(),
            city: "San Francisco".to_owned(),
            state: "CA".to_owned(),
            phone: some("432-325-5432"),
            genres: owned(&["Jazz", "Classical"]),
            image_link: some("https://images.unsplash.com/photo-1558369981-f9ca78462e61?ixlib=rb-1.2.1&auto=format&fit=crop&w=794&q=80"),
            facebook_link: None,
            website: None,
            seeking_venue: false,
            seeking_description: None,
        },
    ]
}

pub fn shows() -> Vec<SampleShow> {
    vec![
        // 2019-05-21 21:30:00
        SampleShow { venue: 0, artist: 0, start_time: 1_558_474_200 },
        // 2019-06-15 23:00:00
        SampleShow { venue: 2, artist: 1, start_time: 1_560_639_600 },
        // 2035-04-01, 2035-04-08 and 2035-04-15, all at 20:00:00
        SampleShow { venue: 2, artist: 2, start_time: 2_059_070_400 },
        SampleShow { venue: 2, artist: 2, start_time: 2_059_675_200 },
        SampleShow { venue: 2, artist: 2, start_time: 2_060_280_000 },
    ]
}

/// Lists every sample record in `db`, stopping at the first failure.
pub async fn seed(db: &SafeDb) -> Result<Seeded, BookingError> {
    let mut seeded = Seeded::default();

    for details in venues() {
        seeded.venues.push(db.create_venue(details).await?);
    }

    for details in artists() {
        seeded.artists.push(db.create_artist(details).await?);
    }

    for show in shows() {
        let id = db
            .create_show(NewShow {
                venue_id: seeded.venues[show.venue],
                artist_id: seeded.artists[show.artist],
                start_time: OffsetDateTime::from_unix_timestamp(show.start_time),
            })
            .await?;

        seeded.shows.push(id);
    }

    Ok(seeded)
}
