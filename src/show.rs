use serde::{Serialize, Serializer};
use time::{OffsetDateTime, UtcOffset};

use crate::schedule::Scheduled;
use crate::Id;

/// The format start times are submitted in and displayed with, always
/// in UTC.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A show about to be listed. Both ids must resolve when it is
/// created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewShow {
    pub venue_id: Id,
    pub artist_id: Id,
    pub start_time: OffsetDateTime,
}

/// A show joined with the names of its venue and artist, as listed on
/// the shows page.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ShowListing {
    pub id: Id,
    pub venue_id: Id,
    pub venue_name: String,
    pub artist_id: Id,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    #[serde(serialize_with = "serialize_start_time")]
    pub start_time: OffsetDateTime,
}

/// A show as seen from its venue.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VenueShow {
    pub artist_id: Id,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    #[serde(serialize_with = "serialize_start_time")]
    pub start_time: OffsetDateTime,
}

/// A show as seen from its artist.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ArtistShow {
    pub venue_id: Id,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    #[serde(serialize_with = "serialize_start_time")]
    pub start_time: OffsetDateTime,
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

/// Renders `time` in UTC with [`START_TIME_FORMAT`].
pub fn format_start_time(time: &OffsetDateTime) -> String {
    time.to_offset(UtcOffset::UTC).format(START_TIME_FORMAT)
}

fn serialize_start_time<S: Serializer>(time: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_start_time(time))
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::{format_start_time, VenueShow};

    #[test]
    fn start_time_is_rendered_in_utc() {
        // 2021-03-06 12:00:00 UTC
        let time = OffsetDateTime::from_unix_timestamp(1_615_032_000);

        assert_eq!(format_start_time(&time), "2021-03-06 12:00:00");

        let show = VenueShow {
            artist_id: 4,
            artist_name: "Guns N Petals".to_owned(),
            artist_image_link: None,
            start_time: time,
        };
        let json = serde_json::to_value(&show).expect("serialize show");

        assert_eq!(json["start_time"], "2021-03-06 12:00:00");
        assert_eq!(json["artist_image_link"], serde_json::Value::Null);
    }
}
