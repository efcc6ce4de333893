use serde::ser::{Serialize, SerializeStruct, Serializer};
use time::OffsetDateTime;

/// Anything with a start time.
pub trait Scheduled {
    fn start_time(&self) -> OffsetDateTime;
}

/// Shows split into those that have started and those still to come.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Partition<T> {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

impl<T: Serialize> Serialize for Partition<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Partition", 4)?;
        state.serialize_field("past_shows", &self.past)?;
        state.serialize_field("upcoming_shows", &self.upcoming)?;
        state.serialize_field("past_shows_count", &self.past_count())?;
        state.serialize_field("upcoming_shows_count", &self.upcoming_count())?;
        state.end()
    }
}

/// Splits `shows` around `now`. A show starting exactly at `now` is
/// upcoming. Each side keeps the input order.
pub fn classify<T: Scheduled>(shows: Vec<T>, now: OffsetDateTime) -> Partition<T> {
    let (past, upcoming) = shows.into_iter().partition(|show| show.start_time() < now);

    Partition { past, upcoming }
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use super::{classify, Scheduled};

    #[derive(Debug, PartialEq)]
    struct At(OffsetDateTime);

    impl Scheduled for At {
        fn start_time(&self) -> OffsetDateTime {
            self.0
        }
    }

    #[test]
    fn boundary_counts_as_upcoming() {
        let now = OffsetDateTime::from_unix_timestamp(1_615_032_000);
        let second = Duration::seconds(1);

        let partition = classify(
            vec![At(now + second), At(now - second), At(now)],
            now,
        );

        assert_eq!(partition.past, vec![At(now - second)]);
        assert_eq!(partition.upcoming, vec![At(now + second), At(now)]);
        assert_eq!(partition.past_count(), 1);
        assert_eq!(partition.upcoming_count(), 2);
    }

    #[test]
    fn counts_are_serialized_alongside_shows() {
        let now = OffsetDateTime::from_unix_timestamp(1_615_032_000);
        let partition = classify(vec![now - Duration::days(3), now + Duration::days(3)], now);
        let partition = super::Partition {
            past: partition.past.iter().map(|t| t.unix_timestamp()).collect(),
            upcoming: partition.upcoming.iter().map(|t| t.unix_timestamp()).collect(),
        };

        let json = serde_json::to_value(&partition).expect("serialize partition");

        assert_eq!(json["past_shows_count"], 1);
        assert_eq!(json["upcoming_shows_count"], 1);
        assert_eq!(json["past_shows"][0], 1_615_032_000 - 3 * 86_400);
    }

    impl Scheduled for OffsetDateTime {
        fn start_time(&self) -> OffsetDateTime {
            *self
        }
    }
}
