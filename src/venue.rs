use std::collections::HashMap;

use serde::Serialize;

use crate::schedule::Partition;
use crate::show::VenueShow;
use crate::Id;

/// The editable fields of a venue. Creating and editing a venue both
/// take a complete set of these; there is no partial update.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct VenueDetails {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// A venue as stored in the directory.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Venue {
    pub id: Id,

    #[serde(flatten)]
    pub details: VenueDetails,
}

impl Venue {
    pub fn new(id: Id, details: VenueDetails) -> Self {
        Venue { id, details }
    }

    pub fn summary(&self) -> VenueSummary {
        VenueSummary {
            id: self.id,
            name: self.details.name.clone(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VenueSummary {
    pub id: Id,
    pub name: String,
}

/// The venues sharing one city and state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Groups venues by exact `(city, state)`. Areas appear in the order
/// their first venue does, and each area keeps its venues in input
/// order.
pub fn group_by_location(venues: &[Venue]) -> Vec<Area> {
    let mut areas: Vec<Area> = vec![];
    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();

    for venue in venues {
        let key = (venue.details.city.as_str(), venue.details.state.as_str());

        match positions.get(&key) {
            Some(&position) => areas[position].venues.push(venue.summary()),
            None => {
                positions.insert(key, areas.len());
                areas.push(Area {
                    city: venue.details.city.clone(),
                    state: venue.details.state.clone(),
                    venues: vec![venue.summary()],
                });
            }
        }
    }

    areas
}

/// Everything shown on a venue's page.
#[derive(Debug, Serialize)]
pub struct VenuePage {
    #[serde(flatten)]
    pub venue: Venue,

    #[serde(flatten)]
    pub shows: Partition<VenueShow>,
}

#[cfg(test)]
mod tests {
    use super::{group_by_location, Venue, VenueDetails};

    fn venue(id: i32, name: &str, city: &str, state: &str) -> Venue {
        Venue::new(
            id,
            VenueDetails {
                name: name.to_owned(),
                city: city.to_owned(),
                state: state.to_owned(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn areas_follow_first_appearance() {
        let venues = vec![
            venue(1, "The Musical Hop", "Boston", "MA"),
            venue(2, "The Dueling Pianos Bar", "NYC", "NY"),
            venue(3, "Park Square Live Music & Coffee", "Boston", "MA"),
        ];

        let areas = group_by_location(&venues);

        assert_eq!(areas.len(), 2);
        assert_eq!((areas[0].city.as_str(), areas[0].state.as_str()), ("Boston", "MA"));
        assert_eq!(
            areas[0].venues.iter().map(|v| v.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!((areas[1].city.as_str(), areas[1].state.as_str()), ("NYC", "NY"));
        assert_eq!(areas[1].venues.len(), 1);
        assert_eq!(areas[1].venues[0].name, "The Dueling Pianos Bar");
    }

    #[test]
    fn city_match_is_case_sensitive() {
        let venues = vec![
            venue(1, "Upper", "Boston", "MA"),
            venue(2, "Lower", "boston", "MA"),
            venue(3, "Elsewhere", "Boston", "NH"),
        ];

        assert_eq!(group_by_location(&venues).len(), 3);
    }

    #[test]
    fn no_venues_no_areas() {
        assert!(group_by_location(&[]).is_empty());
    }
}
