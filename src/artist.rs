use serde::Serialize;

use crate::schedule::Partition;
use crate::show::ArtistShow;
use crate::Id;

/// The editable fields of an artist.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ArtistDetails {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// An artist as stored in the directory.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Artist {
    pub id: Id,

    #[serde(flatten)]
    pub details: ArtistDetails,
}

impl Artist {
    pub fn new(id: Id, details: ArtistDetails) -> Self {
        Artist { id, details }
    }

    pub fn summary(&self) -> ArtistSummary {
        ArtistSummary {
            id: self.id,
            name: self.details.name.clone(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ArtistSummary {
    pub id: Id,
    pub name: String,
}

/// Everything shown on an artist's page.
#[derive(Debug, Serialize)]
pub struct ArtistPage {
    #[serde(flatten)]
    pub artist: Artist,

    #[serde(flatten)]
    pub shows: Partition<ArtistShow>,
}
