use serde::Serialize;
use url::Url;

use crate::artist::{ArtistPage, ArtistSummary};
use crate::form::{Choices, RawForm};
use crate::search::SearchResults;
use crate::show::ShowListing;
use crate::venue::{Area, VenuePage, VenueSummary};
use crate::Id;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Home {
        version: &'a str,
        venues: Url,
        artists: Url,
        shows: Url,
    },
    Areas {
        areas: Vec<Area>,
    },
    Artists {
        artists: Vec<ArtistSummary>,
    },
    VenueSearch {
        search_term: String,
        results: SearchResults<VenueSummary>,
    },
    ArtistSearch {
        search_term: String,
        results: SearchResults<ArtistSummary>,
    },
    Venue(VenuePage),
    Artist(ArtistPage),
    Shows {
        shows: Vec<ShowListing>,
    },
    Form {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Id>,
        form: RawForm,
        #[serde(skip_serializing_if = "Option::is_none")]
        choices: Option<Choices>,
    },
    Listed {
        success: bool,
        message: String,
        id: Id,
    },
    Deleted {
        success: bool,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
}
