//! Parsing and validation of submitted forms.
//!
//! Bodies arrive as `application/x-www-form-urlencoded`, where a field
//! such as `genres` may repeat. Validation collects every problem at
//! once, keyed by field name, so the form can be redisplayed with all
//! of its errors.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::{form_urlencoded, Url};

use crate::artist::{Artist, ArtistDetails};
use crate::genres::{DELIMITER, GENRE_CHOICES};
use crate::normalization::{normalize_optional, normalize_text};
use crate::show::{NewShow, START_TIME_FORMAT};
use crate::venue::{Venue, VenueDetails};
use crate::Id;

/// Two-letter codes accepted in the `state` field.
pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const REQUIRED: &str = "This field is required.";
const MIN_PHONE_DIGITS: usize = 7;

/// Widths of the `VARCHAR` columns these fields are stored in.
const MAX_TEXT_LENGTH: usize = 120;
const MAX_LINK_LENGTH: usize = 500;

/// A submitted form, as field name to every value given for it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawForm(BTreeMap<String, Vec<String>>);

impl RawForm {
    /// Decodes a urlencoded body. Malformed escapes are replaced
    /// rather than rejected.
    pub fn parse(body: &[u8]) -> Self {
        let mut form = RawForm::default();

        for (field, value) in form_urlencoded::parse(body) {
            form.push(field, value);
        }

        form
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(value.into());
    }

    fn push_optional(&mut self, field: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.push(field, value.as_str());
        }
    }

    /// The first value given for `field`, if any.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Validation messages keyed by field name.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// The options offered alongside a blank or pre-filled form.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Choices {
    pub genres: &'static [&'static str],
    pub states: &'static [&'static str],
}

impl Default for Choices {
    fn default() -> Self {
        Choices {
            genres: GENRE_CHOICES,
            states: STATES,
        }
    }
}

pub fn parse_venue(form: &RawForm) -> Result<VenueDetails, FieldErrors> {
    let mut fields = Fields::new(form);

    let details = VenueDetails {
        name: fields.required("name"),
        city: fields.bounded("city", MAX_TEXT_LENGTH),
        state: fields.state("state"),
        address: fields.bounded("address", MAX_TEXT_LENGTH),
        phone: fields.phone("phone"),
        genres: fields.genres("genres"),
        image_link: fields.link("image_link"),
        facebook_link: fields.link("facebook_link"),
        website: fields.link("website"),
        seeking_talent: fields.flag("seeking_talent"),
        seeking_description: fields.optional("seeking_description"),
    };

    fields.finish(details)
}

pub fn parse_artist(form: &RawForm) -> Result<ArtistDetails, FieldErrors> {
    let mut fields = Fields::new(form);

    let details = ArtistDetails {
        name: fields.required("name"),
        city: fields.bounded("city", MAX_TEXT_LENGTH),
        state: fields.state("state"),
        phone: fields.phone("phone"),
        genres: fields.genres("genres"),
        image_link: fields.link("image_link"),
        facebook_link: fields.link("facebook_link"),
        website: fields.link("website"),
        seeking_venue: fields.flag("seeking_venue"),
        seeking_description: fields.optional("seeking_description"),
    };

    fields.finish(details)
}

pub fn parse_show(form: &RawForm) -> Result<NewShow, FieldErrors> {
    let mut fields = Fields::new(form);

    let venue_id = fields.id("venue_id");
    let artist_id = fields.id("artist_id");
    let start_time = fields.start_time("start_time");

    match (venue_id, artist_id, start_time) {
        (Some(venue_id), Some(artist_id), Some(start_time)) => fields.finish(NewShow {
            venue_id,
            artist_id,
            start_time,
        }),
        _ => Err(fields.errors),
    }
}

/// Pre-fills a form with a venue's current values.
pub fn venue_form(venue: &Venue) -> RawForm {
    let details = &venue.details;
    let mut form = RawForm::default();

    form.push("name", details.name.as_str());
    form.push("city", details.city.as_str());
    form.push("state", details.state.as_str());
    form.push("address", details.address.as_str());
    form.push_optional("phone", &details.phone);
    for genre in &details.genres {
        form.push("genres", genre.as_str());
    }
    form.push_optional("image_link", &details.image_link);
    form.push_optional("facebook_link", &details.facebook_link);
    form.push_optional("website", &details.website);
    if details.seeking_talent {
        form.push("seeking_talent", "y");
    }
    form.push_optional("seeking_description", &details.seeking_description);

    form
}

/// Pre-fills a form with an artist's current values.
pub fn artist_form(artist: &Artist) -> RawForm {
    let details = &artist.details;
    let mut form = RawForm::default();

    form.push("name", details.name.as_str());
    form.push("city", details.city.as_str());
    form.push("state", details.state.as_str());
    form.push_optional("phone", &details.phone);
    for genre in &details.genres {
        form.push("genres", genre.as_str());
    }
    form.push_optional("image_link", &details.image_link);
    form.push_optional("facebook_link", &details.facebook_link);
    form.push_optional("website", &details.website);
    if details.seeking_venue {
        form.push("seeking_venue", "y");
    }
    form.push_optional("seeking_description", &details.seeking_description);

    form
}

struct Fields<'a> {
    form: &'a RawForm,
    errors: FieldErrors,
}

impl<'a> Fields<'a> {
    fn new(form: &'a RawForm) -> Self {
        Fields {
            form,
            errors: FieldErrors::default(),
        }
    }

    fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    fn optional(&mut self, field: &str) -> Option<String> {
        normalize_optional(self.form.first(field))
    }

    fn required(&mut self, field: &str) -> String {
        match self.optional(field) {
            Some(value) => value,
            None => {
                self.errors.add(field, REQUIRED);
                String::new()
            }
        }
    }

    fn bounded(&mut self, field: &str, max: usize) -> String {
        let value = self.required(field);
        self.check_length(field, &value, max);

        value
    }

    /// Lengths are counted in characters, as Postgres counts them.
    fn check_length(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.errors.add(
                field,
                format!("Field cannot be longer than {} characters.", max),
            );
        }
    }

    fn state(&mut self, field: &str) -> String {
        let value = self.required(field).to_ascii_uppercase();

        if !value.is_empty() && !STATES.contains(&value.as_str()) {
            self.errors.add(field, "Not a valid choice.");
        }

        value
    }

    fn phone(&mut self, field: &str) -> Option<String> {
        let value = self.optional(field)?;

        let allowed = value
            .chars()
            .all(|c| c.is_ascii_digit() || "+-(). ".contains(c));
        let digits = value.chars().filter(char::is_ascii_digit).count();

        if !allowed || digits < MIN_PHONE_DIGITS {
            self.errors.add(field, "Invalid phone number.");
        }
        self.check_length(field, &value, MAX_TEXT_LENGTH);

        Some(value)
    }

    fn link(&mut self, field: &str) -> Option<String> {
        let value = self.optional(field)?;

        match Url::parse(&value) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => self.errors.add(field, "Invalid URL."),
        }
        self.check_length(field, &value, MAX_LINK_LENGTH);

        Some(value)
    }

    fn genres(&mut self, field: &str) -> Vec<String> {
        let mut genres: Vec<String> = vec![];

        for value in self.form.all(field) {
            let genre = normalize_text(value);

            if genre.is_empty() {
                self.errors.add(field, "Genres may not be blank.");
            } else if genre.contains(DELIMITER) {
                self.errors
                    .add(field, format!("Genres may not contain '{}'.", DELIMITER));
            } else if !genres.contains(&genre) {
                genres.push(genre);
            }
        }

        if self.form.all(field).is_empty() {
            self.errors.add(field, REQUIRED);
        }

        genres
    }

    /// Checkbox semantics: absent, empty and `false` are unchecked.
    fn flag(&self, field: &str) -> bool {
        match self.form.first(field) {
            Some(value) => !(value.trim().is_empty() || value.trim().eq_ignore_ascii_case("false")),
            None => false,
        }
    }

    fn id(&mut self, field: &str) -> Option<Id> {
        let value = self.optional(field);

        match value.as_deref().map(str::parse::<Id>) {
            Some(Ok(id)) if id > 0 => Some(id),
            Some(_) => {
                self.errors.add(field, "Not a valid ID.");
                None
            }
            None => {
                self.errors.add(field, REQUIRED);
                None
            }
        }
    }

    fn start_time(&mut self, field: &str) -> Option<OffsetDateTime> {
        let value = match self.optional(field) {
            Some(value) => value,
            None => {
                self.errors.add(field, REQUIRED);
                return None;
            }
        };

        match PrimitiveDateTime::parse(&value, START_TIME_FORMAT) {
            Ok(time) => Some(time.assume_utc()),
            Err(_) => {
                self.errors.add(field, "Not a valid datetime value.");
                None
            }
        }
    }
}
