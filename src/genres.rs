//! Storage encoding for genre lists.
//!
//! Genres are kept in a single text column, joined with a comma. A
//! genre that itself contains a comma cannot survive the round trip;
//! the form layer refuses such values before they reach the store.

/// The character separating genres in the stored field.
pub const DELIMITER: char = ',';

/// Genres suggested on blank forms. Any other non-blank value is
/// accepted as well.
pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// Joins `genres` into the stored representation.
///
/// ```
/// use fyyur::genres::encode;
/// assert_eq!(encode(&["Jazz".to_owned(), "Folk".to_owned()]), "Jazz,Folk");
/// ```
pub fn encode(genres: &[impl AsRef<str>]) -> String {
    genres
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// Splits a stored field back into its genres, in order.
///
/// An empty field yields a single empty genre, mirroring `str::split`.
pub fn decode(field: &str) -> Vec<String> {
    field.split(DELIMITER).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{decode, encode};

    #[test]
    fn empty_field_decodes_to_one_empty_genre() {
        assert_eq!(decode(""), vec![String::new()]);
    }

    #[test]
    fn order_is_preserved() {
        let genres = vec!["Rock n Roll".to_owned(), "Blues".to_owned(), "Jazz".to_owned()];

        assert_eq!(encode(&genres), "Rock n Roll,Blues,Jazz");
        assert_eq!(decode("Rock n Roll,Blues,Jazz"), genres);
    }

    #[test]
    fn delimiter_inside_a_genre_splits_it() {
        let encoded = encode(&["Rock, Pop"]);

        assert_eq!(decode(&encoded), vec!["Rock".to_owned(), " Pop".to_owned()]);
    }

    proptest! {
        #[test]
        fn genres_without_delimiter_survive(genres in prop::collection::vec("[^,]*", 1..8)) {
            prop_assert_eq!(decode(&encode(&genres)), genres);
        }
    }
}
