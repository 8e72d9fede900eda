//! Borough names and amenity tags derived from record attributes.

use std::str::FromStr as _;

use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Minimum rating that earns the `"Highly rated"` tag.
pub const HIGHLY_RATED_MIN: f64 = 4.5;

/// The five NYC boroughs, keyed by their one-letter feed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
pub enum Borough {
    #[strum(serialize = "B")]
    Brooklyn,
    #[strum(serialize = "X")]
    Bronx,
    #[strum(serialize = "Q")]
    Queens,
    #[strum(serialize = "M")]
    Manhattan,
    #[strum(serialize = "R")]
    StatenIsland,
}

impl Borough {
    /// Full borough name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Brooklyn => "Brooklyn",
            Self::Bronx => "Bronx",
            Self::Queens => "Queens",
            Self::Manhattan => "Manhattan",
            Self::StatenIsland => "Staten Island",
        }
    }
}

/// Maps a borough code to its full name; unknown codes pass through.
#[must_use]
pub fn borough_name(code: &str) -> String {
    Borough::from_str(code).map_or_else(|_| code.to_string(), |b| b.name().to_string())
}

/// Builds the amenity tags in fixed order: surface, seating, rating.
#[must_use]
pub fn amenities(surface: Option<&str>, seating: Option<&str>, rating: Option<f64>) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(surface) = surface.map(str::trim)
        && !surface.is_empty()
    {
        tags.push(format!("{surface} surface"));
    }
    if seating == Some("Yes") {
        tags.push("Seating available".to_string());
    }
    if rating.is_some_and(|r| r >= HIGHLY_RATED_MIN) {
        tags.push("Highly rated".to_string());
    }

    tags
}

/// `"Yes"` is true, `"No"` is false, anything else is unknown.
#[must_use]
pub fn has_seating(seating: Option<&str>) -> Option<bool> {
    match seating {
        Some("Yes") => Some(true),
        Some("No") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn known_codes_map_to_names() {
        assert_eq!(borough_name("Q"), "Queens");
        assert_eq!(borough_name("R"), "Staten Island");
        assert_eq!(borough_name("X"), "Bronx");
    }

    #[test]
    fn unknown_code_passes_through() {
        assert_eq!(borough_name("Z"), "Z");
        assert_eq!(borough_name(""), "");
    }

    #[test]
    fn every_borough_round_trips_its_code() {
        for borough in Borough::iter() {
            assert_eq!(Borough::from_str(borough.as_ref()).unwrap(), borough);
        }
    }

    #[test]
    fn amenities_in_fixed_order() {
        assert_eq!(
            amenities(Some("Asphalt"), Some("Yes"), Some(4.8)),
            vec!["Asphalt surface", "Seating available", "Highly rated"]
        );
    }

    #[test]
    fn rating_threshold() {
        assert_eq!(amenities(None, None, Some(4.6)), vec!["Highly rated"]);
        assert!(amenities(None, None, Some(4.4)).is_empty());
        assert_eq!(amenities(None, None, Some(4.5)), vec!["Highly rated"]);
        assert!(amenities(None, None, None).is_empty());
    }

    #[test]
    fn seating_must_be_exactly_yes() {
        assert!(amenities(Some(" "), Some("yes"), None).is_empty());
        assert!(amenities(None, Some("No"), None).is_empty());
    }

    #[test]
    fn seating_flag() {
        assert_eq!(has_seating(Some("Yes")), Some(true));
        assert_eq!(has_seating(Some("No")), Some(false));
        assert_eq!(has_seating(Some("Maybe")), None);
        assert_eq!(has_seating(None), None);
    }
}
