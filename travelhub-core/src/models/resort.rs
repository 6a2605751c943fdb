//! Resort attributes and the resort type catalogue

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{optional_text, required_text};
use super::ValidationError;

const MAX_PLACE_LEN: usize = 100;
const MAX_RESORT_NAME_LEN: usize = 200;

macro_rules! resort_types {
    ($($variant:ident),+ $(,)?) => {
        /// Categorical resort tag
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ResortType {
            $($variant),+
        }

        impl ResortType {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }
    };
}

resort_types!(
    Beach, Mountain, Spa, Adventure, Cultural, Urban, Rural, Luxury, Budget, Family,
    Desert, Forest, Island, Lake, River, Valley, Volcano, Waterfall, Cave, Coast,
    Safari, Ski, Golf, Wine, Wellness, Yoga, Fishing, Hunting, Cycling, Hiking,
    Surfing, Diving, Sailing, Kayaking, Camping, Glamping, Eco, Sustainable, Historic, Heritage,
    Art, Music, Food, Shopping, Nightlife, Romantic, Solo, Group, Accessible, PetFriendly,
);

impl FromStr for ResortType {
    type Err = ValidationError;

    /// Case-insensitive lookup of the canonical tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.is_empty() {
            return Err(ValidationError::Empty {
                field: "resort type",
            });
        }
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "resort type",
                value: needle.to_owned(),
            })
    }
}

impl fmt::Display for ResortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw resort form input before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResortInput {
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub resort_name: String,
    pub resort_type: String,
}

/// Validated resort attributes, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct ResortDraft {
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub resort_name: String,
    pub resort_type: ResortType,
}

impl ResortDraft {
    /// Validate form input. Country, name and type are required; the
    /// administrative subdivisions are optional and blank means absent.
    pub fn new(input: &ResortInput) -> Result<Self, ValidationError> {
        Ok(Self {
            country: required_text(&input.country, "country", MAX_PLACE_LEN)?,
            state: optional_text(input.state.as_deref(), "state", MAX_PLACE_LEN)?,
            city: optional_text(input.city.as_deref(), "city", MAX_PLACE_LEN)?,
            county: optional_text(input.county.as_deref(), "county", MAX_PLACE_LEN)?,
            resort_name: required_text(&input.resort_name, "resort name", MAX_RESORT_NAME_LEN)?,
            resort_type: input.resort_type.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ResortInput {
        ResortInput {
            country: "Japan".into(),
            state: Some("".into()),
            city: Some("Hakuba".into()),
            county: None,
            resort_name: "Happo-one".into(),
            resort_type: "ski".into(),
        }
    }

    #[test]
    fn catalogue_has_fifty_tags() {
        assert_eq!(ResortType::all().len(), 50);
        assert_eq!(ResortType::PetFriendly.as_str(), "PetFriendly");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("beach".parse::<ResortType>().unwrap(), ResortType::Beach);
        assert_eq!(
            " petfriendly ".parse::<ResortType>().unwrap(),
            ResortType::PetFriendly
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "Casino".parse::<ResortType>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }

    #[test]
    fn draft_normalises_optional_fields() {
        let draft = ResortDraft::new(&input()).unwrap();
        assert_eq!(draft.state, None);
        assert_eq!(draft.city.as_deref(), Some("Hakuba"));
        assert_eq!(draft.resort_type, ResortType::Ski);
    }

    #[test]
    fn draft_requires_country_and_name() {
        let mut missing_country = input();
        missing_country.country = "  ".into();
        assert_eq!(
            ResortDraft::new(&missing_country).unwrap_err(),
            ValidationError::Empty { field: "country" }
        );

        let mut long_name = input();
        long_name.resort_name = "x".repeat(201);
        assert!(matches!(
            ResortDraft::new(&long_name).unwrap_err(),
            ValidationError::TooLong { max: 200, .. }
        ));
    }
}
