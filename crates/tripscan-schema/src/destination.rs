//! Destinations: validated search input, the city catalog, and fuzzy suggestions.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A destination that passed validation: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(String);

/// Errors produced when validating destination input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DestinationError {
    /// Input was empty or whitespace only.
    #[error("Please enter a destination")]
    Blank,
}

impl Destination {
    /// Validate raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::Blank`] if the input is empty after trimming.
    pub fn parse(input: &str) -> Result<Self, DestinationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DestinationError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed destination text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Destination {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A one-click destination shown on the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedDestination {
    /// Card heading, also the text submitted when picked.
    pub title: &'static str,
    /// One-line pitch.
    pub blurb: &'static str,
    /// Region or state.
    pub location: &'static str,
}

/// Quick picks offered before the user types anything.
pub const FEATURED: [FeaturedDestination; 3] = [
    FeaturedDestination {
        title: "Goa Beach Paradise",
        blurb: "Live prices from 6+ booking sites",
        location: "Goa",
    },
    FeaturedDestination {
        title: "Manali Adventure",
        blurb: "Real-time availability & pricing",
        location: "Manali",
    },
    FeaturedDestination {
        title: "Kerala Backwaters",
        blurb: "Compare all major travel agencies",
        location: "Kerala",
    },
];

/// Cities the autocomplete matches against.
pub const CITIES: &[&str] = &[
    "Agra",
    "Ahmedabad",
    "Alleppey",
    "Amritsar",
    "Andaman",
    "Bali",
    "Bangalore",
    "Bangkok",
    "Chennai",
    "Coorg",
    "Darjeeling",
    "Delhi",
    "Dharamshala",
    "Dubai",
    "Gangtok",
    "Goa",
    "Gokarna",
    "Hampi",
    "Hyderabad",
    "Jaipur",
    "Jaisalmer",
    "Jodhpur",
    "Kasol",
    "Kerala",
    "Kochi",
    "Kodaikanal",
    "Kolkata",
    "Ladakh",
    "Leh",
    "Lonavala",
    "Maldives",
    "Manali",
    "Mauritius",
    "Mumbai",
    "Munnar",
    "Mussoorie",
    "Mysore",
    "Nainital",
    "Ooty",
    "Pondicherry",
    "Pune",
    "Rishikesh",
    "Shimla",
    "Singapore",
    "Spiti",
    "Srinagar",
    "Udaipur",
    "Varanasi",
    "Wayanad",
];

/// A ranked autocomplete candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    /// Matched city name.
    pub city: &'static str,
    /// Matcher score; higher is better.
    pub score: i64,
}

/// Fuzzy-match `query` against [`CITIES`], best match first.
///
/// Blank queries produce no suggestions. Ties are broken alphabetically so
/// the output is stable.
pub fn suggest(query: &str, limit: usize) -> Vec<Suggestion> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<Suggestion> = CITIES
        .iter()
        .filter_map(|city| {
            matcher
                .fuzzy_match(city, query)
                .map(|score| Suggestion { city, score })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.city.cmp(b.city)));
    hits.truncate(limit);
    hits
}
