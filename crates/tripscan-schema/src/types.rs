//! Provider records, tagged packages and per-search view settings.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A travel package exactly as a provider returns it.
///
/// Only `title` and `price` are required; every other field is sparse. This is
/// the JSON shape served by the scraping endpoints (camelCase keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackage {
    /// Package headline (e.g. "Goa Beach Paradise").
    pub title: String,

    /// Current price in the provider's currency unit.
    pub price: f64,

    /// Price before discount, if the provider advertises one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,

    /// Average rating on a 0-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Number of reviews behind `rating`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,

    /// Free-text duration label (e.g. "4 Days / 3 Nights").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Short selling points, in provider order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub highlights: Vec<String>,

    /// Advertised discount in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,

    /// Where the "Book Now" action should send the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,

    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reasons a [`RawPackage`] is rejected as malformed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The title is empty or whitespace.
    #[error("empty title")]
    EmptyTitle,

    /// The price is NaN, infinite or negative.
    #[error("invalid price: {0}")]
    InvalidPrice(f64),

    /// The rating is outside the 0-5 scale.
    #[error("rating out of range: {0}")]
    RatingOutOfRange(f64),
}

impl RawPackage {
    /// Create a record with only the required fields set.
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            price,
            original_price: None,
            rating: None,
            reviews: None,
            duration: None,
            highlights: Vec::new(),
            discount: None,
            booking_url: None,
            image: None,
        }
    }

    /// Checks the fields the rest of the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyTitle`] for a blank title,
    /// [`RecordError::InvalidPrice`] for a non-finite or negative price, and
    /// [`RecordError::RatingOutOfRange`] for a rating outside `0..=5`.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.title.trim().is_empty() {
            return Err(RecordError::EmptyTitle);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(RecordError::InvalidPrice(self.price));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(RecordError::RatingOutOfRange(rating));
            }
        }
        Ok(())
    }

    /// Amount saved against `original_price`, when that is higher than `price`.
    pub fn savings(&self) -> Option<f64> {
        self.original_price
            .filter(|original| *original > self.price)
            .map(|original| original - self.price)
    }
}

/// Identifier of a package provider (e.g. "Booking.com").
///
/// Case is preserved since ids double as display names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Wrap a provider name. Surrounding whitespace is trimmed.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_string())
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A [`RawPackage`] tagged with the source that produced it.
///
/// Built by the fan-out coordinator at merge time and never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    source: SourceId,
    #[serde(flatten)]
    raw: RawPackage,
}

impl Package {
    /// Tag a raw record with its source.
    pub fn new(source: SourceId, raw: RawPackage) -> Self {
        Self { source, raw }
    }

    /// The provider this package came from.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// The underlying provider record.
    pub fn raw(&self) -> &RawPackage {
        &self.raw
    }

    /// Package title as the provider wrote it.
    pub fn title(&self) -> &str {
        &self.raw.title
    }

    /// Current price in rupees.
    pub fn price(&self) -> f64 {
        self.raw.price
    }

    /// Rating with an absent value read as 0.
    pub fn rating_or_zero(&self) -> f64 {
        self.raw.rating.unwrap_or(0.0)
    }

    /// Duration label, if the provider sent a non-empty one.
    pub fn duration(&self) -> Option<&str> {
        self.raw.duration.as_deref().filter(|d| !d.is_empty())
    }

    /// Provider page to book this package on.
    pub fn booking_url(&self) -> Option<&str> {
        self.raw.booking_url.as_deref()
    }
}

/// Per-source progress within one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Not yet dispatched.
    Pending,
    /// Dispatched, waiting for the adapter to settle.
    Loading,
    /// Adapter returned a well-formed batch.
    Success,
    /// Adapter failed, timed out, or was abandoned.
    Error,
}

impl SourceStatus {
    /// Whether the adapter call has finished, one way or the other.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Statuses only move forward: pending, then loading, then a settled state.
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Loading | Self::Success | Self::Error)
                | (Self::Loading, Self::Success | Self::Error)
        )
    }

    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering applied by the view projector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Cheapest first.
    #[default]
    Price,
    /// Best rated first.
    Rating,
    /// Duration label, lexicographic.
    Duration,
}

impl SortKey {
    /// Every key, in menu order.
    pub const ALL: [Self; 3] = [Self::Price, Self::Rating, Self::Duration];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort key '{0}' (expected price, rating or duration)")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "rating" => Ok(Self::Rating),
            "duration" => Ok(Self::Duration),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Idle, waiting for a destination.
    #[default]
    Search,
    /// A search has been submitted.
    Results,
}

/// Minimum-rating thresholds offered by front-ends ("All", "3+", "4+", "4.5+").
pub const RATING_PRESETS: [f64; 4] = [0.0, 3.0, 4.0, 4.5];
