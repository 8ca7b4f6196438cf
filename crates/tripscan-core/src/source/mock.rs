//! Randomized package generator used when no live endpoints are available.
//!
//! Each call sleeps for a random latency, fails with the configured
//! probability, and otherwise returns a handful of plausible packages themed
//! on the destination. With a seed, output is a pure function of
//! (seed, source, destination).

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;
use tripscan_schema::{Destination, RawPackage, SourceId};

use super::{Source, SourceError};
use crate::config::MockSettings;

const TITLE_TEMPLATES: &[&str] = &[
    "{} Beach Paradise",
    "Magical {} Getaway",
    "{} Explorer Package",
    "Romantic {} Honeymoon",
    "{} Family Fun Tour",
    "Luxury {} Retreat",
    "{} Adventure Trail",
    "Cultural {} Discovery",
    "{} Budget Escape",
    "Best of {}",
];

const HIGHLIGHTS: &[&str] = &[
    "Hotel Stay",
    "Daily Breakfast",
    "Airport Transfers",
    "Sightseeing",
    "Guided Tours",
    "Candlelight Dinner",
    "Water Sports",
    "Local Cuisine",
    "Free Cancellation",
    "Flights Included",
];

const FAILURE_REASONS: &[&str] = &[
    "connection reset by peer",
    "upstream returned 502",
    "rate limited",
    "unexpected page layout",
];

/// Simulated provider: random latency, random failures, and plausible
/// packages themed on the destination. Deterministic when a seed is set.
#[derive(Debug, Clone)]
pub struct MockSource {
    id: SourceId,
    host: String,
    settings: MockSettings,
}

impl MockSource {
    /// A mock named `id`, with a booking host derived from the name.
    pub fn new(id: SourceId, settings: MockSettings) -> Self {
        let host = host_for(&id);
        Self { id, host, settings }
    }

    fn rng_for(&self, destination: &Destination) -> StdRng {
        match self.settings.seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                self.id.hash(&mut hasher);
                destination.as_str().to_lowercase().hash(&mut hasher);
                StdRng::seed_from_u64(seed ^ hasher.finish())
            }
            None => StdRng::from_os_rng(),
        }
    }

    fn latency(&self, rng: &mut StdRng) -> Duration {
        let lo = self.settings.min_latency_ms;
        let hi = self.settings.max_latency_ms.max(lo);
        Duration::from_millis(rng.random_range(lo..=hi))
    }

    fn generate(&self, rng: &mut StdRng, destination: &Destination) -> Vec<RawPackage> {
        let count = rng.random_range(2..=6);
        TITLE_TEMPLATES
            .choose_multiple(rng, count)
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|template| self.package(rng, template.replace("{}", destination.as_str())))
            .collect()
    }

    fn package(&self, rng: &mut StdRng, title: String) -> RawPackage {
        let nights: u32 = rng.random_range(2..=6);
        let price = f64::from(rng.random_range(80u32..=600) * 100);
        let slug = slugify(&title);

        let mut pkg = RawPackage::new(title, price);
        pkg.duration = Some(format!("{} Days / {} Nights", nights + 1, nights));
        pkg.rating = Some(f64::from(rng.random_range(30u32..=50)) / 10.0);
        pkg.reviews = Some(rng.random_range(20..=2500));
        let highlight_count = rng.random_range(3..=4);
        pkg.highlights = HIGHLIGHTS
            .choose_multiple(rng, highlight_count)
            .map(|h| (*h).to_string())
            .collect();

        if rng.random_bool(0.5) {
            let discount: u32 = rng.random_range(5..=35);
            let original = price / (1.0 - f64::from(discount) / 100.0);
            pkg.discount = Some(discount);
            pkg.original_price = Some((original / 100.0).round() * 100.0);
        }

        pkg.booking_url = Some(format!(
            "https://www.{}/holidays/{slug}-{}",
            self.host,
            rng.random_range(1000..=9999)
        ));
        if rng.random_bool(0.7) {
            pkg.image = Some(format!("https://images.{}/packages/{slug}.jpg", self.host));
        }
        pkg
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self, destination: &Destination) -> Result<Vec<RawPackage>, SourceError> {
        // StdRng is not held across the await.
        let (latency, outcome) = {
            let mut rng = self.rng_for(destination);
            let latency = self.latency(&mut rng);
            let failure_rate = self.settings.failure_rate.clamp(0.0, 1.0);
            let outcome = if rng.random_bool(failure_rate) {
                let reason = FAILURE_REASONS.choose(&mut rng).copied().unwrap_or("unavailable");
                Err(reason)
            } else {
                Ok(self.generate(&mut rng, destination))
            };
            (latency, outcome)
        };

        tokio::time::sleep(latency).await;
        outcome.map_err(|reason| SourceError::Upstream(reason.to_string()))
    }
}

/// "Booking.com" -> "booking.com", "MakeMyTrip" -> "makemytrip.com".
fn host_for(id: &SourceId) -> String {
    let host: String = id
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect::<String>()
        .to_ascii_lowercase();
    if host.contains('.') {
        host
    } else {
        format!("{host}.com")
    }
}

fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
