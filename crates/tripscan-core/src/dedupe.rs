//! Cross-source duplicate removal.

use std::collections::HashSet;
use tripscan_schema::Package;

/// Coarse identity of a package: lowercased title plus price in thousands.
///
/// `"Goa Trip"` at 10999 and at 11499 share the key `goa trip-11`; at 12499
/// the key becomes `goa trip-12`. The bucket is an integer so `-0.0` and
/// `0.0` land in the same one.
pub fn dedupe_key(title: &str, price: f64) -> String {
    let bucket = (price / 1000.0).round() as i64;
    format!("{}-{bucket}", title.to_lowercase())
}

/// Keep the first package for each [`dedupe_key`], preserving input order.
///
/// Later duplicates are dropped even when cheaper or better rated.
pub fn dedupe(packages: Vec<Package>) -> Vec<Package> {
    let mut seen = HashSet::with_capacity(packages.len());
    packages
        .into_iter()
        .filter(|pkg| seen.insert(dedupe_key(pkg.title(), pkg.price())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripscan_schema::{RawPackage, SourceId};

    fn pkg(source: &str, title: &str, price: f64) -> Package {
        Package::new(SourceId::new(source), RawPackage::new(title, price))
    }

    #[test]
    fn test_key_format() {
        assert_eq!(dedupe_key("Goa Trip", 10999.0), "goa trip-11");
        assert_eq!(dedupe_key("Goa Trip", 499.0), "goa trip-0");
    }

    #[test]
    fn test_negative_zero_price_shares_bucket() {
        assert_eq!(dedupe_key("Free Trip", -0.0), "free trip-0");

        let out = dedupe(vec![
            pkg("A", "Free Trip", 0.0),
            pkg("B", "free trip", -0.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source().as_str(), "A");
    }

    #[test]
    fn test_close_prices_collapse() {
        let out = dedupe(vec![
            pkg("A", "Goa Trip", 10999.0),
            pkg("B", "goa trip", 11499.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source().as_str(), "A");
    }

    #[test]
    fn test_distant_prices_kept() {
        let out = dedupe(vec![
            pkg("A", "Goa Trip", 10999.0),
            pkg("B", "Goa Trip", 12499.0),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_first_wins_even_if_later_is_cheaper() {
        let out = dedupe(vec![
            pkg("A", "Kerala Backwaters", 20400.0),
            pkg("B", "Kerala Backwaters", 19600.0),
            pkg("C", "Manali Snow", 9000.0),
        ]);
        let sources: Vec<_> = out.iter().map(|p| p.source().as_str()).collect();
        assert_eq!(sources, ["A", "C"]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            pkg("A", "Trip", 1000.0),
            pkg("B", "Trip", 1200.0),
            pkg("C", "Other", 1000.0),
        ];
        let once = dedupe(input);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }
}
