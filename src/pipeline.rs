// ⚙️ Filter Pipeline - FilterSpec × Catalog → ordered result set
//
// Pure evaluation: convert each price to the display currency, apply
// the price bounds, apply the folded location match, keep catalog
// order. Results are computed fresh on every call, never cached.

use crate::catalog::{Catalog, Plot};
use crate::currency::{convert, Currency};
use crate::query::FilterSpec;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// RESULT ITEM
// ============================================================================

/// One surviving plot, paired with the price in the requested display
/// currency. Serializes flat: all plot fields plus `displayPrice` and
/// the active `currency` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    #[serde(flatten)]
    pub plot: Plot,

    /// `plot.price` converted into `currency`, unrounded
    pub display_price: f64,

    /// Currency `display_price` is denominated in
    pub currency: Currency,
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Apply a filter spec to the catalog.
///
/// Bounds compare against the display price, so a min/max entered while
/// viewing EUR means EUR. The result may be empty (that is the "no
/// matches" signal, not an error) and preserves catalog order.
pub fn evaluate(catalog: &Catalog, spec: &FilterSpec) -> Vec<ResultItem> {
    let folded_query = spec.location_query.as_deref().map(fold_location);

    catalog
        .all()
        .iter()
        .map(|plot| (plot, convert(plot.price, spec.currency)))
        .filter(|(_, display_price)| spec.min_price.map_or(true, |min| *display_price >= min))
        .filter(|(_, display_price)| spec.max_price.map_or(true, |max| *display_price <= max))
        .filter(|(plot, _)| match &folded_query {
            Some(query) => fold_location(&plot.location).contains(query.as_str()),
            None => true,
        })
        .map(|(plot, display_price)| ResultItem {
            plot: plot.clone(),
            display_price,
            currency: spec.currency,
        })
        .collect()
}

/// Fold text for matching: canonical decomposition, combining marks
/// stripped, lower-cased. "Lüneburger" and "luneburger" fold to the
/// same string.
pub fn fold_location(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

// ============================================================================
// AUXILIARY QUERIES
// ============================================================================

/// Distinct catalog locations matching a partial query under the same
/// folding as the pipeline; an empty query returns every location.
/// Feeds the location dropdown.
pub fn suggest_locations<'a>(catalog: &'a Catalog, partial: &str) -> Vec<&'a str> {
    let folded = fold_location(partial.trim());

    catalog
        .locations()
        .into_iter()
        .filter(|location| folded.is_empty() || fold_location(location).contains(&folded))
        .collect()
}

/// Lowest and highest display price in the catalog, or `None` for an
/// empty catalog. Used to seat range sliders.
pub fn price_bounds(catalog: &Catalog, currency: Currency) -> Option<(f64, f64)> {
    catalog.all().iter().fold(None, |bounds, plot| {
        let price = convert(plot.price, currency);
        Some(match bounds {
            Some((lo, hi)) => (lo.min(price), hi.max(price)),
            None => (price, price),
        })
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RawParams;

    fn ids(results: &[ResultItem]) -> Vec<&str> {
        results.iter().map(|r| r.plot.id.as_str()).collect()
    }

    #[test]
    fn test_unfiltered_spec_returns_whole_catalog_in_order() {
        let catalog = Catalog::seed();
        let results = evaluate(&catalog, &FilterSpec::default());

        assert_eq!(ids(&results), vec!["1", "2", "3", "4", "5"]);
        for (item, plot) in results.iter().zip(catalog.all()) {
            assert_eq!(item.display_price, plot.price);
            assert_eq!(item.currency, Currency::Usd);
        }
    }

    #[test]
    fn test_price_window_in_usd() {
        // Prices: 175000, 145000, 160000, 190000, 168000
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            min_price: Some(150000.0),
            max_price: Some(170000.0),
            ..FilterSpec::default()
        };

        let results = evaluate(&catalog, &spec);

        assert_eq!(ids(&results), vec!["3", "5"]);
        assert_eq!(results[0].display_price, 160000.0);
        assert_eq!(results[1].display_price, 168000.0);
    }

    #[test]
    fn test_eur_display_converts_every_price() {
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            currency: Currency::Eur,
            ..FilterSpec::default()
        };

        let results = evaluate(&catalog, &spec);

        assert_eq!(ids(&results), vec!["1", "2", "3", "4", "5"]);
        for (item, plot) in results.iter().zip(catalog.all()) {
            assert_eq!(item.display_price, plot.price * 0.9524);
            assert_eq!(item.currency, Currency::Eur);
            // Stored record is untouched
            assert_eq!(item.plot.price, plot.price);
        }
    }

    #[test]
    fn test_bounds_compare_against_display_price() {
        // In EUR the prices become 166670, 138098, 152384, 180956, 160003.2;
        // a 150000 EUR floor admits a different set than a 150000 USD floor.
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            min_price: Some(150000.0),
            currency: Currency::Eur,
            ..FilterSpec::default()
        };

        let results = evaluate(&catalog, &spec);
        assert_eq!(ids(&results), vec!["1", "3", "4", "5"]);
    }

    #[test]
    fn test_location_match_is_case_insensitive() {
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            location_query: Some("brandenburg".to_string()),
            ..FilterSpec::default()
        };

        let results = evaluate(&catalog, &spec);

        assert_eq!(ids(&results), vec!["3"]);
        assert_eq!(results[0].plot.title, "Spreewald Feuchtgebiet");
    }

    #[test]
    fn test_location_match_is_diacritic_insensitive() {
        let catalog = Catalog::seed();

        for query in ["schwarzwald", "Schwarzwald", "wurttemberg", "Württemberg"] {
            let spec = FilterSpec {
                location_query: Some(query.to_string()),
                ..FilterSpec::default()
            };
            assert_eq!(ids(&evaluate(&catalog, &spec)), vec!["1"], "query {:?}", query);
        }

        // Umlauts match with or without the mark, in either direction
        for query in ["Lüneburger", "luneburger", "LÜNEBURGER"] {
            let spec = FilterSpec {
                location_query: Some(query.to_string()),
                ..FilterSpec::default()
            };
            assert_eq!(ids(&evaluate(&catalog, &spec)), vec!["2"], "query {:?}", query);
        }
    }

    #[test]
    fn test_location_only_matches_location_field() {
        // "Feuchtgebiet" appears in a title and a description, but in
        // no location, so nothing survives
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            location_query: Some("Feuchtgebiet".to_string()),
            ..FilterSpec::default()
        };

        assert!(evaluate(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_min_above_all_prices_gives_empty_result() {
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            min_price: Some(999999.0),
            ..FilterSpec::default()
        };

        assert!(evaluate(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty_not_an_error() {
        let catalog = Catalog::seed();
        let spec = FilterSpec {
            min_price: Some(180000.0),
            max_price: Some(150000.0),
            ..FilterSpec::default()
        };

        assert!(evaluate(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let catalog = Catalog::seed();
        let spec = FilterSpec::from_params(
            &RawParams::new()
                .with("minPrice", "140000")
                .with("location", "heide")
                .with("currency", "EUR"),
        );

        let first = evaluate(&catalog, &spec);
        let second = evaluate(&catalog, &spec);

        assert_eq!(first, second);
    }

    #[test]
    fn test_order_preservation_under_every_filter_shape() {
        let catalog = Catalog::seed();
        let specs = [
            FilterSpec::default(),
            FilterSpec {
                min_price: Some(145000.0),
                ..FilterSpec::default()
            },
            FilterSpec {
                max_price: Some(175000.0),
                ..FilterSpec::default()
            },
            FilterSpec {
                location_query: Some("e".to_string()),
                ..FilterSpec::default()
            },
        ];

        let catalog_order: Vec<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        for spec in &specs {
            let result_ids: Vec<String> = evaluate(&catalog, spec)
                .iter()
                .map(|r| r.plot.id.clone())
                .collect();
            let mut expected: Vec<&str> = catalog_order.clone();
            expected.retain(|id| result_ids.iter().any(|r| r == id));
            assert_eq!(result_ids, expected, "spec {:?}", spec);
        }
    }

    #[test]
    fn test_empty_catalog_evaluates_to_empty_result() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(evaluate(&catalog, &FilterSpec::default()).is_empty());
    }

    #[test]
    fn test_fold_location() {
        assert_eq!(fold_location("Lüneburger Heide"), "luneburger heide");
        assert_eq!(fold_location("Baden-Württemberg"), "baden-wurttemberg");
        assert_eq!(fold_location("ALLGÄU"), "allgau");
        assert_eq!(fold_location(""), "");
    }

    #[test]
    fn test_suggest_locations() {
        let catalog = Catalog::seed();

        assert_eq!(catalog.locations().len(), 5);
        assert_eq!(suggest_locations(&catalog, "").len(), 5);
        assert_eq!(
            suggest_locations(&catalog, "baden"),
            vec!["Schwarzwald, Baden-Württemberg"]
        );
        assert_eq!(
            suggest_locations(&catalog, "allgau"),
            vec!["Allgäu, Bayern"]
        );
        assert!(suggest_locations(&catalog, "berlin").is_empty());
    }

    #[test]
    fn test_price_bounds() {
        let catalog = Catalog::seed();

        assert_eq!(price_bounds(&catalog, Currency::Usd), Some((145000.0, 190000.0)));
        assert_eq!(
            price_bounds(&catalog, Currency::Eur),
            Some((145000.0 * 0.9524, 190000.0 * 0.9524))
        );
        assert_eq!(price_bounds(&Catalog::new(Vec::new()).unwrap(), Currency::Usd), None);
    }

    #[test]
    fn test_result_item_serializes_flat() {
        let catalog = Catalog::seed();
        let results = evaluate(
            &catalog,
            &FilterSpec {
                currency: Currency::Eur,
                ..FilterSpec::default()
            },
        );

        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["projectType"], "Wälder");
        assert_eq!(json["displayPrice"], 175000.0 * 0.9524);
        assert_eq!(json["currency"], "EUR");
    }
}
