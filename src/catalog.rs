// 🌍 Plot Catalog - Immutable source list of land plots
// Seeded in memory at process start; a CSV file can substitute the seed.
//
// This is the single seam where a real data source would plug in: every
// other component only sees `all()` and `find_by_id()`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

// ============================================================================
// PROJECT TYPE
// ============================================================================

/// Ecological restoration category of a plot - closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    /// Peatland / bog restoration
    Moore,

    /// Hedgerow planting
    Feldhecken,

    /// Forest conservation
    #[serde(rename = "Wälder")]
    Waelder,

    /// Traditional orchard meadows
    Streuobstwiesen,
}

impl ProjectType {
    /// Display name, as it appears in listings and data files
    pub fn name(&self) -> &'static str {
        match self {
            ProjectType::Moore => "Moore",
            ProjectType::Feldhecken => "Feldhecken",
            ProjectType::Waelder => "Wälder",
            ProjectType::Streuobstwiesen => "Streuobstwiesen",
        }
    }

    /// All known project types, in display order
    pub fn all() -> [ProjectType; 4] {
        [
            ProjectType::Moore,
            ProjectType::Feldhecken,
            ProjectType::Waelder,
            ProjectType::Streuobstwiesen,
        ]
    }
}

// ============================================================================
// PLOT RECORD
// ============================================================================

/// A land parcel offered in the catalog.
///
/// `price` is always denominated in the base currency (USD); display
/// currency is a presentation concern layered on top and never mutates
/// the record. Field names serialize in camelCase (`projectType`), the
/// same shape CSV headers and API payloads use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    /// Unique identifier; stable ordering key for ties
    pub id: String,

    /// Title or name of the plot
    pub title: String,

    /// Size in square meters (positive)
    pub size: f64,

    /// Price in USD (positive)
    pub price: f64,

    /// Geographic location, free text
    pub location: String,

    /// Detailed description
    pub description: String,

    /// Ecological project classification
    pub project_type: ProjectType,

    /// Name of the plot owner
    pub owner: String,

    /// Contact information of the owner
    pub contact: String,
}

// ============================================================================
// CATALOG
// ============================================================================

/// The immutable plot list. Read-only for the lifetime of the process;
/// no component ever mutates it, so it can be shared freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    plots: Vec<Plot>,
}

impl Catalog {
    /// Build a catalog from plot records, validating the invariants:
    /// non-empty unique ids, positive finite price and size.
    pub fn new(plots: Vec<Plot>) -> Result<Self> {
        validate(&plots)?;
        Ok(Catalog { plots })
    }

    /// The built-in sample catalog (five German conservation plots).
    pub fn seed() -> Self {
        Catalog {
            plots: seed_plots(),
        }
    }

    /// Load a catalog from a CSV file with headers
    /// `id,title,size,price,location,description,projectType,owner,contact`.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rdr = csv::Reader::from_path(path.as_ref())
            .with_context(|| format!("Failed to open catalog file: {:?}", path.as_ref()))?;
        Self::from_csv(rdr)
    }

    /// Load a catalog from any CSV source (same header row as `from_csv_path`).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let mut plots = Vec::new();

        for (i, result) in rdr.deserialize().enumerate() {
            let plot: Plot =
                result.with_context(|| format!("Failed to parse plot record {}", i + 1))?;
            plots.push(plot);
        }

        Catalog::new(plots)
    }

    /// Side-effect-free accessor to the full list, in stable order.
    pub fn all(&self) -> &[Plot] {
        &self.plots
    }

    /// Look up a plot by id. `None` is the explicit not-found signal;
    /// callers decide how to surface it (the core has no notion of 404).
    pub fn find_by_id(&self, id: &str) -> Option<&Plot> {
        self.plots.iter().find(|p| p.id == id)
    }

    /// Distinct locations in catalog order (feeds the suggestion dropdown).
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.plots
            .iter()
            .map(|p| p.location.as_str())
            .filter(|loc| seen.insert(*loc))
            .collect()
    }

    /// Number of plots in the catalog
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    /// An empty catalog is a valid, non-error state
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }
}

fn validate(plots: &[Plot]) -> Result<()> {
    let mut seen_ids = HashSet::new();

    for plot in plots {
        if plot.id.is_empty() {
            bail!("Plot {:?} has an empty id", plot.title);
        }
        if !seen_ids.insert(plot.id.as_str()) {
            bail!("Duplicate plot id: {:?}", plot.id);
        }
        if !(plot.price.is_finite() && plot.price > 0.0) {
            bail!("Plot {:?} has a non-positive price: {}", plot.id, plot.price);
        }
        if !(plot.size.is_finite() && plot.size > 0.0) {
            bail!("Plot {:?} has a non-positive size: {}", plot.id, plot.size);
        }
    }

    Ok(())
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

// ============================================================================
// SEED DATA
// ============================================================================

fn seed_plots() -> Vec<Plot> {
    vec![
        Plot {
            id: "1".to_string(),
            title: "Schwarzwald Naturgrundstück".to_string(),
            size: 2500.0,
            price: 175000.0,
            location: "Schwarzwald, Baden-Württemberg".to_string(),
            description: "Waldgrundstück mit hoher Artenvielfalt und altem Baumbestand"
                .to_string(),
            project_type: ProjectType::Waelder,
            owner: "Max Mustermann".to_string(),
            contact: "max@mustermann.com".to_string(),
        },
        Plot {
            id: "2".to_string(),
            title: "Lüneburger Heide Biotop".to_string(),
            size: 3000.0,
            price: 145000.0,
            location: "Lüneburger Heide, Niedersachsen".to_string(),
            description: "Heidefläche mit seltenen Pflanzenarten und Insektenpopulationen"
                .to_string(),
            project_type: ProjectType::Feldhecken,
            owner: "Sabine Schmidt".to_string(),
            contact: "sabine@schmidt.com".to_string(),
        },
        Plot {
            id: "3".to_string(),
            title: "Spreewald Feuchtgebiet".to_string(),
            size: 1800.0,
            price: 160000.0,
            location: "Spreewald, Brandenburg".to_string(),
            description: "Naturbelassenes Feuchtgebiet mit reichem Vogelvorkommen".to_string(),
            project_type: ProjectType::Moore,
            owner: "Jürgen Müller".to_string(),
            contact: "juergen@mueller.com".to_string(),
        },
        Plot {
            id: "4".to_string(),
            title: "Bayerischer Streuobstwiese".to_string(),
            size: 2200.0,
            price: 190000.0,
            location: "Allgäu, Bayern".to_string(),
            description: "Traditionelle Streuobstwiese mit alten Obstsorten und Wildblumen"
                .to_string(),
            project_type: ProjectType::Streuobstwiesen,
            owner: "Anna Weber".to_string(),
            contact: "anna@weber.com".to_string(),
        },
        Plot {
            id: "5".to_string(),
            title: "Eifel Naturschutzfläche".to_string(),
            size: 2800.0,
            price: 168000.0,
            location: "Eifel, Rheinland-Pfalz".to_string(),
            description: "Artenreiches Grünland mit Quellgebieten und Schmetterlingshabitaten"
                .to_string(),
            project_type: ProjectType::Feldhecken,
            owner: "Oliver Klein".to_string(),
            contact: "oliver@klein.com".to_string(),
        },
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_plot(id: &str, location: &str, price: f64) -> Plot {
        Plot {
            id: id.to_string(),
            title: format!("Plot {}", id),
            size: 1000.0,
            price,
            location: location.to_string(),
            description: "Test plot".to_string(),
            project_type: ProjectType::Moore,
            owner: "Owner".to_string(),
            contact: "owner@example.com".to_string(),
        }
    }

    #[test]
    fn test_seed_catalog() {
        let catalog = Catalog::seed();

        assert_eq!(catalog.len(), 5);
        assert!(!catalog.is_empty());

        let ids: Vec<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        // Every seed plot satisfies the record invariants
        for plot in catalog.all() {
            assert!(plot.price > 0.0);
            assert!(plot.size > 0.0);
        }
    }

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::seed();

        let spreewald = catalog.find_by_id("3");
        assert!(spreewald.is_some());
        assert_eq!(spreewald.unwrap().title, "Spreewald Feuchtgebiet");
        assert_eq!(spreewald.unwrap().project_type, ProjectType::Moore);
    }

    #[test]
    fn test_find_by_id_miss_is_none_not_panic() {
        let catalog = Catalog::seed();

        assert!(catalog.find_by_id("999").is_none());
        assert!(catalog.find_by_id("").is_none());
    }

    #[test]
    fn test_locations_distinct_in_catalog_order() {
        let catalog = Catalog::new(vec![
            create_plot("a", "Spreewald, Brandenburg", 100.0),
            create_plot("b", "Eifel, Rheinland-Pfalz", 100.0),
            create_plot("c", "Spreewald, Brandenburg", 100.0),
        ])
        .unwrap();

        assert_eq!(
            catalog.locations(),
            vec!["Spreewald, Brandenburg", "Eifel, Rheinland-Pfalz"]
        );
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let result = Catalog::new(vec![
            create_plot("1", "Somewhere", 100.0),
            create_plot("1", "Elsewhere", 200.0),
        ]);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate plot id"));
    }

    #[test]
    fn test_new_rejects_bad_records() {
        assert!(Catalog::new(vec![create_plot("", "Somewhere", 100.0)]).is_err());
        assert!(Catalog::new(vec![create_plot("1", "Somewhere", 0.0)]).is_err());
        assert!(Catalog::new(vec![create_plot("1", "Somewhere", -5.0)]).is_err());

        let mut bad_size = create_plot("1", "Somewhere", 100.0);
        bad_size.size = -1.0;
        assert!(Catalog::new(vec![bad_size]).is_err());
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).unwrap();

        assert!(catalog.is_empty());
        assert!(catalog.all().is_empty());
        assert!(catalog.find_by_id("1").is_none());
        assert!(catalog.locations().is_empty());
    }

    #[test]
    fn test_from_csv_reader() {
        let csv_data = "\
id,title,size,price,location,description,projectType,owner,contact
7,Harz Bergwiese,1500,120000,Harz (Niedersachsen),Bergwiese mit Quellbach,Wälder,Karl Harz,karl@harz.de
8,Rhön Weideland,2000,135000,Rhön (Hessen),Extensives Weideland,Feldhecken,Eva Rhön,eva@rhoen.de
";

        let catalog = Catalog::from_csv_reader(csv_data.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        let harz = catalog.find_by_id("7").unwrap();
        assert_eq!(harz.project_type, ProjectType::Waelder);
        assert_eq!(harz.location, "Harz (Niedersachsen)");
        assert_eq!(harz.price, 120000.0);
    }

    #[test]
    fn test_from_csv_reader_rejects_unknown_project_type() {
        let csv_data = "\
id,title,size,price,location,description,projectType,owner,contact
7,Harz Bergwiese,1500,120000,Harz,Bergwiese,Sumpf,Karl,karl@harz.de
";

        assert!(Catalog::from_csv_reader(csv_data.as_bytes()).is_err());
    }

    #[test]
    fn test_from_csv_reader_rejects_invariant_violations() {
        let csv_data = "\
id,title,size,price,location,description,projectType,owner,contact
7,Harz Bergwiese,1500,0,Harz,Bergwiese,Moore,Karl,karl@harz.de
";

        let result = Catalog::from_csv_reader(csv_data.as_bytes());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("non-positive price"));
    }

    #[test]
    fn test_project_type_names() {
        assert_eq!(ProjectType::Moore.name(), "Moore");
        assert_eq!(ProjectType::Waelder.name(), "Wälder");
        assert_eq!(ProjectType::all().len(), 4);
    }

    #[test]
    fn test_plot_serializes_with_camel_case_keys() {
        let plot = create_plot("1", "Somewhere", 100.0);
        let json = serde_json::to_value(&plot).unwrap();

        assert_eq!(json["projectType"], "Moore");
        assert_eq!(json["id"], "1");
        assert!(json.get("project_type").is_none());
    }
}
