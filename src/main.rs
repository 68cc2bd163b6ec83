// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use std::env;

use land_plots::{evaluate, price_bounds, Catalog, Currency, FilterSpec};
use land_plots::currency::format_price;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("list") => run_list(args.get(2).map(String::as_str))?,
        Some("check") => run_check(args.get(2).map(String::as_str))?,
        Some("help") | Some("--help") | Some("-h") => print_usage(),
        // Any other argument is a catalog CSV for the interactive browser
        Some(path) => run_ui_mode(Some(path))?,
        None => run_ui_mode(None)?,
    }

    Ok(())
}

fn print_usage() {
    println!("Land Plot Browser");
    println!();
    println!("USAGE:");
    println!("  land-plots                 Interactive browser over the sample catalog");
    println!("  land-plots <FILE.csv>      Interactive browser over a catalog file");
    println!("  land-plots list [QUERY]    Print matching plots; QUERY is a filter query");
    println!("                             string, e.g. \"minPrice=150000&currency=EUR\"");
    println!("  land-plots check <FILE>    Load and validate a catalog CSV file");
}

fn run_list(query: Option<&str>) -> Result<()> {
    println!("🌍 Land Plot Catalog");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = Catalog::seed();
    let spec = match query {
        Some(q) => {
            println!("🔍 Filter: {}", q);
            FilterSpec::from_query_string(q)
        }
        None => FilterSpec::default(),
    };

    let results = evaluate(&catalog, &spec);

    if results.is_empty() {
        println!("\nNo plots match the current filter.");
    } else {
        println!();
        for item in &results {
            println!(
                "  [{}] {:<30} {:<32} {:>7} m²  {:>12}  {}",
                item.plot.id,
                item.plot.title,
                item.plot.location,
                item.plot.size,
                format_price(item.display_price, item.currency),
                item.plot.project_type.name(),
            );
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✓ {} of {} plots match ({} prices)",
        results.len(),
        catalog.len(),
        spec.currency.code()
    );

    Ok(())
}

fn run_check(path: Option<&str>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => bail!("Usage: land-plots check <FILE>"),
    };

    println!("📂 Checking catalog file: {}", path);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = Catalog::from_csv_path(path)?;

    println!("✓ Loaded {} plots", catalog.len());
    println!("✓ All records valid: unique ids, positive price and size");

    let locations = catalog.locations();
    println!("✓ {} distinct locations:", locations.len());
    for location in locations {
        println!("    • {}", location);
    }

    if let Some((low, high)) = price_bounds(&catalog, Currency::Usd) {
        println!(
            "✓ Price range: {} – {}",
            format_price(low, Currency::Usd),
            format_price(high, Currency::Usd)
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(catalog_path: Option<&str>) -> Result<()> {
    println!("🖥️  Loading Land Plot Browser...\n");

    let catalog = match catalog_path {
        Some(path) => {
            println!("📂 Loading catalog from {}...", path);
            Catalog::from_csv_path(path)?
        }
        None => Catalog::seed(),
    };

    println!("✓ {} plots in catalog\n", catalog.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_catalog_path: Option<&str>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin plots-server --features server");
    eprintln!("   Or print the catalog directly: cargo run list");
    std::process::exit(1);
}
