//! Seed the catalog from a YAML file.

use std::path::Path;

use tracing::{error, info};

use ironyard_storefront::db::seed::{CatalogSeed, seed_catalog, validate};

use super::connect;

/// Seed categories, brands and products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog file
/// * `clear_existing` - If true, delete the existing catalog first
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or if
/// database operations fail.
pub async fn catalog(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let seed = CatalogSeed::from_file(path)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    info!(
        categories = seed.categories.len(),
        brands = seed.brands.len(),
        products = seed.products.len(),
        "Parsed catalog"
    );

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = connect().await?;

    info!(clear_existing, "Starting seeding process");
    let report = seed_catalog(&pool, &seed, clear_existing).await?;

    info!("Seeding complete!");
    info!("  Categories: {}", report.categories);
    info!("  Brands: {}", report.brands);
    info!("  Products: {}", report.products);

    Ok(())
}
