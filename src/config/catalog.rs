//! Catalog seeding from catalog.toml
//!
//! Loads an initial vendor and part catalog from a TOML file and seeds the
//! database on first run. Seeding is skipped entirely once any part exists,
//! so restarting the service never duplicates the catalog.

use crate::{
    entities::{Part, Vendor, part, vendor},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, Set, prelude::*};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Vendors to seed, referenced by parts through their name
    #[serde(default)]
    pub vendors: Vec<VendorSeed>,
    /// Parts to seed
    #[serde(default)]
    pub parts: Vec<PartSeed>,
}

/// Seed definition for a single vendor
#[derive(Debug, Deserialize, Clone)]
pub struct VendorSeed {
    /// Vendor display name, unique
    pub name: String,
    /// Ordering contact email
    pub contact_email: Option<String>,
    /// Ordering contact phone
    pub phone: Option<String>,
}

/// Seed definition for a single part
#[derive(Debug, Deserialize, Clone)]
pub struct PartSeed {
    /// Part display name
    pub name: String,
    /// Stock-keeping unit, unique
    pub sku: String,
    /// Unit price
    pub price: f64,
    /// Initial on-hand quantity
    #[serde(default)]
    pub stock: i64,
    /// Low-stock threshold
    #[serde(default)]
    pub reorder_threshold: i64,
    /// Bin or shelf code
    pub shelf_location: Option<String>,
    /// Name of the supplying vendor, resolved against `vendors`
    pub vendor: Option<String>,
}

/// Loads a catalog configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_catalog_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })
}

/// Loads the catalog from `STOCKROOM_CATALOG` or the default `./catalog.toml`.
pub fn load_default_catalog_config() -> Result<CatalogConfig> {
    let path =
        std::env::var("STOCKROOM_CATALOG").unwrap_or_else(|_| "catalog.toml".to_string());
    load_catalog_config(path)
}

/// Seeds vendors and parts from the configuration.
///
/// A no-op when the part table is already populated. Vendors are inserted
/// first; each part naming a vendor is linked by name, and a part naming an
/// unknown vendor is a configuration error.
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<()> {
    let existing = Part::find().count(db).await?;
    if existing > 0 {
        info!(parts = existing, "catalog already seeded, skipping");
        return Ok(());
    }

    for seed in &config.vendors {
        vendor::ActiveModel {
            name: Set(seed.name.clone()),
            contact_email: Set(seed.contact_email.clone()),
            phone: Set(seed.phone.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for seed in &config.parts {
        let vendor_id = match &seed.vendor {
            Some(name) => {
                let found = Vendor::find()
                    .filter(vendor::Column::Name.eq(name.as_str()))
                    .one(db)
                    .await?;
                Some(found.ok_or_else(|| Error::Config {
                    message: format!("part '{}' names unknown vendor '{name}'", seed.sku),
                })?.id)
            }
            None => None,
        };
        part::ActiveModel {
            name: Set(seed.name.clone()),
            sku: Set(seed.sku.clone()),
            price: Set(seed.price),
            stock: Set(seed.stock),
            reorder_threshold: Set(seed.reorder_threshold),
            shelf_location: Set(seed.shelf_location.clone()),
            vendor_id: Set(vendor_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!(
        vendors = config.vendors.len(),
        parts = config.parts.len(),
        "seeded catalog"
    );
    Ok(())
}
