//! Catalog seed configuration loading from catalog.toml
//!
//! The catalog file lists the initial items per subtype. It is read at
//! startup and fed to `core::item::seed_catalog`, which skips names that are
//! already present in the database.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Albums to seed
    #[serde(default)]
    pub albums: Vec<AlbumSeed>,
    /// Books to seed
    #[serde(default)]
    pub books: Vec<BookSeed>,
    /// Movies to seed
    #[serde(default)]
    pub movies: Vec<MovieSeed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlbumSeed {
    pub name: String,
    pub price: i32,
    pub stock: i32,
    pub artist: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookSeed {
    pub name: String,
    pub price: i32,
    pub stock: i32,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MovieSeed {
    pub name: String,
    pub price: i32,
    pub stock: i32,
    pub actor: Option<String>,
}

/// Loads the catalog configuration from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read (`Error::Io`)
/// - The TOML syntax is invalid
/// - A seed entry has an empty name or a negative price/stock
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;

    let config: CatalogConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })?;
    validate(&config)?;
    Ok(config)
}

/// Loads the catalog from the default location (./catalog.toml)
pub fn load_default_catalog() -> Result<CatalogConfig> {
    load_catalog("catalog.toml")
}

fn validate(config: &CatalogConfig) -> Result<()> {
    let entries = config
        .albums
        .iter()
        .map(|s| (&s.name, s.price, s.stock))
        .chain(config.books.iter().map(|s| (&s.name, s.price, s.stock)))
        .chain(config.movies.iter().map(|s| (&s.name, s.price, s.stock)));

    for (name, price, stock) in entries {
        if name.trim().is_empty() {
            return Err(Error::Config {
                message: "Catalog entry with empty name".to_string(),
            });
        }
        if price < 0 || stock < 0 {
            return Err(Error::Config {
                message: format!("Catalog entry '{name}' has negative price or stock"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [[albums]]
            name = "The Wall"
            price = 25000
            stock = 10
            artist = "Pink Floyd"

            [[books]]
            name = "Database Design"
            price = 32000
            stock = 4

            [[movies]]
            name = "Alien"
            price = 12000
            stock = 7
            actor = "Sigourney Weaver"
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.albums.len(), 1);
        assert_eq!(config.albums[0].artist.as_deref(), Some("Pink Floyd"));
        assert_eq!(config.books.len(), 1);
        assert!(config.books[0].author.is_none());
        assert_eq!(config.movies[0].stock, 7);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let config: CatalogConfig = toml::from_str("").unwrap();
        assert!(config.albums.is_empty());
        assert!(config.books.is_empty());
        assert!(config.movies.is_empty());
    }

    #[test]
    fn test_missing_catalog_file_is_io_error() {
        let err = load_catalog("no/such/catalog.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_validation_rejects_bad_entries() {
        let config = CatalogConfig {
            albums: vec![AlbumSeed {
                name: "x".to_string(),
                price: -1,
                stock: 0,
                artist: None,
            }],
            ..Default::default()
        };
        assert!(validate(&config).is_err());

        let config = CatalogConfig {
            books: vec![BookSeed {
                name: "  ".to_string(),
                price: 1,
                stock: 1,
                author: None,
            }],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }
}
