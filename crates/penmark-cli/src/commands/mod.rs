pub mod evaluate;
pub mod init;
pub mod tasks;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use penmark_core::catalog::{self, Catalog};

/// Load the catalog at `path`, or fall back to the built-in one.
pub(crate) fn load_catalog_or_builtin(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => catalog::load_catalog(p),
        None => Ok(Catalog::builtin().clone()),
    }
}
