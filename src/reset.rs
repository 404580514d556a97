use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::db::{Database, TABLES_IN_CREATION_ORDER};
use crate::identity::EmailRegistry;

/// Dependents first, so no foreign key is ever left dangling mid-wipe.
pub fn deletion_order() -> Vec<&'static str> {
    TABLES_IN_CREATION_ORDER.iter().rev().copied().collect()
}

/// Removes every generated row and forgets every handed-out email.
/// The wipe is a single transaction: it either fully happens or not at all.
pub fn reset(db: &Database, registry: &mut EmailRegistry) -> Result<usize> {
    let removed = db
        .delete_all(&deletion_order())
        .context("Failed to reset generated data")?;
    if !registry.is_empty() {
        debug!(emails = registry.len(), "forgetting issued emails");
        registry.clear();
    }
    info!(removed, "generated data cleared");
    Ok(removed)
}
