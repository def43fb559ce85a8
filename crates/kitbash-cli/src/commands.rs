//! Subcommand handlers. Each returns the text to print on stdout.

use kitbash_core::grade::Grade;
use kitbash_core::tree::ResourceMap;
use kitbash_data::{Catalog, DataLoadError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Data(#[from] DataLoadError),
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("--quantity must be at least 1")]
    ZeroQuantity,
}

/// One line per blueprint: `name: Grade, Grade`.
pub fn list(catalog: &Catalog) -> String {
    lines(catalog.blueprint_names().into_iter().map(|name| {
        let grades: Vec<&str> = catalog
            .grades_of(name)
            .unwrap_or_default()
            .into_iter()
            .map(Grade::name)
            .collect();
        format!("{name}: {}", grades.join(", "))
    }))
}

/// Newline-terminated join; empty input gives an empty string.
fn lines(rows: impl IntoIterator<Item = String>) -> String {
    rows.into_iter().map(|row| row + "\n").collect()
}

pub fn cost(catalog: &Catalog, blueprint: &str, grade: Grade) -> Result<String, CliError> {
    let totals = catalog.totals(blueprint, grade)?;
    Ok(format!("mind: {}\ntime: {}\n", totals.mind, totals.time))
}

/// Raw resources for `quantity` units of `blueprint` at `grade`, one
/// `name: quantity` line per resource in name order, or a JSON object.
pub fn collapse(
    catalog: &Catalog,
    blueprint: &str,
    grade: Grade,
    quantity: u32,
    json: bool,
) -> Result<String, CliError> {
    if quantity == 0 {
        return Err(CliError::ZeroQuantity);
    }
    let resources: ResourceMap = catalog
        .flatten(blueprint, grade)?
        .into_iter()
        .map(|(name, total)| (name, total.saturating_mul(u64::from(quantity))))
        .collect();

    if json {
        let mut out = serde_json::to_string_pretty(&resources)?;
        out.push('\n');
        return Ok(out);
    }
    Ok(lines(
        resources
            .iter()
            .map(|(name, total)| format!("{name}: {total}")),
    ))
}
