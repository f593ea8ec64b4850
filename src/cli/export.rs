//! `infogen export` command implementation.

use crate::cli::open_store;
use crate::config::load_config;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::render::{RenderView, SvgRenderer};
use std::path::Path;

/// Re-render a history record and write it as an image.
///
/// With `data_url`, the image is also printed as a `data:` URL.
///
/// # Errors
///
/// Returns [`Error::HistoryNotFound`] for unknown ids, or an error if the
/// reply cannot be rendered or the file cannot be written.
pub fn run(id: &str, out: Option<&Path>, data_url: bool) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    let record = store
        .get(id)?
        .ok_or_else(|| Error::HistoryNotFound(id.to_string()))?;

    let mut view = RenderView::new(|| Ok(SvgRenderer::new()));
    view.update(&record.content)?;
    let snapshot = view.snapshot()?;
    view.release();

    if let Some(path) = out {
        snapshot.save(path)?;
        eprintln!("Saved infographic to {}", path.display());
    }
    if data_url || out.is_none() {
        println!("{}", snapshot.to_data_url());
    }

    Ok(())
}
