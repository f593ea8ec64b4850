//! Rendering of model replies.
//!
//! A [`Renderer`] is a stateful collaborator with an imperative lifecycle:
//! it is constructed, asked to render any number of times, and destroyed
//! exactly once. [`RenderView`] owns that lifecycle so callers only ever call
//! `update(text)`.

pub mod svg;
pub mod syntax;
pub mod view;

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::Path;

pub use svg::SvgRenderer;
pub use syntax::{Document, Item, extract_syntax, parse};
pub use view::{FrameCoalescer, RenderView};

/// Static image encoding of a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// MIME type of `bytes`.
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Snapshot {
    /// Encode as a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Write the image to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// A stateful diagram renderer.
pub trait Renderer {
    /// Render the full text artifact, replacing the previous render.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be rendered.
    fn render(&mut self, text: &str) -> Result<()>;

    /// Static image of the current render.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been rendered yet.
    fn snapshot(&self) -> Result<Snapshot>;

    /// Release the renderer's resources. Called exactly once.
    fn destroy(&mut self);
}
