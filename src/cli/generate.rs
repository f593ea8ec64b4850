//! `infogen generate` command implementation.

use crate::cli::open_store;
use crate::client::ChatClient;
use crate::config::load_config;
use crate::error::{Error, Result};
use crate::generate::{GenerateRequest, Generator};
use crate::render::{FrameCoalescer, RenderView, SvgRenderer};
use crate::stream::StreamEvent;
use std::io::{self, Read, Write};
use std::path::Path;
use tokio::runtime::Runtime;

/// Echoes streamed text, going quiet after the first write failure.
struct Echo<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Echo<W> {
    fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            log::debug!("stopping terminal output: {e}");
            self.error = Some(e);
        }
    }

    /// The first write failure, if any.
    fn finish(self) -> Result<()> {
        self.error.map_or(Ok(()), |e| Err(Error::Output(e)))
    }
}

fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)
}

/// Run the generate command.
///
/// Reads the prompt from stdin when none is given, prints the reply as it
/// streams in, and writes the rendered infographic to `out` if requested.
///
/// # Errors
///
/// Returns an error if configuration is missing, the request fails, the
/// reply cannot be rendered, history cannot be written, or stdout goes away.
/// A closed stdout does not cancel the request; history is still recorded.
pub fn run(
    prompt: Option<String>,
    template: Option<String>,
    no_stream: bool,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config()?;

    let prompt = match prompt {
        Some(prompt) => prompt,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let request = GenerateRequest {
        prompt,
        template,
        stream: config.api.stream && !no_stream,
    };

    let client = ChatClient::new(&config.api)?;
    let mut generator = Generator::new(client, open_store(&config)?);
    let runtime = build_runtime()?;

    // Live render while streaming; only used when an output file is wanted
    let mut view = RenderView::new(|| Ok(SvgRenderer::new()));
    let mut frames = FrameCoalescer::default();
    let mut reply = String::new();
    let mut echo = Echo::new(io::stdout().lock());

    let mut sink = |event: StreamEvent| match event {
        StreamEvent::Delta { text } => {
            echo.write(&text);
            if out.is_some() {
                reply.push_str(&text);
                frames.schedule(reply.as_str());
                frames.tick(&mut view);
            }
        }
        StreamEvent::End => echo.write("\n"),
    };

    let generation = runtime.block_on(generator.generate(&request, &mut sink))?;
    log::debug!("saved history record {}", generation.record.id);

    if let Some(path) = out {
        view.update(generation.content())?;
        view.snapshot()?.save(path)?;
        view.release();
        eprintln!("Saved infographic to {}", path.display());
    }

    echo.finish()
}
