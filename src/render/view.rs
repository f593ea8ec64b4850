//! Owned renderer lifecycle and update coalescing.

use crate::error::{Error, Result};
use crate::render::{Renderer, Snapshot};
use std::time::{Duration, Instant};

/// Owns at most one renderer, created on first use and destroyed exactly once.
///
/// The renderer is released by [`release`](Self::release) or when the view is
/// dropped, whichever comes first, so every exit path (normal teardown, an
/// error propagating with `?`, replacement) frees it.
pub struct RenderView<R, F>
where
    R: Renderer,
    F: FnMut() -> Result<R>,
{
    factory: F,
    renderer: Option<R>,
}

impl<R, F> RenderView<R, F>
where
    R: Renderer,
    F: FnMut() -> Result<R>,
{
    /// Create a view. The factory is not called until the first update.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            renderer: None,
        }
    }

    /// Whether a renderer is currently held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.renderer.is_some()
    }

    fn acquire(&mut self) -> Result<&mut R> {
        if self.renderer.is_none() {
            self.renderer = Some((self.factory)()?);
        }
        self.renderer
            .as_mut()
            .ok_or_else(|| Error::Render("renderer unavailable".to_string()))
    }

    /// Render `text`, acquiring the renderer if needed. Empty text is ignored.
    ///
    /// A failed render leaves the view usable for the next update.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer cannot be created or rejects `text`.
    pub fn update(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.acquire()?.render(text)
    }

    /// Static image of the current render.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been rendered.
    pub fn snapshot(&self) -> Result<Snapshot> {
        match &self.renderer {
            Some(renderer) => renderer.snapshot(),
            None => Err(Error::Render("nothing rendered yet".to_string())),
        }
    }

    /// Destroy the held renderer, if any. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.destroy();
        }
    }
}

impl<R, F> Drop for RenderView<R, F>
where
    R: Renderer,
    F: FnMut() -> Result<R>,
{
    fn drop(&mut self) {
        self.release();
    }
}

/// Collapses bursts of content updates into at most one render per frame.
///
/// Only the latest scheduled text is kept; intermediate states are skipped.
#[derive(Debug)]
pub struct FrameCoalescer {
    pending: Option<String>,
    frame: Duration,
    last_flush: Option<Instant>,
}

impl Default for FrameCoalescer {
    fn default() -> Self {
        // ~60 fps
        Self::new(Duration::from_millis(16))
    }
}

impl FrameCoalescer {
    /// Create a coalescer with the given frame interval.
    #[must_use]
    pub fn new(frame: Duration) -> Self {
        Self {
            pending: None,
            frame,
            last_flush: None,
        }
    }

    /// Replace the pending text.
    pub fn schedule(&mut self, text: impl Into<String>) {
        self.pending = Some(text.into());
    }

    /// Whether an update is waiting to be rendered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Render the pending text if a frame interval has passed since the last
    /// render. Returns whether a render was attempted.
    pub fn tick<R, F>(&mut self, view: &mut RenderView<R, F>) -> bool
    where
        R: Renderer,
        F: FnMut() -> Result<R>,
    {
        let due = self
            .last_flush
            .is_none_or(|last| last.elapsed() >= self.frame);
        due && self.flush(view)
    }

    /// Render the pending text now. Returns whether a render was attempted.
    ///
    /// Render failures are logged; intermediate streamed states are often
    /// incomplete and the next frame supersedes them.
    pub fn flush<R, F>(&mut self, view: &mut RenderView<R, F>) -> bool
    where
        R: Renderer,
        F: FnMut() -> Result<R>,
    {
        let Some(text) = self.pending.take() else {
            return false;
        };
        if text.is_empty() {
            return false;
        }

        self.last_flush = Some(Instant::now());
        if let Err(e) = view.update(&text) {
            log::debug!("render failed: {e}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Calls {
        created: usize,
        rendered: Vec<String>,
        destroyed: usize,
    }

    struct FakeRenderer {
        calls: Rc<RefCell<Calls>>,
    }

    impl Renderer for FakeRenderer {
        fn render(&mut self, text: &str) -> Result<()> {
            if text == "bad" {
                return Err(Error::Render("bad input".to_string()));
            }
            self.calls.borrow_mut().rendered.push(text.to_string());
            Ok(())
        }

        fn snapshot(&self) -> Result<Snapshot> {
            let last = self.calls.borrow().rendered.last().cloned().unwrap_or_default();
            Ok(Snapshot {
                mime: "text/plain",
                bytes: last.into_bytes(),
            })
        }

        fn destroy(&mut self) {
            self.calls.borrow_mut().destroyed += 1;
        }
    }

    fn factory(calls: &Rc<RefCell<Calls>>) -> impl FnMut() -> Result<FakeRenderer> + use<> {
        let calls = Rc::clone(calls);
        move || {
            calls.borrow_mut().created += 1;
            Ok(FakeRenderer {
                calls: Rc::clone(&calls),
            })
        }
    }

    #[test]
    fn acquires_lazily_and_once() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        assert!(!view.is_active());
        assert_eq!(calls.borrow().created, 0);

        view.update("one").unwrap();
        view.update("two").unwrap();

        assert!(view.is_active());
        assert_eq!(calls.borrow().created, 1);
        assert_eq!(calls.borrow().rendered, vec!["one", "two"]);
    }

    #[test]
    fn empty_text_does_not_acquire() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        view.update("").unwrap();
        assert!(!view.is_active());
        assert!(view.snapshot().is_err());
    }

    #[test]
    fn drop_destroys_exactly_once() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        {
            let mut view = RenderView::new(factory(&calls));
            view.update("content").unwrap();
            view.release();
            view.release();
        }
        assert_eq!(calls.borrow().destroyed, 1);

        {
            let mut view = RenderView::new(factory(&calls));
            view.update("content").unwrap();
        }
        assert_eq!(calls.borrow().destroyed, 2);
    }

    #[test]
    fn never_acquired_is_never_destroyed() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        drop(RenderView::new(factory(&calls)));
        assert_eq!(calls.borrow().destroyed, 0);
    }

    #[test]
    fn release_then_update_reacquires() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        view.update("a").unwrap();
        view.release();
        view.update("b").unwrap();
        drop(view);

        let calls = calls.borrow();
        assert_eq!(calls.created, 2);
        assert_eq!(calls.destroyed, 2);
    }

    #[test]
    fn failed_render_keeps_view_usable() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        assert!(view.update("bad").is_err());
        view.update("good").unwrap();
        assert_eq!(view.snapshot().unwrap().bytes, b"good");
    }

    #[test]
    fn factory_failure_holds_nothing() {
        let mut view = RenderView::new(|| -> Result<FakeRenderer> {
            Err(Error::Render("no mount point".to_string()))
        });
        assert!(view.update("x").is_err());
        assert!(!view.is_active());
    }

    #[test]
    fn coalescer_keeps_only_latest() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        let mut frames = FrameCoalescer::new(Duration::from_secs(3600));

        frames.schedule("a");
        assert!(frames.tick(&mut view));

        // Within the same frame: nothing renders, latest wins
        frames.schedule("ab");
        frames.schedule("abc");
        assert!(!frames.tick(&mut view));
        assert!(frames.is_pending());

        assert!(frames.flush(&mut view));
        assert!(!frames.is_pending());
        assert_eq!(calls.borrow().rendered, vec!["a", "abc"]);
    }

    #[test]
    fn coalescer_skips_empty_text() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        let mut frames = FrameCoalescer::default();

        frames.schedule("");
        assert!(!frames.flush(&mut view));
        assert!(!view.is_active());
    }

    #[test]
    fn coalescer_swallows_render_errors() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut view = RenderView::new(factory(&calls));
        let mut frames = FrameCoalescer::new(Duration::ZERO);

        frames.schedule("bad");
        assert!(frames.tick(&mut view));
        frames.schedule("fine");
        assert!(frames.tick(&mut view));
        assert_eq!(calls.borrow().rendered, vec!["fine"]);
    }
}
