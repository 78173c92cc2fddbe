//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! Long-running work (such as a visualized search) is not run inside
//! `update`. Instead the model returns a [`tick`] command; the loop feeds the
//! resulting [`Msg::Tick`] back on the next frame, drawing and polling input
//! in between, so the model can advance one step per frame and still react
//! to a quit request.

use std::collections::VecDeque;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::canvas::{Canvas, Frame, Glyph};
use crate::messages::Msg;

/// Poll interval used while the model has no pending follow-up messages.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command; its message, if any, is delivered on the next
    /// frame.
    Cmd(Box<dyn FnOnce() -> Option<Msg>>),
    /// Stop the application loop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + 'static,
{
    Effect::Cmd(Box::new(f))
}

/// A command that delivers [`Msg::Tick`] on the next frame.
pub fn tick() -> Effect {
    cmd(|| Some(Msg::Tick))
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state. The canvas is blank on entry.
    fn draw(&self, canvas: &mut Canvas);
}

/// Back-end driver (terminal, test harness).
pub trait Driver {
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// Collect pending input into `tx`, waiting at most `wait` for the first
    /// event. Must return promptly once `ctx.is_done()`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        wait: Duration,
    ) -> Result<(), Box<dyn Error>>;

    /// Write a frame diff to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>>;

    /// Restore the screen. Called exactly once, also after errors.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
    pub poll_interval: Duration,
}

impl<M: Model, D: Driver> AppConfig<M, D> {
    /// Configuration with the default poll interval.
    pub fn new(model: M, driver: D, width: i32, height: i32) -> Self {
        Self {
            model,
            driver,
            width,
            height,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    poll_interval: Duration,
    followups: VecDeque<Msg>,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
            poll_interval: config.poll_interval,
            followups: VecDeque::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the Model-View-Update loop until the model returns
    /// [`Effect::End`] or a [`Msg::Quit`] arrives.
    ///
    /// Each iteration polls the driver, feeds queued follow-ups and new
    /// input through the model, then draws, diffs and flushes once.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let result = self.event_loop(&ctx, &tx, &rx);
        self.driver.close();
        result
    }

    fn event_loop(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        rx: &Receiver<Msg>,
    ) -> Result<(), Box<dyn Error>> {
        let mut prev = Canvas::new(self.width, self.height);
        let mut curr = Canvas::new(self.width, self.height);

        self.process_pending(rx, ctx, &mut prev, &mut curr)?;

        while !ctx.is_done() {
            let wait = if self.followups.is_empty() {
                self.poll_interval
            } else {
                Duration::ZERO
            };
            self.driver.poll_msgs(ctx, tx, wait)?;

            if ctx.is_done() {
                break;
            }

            self.process_pending(rx, ctx, &mut prev, &mut curr)?;
        }

        Ok(())
    }

    /// Handle one batch of messages, then draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev: &mut Canvas,
        curr: &mut Canvas,
    ) -> Result<(), Box<dyn Error>> {
        // Follow-ups queued during this batch wait for the next one.
        let batch: Vec<Msg> = self.followups.drain(..).chain(rx.try_iter()).collect();
        if batch.is_empty() {
            return Ok(());
        }

        for msg in batch {
            let quit = msg == Msg::Quit;
            if matches!(msg, Msg::Screen { .. }) {
                // The terminal lost its contents; repaint everything.
                *prev = Canvas::new(0, 0);
            }
            if let Some(effect) = self.model.update(msg) {
                if self.handle_effect(effect, ctx) {
                    return Ok(());
                }
            }
            if quit {
                ctx.cancel();
                return Ok(());
            }
        }

        curr.fill(Glyph::default());
        self.model.draw(curr);
        let frame = curr.diff(prev);
        if !frame.is_empty() {
            self.driver.flush(frame)?;
        }
        prev.clone_from(curr);

        Ok(())
    }

    /// Returns `true` if the app should stop.
    fn handle_effect(&mut self, effect: Effect, ctx: &Context) -> bool {
        match effect {
            Effect::End => {
                ctx.cancel();
                true
            }
            Effect::Cmd(f) => {
                if let Some(msg) = f() {
                    self.followups.push_back(msg);
                }
                false
            }
        }
    }
}
