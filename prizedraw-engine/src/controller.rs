use crate::animation::{spawn_shuffle, ShuffleFrame};
use crate::engine::DrawOutcome;
use crate::session::{DrawSession, DrawTicket};
use crate::{DrawError, Result};
use parking_lot::Mutex;
use prizedraw_core::{AnimationConfig, MessageGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Abandons a started draw when dropped before its results are applied,
/// so a dropped `draw` future never leaves the session in `Drawing`
struct PendingDraw {
    session: Arc<Mutex<DrawSession>>,
    ticket: DrawTicket,
    armed: bool,
}

impl PendingDraw {
    fn complete(mut self) -> Result<DrawOutcome> {
        self.armed = false;
        let mut rng = StdRng::from_entropy();
        self.session.lock().complete_draw(&self.ticket, &mut rng)
    }
}

impl Drop for PendingDraw {
    fn drop(&mut self) {
        if self.armed {
            self.session.lock().abandon_draw(&self.ticket);
        }
    }
}

/// Drives draws with a shuffle display in front of them.
///
/// The session sits behind a mutex that is only ever held between awaits, so
/// a reset can come in at any point of a running draw.
#[derive(Clone)]
pub struct DrawController {
    session: Arc<Mutex<DrawSession>>,
    animation: AnimationConfig,
}

impl DrawController {
    pub fn new(session: DrawSession, animation: AnimationConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            animation,
        }
    }

    pub fn session(&self) -> Arc<Mutex<DrawSession>> {
        self.session.clone()
    }

    /// Run `f` with exclusive access to the session
    pub fn with_session<T>(&self, f: impl FnOnce(&mut DrawSession) -> T) -> T {
        f(&mut self.session.lock())
    }

    /// Start a draw, play the shuffle, then pick and apply the winners.
    ///
    /// Shuffle frames go to `frames` when given. Returns `Cancelled` if the
    /// session was reset while the shuffle was running. Dropping the future
    /// before it resolves abandons the draw and returns the session to `Idle`.
    pub async fn draw(&self, frames: Option<UnboundedSender<ShuffleFrame>>) -> Result<DrawOutcome> {
        let ticket = self.session.lock().begin_draw()?;

        let (handle, join) = spawn_shuffle(ticket.deck().clone(), self.animation.clone(), frames);
        self.session.lock().attach_shuffle(&ticket, handle);

        let pending = PendingDraw {
            session: self.session.clone(),
            ticket,
            armed: true,
        };

        match join.await {
            Ok(()) => pending.complete(),
            Err(e) if e.is_cancelled() => {
                tracing::info!("Draw cancelled before results were picked");
                Err(DrawError::Cancelled)
            }
            Err(e) => Err(DrawError::Internal(format!("Shuffle task failed: {}", e))),
        }
    }

    pub fn reset(&self) {
        self.session.lock().reset();
    }

    /// Ask `generator` for a thank-you message about the winners so far.
    ///
    /// `Ok(None)` means the session was reset while waiting and the message
    /// no longer applies.
    pub async fn generate_thanks(
        &self,
        generator: &dyn MessageGenerator,
    ) -> Result<Option<String>> {
        let (epoch, summary) = {
            let session = self.session.lock();
            (session.epoch(), session.thanks_summary()?)
        };

        let message = summary.generate(generator).await?;

        if self.session.lock().epoch() != epoch {
            tracing::warn!("Session was reset, discarding thank-you message");
            return Ok(None);
        }

        Ok(Some(message))
    }
}
