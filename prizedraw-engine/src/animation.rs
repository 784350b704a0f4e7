use prizedraw_core::{AnimationConfig, Participant};
use rand::seq::SliceRandom;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{interval_at, Instant};

const PLACEHOLDER: &str = "...";

/// What the shuffle display shows on one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleFrame {
    pub name: String,
    pub code: String,
    pub prize: String,
}

/// Read-only copy of the names and prizes the shuffle cycles through
#[derive(Debug, Clone, Default)]
pub struct ShuffleDeck {
    entries: Vec<(String, String)>,
    prizes: Vec<String>,
}

impl ShuffleDeck {
    pub fn new(pool: &[Participant], prizes: &[String]) -> Self {
        Self {
            entries: pool
                .iter()
                .map(|p| (p.name.clone(), p.code.clone()))
                .collect(),
            prizes: prizes.to_vec(),
        }
    }

    fn random_frame(&self) -> ShuffleFrame {
        let mut rng = rand::thread_rng();
        let (name, code) = self
            .entries
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()));
        let prize = self
            .prizes
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        ShuffleFrame { name, code, prize }
    }
}

/// Cancellation handle for a running shuffle
#[derive(Debug)]
pub struct ShuffleHandle {
    abort: AbortHandle,
}

impl ShuffleHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Start the shuffle display.
///
/// Emits `config.frames` random frames, one per `frame_interval`, then waits
/// `settle_delay` and finishes. The task never touches session state; the
/// returned join handle resolves once the display is done or was cancelled.
pub fn spawn_shuffle(
    deck: ShuffleDeck,
    config: AnimationConfig,
    frames: Option<UnboundedSender<ShuffleFrame>>,
) -> (ShuffleHandle, JoinHandle<()>) {
    // tokio intervals panic on a zero period
    let period = config.frame_interval.max(Duration::from_millis(1));

    let join = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);

        for tick in 0..config.frames {
            ticker.tick().await;
            let frame = deck.random_frame();
            tracing::trace!("Shuffle frame {}: {} ({})", tick, frame.name, frame.code);

            if let Some(tx) = &frames {
                // nobody watching any more is fine
                let _ = tx.send(frame);
            }
        }

        if !config.settle_delay.is_zero() {
            tokio::time::sleep(config.settle_delay).await;
        }
    });

    let handle = ShuffleHandle {
        abort: join.abort_handle(),
    };
    (handle, join)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn quick_config(frames: u32) -> AnimationConfig {
        AnimationConfig {
            frames,
            frame_interval: Duration::from_millis(1),
            settle_delay: Duration::from_millis(1),
        }
    }

    fn deck() -> ShuffleDeck {
        let pool = vec![
            Participant::new("Alice", "a", "A1"),
            Participant::new("Bob", "b", "B2"),
        ];
        ShuffleDeck::new(&pool, &["Bike".to_string()])
    }

    #[tokio::test]
    async fn test_emits_configured_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (handle, join) = spawn_shuffle(deck(), quick_config(5), Some(tx));

        join.await.unwrap();
        assert!(handle.is_finished());

        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }

        assert_eq!(frames.len(), 5);
        for frame in frames {
            assert!(frame.name == "Alice" || frame.name == "Bob");
            assert_eq!(frame.prize, "Bike");
        }
    }

    #[tokio::test]
    async fn test_cancel_stops_shuffle() {
        let config = AnimationConfig {
            frames: 10_000,
            frame_interval: Duration::from_millis(10),
            settle_delay: Duration::ZERO,
        };
        let (handle, join) = spawn_shuffle(deck(), config, None);

        handle.cancel();
        let err = join.await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_empty_deck_uses_placeholders() {
        let frame = ShuffleDeck::default().random_frame();
        assert_eq!(frame.name, PLACEHOLDER);
        assert_eq!(frame.code, PLACEHOLDER);
        assert_eq!(frame.prize, PLACEHOLDER);
    }
}
