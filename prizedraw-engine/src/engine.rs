use crate::{DrawError, Result};
use prizedraw_core::{DrawRecord, Participant};
use rand::Rng;

/// Records produced by one draw batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub records: Vec<DrawRecord>,
    /// Winners requested but not drawn because the pool ran dry.
    ///
    /// `execute_draw` checks the pool size up front, so outcomes it returns
    /// always have a shortfall of 0.
    pub shortfall: usize,
}

impl DrawOutcome {
    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }
}

/// Checks run before any draw starts
pub fn check_preconditions(
    eligible_pool: &[Participant],
    prizes: &[String],
    winner_count: usize,
) -> Result<()> {
    if winner_count == 0 {
        return Err(DrawError::NonPositiveWinnerCount(winner_count));
    }

    if eligible_pool.len() < winner_count {
        return Err(DrawError::InsufficientParticipants {
            available: eligible_pool.len(),
            requested: winner_count,
        });
    }

    if prizes.is_empty() {
        return Err(DrawError::NoPrizes);
    }

    Ok(())
}

/// Draw `winner_count` distinct winners from `eligible_pool`.
///
/// Winners are picked uniformly without replacement; prizes are handed out
/// round-robin in list order. Neither input is modified, removing the winners
/// from the pool is up to the caller.
pub fn execute_draw<R: Rng + ?Sized>(
    eligible_pool: &[Participant],
    prizes: &[String],
    winner_count: usize,
    rng: &mut R,
) -> Result<DrawOutcome> {
    check_preconditions(eligible_pool, prizes, winner_count)?;

    let mut remaining: Vec<&Participant> = eligible_pool.iter().collect();
    let mut records = Vec::with_capacity(winner_count);

    for position in 0..winner_count {
        if remaining.is_empty() {
            break;
        }

        let index = rng.gen_range(0..remaining.len());
        let winner = remaining.swap_remove(index).clone();
        let prize = &prizes[position % prizes.len()];

        records.push(DrawRecord::new(winner, prize.clone()));
    }

    let shortfall = winner_count - records.len();
    if shortfall > 0 {
        tracing::warn!(
            "Pool exhausted: drew {} of {} winners",
            records.len(),
            winner_count
        );
    }

    Ok(DrawOutcome { records, shortfall })
}
