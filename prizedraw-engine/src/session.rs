use crate::animation::{ShuffleDeck, ShuffleHandle};
use crate::engine::{check_preconditions, execute_draw, DrawOutcome};
use crate::{DrawError, Result};
use prizedraw_core::{DrawRecord, Participant, ThanksSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_WINNER_COUNT: usize = 1;

/// Lifecycle of a single draw round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawPhase {
    Idle,
    Drawing,
    Settled,
}

/// Issued when a draw starts, redeemed when it completes
#[derive(Debug, Clone)]
pub struct DrawTicket {
    epoch: u64,
    winner_count: usize,
    deck: ShuffleDeck,
}

impl DrawTicket {
    pub fn deck(&self) -> &ShuffleDeck {
        &self.deck
    }
}

/// All state of one drawing session: the participants, who is still
/// eligible, the prize list and the winners so far.
#[derive(Debug)]
pub struct DrawSession {
    participants: Vec<Participant>,
    eligible: Vec<Participant>,
    prizes: Vec<String>,
    winner_count: usize,
    default_winner_count: usize,
    history: Vec<DrawRecord>,
    current_results: Vec<DrawRecord>,
    phase: DrawPhase,
    pending_shuffle: Option<ShuffleHandle>,
    epoch: u64,
}

impl Default for DrawSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSession {
    pub fn new() -> Self {
        Self::with_default_winner_count(DEFAULT_WINNER_COUNT)
    }

    pub fn with_default_winner_count(default_winner_count: usize) -> Self {
        Self {
            participants: Vec::new(),
            eligible: Vec::new(),
            prizes: Vec::new(),
            winner_count: default_winner_count,
            default_winner_count,
            history: Vec::new(),
            current_results: Vec::new(),
            phase: DrawPhase::Idle,
            pending_shuffle: None,
            epoch: 0,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn eligible(&self) -> &[Participant] {
        &self.eligible
    }

    pub fn prizes(&self) -> &[String] {
        &self.prizes
    }

    pub fn winner_count(&self) -> usize {
        self.winner_count
    }

    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    /// Winners of the latest round, until the round is finished
    pub fn current_results(&self) -> &[DrawRecord] {
        &self.current_results
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == DrawPhase::Drawing
    }

    /// Bumped on every reset
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn ensure_not_drawing(&self) -> Result<()> {
        if self.is_drawing() {
            return Err(DrawError::DrawInProgress);
        }
        Ok(())
    }

    /// Replace the participant list. Everyone in it becomes eligible again;
    /// the winners history is kept.
    pub fn load_participants(&mut self, participants: Vec<Participant>) -> Result<()> {
        self.ensure_not_drawing()?;

        self.eligible = participants.clone();
        self.participants = participants;

        tracing::info!("Loaded {} participants", self.participants.len());
        Ok(())
    }

    pub fn add_prize(&mut self, prize: &str) -> Result<()> {
        self.ensure_not_drawing()?;

        let prize = prize.trim();
        if prize.is_empty() {
            return Err(DrawError::EmptyPrize);
        }

        self.prizes.push(prize.to_string());
        tracing::debug!("Added prize '{}'", prize);
        Ok(())
    }

    pub fn remove_prize(&mut self, index: usize) -> Result<String> {
        self.ensure_not_drawing()?;

        if index >= self.prizes.len() {
            return Err(DrawError::PrizeNotFound(index));
        }

        let removed = self.prizes.remove(index);
        tracing::debug!("Removed prize '{}'", removed);
        Ok(removed)
    }

    /// Any value is accepted here; a zero count is rejected when the draw starts
    pub fn set_winner_count(&mut self, count: usize) -> Result<()> {
        self.ensure_not_drawing()?;
        self.winner_count = count;
        Ok(())
    }

    /// Validate the draw request and move to `Drawing`.
    ///
    /// On failure nothing changes and the session stays where it was.
    pub fn begin_draw(&mut self) -> Result<DrawTicket> {
        self.ensure_not_drawing()?;
        check_preconditions(&self.eligible, &self.prizes, self.winner_count)?;

        self.phase = DrawPhase::Drawing;
        self.current_results.clear();

        tracing::info!(
            "Drawing {} winner(s) from {} eligible participants",
            self.winner_count,
            self.eligible.len()
        );

        Ok(DrawTicket {
            epoch: self.epoch,
            winner_count: self.winner_count,
            deck: ShuffleDeck::new(&self.eligible, &self.prizes),
        })
    }

    /// Hand the running shuffle to the session so a reset can stop it
    pub fn attach_shuffle(&mut self, ticket: &DrawTicket, handle: ShuffleHandle) {
        if ticket.epoch != self.epoch || !self.is_drawing() {
            handle.cancel();
            return;
        }
        self.pending_shuffle = Some(handle);
    }

    /// Pick the winners for a started draw and apply them in one step
    pub fn complete_draw<R: Rng + ?Sized>(
        &mut self,
        ticket: &DrawTicket,
        rng: &mut R,
    ) -> Result<DrawOutcome> {
        if ticket.epoch != self.epoch || !self.is_drawing() {
            tracing::warn!("Ignoring results of a draw from a previous session");
            return Err(DrawError::Cancelled);
        }
        self.pending_shuffle = None;

        let outcome = match execute_draw(&self.eligible, &self.prizes, ticket.winner_count, rng) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.phase = DrawPhase::Idle;
                return Err(e);
            }
        };

        self.apply_draw_results(&outcome.records);
        self.current_results = outcome.records.clone();
        self.phase = DrawPhase::Settled;

        Ok(outcome)
    }

    /// Drop a started draw without results, back to `Idle`
    pub fn abandon_draw(&mut self, ticket: &DrawTicket) {
        if ticket.epoch == self.epoch && self.is_drawing() {
            if let Some(handle) = self.pending_shuffle.take() {
                handle.cancel();
            }
            self.phase = DrawPhase::Idle;
            tracing::warn!("Draw abandoned");
        }
    }

    /// Begin and complete a draw without any shuffle display
    pub fn draw_immediately<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DrawOutcome> {
        let ticket = self.begin_draw()?;
        self.complete_draw(&ticket, rng)
    }

    /// Remove the winners from the eligible pool and append them to history.
    ///
    /// Not idempotent: applying the same records twice records them twice.
    pub fn apply_draw_results(&mut self, records: &[DrawRecord]) {
        let winners: HashSet<_> = records.iter().map(|record| record.winner.id).collect();
        self.eligible.retain(|p| !winners.contains(&p.id));
        self.history.extend_from_slice(records);

        tracing::info!(
            "Applied {} result(s), {} eligible left, {} in history",
            records.len(),
            self.eligible.len(),
            self.history.len()
        );
    }

    /// `Settled -> Idle`, ready for the next round
    pub fn finish_round(&mut self) -> Result<()> {
        match self.phase {
            DrawPhase::Drawing => Err(DrawError::DrawInProgress),
            DrawPhase::Settled => {
                self.phase = DrawPhase::Idle;
                self.current_results.clear();
                Ok(())
            }
            DrawPhase::Idle => Ok(()),
        }
    }

    /// Clear everything and stop any running shuffle
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending_shuffle.take() {
            handle.cancel();
        }

        self.participants.clear();
        self.eligible.clear();
        self.prizes.clear();
        self.history.clear();
        self.current_results.clear();
        self.winner_count = self.default_winner_count;
        self.phase = DrawPhase::Idle;
        self.epoch = self.epoch.wrapping_add(1);

        tracing::info!("Session reset");
    }

    pub fn thanks_summary(&self) -> Result<ThanksSummary> {
        if self.history.is_empty() {
            return Err(DrawError::NoWinners);
        }
        Ok(ThanksSummary::from_history(&self.history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn participants(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|name| Participant::new(*name, "", ""))
            .collect()
    }

    fn session(names: &[&str], prizes: &[&str], count: usize) -> DrawSession {
        let mut session = DrawSession::new();
        session.load_participants(participants(names)).unwrap();
        for prize in prizes {
            session.add_prize(prize).unwrap();
        }
        session.set_winner_count(count).unwrap();
        session
    }

    fn ids(list: &[Participant]) -> HashSet<uuid::Uuid> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_draw_two_of_three() {
        let mut session = session(&["A", "B", "C"], &["Bike"], 2);
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = session.draw_immediately(&mut rng).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.iter().all(|r| r.prize == "Bike"));
        assert_eq!(session.eligible().len(), 1);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.phase(), DrawPhase::Settled);
        assert_eq!(session.current_results(), outcome.records.as_slice());
    }

    #[test]
    fn test_pool_shrinks_by_exactly_the_winners() {
        let mut session = session(&["A", "B", "C", "D", "E", "F"], &["X"], 3);
        let before = ids(session.eligible());
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = session.draw_immediately(&mut rng).unwrap();
        let winners: HashSet<_> = outcome.records.iter().map(|r| r.winner.id).collect();

        assert!(winners.is_subset(&before));
        let expected: HashSet<_> = before.difference(&winners).cloned().collect();
        assert_eq!(ids(session.eligible()), expected);
        assert_eq!(session.participants().len(), 6);
    }

    #[test]
    fn test_history_accumulates_across_rounds() {
        let mut session = session(&["A", "B", "C", "D", "E", "F", "G"], &["P1", "P2"], 3);
        let mut rng = StdRng::seed_from_u64(21);

        let first = session.draw_immediately(&mut rng).unwrap();
        session.finish_round().unwrap();
        session.set_winner_count(2).unwrap();
        let second = session.draw_immediately(&mut rng).unwrap();

        assert_eq!(session.history().len(), 5);
        let expected: Vec<_> = first.records.iter().chain(&second.records).cloned().collect();
        assert_eq!(session.history(), expected.as_slice());

        let winners: HashSet<_> = session.history().iter().map(|r| r.winner.id).collect();
        assert_eq!(winners.len(), 5);
        assert_eq!(session.eligible().len(), 2);
    }

    #[test]
    fn test_draw_from_settled_starts_next_round() {
        let mut session = session(&["A", "B", "C"], &["X"], 1);
        let mut rng = StdRng::seed_from_u64(2);

        session.draw_immediately(&mut rng).unwrap();
        session.draw_immediately(&mut rng).unwrap();

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.current_results().len(), 1);
    }

    #[test]
    fn test_failed_precondition_leaves_state() {
        let mut session = session(&["A", "B"], &[], 1);

        let err = session.begin_draw().unwrap_err();
        assert!(matches!(err, DrawError::NoPrizes));
        assert_eq!(session.phase(), DrawPhase::Idle);
        assert_eq!(session.eligible().len(), 2);
        assert!(session.history().is_empty());

        session.add_prize("Bike").unwrap();
        session.set_winner_count(3).unwrap();
        assert!(matches!(
            session.begin_draw(),
            Err(DrawError::InsufficientParticipants {
                available: 2,
                requested: 3
            })
        ));

        session.set_winner_count(0).unwrap();
        assert!(matches!(
            session.begin_draw(),
            Err(DrawError::NonPositiveWinnerCount(0))
        ));
        assert_eq!(session.phase(), DrawPhase::Idle);
    }

    #[test]
    fn test_edits_locked_while_drawing() {
        let mut session = session(&["A", "B"], &["X"], 1);
        let ticket = session.begin_draw().unwrap();

        assert!(matches!(session.begin_draw(), Err(DrawError::DrawInProgress)));
        assert!(matches!(session.add_prize("Y"), Err(DrawError::DrawInProgress)));
        assert!(matches!(session.remove_prize(0), Err(DrawError::DrawInProgress)));
        assert!(matches!(session.set_winner_count(2), Err(DrawError::DrawInProgress)));
        assert!(matches!(
            session.load_participants(participants(&["C"])),
            Err(DrawError::DrawInProgress)
        ));
        assert!(matches!(session.finish_round(), Err(DrawError::DrawInProgress)));

        let mut rng = StdRng::seed_from_u64(0);
        session.complete_draw(&ticket, &mut rng).unwrap();
        assert_eq!(session.phase(), DrawPhase::Settled);

        session.finish_round().unwrap();
        assert_eq!(session.phase(), DrawPhase::Idle);
        assert!(session.current_results().is_empty());
    }

    #[test]
    fn test_stale_ticket_rejected_after_reset() {
        let mut session = session(&["A", "B"], &["X"], 1);
        let ticket = session.begin_draw().unwrap();

        session.reset();
        session.load_participants(participants(&["C", "D"])).unwrap();
        session.add_prize("Y").unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            session.complete_draw(&ticket, &mut rng),
            Err(DrawError::Cancelled)
        ));
        assert!(session.history().is_empty());
        assert_eq!(session.eligible().len(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = session(&["A", "B", "C"], &["X", "Y"], 2);
        let mut rng = StdRng::seed_from_u64(8);
        session.draw_immediately(&mut rng).unwrap();
        let epoch = session.epoch();

        session.reset();

        assert!(session.participants().is_empty());
        assert!(session.eligible().is_empty());
        assert!(session.prizes().is_empty());
        assert!(session.history().is_empty());
        assert!(session.current_results().is_empty());
        assert_eq!(session.winner_count(), DEFAULT_WINNER_COUNT);
        assert_eq!(session.phase(), DrawPhase::Idle);
        assert_eq!(session.epoch(), epoch + 1);
    }

    #[test]
    fn test_reload_restores_eligibility_keeps_history() {
        let mut session = session(&["A", "B", "C"], &["X"], 2);
        let mut rng = StdRng::seed_from_u64(4);
        session.draw_immediately(&mut rng).unwrap();

        session.load_participants(participants(&["D", "E", "F", "G"])).unwrap();

        assert_eq!(session.eligible().len(), 4);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_apply_is_not_idempotent() {
        let mut session = session(&["A", "B", "C"], &["X"], 1);
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = session.draw_immediately(&mut rng).unwrap();

        session.apply_draw_results(&outcome.records);

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.eligible().len(), 2);
    }

    #[test]
    fn test_prize_editing() {
        let mut session = DrawSession::new();
        session.add_prize("  Bike ").unwrap();
        session.add_prize("TV").unwrap();
        session.add_prize("Phone").unwrap();

        assert!(matches!(session.add_prize("   "), Err(DrawError::EmptyPrize)));
        assert_eq!(session.remove_prize(1).unwrap(), "TV");
        assert!(matches!(session.remove_prize(5), Err(DrawError::PrizeNotFound(5))));
        assert_eq!(session.prizes().to_vec(), vec!["Bike", "Phone"]);
    }

    #[test]
    fn test_thanks_summary_requires_winners() {
        let mut session = session(&["A", "B", "C"], &["Bike", "TV"], 2);
        assert!(matches!(session.thanks_summary(), Err(DrawError::NoWinners)));

        let mut rng = StdRng::seed_from_u64(1);
        session.draw_immediately(&mut rng).unwrap();

        let summary = session.thanks_summary().unwrap();
        assert_eq!(summary.winner_count, 2);
        assert_eq!(summary.prize_sample, vec!["Bike", "TV"]);
    }
}
