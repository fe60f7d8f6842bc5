//! Phase state machine.
//!
//! Drives a match through
//! `PRE_GAME → {SETUP_N_DEFINE → LINKING}×rounds → ACTION → (next cycle) → GAME_OVER`
//! and owns turn and initiative assignment.
//!
//! ## Cycles
//!
//! A cycle is `rounds_per_cycle` definition/linking rounds followed by one
//! ACTION phase. The ACTION phase ends when neither player can act or both
//! players pass in a row. The next cycle then starts with every surviving
//! pawn reset and all cards discarded.
//!
//! ## Initiative
//!
//! The first cycle uses `MatchConfig::opening_initiative`. Later cycles give
//! initiative to the player with fewer surviving pawns; equal counts go to a
//! rock-paper-scissors tie-break before the first definition round.
//!
//! ## Duplicate events
//!
//! `apply_cycle_advance` is idempotent: an advance for the current or an
//! earlier cycle, or any advance after GAME_OVER, leaves state untouched.
//! An advance into a new cycle must name RPS_TIE_BREAK or SETUP_1_DEFINE.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{Card, CardId, CardStats, Initiative, MatchState, PawnId, PlayerId};
use crate::error::ActionError;
use crate::rules::{ActionResolver, MatchResult};

use super::rps::{resolve_rps, RpsChoice};

/// Match phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    PreGame,
    /// Card-definition sub-phase of round `round`.
    Define { round: u8 },
    /// Linking sub-phase following definition round `round`.
    Linking { round: u8 },
    /// Initiative tie-break at cycle start.
    RpsTieBreak,
    Action,
    /// ACTION with a pawn selected, waiting for its target.
    AwaitingActionTarget,
    GameOver,
}

impl Phase {
    /// Stable name without round numbers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::PreGame => "PRE_GAME",
            Phase::Define { .. } => "SETUP_DEFINE",
            Phase::Linking { .. } => "LINKING",
            Phase::RpsTieBreak => "RPS_TIE_BREAK",
            Phase::Action => "ACTION",
            Phase::AwaitingActionTarget => "AWAITING_ACTION_TARGET",
            Phase::GameOver => "GAME_OVER",
        }
    }

    #[must_use]
    pub fn is_action(&self) -> bool {
        matches!(self, Phase::Action | Phase::AwaitingActionTarget)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Define { round } => write!(f, "SETUP_{round}_DEFINE"),
            other => f.write_str(other.name()),
        }
    }
}

/// Who holds the turn after an action or pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnChange {
    /// The opponent takes the turn.
    Switched(PlayerId),
    /// The opponent cannot act, so the same player goes again.
    Kept { skipped: PlayerId },
    /// Nobody can act or both passed; a new cycle has begun.
    CycleExhausted,
}

/// Result of one tie-break submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpsOutcome {
    /// Waiting for the other player's choice.
    Waiting,
    /// Same choice; both must choose again.
    Tie,
    /// Initiative decided.
    Decided(PlayerId),
}

/// Authoritative phase/cycle snapshot sent by the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleAdvance {
    pub cycle_number: u32,
    pub round_number: u8,
    pub current_phase: Phase,
    pub current_player: PlayerId,
}

/// What `apply_cycle_advance` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    IgnoredMatchOver,
    IgnoredStale,
    IgnoredDuplicate,
    IgnoredInvalid,
}

/// Phase transitions. Every method takes the state explicitly.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseMachine;

impl PhaseMachine {
    /// `PRE_GAME → SETUP_1_DEFINE` (or the opening tie-break).
    ///
    /// Returns false if the match was already started.
    pub fn start_match(state: &mut MatchState) -> bool {
        if state.phase != Phase::PreGame {
            debug!(phase = %state.phase, "start ignored, match already running");
            return false;
        }
        Self::begin_cycle(state, 1);
        true
    }

    /// Reset per-cycle state and pick initiative for `cycle`.
    fn begin_cycle(state: &mut MatchState, cycle: u32) {
        state.cycle = cycle;
        state.round = 1;
        state.turn = 0;
        state.consecutive_passes = 0;
        state.selected_pawn = None;

        for pawn in state.pawns_mut() {
            pawn.reset_for_cycle();
        }
        for (_, player) in state.players.iter_mut() {
            player.cards.clear();
            player.defined_this_round = false;
            player.links_made = 0;
            player.links_required = 0;
            player.rps_choice = None;
        }

        let initiative = if cycle == 1 {
            match state.config.opening_initiative {
                Initiative::Player(player) => Some(player),
                Initiative::RockPaperScissors => None,
            }
        } else {
            let first = state.surviving_count(PlayerId::FIRST);
            let second = state.surviving_count(PlayerId::SECOND);
            match first.cmp(&second) {
                std::cmp::Ordering::Less => Some(PlayerId::FIRST),
                std::cmp::Ordering::Greater => Some(PlayerId::SECOND),
                std::cmp::Ordering::Equal => None,
            }
        };

        match initiative {
            Some(player) => {
                state.initiative = player;
                state.current_player = player;
                state.phase = Phase::Define { round: 1 };
            }
            None => state.phase = Phase::RpsTieBreak,
        }
        info!(cycle, phase = %state.phase, initiative = %state.initiative, "cycle started");
    }

    /// Start the next cycle.
    pub fn advance_cycle(state: &mut MatchState) {
        let next = state.cycle + 1;
        Self::begin_cycle(state, next);
    }

    // === Setup ===

    /// Record a player's card set for the current definition round.
    ///
    /// Moves to LINKING only once both players have submitted.
    pub fn submit_cards(
        state: &mut MatchState,
        player: PlayerId,
        stats: &[CardStats],
    ) -> Result<Vec<Card>, ActionError> {
        let round = match state.phase {
            Phase::Define { round } => round,
            Phase::GameOver => return Err(ActionError::MatchOver),
            other => return Err(ActionError::WrongPhase(player, other.name())),
        };
        if state.players[player].defined_this_round {
            return Err(ActionError::AlreadySubmitted(player));
        }
        let expected = state.config.cards_per_round;
        if stats.len() != expected {
            return Err(ActionError::WrongCardCount {
                expected,
                got: stats.len(),
            });
        }
        for card in stats {
            card.validate(state.config.card_budget)?;
        }

        let cards: Vec<Card> = stats
            .iter()
            .enumerate()
            .map(|(slot, &s)| Card::new(CardId::compose(player, round, slot as u8), s))
            .collect();
        let seat = &mut state.players[player];
        seat.cards.extend(cards.iter().copied());
        seat.defined_this_round = true;
        debug!(%player, round, "cards defined");

        if state.players.all(|p| p.defined_this_round) {
            Self::enter_linking(state);
        }
        Ok(cards)
    }

    /// Links each player owes this LINKING phase.
    fn prepare_links(state: &mut MatchState) {
        let per_round = state.config.links_per_round;
        for player in PlayerId::all() {
            let linkable = state.pawns_of(player).filter(|p| p.is_linkable()).count();
            let seat = &mut state.players[player];
            let cards = seat.available_cards().count();
            seat.links_made = 0;
            seat.links_required = per_round.min(linkable).min(cards);
        }
    }

    fn enter_linking(state: &mut MatchState) {
        state.phase = Phase::Linking { round: state.round };
        Self::prepare_links(state);
        info!(cycle = state.cycle, round = state.round, "linking");

        if Self::links_complete(state) {
            Self::finish_linking(state);
        }
    }

    fn links_complete(state: &MatchState) -> bool {
        state.players.all(|p| !p.links_outstanding())
    }

    /// Bind one of the player's available cards to one of their pawns.
    pub fn link_pawn(
        state: &mut MatchState,
        player: PlayerId,
        pawn: PawnId,
        card: CardId,
    ) -> Result<(), ActionError> {
        match state.phase {
            Phase::Linking { .. } => {}
            Phase::GameOver => return Err(ActionError::MatchOver),
            other => return Err(ActionError::WrongPhase(player, other.name())),
        }
        if !state.players[player].links_outstanding() {
            return Err(ActionError::AlreadySubmitted(player));
        }
        let target = state.pawn(pawn).ok_or(ActionError::UnknownPawn(pawn))?;
        if target.owner != player {
            return Err(ActionError::NotOwner(pawn, player));
        }
        if !target.is_linkable() {
            return Err(ActionError::AlreadyLinked(pawn));
        }
        let chosen = state.players[player]
            .available_cards()
            .find(|c| c.id == card)
            .copied()
            .ok_or(ActionError::UnknownCard(card))?;

        if let Some(target) = state.pawn_mut(pawn) {
            target.link(&chosen);
        }
        let seat = &mut state.players[player];
        if let Some(spent) = seat.cards.iter_mut().find(|c| c.id == card) {
            spent.spent = true;
        }
        seat.links_made += 1;
        debug!(%player, %pawn, %card, "pawn linked");

        if Self::links_complete(state) {
            Self::finish_linking(state);
        }
        Ok(())
    }

    fn finish_linking(state: &mut MatchState) {
        if state.round < state.config.rounds_per_cycle {
            state.round += 1;
            state.phase = Phase::Define { round: state.round };
            for (_, seat) in state.players.iter_mut() {
                seat.defined_this_round = false;
            }
            info!(cycle = state.cycle, round = state.round, "next definition round");
        } else {
            Self::enter_action(state);
        }
    }

    fn enter_action(state: &mut MatchState) {
        state.phase = Phase::Action;
        state.turn = 1;
        state.consecutive_passes = 0;
        state.current_player = state.initiative;

        let first = state.initiative;
        if !ActionResolver::player_can_act(state, first) {
            if ActionResolver::player_can_act(state, first.opponent()) {
                state.current_player = first.opponent();
            } else {
                info!(cycle = state.cycle, "nobody can act, cycle exhausted");
                Self::advance_cycle(state);
                return;
            }
        }
        info!(cycle = state.cycle, player = %state.current_player, "action phase");
    }

    // === Tie-break ===

    pub fn choose_rps(
        state: &mut MatchState,
        player: PlayerId,
        choice: RpsChoice,
    ) -> Result<RpsOutcome, ActionError> {
        match state.phase {
            Phase::RpsTieBreak => {}
            Phase::GameOver => return Err(ActionError::MatchOver),
            other => return Err(ActionError::WrongPhase(player, other.name())),
        }
        if state.players[player].rps_choice.is_some() {
            return Err(ActionError::AlreadySubmitted(player));
        }
        state.players[player].rps_choice = Some(choice);

        let (Some(first), Some(second)) = (
            state.players[PlayerId::FIRST].rps_choice,
            state.players[PlayerId::SECOND].rps_choice,
        ) else {
            return Ok(RpsOutcome::Waiting);
        };

        for (_, seat) in state.players.iter_mut() {
            seat.rps_choice = None;
        }
        match resolve_rps(first, second) {
            Some(winner) => {
                state.initiative = winner;
                state.current_player = winner;
                state.phase = Phase::Define { round: 1 };
                info!(%winner, ?first, ?second, "tie-break decided");
                Ok(RpsOutcome::Decided(winner))
            }
            None => {
                debug!(?first, "tie-break tied, replaying");
                Ok(RpsOutcome::Tie)
            }
        }
    }

    // === Action phase ===

    /// Hand the turn on after an accepted action (`passed == false`) or a pass.
    pub fn end_turn(state: &mut MatchState, passed: bool) -> TurnChange {
        if passed {
            state.consecutive_passes += 1;
        } else {
            state.consecutive_passes = 0;
        }
        Self::clear_selection(state);

        let current = state.current_player;
        let other = current.opponent();

        if state.consecutive_passes >= 2 {
            info!(cycle = state.cycle, "both players passed, cycle exhausted");
            Self::advance_cycle(state);
            return TurnChange::CycleExhausted;
        }
        if ActionResolver::player_can_act(state, other) {
            state.current_player = other;
            state.turn += 1;
            return TurnChange::Switched(other);
        }
        if !passed && ActionResolver::player_can_act(state, current) {
            state.turn += 1;
            return TurnChange::Kept { skipped: other };
        }
        info!(cycle = state.cycle, "no pawn can act, cycle exhausted");
        Self::advance_cycle(state);
        TurnChange::CycleExhausted
    }

    /// Force a turn hand-off if the current player has nothing left to do.
    pub fn reconcile_turn(state: &mut MatchState) -> Option<TurnChange> {
        if !state.phase.is_action() {
            return None;
        }
        let current = state.current_player;
        if ActionResolver::player_can_act(state, current) {
            return None;
        }
        Some(Self::end_turn(state, true))
    }

    /// Enter AWAITING_ACTION_TARGET with `pawn` selected.
    pub fn select_pawn(
        state: &mut MatchState,
        player: PlayerId,
        pawn: PawnId,
    ) -> Result<(), ActionError> {
        ActionResolver::check_turn(state, player)?;
        ActionResolver::own_active_pawn(state, player, pawn)?;
        state.selected_pawn = Some(pawn);
        state.phase = Phase::AwaitingActionTarget;
        Ok(())
    }

    pub fn clear_selection(state: &mut MatchState) {
        state.selected_pawn = None;
        if state.phase == Phase::AwaitingActionTarget {
            state.phase = Phase::Action;
        }
    }

    // === Termination and sync ===

    /// Any state → GAME_OVER. Returns false if the match had already ended.
    pub fn finish_match(state: &mut MatchState, result: MatchResult) -> bool {
        if state.is_over() {
            return false;
        }
        state.phase = Phase::GameOver;
        state.result = Some(result);
        state.selected_pawn = None;
        info!(cycle = state.cycle, ?result, "match over");
        true
    }

    /// Apply an authoritative phase snapshot from the relay.
    pub fn apply_cycle_advance(state: &mut MatchState, event: &CycleAdvance) -> SyncOutcome {
        if state.is_over() {
            debug!(cycle = event.cycle_number, "cycle advance after game over ignored");
            return SyncOutcome::IgnoredMatchOver;
        }
        if event.cycle_number < state.cycle {
            debug!(
                incoming = event.cycle_number,
                local = state.cycle,
                "stale cycle advance ignored"
            );
            return SyncOutcome::IgnoredStale;
        }
        if event.cycle_number == state.cycle {
            if event.current_phase != state.phase {
                debug!(
                    incoming = %event.current_phase,
                    local = %state.phase,
                    "cycle advance for current cycle ignored"
                );
            }
            return SyncOutcome::IgnoredDuplicate;
        }
        // A new cycle always opens with the tie-break or the first
        // definition round; later phases need cards that were never relayed.
        let opens_cycle = event.round_number == 1
            && matches!(event.current_phase, Phase::Define { round: 1 } | Phase::RpsTieBreak);
        if !opens_cycle {
            debug!(phase = %event.current_phase, round = event.round_number, "malformed cycle advance ignored");
            return SyncOutcome::IgnoredInvalid;
        }

        Self::begin_cycle(state, event.cycle_number);
        state.initiative = event.current_player;
        state.current_player = event.current_player;
        state.phase = event.current_phase;
        info!(cycle = state.cycle, phase = %state.phase, "fast-forwarded to relay cycle");
        SyncOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchConfig;

    fn started(config: MatchConfig) -> MatchState {
        let mut state = MatchState::new(config);
        assert!(PhaseMachine::start_match(&mut state));
        state
    }

    fn balanced_set(state: &MatchState) -> Vec<CardStats> {
        vec![CardStats::balanced(state.config.card_budget); state.config.cards_per_round]
    }

    /// Both players define and link one pawn each; returns after LINKING.
    fn play_round(state: &mut MatchState) {
        let set = balanced_set(state);
        for player in PlayerId::all() {
            PhaseMachine::submit_cards(state, player, &set).unwrap();
        }
        for player in PlayerId::all() {
            let pawn = state.pawns_of(player).find(|p| p.is_linkable()).unwrap().id;
            let card = state.players[player].available_cards().next().unwrap().id;
            PhaseMachine::link_pawn(state, player, pawn, card).unwrap();
        }
    }

    #[test]
    fn test_start_match() {
        let state = started(MatchConfig::default());
        assert_eq!(state.phase, Phase::Define { round: 1 });
        assert_eq!(state.cycle, 1);
        assert_eq!(state.initiative, PlayerId::FIRST);
        assert_eq!(format!("{}", state.phase), "SETUP_1_DEFINE");
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut state = started(MatchConfig::default());
        assert!(!PhaseMachine::start_match(&mut state));
        assert_eq!(state.cycle, 1);
    }

    #[test]
    fn test_opening_rps() {
        let config = MatchConfig::default().with_opening_initiative(Initiative::RockPaperScissors);
        let mut state = started(config);
        assert_eq!(state.phase, Phase::RpsTieBreak);

        assert_eq!(
            PhaseMachine::choose_rps(&mut state, PlayerId::FIRST, RpsChoice::Rock),
            Ok(RpsOutcome::Waiting)
        );
        assert_eq!(
            PhaseMachine::choose_rps(&mut state, PlayerId::FIRST, RpsChoice::Paper),
            Err(ActionError::AlreadySubmitted(PlayerId::FIRST))
        );
        assert_eq!(
            PhaseMachine::choose_rps(&mut state, PlayerId::SECOND, RpsChoice::Rock),
            Ok(RpsOutcome::Tie)
        );
        assert_eq!(state.phase, Phase::RpsTieBreak);

        PhaseMachine::choose_rps(&mut state, PlayerId::FIRST, RpsChoice::Scissors).unwrap();
        assert_eq!(
            PhaseMachine::choose_rps(&mut state, PlayerId::SECOND, RpsChoice::Rock),
            Ok(RpsOutcome::Decided(PlayerId::SECOND))
        );
        assert_eq!(state.initiative, PlayerId::SECOND);
        assert_eq!(state.phase, Phase::Define { round: 1 });
    }

    #[test]
    fn test_linking_waits_for_both_sets() {
        let mut state = started(MatchConfig::default());
        let set = balanced_set(&state);

        PhaseMachine::submit_cards(&mut state, PlayerId::FIRST, &set).unwrap();
        assert_eq!(state.phase, Phase::Define { round: 1 });
        assert_eq!(
            PhaseMachine::submit_cards(&mut state, PlayerId::FIRST, &set),
            Err(ActionError::AlreadySubmitted(PlayerId::FIRST))
        );

        PhaseMachine::submit_cards(&mut state, PlayerId::SECOND, &set).unwrap();
        assert_eq!(state.phase, Phase::Linking { round: 1 });
        assert_eq!(state.players[PlayerId::FIRST].links_required, 1);
    }

    #[test]
    fn test_invalid_card_sets() {
        let mut state = started(MatchConfig::default());
        assert_eq!(
            PhaseMachine::submit_cards(&mut state, PlayerId::FIRST, &[CardStats::new(3, 2, 2)]),
            Err(ActionError::WrongCardCount {
                expected: 3,
                got: 1
            })
        );
        let bad = vec![CardStats::new(5, 5, 5); 3];
        assert!(matches!(
            PhaseMachine::submit_cards(&mut state, PlayerId::FIRST, &bad),
            Err(ActionError::InvalidCardStats { .. })
        ));
        assert!(!state.players[PlayerId::FIRST].defined_this_round);
    }

    #[test]
    fn test_link_validation() {
        let mut state = started(MatchConfig::default());
        let set = balanced_set(&state);
        PhaseMachine::submit_cards(&mut state, PlayerId::FIRST, &set).unwrap();
        PhaseMachine::submit_cards(&mut state, PlayerId::SECOND, &set).unwrap();

        let own_card = CardId::compose(PlayerId::FIRST, 1, 0);
        let enemy_card = CardId::compose(PlayerId::SECOND, 1, 0);
        assert_eq!(
            PhaseMachine::link_pawn(&mut state, PlayerId::FIRST, PawnId(3), own_card),
            Err(ActionError::NotOwner(PawnId(3), PlayerId::FIRST))
        );
        assert_eq!(
            PhaseMachine::link_pawn(&mut state, PlayerId::FIRST, PawnId(0), enemy_card),
            Err(ActionError::UnknownCard(enemy_card))
        );

        PhaseMachine::link_pawn(&mut state, PlayerId::FIRST, PawnId(0), own_card).unwrap();
        assert!(state.pawn(PawnId(0)).unwrap().active);
        assert!(state.players[PlayerId::FIRST].card(own_card).unwrap().spent);
        assert_eq!(
            PhaseMachine::link_pawn(&mut state, PlayerId::FIRST, PawnId(1), own_card),
            Err(ActionError::AlreadySubmitted(PlayerId::FIRST))
        );
    }

    #[test]
    fn test_three_rounds_reach_action() {
        let mut state = started(MatchConfig::default());

        play_round(&mut state);
        assert_eq!(state.phase, Phase::Define { round: 2 });
        play_round(&mut state);
        assert_eq!(state.phase, Phase::Define { round: 3 });
        play_round(&mut state);

        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.current_player, PlayerId::FIRST);
        assert!(state.pawns().iter().all(|p| p.active));
        // Unspent cards carry over between rounds within the cycle.
        assert_eq!(state.players[PlayerId::FIRST].available_cards().count(), 6);
    }

    #[test]
    fn test_end_turn_switches_and_passes_exhaust_cycle() {
        let mut state = started(MatchConfig::default());
        for _ in 0..3 {
            play_round(&mut state);
        }

        assert_eq!(PhaseMachine::end_turn(&mut state, true), TurnChange::Switched(PlayerId::SECOND));
        assert_eq!(PhaseMachine::end_turn(&mut state, true), TurnChange::CycleExhausted);

        assert_eq!(state.cycle, 2);
        // No eliminations: equal survivors go to the tie-break.
        assert_eq!(state.phase, Phase::RpsTieBreak);
        assert!(state.pawns().iter().all(|p| !p.active && p.linked_card.is_none()));
        assert!(state.players[PlayerId::FIRST].cards.is_empty());
    }

    #[test]
    fn test_fewer_survivors_get_initiative() {
        let mut state = started(MatchConfig::default());
        state.pawn_mut(PawnId(4)).unwrap().eliminated = true;

        PhaseMachine::advance_cycle(&mut state);
        assert_eq!(state.phase, Phase::Define { round: 1 });
        assert_eq!(state.initiative, PlayerId::SECOND);
        assert!(state.pawn(PawnId(4)).unwrap().eliminated);
    }

    #[test]
    fn test_cycle_advance_idempotent() {
        let mut state = started(MatchConfig::default());
        let event = CycleAdvance {
            cycle_number: 2,
            round_number: 1,
            current_phase: Phase::Define { round: 1 },
            current_player: PlayerId::SECOND,
        };

        assert_eq!(PhaseMachine::apply_cycle_advance(&mut state, &event), SyncOutcome::Applied);
        assert_eq!(state.cycle, 2);
        assert_eq!(state.current_player, PlayerId::SECOND);

        assert_eq!(
            PhaseMachine::apply_cycle_advance(&mut state, &event),
            SyncOutcome::IgnoredDuplicate
        );

        let stale = CycleAdvance {
            cycle_number: 1,
            ..event
        };
        assert_eq!(
            PhaseMachine::apply_cycle_advance(&mut state, &stale),
            SyncOutcome::IgnoredStale
        );
    }

    #[test]
    fn test_cycle_advance_must_open_the_cycle() {
        let mut state = started(MatchConfig::default());
        let linking = CycleAdvance {
            cycle_number: 2,
            round_number: 1,
            current_phase: Phase::Linking { round: 1 },
            current_player: PlayerId::SECOND,
        };
        let action = CycleAdvance {
            current_phase: Phase::Action,
            ..linking
        };
        let later_round = CycleAdvance {
            round_number: 2,
            current_phase: Phase::Define { round: 2 },
            ..linking
        };

        for event in [linking, action, later_round] {
            assert_eq!(
                PhaseMachine::apply_cycle_advance(&mut state, &event),
                SyncOutcome::IgnoredInvalid
            );
            assert_eq!(state.cycle, 1);
            assert_eq!(state.phase, Phase::Define { round: 1 });
        }

        let tie_break = CycleAdvance {
            current_phase: Phase::RpsTieBreak,
            ..linking
        };
        assert_eq!(PhaseMachine::apply_cycle_advance(&mut state, &tie_break), SyncOutcome::Applied);
        assert_eq!(state.cycle, 2);
        assert_eq!(state.phase, Phase::RpsTieBreak);
    }

    #[test]
    fn test_cycle_advance_after_game_over() {
        let mut state = started(MatchConfig::default());
        assert!(PhaseMachine::finish_match(&mut state, MatchResult::Winner(PlayerId::FIRST)));
        assert!(!PhaseMachine::finish_match(&mut state, MatchResult::Draw));

        let event = CycleAdvance {
            cycle_number: 5,
            round_number: 1,
            current_phase: Phase::Define { round: 1 },
            current_player: PlayerId::SECOND,
        };
        assert_eq!(
            PhaseMachine::apply_cycle_advance(&mut state, &event),
            SyncOutcome::IgnoredMatchOver
        );
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.cycle, 1);
        assert_eq!(state.result, Some(MatchResult::Winner(PlayerId::FIRST)));
    }

    #[test]
    fn test_select_pawn() {
        let mut state = started(MatchConfig::default());
        for _ in 0..3 {
            play_round(&mut state);
        }

        assert_eq!(
            PhaseMachine::select_pawn(&mut state, PlayerId::SECOND, PawnId(3)),
            Err(ActionError::NotYourTurn(PlayerId::SECOND))
        );
        PhaseMachine::select_pawn(&mut state, PlayerId::FIRST, PawnId(0)).unwrap();
        assert_eq!(state.phase, Phase::AwaitingActionTarget);
        assert_eq!(state.selected_pawn, Some(PawnId(0)));

        PhaseMachine::clear_selection(&mut state);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.selected_pawn, None);
    }
}
