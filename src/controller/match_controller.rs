//! Match controller.
//!
//! Owns the match state, both seats' policies, the attack coordinator and
//! the timer queue, and is the only thing that mutates state.
//!
//! ## Flow
//!
//! ```text
//! actor decision ─► validate ─► apply ─► win check ─► turn hand-off
//!                                 │
//!                                 └─► outbound events (local/AI seats only)
//! ```
//!
//! Local seats act through the entry points (`define_cards`, `move_pawn`,
//! ...). AI seats are polled after their thinking delay. Remote seats are
//! fed by [`MatchController::receive`]; their decisions are re-validated
//! before use and dropped as stale if they no longer fit.
//!
//! ## Scheduling
//!
//! Single-threaded. The host calls [`MatchController::tick`] with a
//! monotonic clock; due timers fire in order, then seats owing a decision
//! are polled. While a replay runs, inbound events queue up and are
//! applied in arrival order once it finishes.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::actors::{
    ActionChoice, ActorKind, ActorPolicy, Decision, DecisionContext, DecisionRequest, LocalInput,
    RelayedDecision, RemoteRelay, RequestKind,
};
use crate::ai::{AiOpponent, Difficulty};
use crate::core::{
    Action, ActionRecord, CardId, CardStats, GameRng, GridPos, MatchConfig, MatchState, PawnId,
    PlayerId, PlayerMap, PLAYER_COUNT,
};
use crate::error::{ActionError, ConfigError};
use crate::net::MatchEvent;
use crate::phase::{Phase, PhaseMachine, RpsChoice, TurnChange};
use crate::physics::{AttackCoordinator, AttackReplayDescriptor, DragGesture, ReplayStep};
use crate::rules::{ActionResolver, MatchResult};

use super::timers::{TimerKind, TimerQueue};
use super::view::{Notice, PawnView, PossibleTargets};

/// Bound on back-to-back relay decisions handled in one poll.
const MAX_POLL_ROUNDS: usize = 32;

/// A ready decision of any request kind.
enum Chosen {
    Cards(Vec<CardStats>),
    Link(PawnId, CardId),
    Action(ActionChoice),
    Rps(RpsChoice),
}

pub struct MatchController {
    state: MatchState,
    actors: PlayerMap<Box<dyn ActorPolicy>>,
    coordinator: AttackCoordinator,
    timers: TimerQueue,
    /// Events for the relay, in emission order.
    outbound: Vec<MatchEvent>,
    /// Inbound events held back while a replay runs.
    inbound: VecDeque<MatchEvent>,
    notices: Vec<Notice>,
    now_ms: u64,
}

impl MatchController {
    /// Create a controller for a validated configuration.
    pub fn new(
        config: MatchConfig,
        first: Box<dyn ActorPolicy>,
        second: Box<dyn ActorPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let coordinator = AttackCoordinator::new(config.physics.clone());
        Ok(Self {
            state: MatchState::new(config),
            actors: PlayerMap::from_pair(first, second),
            coordinator,
            timers: TimerQueue::new(),
            outbound: Vec::new(),
            inbound: VecDeque::new(),
            notices: Vec::new(),
            now_ms: 0,
        })
    }

    /// Single-player match: the human sits at `human`, the AI opposite.
    pub fn vs_ai(config: MatchConfig, human: PlayerId, difficulty: Difficulty) -> Result<Self, ConfigError> {
        let ai = AiOpponent::for_seat(difficulty, &GameRng::new(config.seed), human.opponent());
        let (first, second): (Box<dyn ActorPolicy>, Box<dyn ActorPolicy>) = if human == PlayerId::FIRST {
            (Box::new(LocalInput::new()), Box::new(ai))
        } else {
            (Box::new(ai), Box::new(LocalInput::new()))
        };
        Self::new(config, first, second)
    }

    /// Networked match: the local human at `local`, the relay opposite.
    pub fn online(config: MatchConfig, local: PlayerId) -> Result<Self, ConfigError> {
        let (first, second): (Box<dyn ActorPolicy>, Box<dyn ActorPolicy>) = if local == PlayerId::FIRST {
            (Box::new(LocalInput::new()), Box::new(RemoteRelay::new()))
        } else {
            (Box::new(RemoteRelay::new()), Box::new(LocalInput::new()))
        };
        Self::new(config, first, second)
    }

    // === Lifecycle ===

    /// `PRE_GAME → SETUP_1_DEFINE` and arm the win-check backstop.
    pub fn start(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        if !PhaseMachine::start_match(&mut self.state) {
            return;
        }
        self.schedule_win_check();
        self.poll_actors();
    }

    /// Run due timers and poll seats that owe a decision.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        while let Some(kind) = self.timers.pop_due(self.now_ms) {
            if self.state.is_over() {
                self.timers.clear();
                return;
            }
            match kind {
                TimerKind::ReplayFrame => self.replay_frame(),
                TimerKind::WinCheck => {
                    if !self.check_win() {
                        self.schedule_win_check();
                    }
                }
                TimerKind::Decision(request) => {
                    self.run_decision(request);
                }
            }
        }
        if self.state.is_over() {
            self.timers.clear();
            return;
        }
        self.poll_actors();
    }

    /// Mark the relay seat connected or not.
    pub fn set_remote_connected(&mut self, connected: bool) {
        for seat in PlayerId::all() {
            if self.actors[seat].kind() == ActorKind::Remote {
                self.actors[seat].set_connected(connected);
                info!(%seat, connected, "relay connectivity changed");
            }
        }
        self.poll_actors();
    }

    // === Local entry points ===

    pub fn define_cards(&mut self, player: PlayerId, cards: &[CardStats]) -> Result<(), ActionError> {
        let result = self
            .require_local(player)
            .and_then(|()| self.apply_cards(player, cards, true));
        self.settle(result)
    }

    pub fn link_pawn(&mut self, player: PlayerId, pawn: PawnId, card: CardId) -> Result<(), ActionError> {
        let result = self
            .require_local(player)
            .and_then(|()| self.apply_link(player, pawn, card, true));
        self.settle(result)
    }

    pub fn move_pawn(&mut self, player: PlayerId, pawn: PawnId, to: GridPos) -> Result<(), ActionError> {
        let choice = ActionChoice::new(Action::Move { pawn, to });
        let result = self
            .require_local(player)
            .and_then(|()| self.apply_action(player, choice, true));
        self.settle(result)
    }

    /// Attack, confirmed by the drag gesture that aimed it. A drag under
    /// either threshold is rejected as a stray click.
    pub fn attack(
        &mut self,
        player: PlayerId,
        attacker: PawnId,
        target: PawnId,
        gesture: DragGesture,
    ) -> Result<(), ActionError> {
        let choice = ActionChoice {
            action: Action::Attack { attacker, target },
            gesture: Some(gesture),
        };
        let result = self
            .require_local(player)
            .and_then(|()| self.apply_action(player, choice, true));
        self.settle(result)
    }

    pub fn pass(&mut self, player: PlayerId) -> Result<(), ActionError> {
        let result = self
            .require_local(player)
            .and_then(|()| self.apply_action(player, ActionChoice::pass(), true));
        self.settle(result)
    }

    pub fn choose_rps(&mut self, player: PlayerId, choice: RpsChoice) -> Result<(), ActionError> {
        let result = self
            .require_local(player)
            .and_then(|()| self.apply_rps(player, choice, true));
        self.settle(result)
    }

    /// Enter AWAITING_ACTION_TARGET with `pawn` selected.
    pub fn select_pawn(&mut self, player: PlayerId, pawn: PawnId) -> Result<(), ActionError> {
        let result = self
            .require_local(player)
            .and_then(|()| PhaseMachine::select_pawn(&mut self.state, player, pawn));
        self.settle(result)
    }

    pub fn clear_selection(&mut self) {
        PhaseMachine::clear_selection(&mut self.state);
    }

    fn require_local(&self, player: PlayerId) -> Result<(), ActionError> {
        if player.index() >= PLAYER_COUNT || self.actors[player].kind() != ActorKind::Local {
            return Err(ActionError::NotLocalSeat(player));
        }
        Ok(())
    }

    /// Turn a local rejection into a notice, or poll seats after success.
    fn settle(&mut self, result: Result<(), ActionError>) -> Result<(), ActionError> {
        match &result {
            Ok(()) => self.poll_actors(),
            Err(err) => {
                debug!(code = err.code(), %err, "local request rejected");
                self.notices.push(Notice::from_error(err, self.now_ms));
            }
        }
        result
    }

    // === Relay ===

    /// Feed one inbound relay event.
    pub fn receive(&mut self, event: MatchEvent) {
        if self.state.is_over() {
            debug!(event = event.name(), "event after game over ignored");
            return;
        }
        if self.state.is_animating {
            self.inbound.push_back(event);
            return;
        }
        self.dispatch(event);
        self.poll_actors();
    }

    fn dispatch(&mut self, event: MatchEvent) {
        match event {
            MatchEvent::CycleAdvance(advance) => {
                if advance.current_player.index() >= PLAYER_COUNT {
                    warn!(player = advance.current_player.0, "cycle advance names unknown seat");
                    return;
                }
                let outcome = PhaseMachine::apply_cycle_advance(&mut self.state, &advance);
                debug!(?outcome, cycle = advance.cycle_number, "cycle advance");
            }
            MatchEvent::PhysicsAttackAnimation(descriptor) => self.start_replay(descriptor),
            MatchEvent::PlayerCannotAct => {
                if let Some(change) = PhaseMachine::reconcile_turn(&mut self.state) {
                    debug!(?change, "turn reconciled after peer skip");
                    self.on_turn_change(change);
                }
            }
            other => self.relay_decision(other),
        }
    }

    fn relay_decision(&mut self, event: MatchEvent) {
        let Some(seat) = self.remote_seat() else {
            warn!(event = event.name(), "relay event without a remote seat");
            return;
        };
        let name = event.name();
        let decision = match event {
            MatchEvent::CardsDefined { player, cards } if player == seat => {
                RelayedDecision::Cards(cards.iter().map(|c| c.stats).collect())
            }
            MatchEvent::PawnLinked {
                player,
                pawn_id,
                card_id,
            } if player == seat => RelayedDecision::Link {
                pawn: pawn_id,
                card: card_id,
            },
            MatchEvent::Move {
                pawn_id,
                target_x,
                target_y,
            } => RelayedDecision::Action(Action::Move {
                pawn: pawn_id,
                to: GridPos::new(target_x, target_y),
            }),
            MatchEvent::Attack {
                attacker_id,
                target_id,
            } => RelayedDecision::Action(Action::Attack {
                attacker: attacker_id,
                target: target_id,
            }),
            MatchEvent::Pass => RelayedDecision::Action(Action::Pass),
            MatchEvent::RpsChoice { choice } => RelayedDecision::Rps(choice),
            _ => {
                warn!(event = name, "relay event for the wrong seat dropped");
                return;
            }
        };

        let Some(request) = DecisionRequest::owed(&self.state, seat) else {
            debug!(event = name, phase = %self.state.phase, "stale relay event dropped");
            return;
        };
        self.actors[seat].deliver(decision);
        self.run_decision(request);
    }

    fn remote_seat(&self) -> Option<PlayerId> {
        PlayerId::all().find(|&seat| self.actors[seat].kind() == ActorKind::Remote)
    }

    /// Events for the relay since the last drain.
    pub fn drain_outbound(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.outbound)
    }

    // === Decisions ===

    /// Ask every seat that owes a decision. Relay seats answer at once, so
    /// keep going while they make progress, up to [`MAX_POLL_ROUNDS`].
    fn poll_actors(&mut self) {
        for _ in 0..MAX_POLL_ROUNDS {
            if self.state.is_over() {
                return;
            }
            if self.state.phase.is_action() && !self.state.is_animating {
                if let Some(change) = PhaseMachine::reconcile_turn(&mut self.state) {
                    self.on_turn_change(change);
                }
            }
            let mut progressed = false;
            for seat in PlayerId::all() {
                let Some(request) = DecisionRequest::owed(&self.state, seat) else {
                    continue;
                };
                match self.actors[seat].kind() {
                    ActorKind::Local => {}
                    ActorKind::Remote => progressed |= self.run_decision(request),
                    ActorKind::Ai => {
                        let timer = TimerKind::Decision(request);
                        if !self.timers.contains(&timer) {
                            let delay = self.actors[seat].thinking_delay_ms(&request);
                            self.timers.schedule(self.now_ms + delay, timer);
                        }
                    }
                }
            }
            if !progressed {
                return;
            }
        }
        debug!(cycle = self.state.cycle, "relay seats still deciding, resuming next tick");
    }

    /// Poll the seat for `request` and apply the answer. Returns whether a
    /// decision was applied.
    fn run_decision(&mut self, request: DecisionRequest) -> bool {
        if self.state.is_over() {
            return false;
        }
        if DecisionRequest::owed(&self.state, request.seat) != Some(request) {
            debug!(?request, "decision no longer owed");
            return false;
        }
        let seat = request.seat;
        let kind = self.actors[seat].kind();
        let emit = kind.originates_events();
        let ctx = DecisionContext::new(&self.state, seat);
        let actor = &mut self.actors[seat];

        let decision = match request.kind {
            RequestKind::DefineCards => actor.define_cards(&ctx, request.round).map(Chosen::Cards),
            RequestKind::LinkPawn => actor.link_pawn(&ctx).map(|(pawn, card)| Chosen::Link(pawn, card)),
            RequestKind::ChooseAction => actor.choose_action(&ctx).map(Chosen::Action),
            RequestKind::ChooseRps => actor.choose_rps(&ctx).map(Chosen::Rps),
        };
        let result = match decision {
            Decision::Ready(Chosen::Cards(cards)) => Some(self.apply_cards(seat, &cards, emit)),
            Decision::Ready(Chosen::Link(pawn, card)) => Some(self.apply_link(seat, pawn, card, emit)),
            Decision::Ready(Chosen::Action(choice)) => Some(self.apply_action(seat, choice, emit)),
            Decision::Ready(Chosen::Rps(choice)) => Some(self.apply_rps(seat, choice, emit)),
            Decision::Pending => None,
            Decision::Unavailable => Some(self.fallback(request)),
        };

        match (result, kind) {
            (Some(Ok(())), _) => true,
            (None, ActorKind::Ai) => {
                let frame = self.coordinator.config().frame_interval_ms;
                self.timers.schedule(self.now_ms + frame, TimerKind::Decision(request));
                false
            }
            (None, _) => false,
            (Some(Err(err)), ActorKind::Remote) => {
                debug!(%seat, code = err.code(), "relayed decision failed consistency check, dropped");
                false
            }
            (Some(Err(err)), _) => {
                warn!(%seat, code = err.code(), %err, "actor decision rejected, using fallback");
                match self.fallback(request) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(%seat, %err, "fallback decision rejected");
                        false
                    }
                }
            }
        }
    }

    /// Default decision for a seat whose actor cannot decide: pass in
    /// ACTION, a balanced card set, the first free pawn/card pair, and a
    /// seat-dependent RPS choice.
    fn fallback(&mut self, request: DecisionRequest) -> Result<(), ActionError> {
        let seat = request.seat;
        let emit = self.actors[seat].kind().originates_events();
        info!(%seat, kind = ?request.kind, "actor unavailable, applying default decision");
        match request.kind {
            RequestKind::ChooseAction => self.apply_action(seat, ActionChoice::pass(), emit),
            RequestKind::DefineCards => {
                let config = &self.state.config;
                let cards = vec![CardStats::balanced(config.card_budget); config.cards_per_round];
                self.apply_cards(seat, &cards, emit)
            }
            RequestKind::LinkPawn => {
                let pawn = self.state.pawns_of(seat).find(|p| p.is_linkable()).map(|p| p.id);
                let card = self.state.players[seat].available_cards().next().map(|c| c.id);
                match (pawn, card) {
                    (Some(pawn), Some(card)) => self.apply_link(seat, pawn, card, emit),
                    _ => Err(ActionError::WrongPhase(seat, self.state.phase.name())),
                }
            }
            RequestKind::ChooseRps => {
                let index = (request.cycle as usize + seat.index()) % RpsChoice::ALL.len();
                self.apply_rps(seat, RpsChoice::ALL[index], emit)
            }
        }
    }

    // === Application ===

    fn apply_cards(&mut self, seat: PlayerId, cards: &[CardStats], emit: bool) -> Result<(), ActionError> {
        let defined = PhaseMachine::submit_cards(&mut self.state, seat, cards)?;
        if emit {
            self.outbound.push(MatchEvent::CardsDefined {
                player: seat,
                cards: defined,
            });
        }
        Ok(())
    }

    fn apply_link(&mut self, seat: PlayerId, pawn: PawnId, card: CardId, emit: bool) -> Result<(), ActionError> {
        PhaseMachine::link_pawn(&mut self.state, seat, pawn, card)?;
        if emit {
            self.outbound.push(MatchEvent::PawnLinked {
                player: seat,
                pawn_id: pawn,
                card_id: card,
            });
        }
        Ok(())
    }

    fn apply_rps(&mut self, seat: PlayerId, choice: RpsChoice, emit: bool) -> Result<(), ActionError> {
        let outcome = PhaseMachine::choose_rps(&mut self.state, seat, choice)?;
        debug!(%seat, ?outcome, "rps choice");
        if emit {
            self.outbound.push(MatchEvent::RpsChoice { choice });
        }
        Ok(())
    }

    fn apply_action(&mut self, seat: PlayerId, choice: ActionChoice, emit: bool) -> Result<(), ActionError> {
        let action = choice.action;
        ActionResolver::validate(&self.state, seat, &action)?;

        // Only the originating peer builds a descriptor; the other side
        // receives it as its own event.
        let descriptor = match action {
            Action::Attack { attacker, target } if emit => Some(self.coordinator.describe(
                &self.state,
                seat,
                attacker,
                target,
                choice.gesture.as_ref(),
                self.now_ms,
            )?),
            _ => None,
        };

        let sequence = self.state.next_sequence();
        let record = ActionRecord::new(seat, action, self.state.cycle, self.state.turn, sequence);
        self.state.record_action(record);

        match action {
            Action::Move { pawn, to } => {
                ActionResolver::apply_move(&mut self.state, pawn, to);
                if emit {
                    self.outbound.push(MatchEvent::Move {
                        pawn_id: pawn,
                        target_x: to.x,
                        target_y: to.y,
                    });
                }
            }
            Action::Attack { attacker, target } => {
                ActionResolver::apply_attack(&mut self.state, attacker, target);
                if emit {
                    self.outbound.push(MatchEvent::Attack {
                        attacker_id: attacker,
                        target_id: target,
                    });
                }
                if let Some(descriptor) = descriptor {
                    self.outbound.push(MatchEvent::PhysicsAttackAnimation(descriptor));
                }
            }
            Action::Pass => {
                if emit {
                    self.outbound.push(MatchEvent::Pass);
                }
            }
        }
        info!(%seat, ?action, cycle = self.state.cycle, turn = self.state.turn, "action applied");

        if self.check_win() {
            return Ok(());
        }
        if let Some(descriptor) = descriptor {
            self.start_replay(descriptor);
        }
        let change = PhaseMachine::end_turn(&mut self.state, action.is_pass());
        self.on_turn_change(change);
        Ok(())
    }

    fn on_turn_change(&mut self, change: TurnChange) {
        debug!(?change, cycle = self.state.cycle, "turn change");
        if let TurnChange::Kept { skipped } = change {
            if self.actors[skipped].kind().originates_events() {
                self.outbound.push(MatchEvent::PlayerCannotAct);
            }
        }
    }

    /// End the match if a win condition holds. True once the match is over.
    fn check_win(&mut self) -> bool {
        if self.state.is_over() {
            return true;
        }
        let Some(result) = ActionResolver::check_win(&self.state) else {
            return false;
        };
        PhaseMachine::finish_match(&mut self.state, result);
        self.coordinator.cancel(&mut self.state);
        self.timers.clear();
        self.inbound.clear();
        true
    }

    fn schedule_win_check(&mut self) {
        let interval = self.state.config.win_check_interval_ms.max(1);
        self.timers.schedule(self.now_ms + interval, TimerKind::WinCheck);
    }

    // === Replay ===

    fn start_replay(&mut self, descriptor: AttackReplayDescriptor) {
        if self.coordinator.start(&mut self.state, descriptor) {
            let frame = self.coordinator.config().frame_interval_ms;
            self.timers.schedule(self.now_ms + frame, TimerKind::ReplayFrame);
        } else {
            self.drain_inbound();
        }
    }

    fn replay_frame(&mut self) {
        match self.coordinator.step(&mut self.state) {
            ReplayStep::Frame { .. } => {
                let frame = self.coordinator.config().frame_interval_ms;
                self.timers.schedule(self.now_ms + frame, TimerKind::ReplayFrame);
            }
            ReplayStep::Finished(report) => {
                debug!(?report, "replay complete");
                self.drain_inbound();
            }
            ReplayStep::Idle => self.drain_inbound(),
        }
    }

    fn drain_inbound(&mut self) {
        while !self.state.is_animating && !self.state.is_over() {
            let Some(event) = self.inbound.pop_front() else {
                break;
            };
            self.dispatch(event);
        }
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.current_player
    }

    #[must_use]
    pub fn selected_pawn(&self) -> Option<PawnId> {
        self.state.selected_pawn
    }

    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        self.state.result
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    #[must_use]
    pub fn seat_kind(&self, seat: PlayerId) -> ActorKind {
        self.actors[seat].kind()
    }

    #[must_use]
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the next timer, for hosts that sleep between ticks.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<u64> {
        self.timers.next_due()
    }

    #[must_use]
    pub fn pawn_views(&self) -> Vec<PawnView> {
        self.state
            .pawns()
            .iter()
            .map(|p| PawnView::new(p, &self.coordinator))
            .collect()
    }

    /// Moves and attacks available to a pawn; empty for unknown pawns.
    #[must_use]
    pub fn possible_targets(&self, pawn: PawnId) -> PossibleTargets {
        self.state
            .pawn(pawn)
            .map(|p| PossibleTargets::for_pawn(&self.state, p))
            .unwrap_or_default()
    }

    /// Notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl std::fmt::Debug for MatchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchController")
            .field("phase", &self.state.phase)
            .field("cycle", &self.state.cycle)
            .field("current_player", &self.state.current_player)
            .field("seats", &[self.actors[PlayerId::FIRST].kind(), self.actors[PlayerId::SECOND].kind()])
            .field("now_ms", &self.now_ms)
            .finish()
    }
}
