// Keeps a local `CheckersGame` in sync with the other device. Every local move is broadcast as a
// full board snapshot followed by the side to move; the peer does the same, and we mirror whatever
// it reports. There is no authority beyond that: each side re-evaluates game over on its own.

use std::sync::mpsc;
use std::time::Duration;

use log::{debug, info, warn};
use strum::IntoEnumIterator;

use crate::board::{MoveOutcome, TurnError};
use crate::coord::Coord;
use crate::event::{
    GameSettingsData, MessageError, PeerMessage, grid_from_wire_pieces, snapshot_contents,
};
use crate::force::Force;
use crate::game::{CheckersGame, GameStatus};
use crate::grid::Grid;
use crate::network::{parse_message, serialize_message};
use crate::piece::PieceId;
use crate::role::Role;
use crate::rules::{CheckersRules, GameSettings};
use crate::starter::assign_piece_ids;


// Everything the owning thread reacts to. Helper threads (network reader, tick source) only ever
// push these into a channel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum IncomingEvent {
    Network(String),
    PeerConnected,
    PeerDisconnected,
    Tick(Duration),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TurnCommandError {
    IllegalTurn(TurnError),
    NoGameInProgress,
    NotYourTurn,
    // Only the host decides when a new match starts.
    NotHost,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    PeerConnected,
    GameStarted,
    OpponentMoved,
    TurnChanged(Force),
    GameOver(GameStatus),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SyncError {
    MalformedMessage(MessageError),
    CannotApply(String),
}

impl From<MessageError> for SyncError {
    fn from(err: MessageError) -> Self { SyncError::MalformedMessage(err) }
}

pub struct PeerState {
    role: Role,
    // Known from the start on the host, received with `GameSettings` on the guest.
    settings: Option<GameSettings>,
    rules: CheckersRules,
    send_initial_board: bool,
    peer_connected: bool,
    game: Option<CheckersGame>,
    outgoing_tx: mpsc::Sender<String>,
}

impl PeerState {
    pub fn new_host(
        settings: GameSettings, rules: CheckersRules, send_initial_board: bool,
        outgoing_tx: mpsc::Sender<String>,
    ) -> Self {
        PeerState {
            role: Role::Host,
            settings: Some(settings),
            rules,
            send_initial_board,
            peer_connected: false,
            game: None,
            outgoing_tx,
        }
    }

    pub fn new_guest(outgoing_tx: mpsc::Sender<String>) -> Self {
        PeerState {
            role: Role::Guest,
            settings: None,
            rules: CheckersRules::default(),
            send_initial_board: false,
            peer_connected: false,
            game: None,
            outgoing_tx,
        }
    }

    pub fn role(&self) -> Role { self.role }
    pub fn settings(&self) -> Option<&GameSettings> { self.settings.as_ref() }
    pub fn local_force(&self) -> Option<Force> { self.settings.as_ref().map(|s| s.local_force) }
    pub fn rules(&self) -> &CheckersRules { &self.rules }
    pub fn is_peer_connected(&self) -> bool { self.peer_connected }
    pub fn game(&self) -> Option<&CheckersGame> { self.game.as_ref() }

    pub fn is_my_turn(&self) -> bool {
        match (&self.game, self.local_force()) {
            (Some(game), Some(force)) => game.is_active() && game.active_force() == force,
            _ => false,
        }
    }

    pub fn make_move(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, TurnCommandError> {
        let local_force = self.local_force().ok_or(TurnCommandError::NoGameInProgress)?;
        let game = self.game.as_mut().ok_or(TurnCommandError::NoGameInProgress)?;
        if game.game_over() {
            return Err(TurnCommandError::IllegalTurn(TurnError::GameOver));
        }
        if game.active_force() != local_force {
            return Err(TurnCommandError::NotYourTurn);
        }
        let outcome = game.try_move(from, to).map_err(TurnCommandError::IllegalTurn)?;
        let snapshot = PeerMessage::snapshot(game.grid(), game.captured_counts());
        let current_player = PeerMessage::CurrentPlayer { current_player: game.active_force() };
        self.send(&snapshot);
        self.send(&current_player);
        Ok(outcome)
    }

    // Starts a new match with the same settings.
    pub fn restart(&mut self) -> Result<(), TurnCommandError> {
        self.check_can_start()?;
        self.start_hosted_match(None);
        Ok(())
    }

    // Starts a new match from an arbitrary position, White to move. The position always goes out
    // as the initial board.
    pub fn restart_from(&mut self, grid: Grid) -> Result<(), TurnCommandError> {
        self.check_can_start()?;
        self.start_hosted_match(Some(grid));
        Ok(())
    }

    fn check_can_start(&self) -> Result<(), TurnCommandError> {
        if self.role != Role::Host {
            return Err(TurnCommandError::NotHost);
        }
        if !self.peer_connected {
            return Err(TurnCommandError::NoGameInProgress);
        }
        Ok(())
    }

    pub fn apply_event(&mut self, event: IncomingEvent) -> Result<NotableEvent, SyncError> {
        let result = self.process_event(event);
        if let Err(err) = &result {
            warn!("Ignoring peer event: {err:?}");
        }
        result
    }

    fn process_event(&mut self, event: IncomingEvent) -> Result<NotableEvent, SyncError> {
        match event {
            IncomingEvent::Network(text) => {
                let msg = parse_message(&text)?;
                self.process_message(msg)
            },
            IncomingEvent::PeerConnected => {
                info!("Peer connected");
                self.peer_connected = true;
                match self.role {
                    Role::Host => {
                        self.start_hosted_match(None);
                        Ok(NotableEvent::GameStarted)
                    },
                    Role::Guest => Ok(NotableEvent::PeerConnected),
                }
            },
            IncomingEvent::PeerDisconnected => {
                info!("Peer disconnected");
                self.peer_connected = false;
                let local_force = self.local_force();
                match (self.game.as_mut(), local_force) {
                    (Some(game), Some(local_force)) if game.is_active() => {
                        game.forfeit(local_force.opponent());
                        Ok(NotableEvent::GameOver(game.status()))
                    },
                    _ => Ok(NotableEvent::None),
                }
            },
            IncomingEvent::Tick(elapsed) => {
                let Some(game) = self.game.as_mut() else {
                    return Ok(NotableEvent::None);
                };
                let was_active = game.is_active();
                game.tick_clock(elapsed);
                if was_active && game.game_over() {
                    Ok(NotableEvent::GameOver(game.status()))
                } else {
                    Ok(NotableEvent::None)
                }
            },
        }
    }

    fn process_message(&mut self, msg: PeerMessage) -> Result<NotableEvent, SyncError> {
        match msg {
            PeerMessage::BoardSnapshot { board_state, captured_white, captured_black } => {
                let (grid, captured) =
                    snapshot_contents(&board_state, captured_white, captured_black)?;
                let game = self.game_mut()?;
                game.apply_snapshot(&grid, captured).map_err(|err| {
                    SyncError::CannotApply(format!("Cannot apply board snapshot: {err:?}"))
                })?;
                debug!("Applied board snapshot: {:?}", game.grid());
                Ok(after_remote_update(game, NotableEvent::OpponentMoved))
            },
            PeerMessage::CurrentPlayer { current_player } => {
                let game = self.game_mut()?;
                let was_active = game.is_active();
                game.apply_remote_active_force(current_player);
                if !was_active {
                    return Ok(NotableEvent::None);
                }
                Ok(after_remote_update(game, NotableEvent::TurnChanged(current_player)))
            },
            PeerMessage::GameSettings { game_settings } => {
                if self.role == Role::Host {
                    return Err(SyncError::CannotApply("Host does not accept settings".to_owned()));
                }
                self.start_joined_match(&game_settings);
                Ok(NotableEvent::GameStarted)
            },
            PeerMessage::InitialBoard { initial_board } => {
                if self.role == Role::Host {
                    return Err(SyncError::CannotApply("Host does not accept boards".to_owned()));
                }
                // Piece ids are local: the peer's are replaced.
                let mut grid = grid_from_wire_pieces(&initial_board)?;
                assign_piece_ids(&mut grid, &mut PieceId::new());
                let rules = self.rules;
                let game = self.game_mut()?;
                if !grid.same_position(game.grid()) {
                    warn!("Initial board differs from the local one; using the host's board");
                }
                let mut new_game = CheckersGame::new_with_grid(
                    rules,
                    game.clock().control().clone(),
                    grid,
                    game.active_force(),
                );
                for force in Force::iter() {
                    new_game.clock_mut().set_time_left(force, game.clock().time_left(force));
                }
                *game = new_game;
                Ok(NotableEvent::None)
            },
        }
    }

    fn game_mut(&mut self) -> Result<&mut CheckersGame, SyncError> {
        self.game
            .as_mut()
            .ok_or_else(|| SyncError::CannotApply("No game in progress".to_owned()))
    }

    fn start_hosted_match(&mut self, grid: Option<Grid>) {
        let Some(settings) = self.settings.clone() else {
            return;
        };
        info!("Starting match: host plays {}, {}", settings.local_force, settings.time_control);
        let time_control = settings.time_control.clone();
        let send_initial_board = self.send_initial_board || grid.is_some();
        let game = match grid {
            Some(grid) => CheckersGame::new_with_grid(self.rules, time_control, grid, Force::White),
            None => CheckersGame::new(self.rules, time_control),
        };
        self.send(&PeerMessage::settings(&settings, self.rules));
        if send_initial_board {
            self.send(&PeerMessage::initial_board(game.grid()));
        }
        self.game = Some(game);
    }

    fn start_joined_match(&mut self, data: &GameSettingsData) {
        let board_style = self.settings.as_ref().map_or(0, |s| s.board_style);
        let settings = data.receiver_settings(board_style);
        info!("Joining match: playing {}, {}", settings.local_force, settings.time_control);
        self.rules = data.rules();
        let mut game = CheckersGame::new(self.rules, settings.time_control.clone());
        if settings.time_control.is_limited() {
            for force in Force::iter() {
                game.clock_mut().set_time_left(force, data.initial_time(force));
            }
        }
        self.settings = Some(settings);
        self.game = Some(game);
    }

    fn send(&self, msg: &PeerMessage) {
        if self.outgoing_tx.send(serialize_message(msg)).is_err() {
            warn!("Cannot send message: transport is gone");
        }
    }
}

fn after_remote_update(game: &CheckersGame, event: NotableEvent) -> NotableEvent {
    if game.game_over() { NotableEvent::GameOver(game.status()) } else { event }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeControl;
    use crate::piece::{PieceKind, PieceOnBoard};

    fn host_settings() -> GameSettings {
        GameSettings {
            local_force: Force::White,
            time_control: TimeControl::per_move(Duration::from_secs(30)),
            board_style: 0,
        }
    }

    #[test]
    fn guest_plays_other_color() {
        let (host_tx, host_rx) = mpsc::channel();
        let (guest_tx, _guest_rx) = mpsc::channel();
        let mut host = PeerState::new_host(host_settings(), CheckersRules::simplified(), false, host_tx);
        let mut guest = PeerState::new_guest(guest_tx);
        assert_eq!(host.apply_event(IncomingEvent::PeerConnected), Ok(NotableEvent::GameStarted));
        assert_eq!(guest.apply_event(IncomingEvent::PeerConnected), Ok(NotableEvent::PeerConnected));
        for text in host_rx.try_iter() {
            guest.apply_event(IncomingEvent::Network(text)).unwrap();
        }
        assert_eq!(guest.local_force(), Some(Force::Black));
        assert_eq!(guest.rules(), &CheckersRules::simplified());
        assert_eq!(
            guest.game().unwrap().clock().control(),
            &TimeControl::per_move(Duration::from_secs(30))
        );
    }

    #[test]
    fn malformed_message_is_dropped() {
        let (tx, _rx) = mpsc::channel();
        let mut guest = PeerState::new_guest(tx);
        assert!(matches!(
            guest.apply_event(IncomingEvent::Network("{not json".to_owned())),
            Err(SyncError::MalformedMessage(MessageError::Json(_)))
        ));
        assert!(matches!(
            guest.apply_event(IncomingEvent::Network(r#"{"currentPlayer":"White"}"#.to_owned())),
            Err(SyncError::CannotApply(_))
        ));
        assert!(guest.game().is_none());
    }

    #[test]
    fn moves_before_connection_are_rejected() {
        let (tx, _rx) = mpsc::channel();
        let mut host = PeerState::new_host(host_settings(), CheckersRules::default(), false, tx);
        assert_eq!(
            host.make_move(Coord::new(5, 0), Coord::new(4, 1)),
            Err(TurnCommandError::NoGameInProgress)
        );
    }

    #[test]
    fn peer_piece_ids_are_renumbered() {
        let (host_tx, host_rx) = mpsc::channel();
        let (guest_tx, _guest_rx) = mpsc::channel();
        let mut host = PeerState::new_host(host_settings(), CheckersRules::default(), false, host_tx);
        let mut guest = PeerState::new_guest(guest_tx);
        host.apply_event(IncomingEvent::PeerConnected).unwrap();
        guest.apply_event(IncomingEvent::PeerConnected).unwrap();
        for text in host_rx.try_iter() {
            guest.apply_event(IncomingEvent::Network(text)).unwrap();
        }

        let mut grid = Grid::new();
        grid[Coord::new(5, 0)] =
            Some(PieceOnBoard::new(PieceId(u32::MAX), PieceKind::Man, Force::White));
        grid[Coord::new(2, 1)] =
            Some(PieceOnBoard::new(PieceId(u32::MAX), PieceKind::Man, Force::Black));
        let text = serialize_message(&PeerMessage::initial_board(&grid));
        assert_eq!(guest.apply_event(IncomingEvent::Network(text)), Ok(NotableEvent::None));

        let game = guest.game().unwrap();
        assert!(game.is_active());
        assert!(game.grid().same_position(&grid));
        assert_eq!(game.grid()[Coord::new(2, 1)].map(|p| p.id), Some(PieceId(1)));
        assert_eq!(game.grid()[Coord::new(5, 0)].map(|p| p.id), Some(PieceId(2)));
    }
}
