mod common;

use std::sync::mpsc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use checkers_sync::board::TurnError;
use checkers_sync::clock::TimeControl;
use checkers_sync::force::Force;
use checkers_sync::game::{DrawReason, GameStatus, VictoryReason};
use checkers_sync::peer::{IncomingEvent, NotableEvent, PeerState, TurnCommandError};
use checkers_sync::rules::{CheckersRules, GameSettings};
use checkers_sync::test_util::parse_grid;


struct Peer {
    state: PeerState,
    outbox: mpsc::Receiver<String>,
}

impl Peer {
    fn host(time_control: TimeControl, send_initial_board: bool) -> Self {
        let (tx, outbox) = mpsc::channel();
        let settings = GameSettings {
            local_force: Force::White,
            time_control,
            board_style: 0,
        };
        let state = PeerState::new_host(settings, CheckersRules::default(), send_initial_board, tx);
        Peer { state, outbox }
    }

    fn guest() -> Self {
        let (tx, outbox) = mpsc::channel();
        Peer { state: PeerState::new_guest(tx), outbox }
    }
}

// Feeds everything `from` has sent so far to `to`.
fn deliver(from: &Peer, to: &mut Peer) -> Vec<NotableEvent> {
    from.outbox
        .try_iter()
        .map(|text| to.state.apply_event(IncomingEvent::Network(text)).unwrap())
        .collect()
}

fn connected_pair(time_control: TimeControl, send_initial_board: bool) -> (Peer, Peer) {
    let mut host = Peer::host(time_control, send_initial_board);
    let mut guest = Peer::guest();
    host.state.apply_event(IncomingEvent::PeerConnected).unwrap();
    guest.state.apply_event(IncomingEvent::PeerConnected).unwrap();
    deliver(&host, &mut guest);
    (host, guest)
}

// Host (White) restarts from `diagram` with White to move.
fn seeded_pair(diagram: &str) -> (Peer, Peer) {
    let (mut host, mut guest) = connected_pair(TimeControl::no_limit(), false);
    host.state.restart_from(parse_grid(diagram).unwrap()).unwrap();
    assert_eq!(deliver(&host, &mut guest), vec![NotableEvent::GameStarted, NotableEvent::None]);
    assert_in_sync(&host, &guest);
    (host, guest)
}

fn assert_in_sync(host: &Peer, guest: &Peer) {
    let host_game = host.state.game().unwrap();
    let guest_game = guest.state.game().unwrap();
    assert_eq!(host_game.grid(), guest_game.grid());
    assert_eq!(host_game.captured_counts(), guest_game.captured_counts());
    assert_eq!(host_game.active_force(), guest_game.active_force());
    assert_eq!(host_game.status(), guest_game.status());
}


#[test]
fn play_capture_and_agree() {
    let (mut host, mut guest) = connected_pair(TimeControl::no_limit(), false);
    assert_eq!(guest.state.local_force(), Some(Force::Black));
    assert_eq!(
        guest.state.make_move(at!(2, 1), at!(3, 0)),
        Err(TurnCommandError::NotYourTurn)
    );

    host.state.make_move(at!(5, 2), at!(4, 3)).unwrap();
    assert_eq!(deliver(&host, &mut guest), vec![
        NotableEvent::OpponentMoved,
        NotableEvent::TurnChanged(Force::Black),
    ]);
    assert!(guest.state.is_my_turn());
    assert_in_sync(&host, &guest);

    guest.state.make_move(at!(2, 5), at!(3, 4)).unwrap();
    deliver(&guest, &mut host);
    assert_in_sync(&host, &guest);

    assert_eq!(
        host.state.make_move(at!(5, 0), at!(4, 1)),
        Err(TurnCommandError::IllegalTurn(TurnError::CaptureRequired))
    );
    let outcome = host.state.make_move(at!(4, 3), at!(2, 5)).unwrap();
    assert_eq!(outcome.capture.map(|c| c.pos), Some(at!(3, 4)));
    deliver(&host, &mut guest);
    assert_in_sync(&host, &guest);
    assert_eq!(guest.state.game().unwrap().captured(Force::Black), 1);
    assert_eq!(guest.state.game().unwrap().active_force(), Force::Black);
}

#[test]
fn initial_board_is_adopted() {
    let (host, guest) = connected_pair(TimeControl::no_limit(), true);
    assert_in_sync(&host, &guest);
}

#[test]
fn disconnect_forfeits() {
    let (_host, mut guest) = connected_pair(TimeControl::no_limit(), false);
    assert_eq!(
        guest.state.apply_event(IncomingEvent::PeerDisconnected),
        Ok(NotableEvent::GameOver(GameStatus::Victory(Force::Black, VictoryReason::Forfeit)))
    );
    assert!(!guest.state.is_peer_connected());
}

#[test]
fn both_sides_flag() {
    let (mut host, mut guest) = connected_pair(TimeControl::per_move(Duration::from_secs(30)), false);
    host.state.make_move(at!(5, 2), at!(4, 3)).unwrap();
    deliver(&host, &mut guest);
    let expected = NotableEvent::GameOver(GameStatus::Victory(Force::White, VictoryReason::Flag));
    for peer in [&mut host, &mut guest] {
        assert_eq!(
            peer.state.apply_event(IncomingEvent::Tick(Duration::from_secs(20))),
            Ok(NotableEvent::None)
        );
        assert_eq!(peer.state.apply_event(IncomingEvent::Tick(Duration::from_secs(10))), Ok(expected.clone()));
    }
}

#[test]
fn host_restarts_match() {
    let (mut host, mut guest) = connected_pair(TimeControl::no_limit(), true);
    host.state.make_move(at!(5, 2), at!(4, 3)).unwrap();
    deliver(&host, &mut guest);
    assert_eq!(guest.state.restart(), Err(TurnCommandError::NotHost));

    host.state.restart().unwrap();
    assert_eq!(deliver(&host, &mut guest), vec![NotableEvent::GameStarted, NotableEvent::None]);
    assert_in_sync(&host, &guest);
    assert_eq!(host.state.game().unwrap().active_force(), Force::White);
}

#[test]
fn elimination_seen_by_both() {
    let (mut host, mut guest) = seeded_pair("
        . . . . . . . .
        . . . . . . . .
        . . . B . . . .
        . . W . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
    ");
    host.state.make_move(at!(3, 2), at!(1, 4)).unwrap();
    let expected = GameStatus::Victory(Force::White, VictoryReason::Elimination);
    assert_eq!(deliver(&host, &mut guest), vec![NotableEvent::GameOver(expected), NotableEvent::None]);
    assert_eq!(host.state.game().unwrap().status(), expected);
    assert_in_sync(&host, &guest);
}

#[test]
fn blocked_seen_by_both() {
    let (mut host, mut guest) = seeded_pair("
        . . . . . . . B
        . . . . . . W .
        . . . . . . . .
        . . . . W . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
    ");
    host.state.make_move(at!(3, 4), at!(2, 5)).unwrap();
    let expected = GameStatus::Victory(Force::White, VictoryReason::Blocked);
    // The snapshot alone does not end the game: blocked depends on whose turn it is.
    assert_eq!(deliver(&host, &mut guest), vec![
        NotableEvent::OpponentMoved,
        NotableEvent::GameOver(expected),
    ]);
    assert_eq!(host.state.game().unwrap().status(), expected);
    assert_in_sync(&host, &guest);
}

#[test]
fn kings_only_draw_seen_by_both() {
    let (mut host, mut guest) = seeded_pair("
        . . . . . . . BK
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . B . . .
        . . . . . . . .
        . . WK . . . . .
    ");
    host.state.make_move(at!(7, 2), at!(4, 5)).unwrap();
    let expected = GameStatus::Draw(DrawReason::KingsOnly);
    assert_eq!(deliver(&host, &mut guest), vec![NotableEvent::GameOver(expected), NotableEvent::None]);
    assert_in_sync(&host, &guest);
}

#[test]
fn draw_mid_chain_seen_by_both() {
    let (mut host, mut guest) = seeded_pair("
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . BK . . .
        . . . . . . . .
        . . . . . . . .
        . BK . . . . . .
        WK . . . . . . .
    ");
    let outcome = host.state.make_move(at!(7, 0), at!(5, 2)).unwrap();
    assert!(outcome.chain_continues);
    let expected = GameStatus::Draw(DrawReason::KingsOnly);
    assert_eq!(deliver(&host, &mut guest), vec![NotableEvent::GameOver(expected), NotableEvent::None]);
    assert_eq!(
        host.state.make_move(at!(5, 2), at!(2, 5)),
        Err(TurnCommandError::IllegalTurn(TurnError::GameOver))
    );
    assert_in_sync(&host, &guest);
}
