use std::io::{self, BufRead};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use log::{info, warn};
use tungstenite::WebSocket;
use tungstenite::protocol::Role as SocketRole;

use checkers_sync::board::TurnError;
use checkers_sync::clock::{TimeControl, TimerMode};
use checkers_sync::coord::Coord;
use checkers_sync::network::PORT;
use checkers_sync::peer::{IncomingEvent, NotableEvent, PeerState, TurnCommandError};
use checkers_sync::rules::GameSettings;

use crate::network;
use crate::peer_config::PeerConfig;
use crate::tui;


const TICK_PERIOD: Duration = Duration::from_millis(100);

enum ConsoleEvent {
    Peer(IncomingEvent),
    Input(String),
    InputClosed,
}

enum Command {
    Move(Coord, Coord),
    Restart,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    match line.trim() {
        "quit" => Ok(Command::Quit),
        "restart" => Ok(Command::Restart),
        other => {
            let mut parts = other.split_whitespace();
            let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(format!("Expected 'row,col row,col', got '{other}'"));
            };
            let from = Coord::from_text(from).ok_or_else(|| format!("Bad square: '{from}'"))?;
            let to = Coord::from_text(to).ok_or_else(|| format!("Bad square: '{to}'"))?;
            Ok(Command::Move(from, to))
        },
    }
}

fn describe_command_error(err: &TurnCommandError) -> String {
    match err {
        TurnCommandError::IllegalTurn(TurnError::GameOver) => "The game is over".to_owned(),
        TurnCommandError::IllegalTurn(err) => format!("Illegal move: {err:?}"),
        TurnCommandError::NoGameInProgress => "No game in progress".to_owned(),
        TurnCommandError::NotYourTurn => "Wait for your turn".to_owned(),
        TurnCommandError::NotHost => "Only the host can restart".to_owned(),
    }
}

pub fn run_host(config: PeerConfig) -> anyhow::Result<()> {
    let time_control = match config.timer_mode {
        TimerMode::NoLimit => TimeControl::no_limit(),
        TimerMode::TimePerMove => {
            TimeControl::per_move(Duration::from_secs(config.seconds_per_move))
        },
    };
    let settings = GameSettings {
        local_force: config.color,
        time_control,
        board_style: config.board_style,
    };
    let listener = TcpListener::bind((config.listen_address.as_str(), PORT))
        .with_context(|| format!("Cannot listen on {}:{PORT}", config.listen_address))?;
    println!("Waiting for a peer on port {PORT}...");
    let (stream, peer_addr) = listener.accept().context("Failed to accept connection")?;
    info!("Accepted connection from {peer_addr}");
    let socket =
        tungstenite::accept(stream).map_err(|err| anyhow!("WebSocket handshake failed: {err}"))?;
    let (outgoing_tx, outgoing_rx) = mpsc::channel();
    let peer_state =
        PeerState::new_host(settings, config.rules, config.send_initial_board, outgoing_tx);
    run_session(socket, SocketRole::Server, peer_state, outgoing_rx)
}

pub fn run_guest(host_address: &str) -> anyhow::Result<()> {
    println!("Connecting to {host_address}:{PORT}...");
    let stream = TcpStream::connect((host_address, PORT))
        .with_context(|| format!("Cannot connect to {host_address}:{PORT}"))?;
    let (socket, _) = tungstenite::client(format!("ws://{host_address}:{PORT}/"), stream)
        .map_err(|err| anyhow!("WebSocket handshake failed: {err}"))?;
    let (outgoing_tx, outgoing_rx) = mpsc::channel();
    let peer_state = PeerState::new_guest(outgoing_tx);
    run_session(socket, SocketRole::Client, peer_state, outgoing_rx)
}

fn run_session(
    mut socket_in: WebSocket<TcpStream>, socket_role: SocketRole, mut peer_state: PeerState,
    outgoing_rx: mpsc::Receiver<String>,
) -> anyhow::Result<()> {
    let mut socket_out = network::clone_websocket(&socket_in, socket_role)
        .context("Failed to clone socket")?;

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_input = tx.clone();
    let tx_tick = tx.clone();
    tx.send(ConsoleEvent::Peer(IncomingEvent::PeerConnected))
        .map_err(|_| anyhow!("Event channel closed"))?;
    thread::spawn(move || {
        loop {
            match network::read_text(&mut socket_in) {
                Ok(text) => {
                    if tx_net.send(ConsoleEvent::Peer(IncomingEvent::Network(text))).is_err() {
                        return;
                    }
                },
                Err(err) => {
                    info!("Connection lost: {err:?}");
                    let _ = tx_net.send(ConsoleEvent::Peer(IncomingEvent::PeerDisconnected));
                    return;
                },
            }
        }
    });
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx_input.send(ConsoleEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx_input.send(ConsoleEvent::InputClosed);
    });
    thread::spawn(move || {
        let mut last = Instant::now();
        loop {
            thread::sleep(TICK_PERIOD);
            let now = Instant::now();
            if tx_tick.send(ConsoleEvent::Peer(IncomingEvent::Tick(now - last))).is_err() {
                return;
            }
            last = now;
        }
    });
    thread::spawn(move || {
        for text in outgoing_rx {
            if let Err(err) = network::write_text(&mut socket_out, text) {
                warn!("Cannot send message: {err:?}");
                return;
            }
        }
    });

    let mut last_render = String::new();
    let mut message: Option<String> = None;
    for event in rx {
        match event {
            ConsoleEvent::Peer(event) => match peer_state.apply_event(event) {
                Ok(NotableEvent::GameStarted) => {
                    message = Some("New game started".to_owned());
                },
                Ok(NotableEvent::PeerConnected) => {
                    message = Some("Connected, waiting for the host".to_owned());
                },
                Ok(NotableEvent::None
                    | NotableEvent::OpponentMoved
                    | NotableEvent::TurnChanged(_)
                    | NotableEvent::GameOver(_)) => {},
                Err(err) => {
                    message = Some(format!("Ignored peer message: {err:?}"));
                },
            },
            ConsoleEvent::Input(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                message = match parse_command(&line) {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(Command::Restart) => {
                        peer_state.restart().err().map(|err| describe_command_error(&err))
                    },
                    Ok(Command::Move(from, to)) => {
                        peer_state.make_move(from, to).err().map(|err| describe_command_error(&err))
                    },
                    Err(err) => Some(err),
                };
                // Force a repaint so that the message shows up.
                last_render.clear();
            },
            ConsoleEvent::InputClosed => return Ok(()),
        }
        let (Some(game), Some(local_force)) = (peer_state.game(), peer_state.local_force()) else {
            if let Some(message) = message.take() {
                println!("{message}");
            }
            continue;
        };
        let rendered = tui::render_game(game, local_force);
        if rendered != last_render {
            println!("{rendered}");
            if let Some(message) = message.take() {
                println!("{message}");
            }
            last_render = rendered;
        }
    }
    Ok(())
}
