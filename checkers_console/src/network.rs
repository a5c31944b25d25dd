use std::io;
use std::net::TcpStream;

use tungstenite::{Message, WebSocket, protocol::Role};


#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    ConnectionClosed,
    UnexpectedMessage(String),
}

pub fn write_text<S>(socket: &mut WebSocket<S>, text: String) -> Result<(), CommunicationError>
where
    S: io::Read + io::Write,
{
    socket.send(Message::text(text)).map_err(CommunicationError::Socket)
}

// Skips control frames; fails on close and on binary data.
pub fn read_text<S>(socket: &mut WebSocket<S>) -> Result<String, CommunicationError>
where
    S: io::Read + io::Write,
{
    loop {
        match socket.read().map_err(CommunicationError::Socket)? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Close(_) => return Err(CommunicationError::ConnectionClosed),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {},
            msg @ Message::Binary(_) => {
                return Err(CommunicationError::UnexpectedMessage(format!(
                    "Expected text, got {msg:?}"
                )));
            },
        }
    }
}

// Improvement potential: Use a non-blocking stream and do reads and writes on the same thread
//   instead of cloning the socket.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: Role,
) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = *socket.get_config();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}
