use crate::ipc::messages::{decode_command, encode_command, Action};
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

pub const DEFAULT_COMMAND_PORT: u16 = 47_823;
pub const COMMAND_PORT_ENV: &str = "SICKMOTION_COMMAND_PORT";
const MAX_DATAGRAM: usize = 2048;

/// Loopback address of the command channel on `port`.
pub fn command_endpoint(port: u16) -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
}

/// Port override from the environment, if it parses.
pub fn port_from_env() -> Option<u16> {
    let raw = std::env::var(COMMAND_PORT_ENV).ok()?;
    match raw.trim().parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring invalid {COMMAND_PORT_ENV}");
            None
        }
    }
}

/// Fire-and-forget sender. Delivery is at most once and unacknowledged.
pub struct CommandSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl CommandSender {
    pub fn new(port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(command_endpoint(0)).context("binding command sender")?;
        Ok(Self {
            socket,
            target: command_endpoint(port),
        })
    }

    pub fn send(&self, action: Action) -> Result<()> {
        let bytes = encode_command(action)?;
        self.socket
            .send_to(&bytes, self.target)
            .with_context(|| format!("sending {action} to {}", self.target))?;
        tracing::debug!(%action, target = %self.target, "command sent");
        Ok(())
    }
}

/// Send one action on the command channel.
pub fn send_action(action: Action, port: u16) -> Result<()> {
    CommandSender::new(port)?.send(action)
}

/// Non-blocking receiver drained from the UI loop.
pub struct CommandListener {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl CommandListener {
    /// Bind the loopback command port. Port 0 picks a free port (tests).
    pub fn bind(port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(command_endpoint(port))
            .with_context(|| format!("binding command channel on port {port}"))?;
        socket
            .set_nonblocking(true)
            .context("making command channel non-blocking")?;
        Ok(Self {
            socket,
            buf: vec![0; MAX_DATAGRAM],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Every recognised action received since the last call, in arrival
    /// order. Unrecognised datagrams are dropped.
    pub fn drain(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        loop {
            match self.socket.recv_from(&mut self.buf) {
                Ok((len, from)) => match decode_command(&self.buf[..len]) {
                    Some(action) => actions.push(action),
                    None => tracing::debug!(%from, len, "ignoring unrecognised command payload"),
                },
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) => {
                    tracing::debug!(error = %err, "command channel receive failed");
                    break;
                }
            }
        }
        actions
    }
}
