// Listener module
// Creates the TCP listener with SO_REUSEADDR so restarts can rebind right away

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::ServerError;

const LISTEN_BACKLOG: i32 = 1024;

/// Create a `TcpListener` bound to `addr` with `SO_REUSEADDR` enabled.
///
/// Must be called from within a tokio runtime.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    create_listener(addr).map_err(|source| ServerError::Bind { addr, source })
}

fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Allow binding to a port in TIME_WAIT state
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
