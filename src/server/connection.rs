// Connection handling module
// Serves one accepted TCP connection with hyper's HTTP/1 server

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Handle a single connection in a local task.
///
/// Every request on the connection is dispatched to the media router.
/// `server.connection_timeout` bounds only the wait for a request head, so
/// an idle keep-alive connection is closed while a long response body keeps
/// streaming for as long as the client reads it. The active-connection
/// counter is decremented when the task ends.
///
/// Must run inside a `LocalSet`.
pub fn handle_connection(
    stream: TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);
    logger::log_connection_accepted(&peer_addr);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder
            .keep_alive(state.config.server.keep_alive)
            .timer(TokioTimer::new())
            .header_read_timeout(state.config.connection_timeout());

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), Some(peer_addr))
            }),
        );

        match conn.await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                logger::log_debug(&format!("Idle connection from {peer_addr} closed"));
            }
            Err(err) => logger::log_connection_error(&err),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
