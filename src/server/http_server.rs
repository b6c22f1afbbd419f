use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use may::coroutine::JoinHandle;
use may::net::TcpListener;
use tracing::{debug, info, warn};

use super::service::AppService;

/// TCP front end: one accept-loop coroutine, one coroutine per connection.
///
/// Each connection carries exactly one request; the server closes it after
/// writing the response.
pub struct HttpServer(pub AppService);

/// Handle to a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address actually bound (useful when binding port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll the listening socket until it accepts connections.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server is not reachable within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if let Ok(probe) = TcpStream::connect(self.addr) {
                // The probe is accepted and answered like an empty request.
                drop(probe);
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Cancel the accept loop and wait for it to finish.
    pub fn stop(self) {
        // SAFETY: cancelling a coroutine we own; the accept loop holds no
        // state that needs unwinding beyond its listener.
        unsafe {
            self.handle.coroutine().cancel();
        }
        if self.handle.join().is_err() {
            debug!("Accept loop ended by cancellation");
        }
    }

    /// Block until the accept loop ends.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl HttpServer {
    /// Bind `addr` and start accepting connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let listener = TcpListener::bind(addr)?;
        let addr = listener.local_addr()?;
        info!(%addr, "Listening server at http://{}", addr);

        let service = self.0;
        let handle = may::go!(move || {
            for stream in listener.incoming() {
                let mut stream = match stream {
                    Ok(stream) => stream,
                    Err(e) => {
                        warn!(error = %e, "Accept failed");
                        continue;
                    }
                };
                let service = service.clone();
                may::go!(move || {
                    if let Err(e) = service.serve_connection(&mut stream) {
                        warn!(error = %e, "Connection error");
                    }
                    if let Err(e) = stream.shutdown(Shutdown::Both) {
                        debug!(error = %e, "Shutdown after response failed");
                    }
                });
            }
        });
        Ok(ServerHandle { addr, handle })
    }
}
