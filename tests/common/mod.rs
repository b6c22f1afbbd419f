#![allow(dead_code)]

pub mod test_server {
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Once;

    use kuweb::routes::app_router;
    use kuweb::server::{AppService, HttpServer, ServerHandle};
    use kuweb::state::AppState;
    use kuweb::static_files::StaticFiles;
    use kuweb::store::Store;
    use kuweb::templates::Templates;
    use tempfile::TempDir;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    fn repo_dir(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
    }

    /// Running application over a throwaway data directory.
    ///
    /// Templates and images come from the repository; the server is stopped
    /// and the data directory removed on drop.
    pub struct TestServer {
        handle: Option<ServerHandle>,
        addr: SocketAddr,
        data_dir: TempDir,
    }

    impl TestServer {
        pub fn start() -> Self {
            setup_may_runtime();
            let data_dir = TempDir::new().unwrap();
            let store = Store::open(data_dir.path()).unwrap();
            let state = AppState::new(
                store,
                Templates::new(repo_dir("templates")),
                StaticFiles::new(repo_dir("static")),
            );
            let handle = HttpServer(AppService::new(app_router(), state))
                .start("127.0.0.1:0")
                .unwrap();
            handle.wait_ready().unwrap();
            let addr = handle.addr();
            Self {
                handle: Some(handle),
                addr,
                data_dir,
            }
        }

        pub fn addr(&self) -> SocketAddr {
            self.addr
        }

        /// A second store handle over the server's data directory.
        pub fn store(&self) -> Store {
            Store::open(self.data_dir.path()).unwrap()
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Parsed reply: status code, headers in wire order, raw body.
    pub struct Reply {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl Reply {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }

        /// `name=value` from the `Set-Cookie` header, if any.
        pub fn cookie(&self) -> Option<String> {
            self.header("Set-Cookie")
                .map(|v| v.split(';').next().unwrap_or_default().to_string())
        }
    }

    /// Write raw bytes and read until the server closes the connection.
    pub fn send_raw(addr: SocketAddr, raw: &[u8]) -> Reply {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(raw).unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        parse_reply(&buf)
    }

    fn cookie_line(cookie: Option<&str>) -> String {
        cookie
            .map(|c| format!("Cookie: {c}\r\n"))
            .unwrap_or_default()
    }

    pub fn get(addr: SocketAddr, path: &str, cookie: Option<&str>) -> Reply {
        let req = format!(
            "GET {path} HTTP/1.1\r\nHost: localhost\r\n{}\r\n",
            cookie_line(cookie)
        );
        send_raw(addr, req.as_bytes())
    }

    pub fn post_form(addr: SocketAddr, path: &str, form: &str, cookie: Option<&str>) -> Reply {
        let req = format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\n{}Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{form}",
            cookie_line(cookie),
            form.len()
        );
        send_raw(addr, req.as_bytes())
    }

    pub fn parse_reply(buf: &[u8]) -> Reply {
        let split = buf
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("reply has a header terminator");
        let head = String::from_utf8_lossy(&buf[..split]).into_owned();
        let mut lines = head.split("\r\n");
        let status = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .expect("status line");
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        Reply {
            status,
            headers,
            body: buf[split + 4..].to_vec(),
        }
    }
}
