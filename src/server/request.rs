use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};

use http::Method;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::ids::RequestId;

/// Upper bound on the bytes accepted for one request (head and body).
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw bytes that could not be turned into a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace was received
    Empty,
    /// The request line does not have the `METHOD TARGET VERSION` shape
    MalformedRequestLine(String),
    /// The method token is not a valid HTTP method
    InvalidMethod(String),
    /// The request target is not an origin-form path
    InvalidTarget(String),
    /// Only HTTP/1.0 and HTTP/1.1 are understood
    UnsupportedVersion(String),
    /// The request exceeded [`MAX_REQUEST_BYTES`]
    TooLarge,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty request"),
            ParseError::MalformedRequestLine(line) => write!(f, "malformed request line '{}'", line),
            ParseError::InvalidMethod(method) => write!(f, "invalid method '{}'", method),
            ParseError::InvalidTarget(target) => write!(f, "invalid request target '{}'", target),
            ParseError::UnsupportedVersion(version) => {
                write!(f, "unsupported protocol version '{}'", version)
            }
            ParseError::TooLarge => write!(f, "request exceeds {} bytes", MAX_REQUEST_BYTES),
        }
    }
}

impl std::error::Error for ParseError {}

/// One parsed HTTP/1.x request.
///
/// Header names are stored lowercase. Query, cookie and form maps are empty
/// when the corresponding part of the request is absent.
#[derive(Debug)]
pub struct Request {
    /// Correlation id for log lines (taken from `x-request-id` when valid)
    pub request_id: RequestId,
    pub method: Method,
    /// Path without the query string, not percent-decoded
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    pub body: String,
    form: OnceCell<HashMap<String, String>>,
}

impl Request {
    /// Parse raw request bytes.
    pub fn parse(raw: &[u8]) -> Result<Request, ParseError> {
        if raw.len() > MAX_REQUEST_BYTES {
            return Err(ParseError::TooLarge);
        }
        let (head, body) = match find_header_end(raw) {
            Some(end) => (&raw[..end], &raw[end..]),
            None => (raw, &raw[raw.len()..]),
        };
        let head = String::from_utf8_lossy(head);
        let mut lines = head.lines().skip_while(|l| l.trim().is_empty());

        let request_line = lines.next().ok_or(ParseError::Empty)?;
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::MalformedRequestLine(request_line.to_string()));
        };

        if version != "HTTP/1.1" && version != "HTTP/1.0" {
            return Err(ParseError::UnsupportedVersion(version.to_string()));
        }
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| ParseError::InvalidMethod(method.to_string()))?;
        if !target.starts_with('/') {
            return Err(ParseError::InvalidTarget(target.to_string()));
        }

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_query(query)),
            None => (target.to_string(), HashMap::new()),
        };

        let mut headers = HashMap::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
                None => debug!(line = %line, "Skipping header line without colon"),
            }
        }

        let cookies = parse_cookies(&headers);
        let request_id =
            RequestId::from_header_or_new(headers.get("x-request-id").map(String::as_str));

        debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            header_count = headers.len(),
            cookie_count = cookies.len(),
            query_count = query.len(),
            body_bytes = body.len(),
            "HTTP request parsed"
        );

        Ok(Request {
            request_id,
            method,
            path,
            query,
            headers,
            cookies,
            body: String::from_utf8_lossy(body).into_owned(),
            form: OnceCell::new(),
        })
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// URL-encoded form fields from the body.
    ///
    /// Computed on first use. Empty unless the request is a POST whose
    /// `Content-Type` is `application/x-www-form-urlencoded`.
    pub fn form(&self) -> &HashMap<String, String> {
        self.form.get_or_init(|| {
            let is_form = self
                .header("content-type")
                .is_some_and(|ct| ct.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE));
            if self.method == Method::POST && is_form {
                parse_query(&self.body)
            } else {
                HashMap::new()
            }
        })
    }

    /// Single form field, or `""` when absent.
    pub fn form_value(&self, name: &str) -> &str {
        self.form().get(name).map(String::as_str).unwrap_or("")
    }
}

/// Parse cookies from the `cookie` header of a lowercase header map.
///
/// Values are percent-decoded; `+` is kept literally and a value that does
/// not decode to UTF-8 is kept as sent.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let raw = parts.next().unwrap_or("").trim();
                    let value = urlencoding::decode(raw)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| raw.to_string());
                    Some((name.to_string(), value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse an `a=1&b=2` string with percent-decoding and `+` as space.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Index just past the blank line ending the header block.
fn find_header_end(raw: &[u8]) -> Option<usize> {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return Some(pos + 4);
    }
    raw.windows(2).position(|w| w == b"\n\n").map(|pos| pos + 2)
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Read one request from `stream`: the header block plus `Content-Length`
/// body bytes. Stops early at end of stream; never reads more than one
/// byte past [`MAX_REQUEST_BYTES`].
pub fn read_request<R: Read>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = find_header_end(&buf) {
            let wanted = end.saturating_add(content_length(&buf[..end]));
            if buf.len() >= wanted {
                buf.truncate(wanted);
                break;
            }
        }
        if buf.len() > MAX_REQUEST_BYTES {
            break;
        }
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let mut h = HashMap::new();
        h.insert("cookie".to_string(), "a=b; c=d; flag".to_string());
        let cookies = parse_cookies(&h);
        assert_eq!(cookies.get("a"), Some(&"b".to_string()));
        assert_eq!(cookies.get("c"), Some(&"d".to_string()));
        assert_eq!(cookies.get("flag"), Some(&String::new()));
    }

    #[test]
    fn test_cookie_values_are_percent_decoded() {
        let req = Request::parse(
            b"GET / HTTP/1.1\r\nCookie: note=hello%20world; sum=1+1; bad=%FF\r\n\r\n",
        )
        .unwrap();
        assert_eq!(req.cookie("note"), Some("hello world"));
        assert_eq!(req.cookie("sum"), Some("1+1"));
        assert_eq!(req.cookie("bad"), Some("%FF"));
    }

    #[test]
    fn test_parse_query() {
        let q = parse_query("x=1&y=hello+world&z=%E4%BD%A0");
        assert_eq!(q.get("x"), Some(&"1".to_string()));
        assert_eq!(q.get("y"), Some(&"hello world".to_string()));
        assert_eq!(q.get("z"), Some(&"你".to_string()));
    }

    #[test]
    fn test_parse_get_with_query_and_cookies() {
        let raw = b"GET /todo/edit?id=3 HTTP/1.1\r\nHost: localhost\r\nCookie: user=abc; theme=dark\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/todo/edit");
        assert_eq!(req.query_param("id"), Some("3"));
        assert_eq!(req.cookie("user"), Some("abc"));
        assert_eq!(req.header("HOST"), Some("localhost"));
        assert!(req.form().is_empty());
    }

    #[test]
    fn test_parse_minimal_request() {
        let req = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.path, "/");
        assert!(req.query.is_empty());
        assert!(req.cookies.is_empty());
        assert!(req.body.is_empty());
        assert!(req.form().is_empty());
    }

    #[test]
    fn test_parse_form_body() {
        let body = "username=gua&password=1%2623";
        let raw = format!(
            "POST /login HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let req = Request::parse(raw.as_bytes()).unwrap();
        assert_eq!(req.form_value("username"), "gua");
        assert_eq!(req.form_value("password"), "1&23");
        assert_eq!(req.form_value("missing"), "");
    }

    #[test]
    fn test_form_requires_post_and_form_content_type() {
        let json = b"POST /login HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"a\":1}";
        assert!(Request::parse(json).unwrap().form().is_empty());

        let get = b"GET /login HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\na=1";
        assert!(Request::parse(get).unwrap().form().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Request::parse(b"").unwrap_err(), ParseError::Empty);
        assert_eq!(Request::parse(b"\r\n\r\n").unwrap_err(), ParseError::Empty);
        assert!(matches!(
            Request::parse(b"GET\r\n\r\n"),
            Err(ParseError::MalformedRequestLine(_))
        ));
        assert!(matches!(
            Request::parse(b"G(T / HTTP/1.1\r\n\r\n"),
            Err(ParseError::InvalidMethod(_))
        ));
        assert!(matches!(
            Request::parse(b"GET example.com HTTP/1.1\r\n\r\n"),
            Err(ParseError::InvalidTarget(_))
        ));
        assert!(matches!(
            Request::parse(b"GET / SPDY/3\r\n\r\n"),
            Err(ParseError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_read_request_honours_content_length() {
        let raw = b"POST /message HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA".to_vec();
        let mut cursor = io::Cursor::new(raw);
        let read = read_request(&mut cursor).unwrap();
        assert!(read.ends_with(b"\r\n\r\nhello"));
    }

    #[test]
    fn test_read_request_stops_at_eof() {
        let mut cursor = io::Cursor::new(b"GET / HTTP/1.1\r\n".to_vec());
        let read = read_request(&mut cursor).unwrap();
        assert_eq!(read, b"GET / HTTP/1.1\r\n");
        assert!(Request::parse(&read).is_ok());
    }
}
