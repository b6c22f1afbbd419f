/// Fixed body of the not-found response.
pub const NOT_FOUND_BODY: &str = "<h1>NOT FOUND</h1>";

/// Reason phrase written after the status code.
///
/// Every status is framed as `OK` except 404 and 500; browsers ignore the
/// phrase.
pub fn status_reason(status: u16) -> &'static str {
    match status {
        404 => "NOT FOUND",
        500 => "INTERNAL SERVER ERROR",
        _ => "OK",
    }
}

/// Response payload: text for pages, raw bytes for images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Bytes(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(s) => s.as_bytes(),
            Body::Bytes(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete HTTP response: status, ordered headers and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    headers: Vec<(String, String)>,
    pub body: Body,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Text(String::new()),
        }
    }

    /// 200 response with a `text/html` body.
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(200)
            .with_header("Content-Type", "text/html")
            .with_body(Body::Text(body.into()))
    }

    /// 200 response carrying raw bytes.
    pub fn bytes(content_type: &str, body: Vec<u8>) -> Self {
        Self::new(200)
            .with_header("Content-Type", content_type)
            .with_body(Body::Bytes(body))
    }

    /// 302 redirect to `location` with an empty body.
    pub fn redirect(location: &str) -> Self {
        Self::new(302).with_header("Location", location)
    }

    pub fn not_found() -> Self {
        Self::new(404).with_body(Body::Text(NOT_FOUND_BODY.to_string()))
    }

    pub fn internal_error() -> Self {
        Self::new(500)
            .with_header("Content-Type", "text/html")
            .with_body(Body::Text("<h1>INTERNAL SERVER ERROR</h1>".to_string()))
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header, replacing an existing one of the same name in place so
    /// the original insertion order is kept.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Status line, header lines and the blank separator line.
    pub fn head(&self) -> String {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, status_reason(self.status));
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        if self.header("Content-Length").is_none() {
            head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        }
        head.push_str("\r\n");
        head
    }

    /// Head bytes followed by the raw body bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let head = self.head();
        let mut out = Vec::with_capacity(head.len() + self.body.len());
        out.extend_from_slice(head.as_bytes());
        out.extend_from_slice(self.body.as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(302), "OK");
        assert_eq!(status_reason(404), "NOT FOUND");
        assert_eq!(status_reason(500), "INTERNAL SERVER ERROR");
    }

    #[test]
    fn test_html_framing() {
        let bytes = Response::html("<p>hi</p>").to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 9\r\n\r\n<p>hi</p>"
        );
    }

    #[test]
    fn test_redirect() {
        let res = Response::redirect("/login");
        assert_eq!(res.status, 302);
        assert_eq!(res.header("location"), Some("/login"));
        assert!(String::from_utf8(res.to_bytes())
            .unwrap()
            .starts_with("HTTP/1.1 302 OK\r\nLocation: /login\r\n"));
    }

    #[test]
    fn test_set_header_keeps_order() {
        let mut res = Response::html("x").with_header("Set-Cookie", "user=a");
        res.set_header("content-type", "text/plain");
        let names: Vec<_> = res.headers().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Content-Type", "Set-Cookie"]);
        assert_eq!(res.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_binary_body_is_appended_raw() {
        let body = vec![0x47, 0x49, 0x46, 0x00, 0xff];
        let bytes = Response::bytes("image/gif", body.clone()).to_bytes();
        assert!(bytes.ends_with(&body));
        assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_not_found() {
        let text = String::from_utf8(Response::not_found().to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 NOT FOUND\r\n"));
        assert!(text.ends_with(NOT_FOUND_BODY));
    }
}
