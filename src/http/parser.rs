use bytes::Bytes;

use crate::http::request::{Method, Request, RequestLine};

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Marker the request line must contain to be recognized.
const VERSION_MARKER: &[u8] = b" HTTP/";

/// Decodes a request head (and any body bytes after it) from `buf`.
///
/// Never fails: a first line without ` HTTP/` leaves [`Request::line`]
/// unset, and a buffer that stops before the blank line yields the headers
/// seen so far with [`Request::head_len`] and [`Request::body`] unset.
/// Decoding again once more bytes have arrived gives the complete request.
pub fn decode_request(buf: &[u8]) -> Request {
    let mut request = Request::default();
    let mut lines = Lines::new(buf);

    let Some(first) = lines.next() else {
        return request;
    };
    if !contains(first.text, VERSION_MARKER) {
        return request;
    }
    request.line = parse_request_line(first.text);

    if first.ends_head {
        finish_head(&mut request, buf, first.end);
        return request;
    }

    for line in lines {
        if !line.text.is_empty() {
            if let Some((key, value)) = split_header(line.text) {
                request.headers.insert(key, value);
            }
        }
        if line.ends_head {
            finish_head(&mut request, buf, line.end);
            break;
        }
    }

    request
}

fn finish_head(request: &mut Request, buf: &[u8], end: usize) {
    request.head_len = Some(end);
    if end < buf.len() {
        request.body = Some(Bytes::copy_from_slice(&buf[end..]));
    }
}

/// Offset of the first byte after the blank line ending the head.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    Lines::new(buf).find(|l| l.ends_head).map(|l| l.end)
}

fn parse_request_line(text: &[u8]) -> Option<RequestLine> {
    let text = std::str::from_utf8(text).ok()?;
    let mut parts = text.split(' ');
    let method = parts.next().filter(|m| !m.is_empty())?;
    let path = parts.next().filter(|p| !p.is_empty())?;

    Some(RequestLine {
        method: Method::from_token(method),
        path: path.to_string(),
    })
}

fn split_header(text: &[u8]) -> Option<(String, String)> {
    let colon = text.iter().position(|&b| b == b':')?;
    let key = String::from_utf8_lossy(&text[..colon]).trim().to_string();
    let value = String::from_utf8_lossy(&text[colon + 1..]).trim().to_string();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// One LF-terminated line of a head.
struct Line<'a> {
    /// Line content without its CR LF / LF terminator.
    text: &'a [u8],
    /// Offset just past the terminator.
    end: usize,
    /// The terminator is immediately followed by CR LF, i.e. the next line
    /// is the blank separator; `end` is then moved past it.
    ends_head: bool,
}

struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    // Only complete lines are yielded; a trailing fragment without LF is
    // part of a head that has not fully arrived yet.
    fn next(&mut self) -> Option<Line<'a>> {
        if self.done {
            return None;
        }

        let buf = self.buf;
        let start = self.pos;
        let lf = start + buf[start..].iter().position(|&b| b == LF)?;
        let mut text = &buf[start..lf];
        if text.last() == Some(&CR) {
            text = &text[..text.len() - 1];
        }

        let mut end = lf + 1;
        // Boundary check on the bytes around the terminator: the line ended
        // in CR LF and the next two bytes are CR LF as well.
        let ends_head = lf >= 1
            && buf[lf - 1] == CR
            && buf.get(end) == Some(&CR)
            && buf.get(end + 1) == Some(&LF);
        if ends_head {
            end += 2;
            self.done = true;
        }

        self.pos = end;
        Some(Line {
            text,
            end,
            ends_head,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = decode_request(req);

        assert_eq!(parsed.path(), Some("/"));
        assert_eq!(parsed.header("host"), Some("example.com"));
        assert_eq!(parsed.head_len, Some(req.len()));
        assert_eq!(parsed.body, None);
        assert_eq!(find_headers_end(req), Some(req.len()));
    }

    #[test]
    fn separator_split_across_buffers() {
        let req = b"GET /a.txt HTTP/1.1\r\nAccept: */*\r\n\r\n";
        let cut = req.len() - 3;

        let partial = decode_request(&req[..cut]);
        assert!(partial.line.is_some());
        assert!(!partial.is_head_complete());
        assert_eq!(find_headers_end(&req[..cut]), None);

        let full = decode_request(req);
        assert!(full.is_head_complete());
        assert_eq!(full.header("accept"), Some("*/*"));
    }
}
