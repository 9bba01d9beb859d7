use spool::http::headers::Headers;
use spool::http::request::{Method, Request, RequestLine};

fn request_with(headers: &[(&str, &str)]) -> Request {
    Request {
        line: Some(RequestLine {
            method: Method::POST,
            path: "/a.bin".to_string(),
        }),
        headers: headers.iter().copied().collect::<Headers>(),
        head_len: None,
        body: None,
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request_with(&[("Host", "example.com"), ("Content-Type", "application/json")]);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    assert_eq!(request_with(&[("Content-Length", "42")]).content_length(), Some(42));
    assert_eq!(request_with(&[]).content_length(), None);
    assert_eq!(
        request_with(&[("Content-Length", "not-a-number")]).content_length(),
        None
    );
}

#[test]
fn test_request_expects_continue() {
    assert!(request_with(&[("Expect", "100-continue")]).expects_continue());
    assert!(request_with(&[("expect", "100-Continue")]).expects_continue());
    assert!(!request_with(&[]).expects_continue());
}

#[test]
fn test_request_without_line() {
    let req = Request::default();

    assert_eq!(req.method(), None);
    assert_eq!(req.path(), None);
    assert!(!req.is_head_complete());
}

#[test]
fn test_method_tokens() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (token, expected) in methods {
        let method = Method::from_token(token);
        assert_eq!(method, expected);
        assert_eq!(method.as_str(), token);
    }

    assert_eq!(Method::from_token("get"), Method::Extension("get".to_string()));
}
