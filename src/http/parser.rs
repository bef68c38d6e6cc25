use bytes::Bytes;
use thiserror::Error;

use crate::http::request::{Header, Request};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("wrong request line")]
    InvalidRequestLine,
    #[error("wrong header")]
    InvalidHeader,
}

/// Parses `METHOD SP URI SP VERSION` into a request with no headers.
///
/// The line is split on every single space, so anything other than exactly
/// three tokens (including doubled spaces) is rejected.
pub fn parse_request_line(line: &Bytes) -> Result<Request, ParseError> {
    let mut tokens = split_spaces(line);

    let (Some(method), Some(uri), Some(version), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(ParseError::InvalidRequestLine);
    };

    Ok(Request::new(&method, uri, &version))
}

/// Parses `Name: value`, splitting on the first colon.
///
/// The name is kept as-is; surrounding whitespace is trimmed from the value.
pub fn parse_header_line(line: &Bytes) -> Result<Header, ParseError> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(ParseError::InvalidHeader)?;

    let name = line.slice(..colon);
    let value = line.slice(colon + 1..);
    let value = value.slice_ref(value.trim_ascii());

    Ok(Header { name, value })
}

fn split_spaces(line: &Bytes) -> impl Iterator<Item = Bytes> + '_ {
    let mut start = 0;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        match line[start..].iter().position(|&b| b == b' ') {
            Some(pos) => {
                let token = line.slice(start..start + pos);
                start += pos + 1;
                Some(token)
            }
            None => {
                done = true;
                Some(line.slice(start..))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request_line(&Bytes::from_static(b"get /index.html http/1.0")).unwrap();

        assert_eq!(req.method(), "GET");
        assert_eq!(&req.uri[..], b"/index.html");
        assert_eq!(req.version(), "HTTP/1.0");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn split_keeps_empty_tokens() {
        let tokens: Vec<Bytes> = split_spaces(&Bytes::from_static(b"a  b ")).collect();
        assert_eq!(tokens, vec![
            Bytes::from_static(b"a"),
            Bytes::new(),
            Bytes::from_static(b"b"),
            Bytes::new(),
        ]);
    }

    #[test]
    fn header_value_is_trimmed() {
        let header = parse_header_line(&Bytes::from_static(b"X-Foo:   bar  ")).unwrap();

        assert_eq!(&header.name[..], b"X-Foo");
        assert_eq!(&header.value[..], b"bar");
    }
}
