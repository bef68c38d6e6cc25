use bytes::Bytes;
use percent_encoding::percent_decode;

/// A single request header as it arrived on the wire.
///
/// Neither the name nor the value is case-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: Bytes,
    pub value: Bytes,
}

impl Header {
    pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Method and version are stored upper-cased. The URI is kept raw; decoding
/// and query splitting happen in the accessors.
#[derive(Debug, Clone)]
pub struct Request {
    /// The request method, upper-cased
    pub method: Bytes,
    /// The raw request target (e.g. "/a%20b?x=1")
    pub uri: Bytes,
    /// Protocol version, upper-cased
    pub version: Bytes,
    /// Headers in arrival order
    pub headers: Vec<Header>,
}

impl Request {
    /// Creates a request with no headers, upper-casing method and version.
    pub fn new(method: &[u8], uri: Bytes, version: &[u8]) -> Self {
        Self {
            method: Bytes::from(method.to_ascii_uppercase()),
            uri,
            version: Bytes::from(version.to_ascii_uppercase()),
            headers: Vec::new(),
        }
    }

    pub fn method(&self) -> String {
        String::from_utf8_lossy(&self.method).to_ascii_uppercase()
    }

    pub fn version(&self) -> String {
        String::from_utf8_lossy(&self.version).to_ascii_uppercase()
    }

    /// Returns the percent-decoded path portion of the URI.
    ///
    /// A path that cannot be decoded is returned as-is.
    pub fn uri(&self) -> String {
        let path = self.split_uri().0;
        decode_path(path).unwrap_or_else(|| String::from_utf8_lossy(path).into_owned())
    }

    /// Returns everything after the first `?`, undecoded, or an empty string.
    pub fn query(&self) -> String {
        self.split_uri()
            .1
            .map(|q| String::from_utf8_lossy(q).into_owned())
            .unwrap_or_default()
    }

    /// Retrieves the first header whose name matches `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name.as_bytes()))
            .map(|h| &h.value[..])
    }

    fn split_uri(&self) -> (&[u8], Option<&[u8]>) {
        match self.uri.iter().position(|&b| b == b'?') {
            Some(pos) => (&self.uri[..pos], Some(&self.uri[pos + 1..])),
            None => (&self.uri[..], None),
        }
    }
}

/// Decodes `%XX` escapes, failing on malformed escapes or non UTF-8 output.
fn decode_path(raw: &[u8]) -> Option<String> {
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let escape = raw.get(i + 1..i + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}
