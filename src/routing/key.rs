//! Endpoint identity.
//!
//! # Design Decisions
//! - Paths are compared segment by segment, case-sensitive
//! - Empty segments are dropped, so leading, trailing and doubled slashes
//!   never change identity
//! - Request segments are percent-decoded, so `/caf%C3%A9` matches the
//!   directory `café`; invalid UTF-8 after decoding is replaced lossily
//! - Method tokens are case-sensitive (`get` is not `GET`)

use std::fmt;

use axum::http::Method;
use percent_encoding::percent_decode_str;

/// Method tokens accepted as method directory names.
pub const SUPPORTED_METHODS: [Method; 8] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::TRACE,
];

/// Segment reserved for the control endpoint.
pub const CONTROL_SEGMENT: &str = "__ersatz";

/// Map a directory name to the method it stands for, if any.
pub fn method_for_dir(name: &str) -> Option<Method> {
    SUPPORTED_METHODS.iter().find(|m| m.as_str() == name).cloned()
}

/// Normalized URL path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointPath(Vec<String>);

impl EndpointPath {
    /// Normalize a raw URL path such as `/users/42/`.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('/')
                .filter(|s| !s.is_empty())
                .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                .collect(),
        )
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::<String>::into)
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True for the path served by the control plane.
    pub fn is_control(&self) -> bool {
        self.0.len() == 1 && self.0[0] == CONTROL_SEGMENT
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Identity of a routable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub method: Method,
    pub path: EndpointPath,
}

impl EndpointKey {
    pub fn new(method: Method, path: EndpointPath) -> Self {
        Self { method, path }
    }

    /// Build a key from a method token and a raw path.
    ///
    /// Returns `None` when `method` is not a valid HTTP token.
    pub fn parse(method: &str, path: &str) -> Option<Self> {
        let method = Method::from_bytes(method.as_bytes()).ok()?;
        Some(Self::new(method, EndpointPath::parse(path)))
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_normalization() {
        let expected = EndpointPath::from_segments(["endpoint1", "subendpoint1"]);
        assert_eq!(EndpointPath::parse("/endpoint1/subendpoint1"), expected);
        assert_eq!(EndpointPath::parse("/endpoint1/subendpoint1/"), expected);
        assert_eq!(EndpointPath::parse("endpoint1/subendpoint1"), expected);
        assert_eq!(EndpointPath::parse("//endpoint1//subendpoint1"), expected);
        assert_eq!(EndpointPath::parse("/"), EndpointPath::default());
    }

    #[test]
    fn test_path_percent_decoding() {
        assert_eq!(
            EndpointPath::parse("/caf%C3%A9"),
            EndpointPath::from_segments(["café"])
        );
        assert_eq!(
            EndpointPath::parse("/hello%20world/GET"),
            EndpointPath::from_segments(["hello world", "GET"])
        );
        // Already decoded input is left alone.
        assert_eq!(EndpointPath::parse("/café"), EndpointPath::from_segments(["café"]));
    }

    #[test]
    fn test_path_case_sensitive() {
        assert_ne!(EndpointPath::parse("/Users"), EndpointPath::parse("/users"));
    }

    #[test]
    fn test_display() {
        let key = EndpointKey::parse("POST", "some/endpoint").unwrap();
        assert_eq!(key.to_string(), "POST /some/endpoint");
        assert_eq!(EndpointPath::default().to_string(), "/");
    }

    #[test]
    fn test_method_dirs() {
        assert_eq!(method_for_dir("GET"), Some(Method::GET));
        assert_eq!(method_for_dir("PATCH"), Some(Method::PATCH));
        assert_eq!(method_for_dir("get"), None);
        assert_eq!(method_for_dir("users"), None);
    }

    #[test]
    fn test_key_method_case_sensitive() {
        assert_ne!(
            EndpointKey::parse("post", "/a").unwrap(),
            EndpointKey::parse("POST", "/a").unwrap()
        );
        assert!(EndpointKey::parse("NOT A TOKEN", "/a").is_none());
    }

    #[test]
    fn test_control_path() {
        assert!(EndpointPath::parse("/__ersatz").is_control());
        assert!(!EndpointPath::parse("/__ersatz/x").is_control());
    }
}
