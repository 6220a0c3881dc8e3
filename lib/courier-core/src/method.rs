//! The HTTP verb carried by an [`HttpRequest`](crate::HttpRequest).

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// HTTP request method, set on the request by `SetMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl Method {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive.
impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Delete,
            Self::Patch,
            Self::Head,
            Self::Options,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| Error::invalid_request(format!("unsupported HTTP method: {s}")))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_wire_name() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::default().to_string(), "GET");
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("post".parse::<Method>().expect("POST"), Method::Post);
        assert_eq!("Delete".parse::<Method>().expect("DELETE"), Method::Delete);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn converts_to_http() {
        assert_eq!(http::Method::from(Method::Head), http::Method::HEAD);
        assert_eq!(http::Method::from(Method::Options), http::Method::OPTIONS);
    }
}
