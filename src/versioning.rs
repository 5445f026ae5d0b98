//! Header-based API versioning.
//!
//! Clients pick a version with the `api-version` request header. Requests
//! without it are served as the default version. Every response reports the
//! supported versions in `api-supported-versions`.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::fmt;
use std::str::FromStr;

use crate::errors::ApiError;

pub const API_VERSION_HEADER: &str = "api-version";
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const V1_0: ApiVersion = ApiVersion { major: 1, minor: 0 };
    pub const DEFAULT: ApiVersion = Self::V1_0;
    pub const SUPPORTED: &'static [ApiVersion] = &[Self::V1_0];

    #[must_use]
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    fn supported_header() -> String {
        Self::SUPPORTED
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = ();

    /// Accepts `major` or `major.minor`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = match s.trim().split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s.trim(), "0"),
        };
        Ok(ApiVersion {
            major: major.parse().map_err(|_| ())?,
            minor: minor.parse().map_err(|_| ())?,
        })
    }
}

fn with_supported_versions(mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&ApiVersion::supported_header()) {
        response.headers_mut().insert(SUPPORTED_VERSIONS_HEADER, value);
    }
    response
}

/// Reject requests asking for an unsupported API version.
///
/// A request without the `api-version` header is served as [`ApiVersion::DEFAULT`].
pub async fn api_version(request: Request, next: Next) -> Response {
    let requested = request
        .headers()
        .get(API_VERSION_HEADER)
        .map(|raw| String::from_utf8_lossy(raw.as_bytes()).into_owned());
    let version = match &requested {
        None => Ok(ApiVersion::DEFAULT),
        Some(raw) => raw.parse::<ApiVersion>(),
    };

    if !version.is_ok_and(ApiVersion::is_supported) {
        let error = ApiError::bad_request(format!(
            "Unsupported API version '{}', supported: {}",
            requested.unwrap_or_default(),
            ApiVersion::supported_header()
        ));
        return with_supported_versions(error.into_response());
    }

    with_supported_versions(next.run(request).await)
}
