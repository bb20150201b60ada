//! Error types.

use reqwest::StatusCode;

/// Any error that can occur while talking to the site or emitting notifications.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An input parameter is missing or invalid.
    #[error("Invalid parameter: {}", .0)]
    Parameter(#[from] ParameterError),
    /// An unexpected response was received.
    #[error("Unexpected response: {}", .0)]
    Response(String),
    /// An error was encountered making a request.
    #[error("Request error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    /// An error was encountered within the request middleware.
    #[error("Request middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
    /// An error was encountered parsing a JSON response body.
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    /// A non-success status code was received.
    #[error("Error {}", .0)]
    Http(StatusCode),
    /// The session cookies are missing or expired.
    #[error("Not logged in")]
    NotLoggedIn,
    /// The trade did not contain an offer for each party.
    #[error("Trade has {} offers, expected at least 2", .0)]
    MissingOffers(usize),
    /// The notification backend failed.
    #[error("Notification error: {}", .0)]
    Notification(String),
    /// An error occurred while caching a file.
    #[error("{}", .0)]
    File(#[from] FileError),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Error {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Error::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Error::ReqwestMiddleware(e),
        }
    }
}

/// An error with an input parameter.
#[derive(thiserror::Error, Debug)]
pub enum ParameterError {
    /// A URL could not be parsed.
    #[error("Error parsing URL: {}", .0)]
    UrlParse(#[from] url::ParseError),
    /// A cookie string was not in `name=value` form.
    #[error("Malformed cookie: {}", .0)]
    MalformedCookie(String),
}

/// An error reading or writing a cached file.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error("Filesystem error: {}", .0)]
    FileSystem(#[from] std::io::Error),
    #[error("Path conversion to string failed")]
    PathError,
}

/// An error loading configuration from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {}", .0)]
    Missing(&'static str),
    #[error("Invalid value for {}: {}", .0, .1)]
    Invalid(&'static str, String),
    #[error("{}", .0)]
    Parameter(#[from] ParameterError),
}
