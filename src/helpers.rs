use crate::error::{Error, FileError, ParameterError};
use crate::types::HttpClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use reqwest::cookie::CookieStore;
use reqwest::header;
use reqwest_middleware::ClientBuilder;
use serde::de::DeserializeOwned;
use lazy_regex::regex_is_match;

pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36";

/// Builds the default client. Cookies from `cookie_store` are sent with every request. No
/// retry middleware is attached; a failed request is left for the next poll.
pub fn get_default_middleware<T>(
    cookie_store: Arc<T>,
    user_agent_string: &'static str,
) -> Result<HttpClient, Error>
where
    T: CookieStore + 'static,
{
    let mut headers = header::HeaderMap::new();

    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(user_agent_string));

    let client = reqwest::ClientBuilder::new()
        .cookie_provider(cookie_store)
        .default_headers(headers)
        .build()?;

    Ok(ClientBuilder::new(client).build())
}

/// The default directory for cached data.
pub fn default_data_directory() -> PathBuf {
    directories::ProjectDirs::from("com", "strrev", "trade-notifier")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("strrev-trade-notifier"))
}

/// Splits a `;`-separated cookie header value into individual `name=value` cookies.
pub fn parse_cookies(cookies: &str) -> Result<Vec<String>, ParameterError> {
    cookies
        .split(';')
        .map(str::trim)
        .filter(|cookie| !cookie.is_empty())
        .map(|cookie| match cookie.split_once('=') {
            Some((name, _value)) if !name.trim().is_empty() => Ok(cookie.to_string()),
            _ => Err(ParameterError::MalformedCookie(cookie.to_string())),
        })
        .collect()
}

fn is_login(location_option: Option<&header::HeaderValue>) -> bool {
    match location_option {
        Some(location) => {
            if let Ok(location_str) = location.to_str() {
                regex_is_match!("/login", location_str)
            } else {
                false
            }
        },
        None => false,
    }
}

/// Checks the status of a response and reads its body.
pub async fn check_response(response: reqwest::Response) -> Result<bytes::Bytes, Error> {
    let status = &response.status();

    // Redirects are followed, so an expired session ends up on the login page.
    if regex_is_match!("/login", response.url().path()) {
        return Err(Error::NotLoggedIn);
    }

    match status.as_u16() {
        300..=399 if is_login(response.headers().get(header::LOCATION)) => {
            Err(Error::NotLoggedIn)
        },
        200..=299 => {
            Ok(response.bytes().await?)
        },
        _ => {
            Err(Error::Http(*status))
        },
    }
}

/// Checks the response and deserializes its JSON body.
pub async fn parses_response<D>(response: reqwest::Response) -> Result<D, Error>
where
    D: DeserializeOwned,
{
    let body = check_response(response).await?;

    match serde_json::from_slice::<D>(&body) {
        Ok(body) => Ok(body),
        Err(parse_error) => {
            log::debug!("Unexpected response body: {}", String::from_utf8_lossy(&body));
            Err(Error::Parse(parse_error))
        },
    }
}

/// Writes a file atomically by writing to a temporary file and renaming it over `filepath`.
pub async fn write_file_atomic(
    filepath: PathBuf,
    bytes: &[u8],
) -> Result<(), FileError> {
    let mut temp_filepath = filepath.clone();
    let filename = filepath
        .file_name()
        .and_then(|filename| filename.to_str())
        .ok_or(FileError::PathError)?;

    temp_filepath.set_file_name(format!(".{filename}.tmp"));

    if let Some(parent) = filepath.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match async_fs::write(&temp_filepath, bytes).await {
        Ok(_) => {
            async_fs::rename(&temp_filepath, &filepath).await?;
            Ok(())
        },
        Err(error) => {
            // Clean up the partial file.
            let _ = async_fs::remove_file(&temp_filepath).await;
            Err(error.into())
        },
    }
}

/// Checks whether a file exists at `path`.
pub async fn file_exists(path: &Path) -> bool {
    async_fs::metadata(path).await.is_ok()
}
