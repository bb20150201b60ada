use super::{TradeAPI, DEFAULT_API_PATH, DEFAULT_HOSTNAME};
use super::helpers::api_base_url;
use crate::error::{Error, ParameterError};
use crate::helpers::{get_default_middleware, USER_AGENT_STRING};
use std::sync::Arc;
use reqwest::cookie::Jar;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

/// Builder for constructing a [`TradeAPI`].
#[derive(Debug, Clone)]
pub struct TradeAPIBuilder {
    /// The site root. Image URLs are resolved against this.
    pub(crate) hostname: String,
    /// The path of the API relative to the hostname.
    pub(crate) api_path: String,
    /// Request cookies.
    pub(crate) cookie_jar: Option<Arc<Jar>>,
    /// Client to use for requests. Remember to also include the cookies connected to this client.
    pub(crate) client: Option<ClientWithMiddleware>,
    /// User agent for requests.
    pub(crate) user_agent: &'static str,
}

impl Default for TradeAPIBuilder {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.into(),
            api_path: DEFAULT_API_PATH.into(),
            cookie_jar: None,
            client: None,
            user_agent: USER_AGENT_STRING,
        }
    }
}

impl TradeAPIBuilder {
    /// Creates a new [`TradeAPIBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The site root. Defaults to `https://www.strrev.com`.
    pub fn hostname<T>(mut self, hostname: T) -> Self
    where
        T: Into<String>,
    {
        self.hostname = hostname.into();
        self
    }

    /// The path of the API relative to the hostname. Defaults to `/apisite`.
    pub fn api_path<T>(mut self, api_path: T) -> Self
    where
        T: Into<String>,
    {
        self.api_path = api_path.into();
        self
    }

    /// Client to use for requests. It is also required to include the associated cookies with this
    /// client so that the `set_cookies` method works as expected.
    pub fn client(mut self, client: ClientWithMiddleware, cookies: Arc<Jar>) -> Self {
        self.client = Some(client);
        self.cookie_jar = Some(cookies);
        self
    }

    /// The user agent for requests. Ignored when a client is supplied.
    pub fn user_agent(mut self, user_agent: &'static str) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Builds the [`TradeAPI`].
    pub fn build(self) -> Result<TradeAPI, Error> {
        let hostname = Url::parse(&self.hostname)
            .map_err(ParameterError::UrlParse)?;
        let cookies = self.cookie_jar
            .unwrap_or_else(|| Arc::new(Jar::default()));
        let client = match self.client {
            Some(client) => client,
            None => get_default_middleware(Arc::clone(&cookies), self.user_agent)?,
        };
        let api_url = api_base_url(&hostname, &self.api_path);

        Ok(TradeAPI {
            client,
            cookies,
            hostname,
            api_url,
        })
    }
}
