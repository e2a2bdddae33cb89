//! Remote endpoint definitions.

use super::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Default API root used when `api-url` is omitted.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// One side of a migration: where the API lives, which repository, and how
/// to authenticate.
///
/// Built once per run and never mutated afterwards.
#[derive(Clone)]
pub struct RemoteEndpoint {
    api_url: Url,
    repository: String,
    token: String,
    proxy: Option<String>,
    ca_bundle: Option<PathBuf>,
    clone_url: Option<Url>,
}

impl RemoteEndpoint {
    /// Creates an endpoint for `repository` (in `owner/name` form).
    pub fn new(api_url: Url, repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url,
            repository: repository.into(),
            token: token.into(),
            proxy: None,
            ca_bundle: None,
            clone_url: None,
        }
    }

    /// Routes every request through `proxy`.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Trusts the certificates in the PEM bundle at `path`.
    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    /// Sets the git URL used by the mirror step.
    pub fn with_clone_url(mut self, clone_url: Url) -> Self {
        self.clone_url = Some(clone_url);
        self
    }

    /// Returns the API root.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Returns the repository in `owner/name` form.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the proxy URL, if any.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Returns the CA bundle path, if any.
    pub fn ca_bundle(&self) -> Option<&Path> {
        self.ca_bundle.as_deref()
    }

    /// Returns `{api-url}/repos/{owner}/{name}`, the root of every route.
    pub fn repository_url(&self) -> String {
        format!(
            "{}/repos/{}",
            self.api_url.as_str().trim_end_matches('/'),
            self.repository
        )
    }

    /// Returns the git URL of the repository.
    ///
    /// Falls back to `https://github.com/{owner}/{name}.git` for the public
    /// GitHub API; other hosts need an explicit `clone-url`.
    pub fn clone_url(&self) -> Option<Url> {
        if let Some(url) = &self.clone_url {
            return Some(url.clone());
        }

        if self.api_url.host_str() == Some("api.github.com") {
            return Url::parse(&format!("https://github.com/{}.git", self.repository)).ok();
        }

        None
    }
}

impl fmt::Debug for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEndpoint")
            .field("api_url", &self.api_url.as_str())
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("proxy", &self.proxy)
            .field("ca_bundle", &self.ca_bundle)
            .field("clone_url", &self.clone_url.as_ref().map(Url::as_str))
            .finish()
    }
}

/// An endpoint section (`[source]` or `[destination]`) as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointConfig {
    /// API root (defaults to the public GitHub API).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository in `owner/name` form.
    pub repository: String,

    /// Literal token.
    pub token: Option<String>,

    /// Environment variable holding the token.
    pub token_env: Option<String>,

    /// Proxy URL.
    pub proxy: Option<String>,

    /// PEM bundle with extra trusted certificates.
    pub ca_bundle: Option<PathBuf>,

    /// Git URL for the mirror step.
    pub clone_url: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl EndpointConfig {
    /// Validates the section without resolving the token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending key.
    pub fn validate(&self, section: &str, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message: format!("[{section}] {message}"),
        };

        let api_url = Url::parse(&self.api_url)
            .map_err(|e| invalid(format!("api-url '{}' is not a valid URL: {e}", self.api_url)))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "api-url '{}' must use http or https",
                self.api_url
            )));
        }

        if !is_owner_and_name(&self.repository) {
            return Err(invalid(format!(
                "repository '{}' must be in 'owner/name' form",
                self.repository
            )));
        }

        if let Some(proxy) = &self.proxy {
            Url::parse(proxy).map_err(|e| invalid(format!("proxy '{proxy}' is not a valid URL: {e}")))?;
        }

        if let Some(clone_url) = &self.clone_url {
            Url::parse(clone_url)
                .map_err(|e| invalid(format!("clone-url '{clone_url}' is not a valid URL: {e}")))?;
        }

        Ok(())
    }

    /// Resolves the section into a [`RemoteEndpoint`].
    ///
    /// The token is taken from `token_override` first, then `token`, then the
    /// variable named by `token-env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails or no token can be found.
    pub fn resolve(
        self,
        section: &str,
        path: &Path,
        token_override: Option<String>,
    ) -> Result<RemoteEndpoint, ConfigError> {
        self.validate(section, path)?;

        let token = token_override
            .or(self.token)
            .or_else(|| {
                self.token_env
                    .as_deref()
                    .and_then(|name| std::env::var(name).ok())
            })
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingToken {
                section: section.to_string(),
            })?;

        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message: format!("[{section}] {message}"),
        };
        let api_url = Url::parse(&self.api_url).map_err(|e| invalid(e.to_string()))?;

        let mut endpoint = RemoteEndpoint::new(api_url, self.repository, token);
        if let Some(proxy) = self.proxy {
            endpoint = endpoint.with_proxy(proxy);
        }
        if let Some(ca_bundle) = self.ca_bundle {
            endpoint = endpoint.with_ca_bundle(ca_bundle);
        }
        if let Some(clone_url) = self.clone_url {
            endpoint = endpoint.with_clone_url(Url::parse(&clone_url).map_err(|e| invalid(e.to_string()))?);
        }

        Ok(endpoint)
    }
}

fn is_owner_and_name(repository: &str) -> bool {
    let mut parts = repository.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    )
}
