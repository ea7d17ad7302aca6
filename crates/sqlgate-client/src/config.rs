//! Database locator parsing.
//!
//! A locator is either a bare filesystem path or a URL whose scheme picks
//! the backend. `file:` locators are handed to SQLite verbatim, with no
//! path surgery here: SQLite's own URI parser understands relative paths,
//! `file::memory:`, and query parameters like `?mode=ro`.

use url::Url;

use crate::error::{ClientError, Result};

/// The backend family a locator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// An embedded SQLite database (`file:` URL or bare path).
    File,
    /// A remote HTTP backend (`http:` / `https:`).
    Http,
    /// A remote websocket backend (`ws:` / `wss:`).
    Ws,
}

/// A parsed and classified database locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbUrl {
    raw: String,
    backend: Backend,
}

impl DbUrl {
    /// Parse `raw` and classify its backend.
    ///
    /// Strings that do not parse as absolute URLs are treated as bare
    /// SQLite paths (this covers `data/app.db` and `:memory:`). URLs with
    /// a scheme outside the recognized set are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let backend = match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "file" => Backend::File,
                "http" | "https" => Backend::Http,
                "ws" | "wss" => Backend::Ws,
                other => {
                    return Err(ClientError::InvalidUrl {
                        url: raw.to_string(),
                        reason: format!("unknown scheme `{other}`"),
                    });
                }
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Backend::File,
            Err(e) => {
                return Err(ClientError::InvalidUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                });
            }
        };
        Ok(Self {
            raw: raw.to_string(),
            backend,
        })
    }

    /// Which backend family this locator names.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The scheme portion, for error reporting. Bare paths count as `file`.
    pub fn scheme(&self) -> &str {
        match self.backend {
            Backend::File => "file",
            Backend::Http | Backend::Ws => {
                self.raw.split_once(':').map_or("file", |(scheme, _)| scheme)
            }
        }
    }

    /// The locator exactly as supplied; for [`Backend::File`] this is what
    /// the SQLite open call receives.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for DbUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
