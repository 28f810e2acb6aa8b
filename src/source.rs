//! Article input sources
//!
//! An article comes either from a URL fetch or from stdin (`-`). The source
//! abstracts that choice away from the conversion pipeline, which only sees
//! bytes plus an optional `Content-Type` for charset detection.

use std::io::{IsTerminal, Read};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use reqwest::Url;

/// Where the article HTML comes from
#[derive(Debug, Clone)]
pub enum ArticleSource {
    /// Read from standard input; requires stdin to be redirected
    Stdin,
    /// Fetch from an absolute http(s) URL
    Url(Url),
}

impl FromStr for ArticleSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "-" {
            return Ok(ArticleSource::Stdin);
        }

        match Url::parse(value) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                Ok(ArticleSource::Url(url))
            }
            Ok(url) => Err(format!("unsupported URL scheme '{}'", url.scheme())),
            Err(err) => Err(format!("'{}' is not a valid article URL: {}", value, err)),
        }
    }
}

impl ArticleSource {
    /// Retrieve the article HTML
    ///
    /// Returns the body bytes together with the `Content-Type` header value
    /// when the transport provides one (stdin does not).
    pub async fn fetch(&self) -> Result<(Vec<u8>, Option<String>)> {
        match self {
            ArticleSource::Stdin => {
                let mut stdin = std::io::stdin();
                if stdin.is_terminal() {
                    bail!("stdin redirection required if '-' is given");
                }

                let mut bytes = Vec::new();
                stdin
                    .read_to_end(&mut bytes)
                    .context("failed to read article from stdin")?;
                Ok((bytes, None))
            }
            ArticleSource::Url(url) => {
                let response = reqwest::get(url.clone())
                    .await
                    .with_context(|| format!("failed to fetch {}", url))?;

                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(|value| value.to_string());

                let body = response
                    .bytes()
                    .await
                    .with_context(|| format!("failed to read article body from {}", url))?;

                Ok((body.to_vec(), content_type))
            }
        }
    }
}
