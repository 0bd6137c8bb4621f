use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::error::{Result, RgisfError};

/// Where container or GeoTIFF bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(Url),
}

impl Source {
    /// Classify `s` as an http(s) URL or an existing filesystem path
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(url) = Url::parse(s) {
            match url.scheme() {
                "http" | "https" => return Ok(Source::Url(url)),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Ok(Source::Path(path));
                    }
                }
                _ => {}
            }
        }
        let path = PathBuf::from(s);
        if path.is_file() {
            Ok(Source::Path(path))
        } else {
            Err(RgisfError::UnresolvedSource(s.to_string()))
        }
    }

    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            Source::Path(path) => {
                log::debug!("Reading {}", path.display());
                Ok(fs::read(path)?)
            }
            Source::Url(url) => fetch(url),
        }
    }
}

#[cfg(feature = "remote")]
fn fetch(url: &Url) -> Result<Vec<u8>> {
    log::debug!("Fetching {}", url);
    let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &Url) -> Result<Vec<u8>> {
    Err(RgisfError::UnresolvedSource(format!(
        "{} (URL sources need the `remote` feature)",
        url
    )))
}
