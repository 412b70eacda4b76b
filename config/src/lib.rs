#![forbid(unsafe_code)]

//! Site-wide configuration shared by the router and the metadata updater.
//!
//! Configuration is read from a TOML document (usually `site.toml`, embedded in
//! the application at build time), and any key can be overridden with a
//! `FOLIO_`-prefixed environment variable: `FOLIO_BASE_URL` overrides
//! `base-url`, `FOLIO_DEFAULT_KEYWORDS` takes a comma-separated list, and so on.

pub mod errors;

use crate::errors::SiteConfigError;
use config::{Case, Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use typed_builder::TypedBuilder;

/// Describes the portfolio site: its identity, its canonical location and the
/// defaults used whenever a route does not provide its own metadata.
#[derive(TypedBuilder, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Human-readable site name, used for `og:site_name`.
    #[builder(setter(into), default = default_site_name())]
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Absolute URL the canonical links are built from.
    #[builder(setter(into), default = default_base_url())]
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Appended to every page title when setting `document.title`.
    #[builder(setter(into), default = default_title_suffix())]
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
    /// Title used when neither the load result nor the route supplies one.
    #[builder(setter(into), default = default_page_title())]
    #[serde(default = "default_page_title")]
    pub default_title: String,
    #[builder(setter(into), default = default_site_description())]
    #[serde(default = "default_site_description")]
    pub default_description: String,
    #[builder(default)]
    #[serde(default)]
    pub default_keywords: Vec<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub default_image: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub default_image_alt: Option<String>,
    /// The site's `@handle`, for `twitter:site`.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub twitter_site: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub twitter_creator: Option<String>,
    #[builder(setter(into), default = default_og_type())]
    #[serde(default = "default_og_type")]
    pub og_type: String,
    #[builder(setter(into), default = default_twitter_card())]
    #[serde(default = "default_twitter_card")]
    pub twitter_card: String,
    /// Shortest time a navigation keeps the loading overlay up, in milliseconds.
    #[builder(default = default_min_load_duration_ms())]
    #[serde(default = "default_min_load_duration_ms")]
    pub min_load_duration_ms: u64,
    /// CSS selector matching the navigation drawer's route links.
    #[builder(setter(into), default = default_nav_link_selector())]
    #[serde(default = "default_nav_link_selector")]
    pub nav_link_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SiteConfig {
    /// Parses a TOML document, applies `FOLIO_*` environment overrides and
    /// validates the result.
    pub fn from_toml_str(text: &str) -> Result<Self, SiteConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .add_source(env_overrides())
            .build()?;
        Self::from_settings(settings)
    }

    /// Reads the TOML file at `path`, applies `FOLIO_*` environment overrides
    /// and validates the result.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SiteConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SiteConfigError::ConfigNotFound(
                path.display().to_string(),
            ));
        }
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(env_overrides())
            .build()?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, SiteConfigError> {
        let site: SiteConfig = settings.try_deserialize()?;
        site.validate()?;
        Ok(site)
    }

    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), SiteConfigError> {
        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(SiteConfigError::InvalidBaseUrl(self.base_url.clone())),
        }
    }

    pub fn min_load_duration(&self) -> Duration {
        Duration::from_millis(self.min_load_duration_ms)
    }

    /// `page_title` followed by the configured suffix.
    pub fn document_title(&self, page_title: &str) -> String {
        format!("{page_title}{}", self.title_suffix)
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix("FOLIO")
        .convert_case(Case::Kebab)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("default-keywords")
}

fn default_site_name() -> String {
    "Portfolio".to_string()
}

fn default_base_url() -> String {
    "https://localhost/".to_string()
}

fn default_title_suffix() -> String {
    " - Portfolio".to_string()
}

fn default_page_title() -> String {
    "Portfolio".to_string()
}

fn default_site_description() -> String {
    "Personal portfolio: projects, resume, songs and writing.".to_string()
}

fn default_og_type() -> String {
    "website".to_string()
}

fn default_twitter_card() -> String {
    "summary_large_image".to_string()
}

fn default_min_load_duration_ms() -> u64 {
    600
}

fn default_nav_link_selector() -> String {
    ".nav-drawer a[href^='#'], .nav-drawer md-list-item[href^='#']"
        .to_string()
}
