use serde::Deserialize;
use thiserror::Error;

use nightsky_protocol::{Background, Color};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Page-level configuration.
///
/// Every field has a default, so an empty object (or no config at all)
/// reproduces the stock page behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Maximum log level forwarded to the console (`error` .. `trace`, `off`).
    pub log_level: String,
    pub starfield: StarfieldConfig,
    pub contact: ContactConfig,
    pub repos: RepoListConfig,
    pub navigation: NavigationConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            starfield: StarfieldConfig::default(),
            contact: ContactConfig::default(),
            repos: RepoListConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.starfield.star_count == 0 {
            return invalid("starfield.star_count", "must be at least 1");
        }
        if self.starfield.spawn_interval_ms <= 0.0 {
            return invalid("starfield.spawn_interval_ms", "must be positive");
        }
        if self.starfield.opacity_decay <= 0.0 {
            return invalid("starfield.opacity_decay", "must be positive");
        }
        if self.repos.limit == 0 {
            return invalid("repos.limit", "must be at least 1");
        }
        if self.contact.request_timeout_ms == 0 || self.repos.request_timeout_ms == 0 {
            return invalid("request_timeout_ms", "must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub canvas_id: String,
    pub star_count: usize,
    /// Minimum time between two shooting stars.
    pub spawn_interval_ms: f64,
    /// Opacity lost by a shooting star on every frame.
    pub opacity_decay: f64,
    /// Travel direction of shooting stars, below the horizontal, heading left.
    pub streak_angle_deg: f64,
    pub background: BackgroundMode,
    /// Draw a single still frame when the user asks for reduced motion.
    pub respect_reduced_motion: bool,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            canvas_id: "stars-bg".to_string(),
            star_count: 200,
            spawn_interval_ms: 2500.0,
            opacity_decay: 0.02,
            streak_angle_deg: 30.0,
            background: BackgroundMode::Transparent,
            respect_reduced_motion: true,
        }
    }
}

impl StarfieldConfig {
    pub fn streak_angle(&self) -> f64 {
        self.streak_angle_deg.to_radians()
    }
}

/// How each frame clears the canvas.
///
/// ```json
/// "transparent"
/// { "solid": "#0b0d17" }
/// { "css_var": "--bg-color" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    Transparent,
    Solid(String),
    CssVar(String),
}

impl BackgroundMode {
    /// Resolve to a render background. `lookup_var` reads a CSS custom
    /// property; an unset variable or a malformed color falls back to
    /// transparent.
    pub fn resolve(&self, lookup_var: impl FnOnce(&str) -> Option<String>) -> Background {
        match self {
            BackgroundMode::Transparent => Background::Transparent,
            BackgroundMode::Solid(hex) => match Color::from_hex(hex) {
                Some(color) => Background::Solid(color),
                None => {
                    log::warn!("ignoring malformed background color {hex:?}");
                    Background::Transparent
                }
            },
            BackgroundMode::CssVar(name) => match lookup_var(name) {
                Some(value) if !value.trim().is_empty() => {
                    Background::Css(value.trim().to_string())
                }
                _ => {
                    log::warn!("CSS variable {name} is not set, clearing to transparent");
                    Background::Transparent
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_id: String,
    pub status_id: String,
    pub request_timeout_ms: u32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_id: "contact-form".to_string(),
            status_id: "form-status".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepoListConfig {
    pub container_id: String,
    /// Account whose repositories are listed. Falls back to the container's
    /// `data-github-user` attribute.
    pub user: Option<String>,
    pub limit: usize,
    pub api_base: String,
    pub request_timeout_ms: u32,
}

impl Default for RepoListConfig {
    fn default() -> Self {
        Self {
            container_id: "project-list".to_string(),
            user: None,
            limit: 6,
            api_base: "https://api.github.com".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub selector: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            selector: ".navbar a, .scroll-down-btn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.starfield.star_count, 200);
        assert_eq!(config.repos.limit, 6);
        assert_eq!(config.starfield.background, BackgroundMode::Transparent);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r##"{
            "starfield": { "spawn_interval_ms": 2000, "background": { "solid": "#0b0d17" } },
            "repos": { "user": "octocat", "limit": 9 }
        }"##;
        let config = SiteConfig::from_json(json).unwrap();
        assert_eq!(config.starfield.spawn_interval_ms, 2000.0);
        assert_eq!(config.starfield.star_count, 200);
        assert_eq!(
            config.starfield.background,
            BackgroundMode::Solid("#0b0d17".into())
        );
        assert_eq!(config.repos.user.as_deref(), Some("octocat"));
        assert_eq!(config.repos.limit, 9);
        assert_eq!(config.repos.container_id, "project-list");
    }

    #[test]
    fn css_var_background_parses() {
        let json = r#"{ "starfield": { "background": { "css_var": "--bg-color" } } }"#;
        let config = SiteConfig::from_json(json).unwrap();
        let bg = config
            .starfield
            .background
            .resolve(|name| (name == "--bg-color").then(|| " #111 ".to_string()));
        assert_eq!(bg, Background::Css("#111".into()));
    }

    #[test]
    fn unresolvable_backgrounds_fall_back_to_transparent() {
        let unset = BackgroundMode::CssVar("--missing".into()).resolve(|_| None);
        assert_eq!(unset, Background::Transparent);
        let bad = BackgroundMode::Solid("navy".into()).resolve(|_| None);
        assert_eq!(bad, Background::Transparent);
    }

    #[test]
    fn rejects_zero_limits() {
        let err = SiteConfig::from_json(r#"{ "repos": { "limit": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("repos.limit"));
        assert!(SiteConfig::from_json(r#"{ "starfield": { "star_count": 0 } }"#).is_err());
        assert!(SiteConfig::from_json(r#"{ "starfield": { "spawn_interval_ms": 0 } }"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SiteConfig::from_json("{ starfield"),
            Err(ConfigError::Json(_))
        ));
    }
}
