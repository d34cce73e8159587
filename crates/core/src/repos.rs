//! Recent public repositories, rendered as project cards.

use serde::Deserialize;
use thiserror::Error;

use crate::config::RepoListConfig;
use crate::http::{HttpClient, HttpRequest, TransportError};

pub const NO_DESCRIPTION: &str = "No description provided.";
pub const LOAD_FAILURE_MESSAGE: &str = "Could not load projects at this time.";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid repository listing: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The fields of a listed repository that a card needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCard {
    pub title: String,
    pub description: String,
    pub href: String,
}

impl From<RepoSummary> for RepoCard {
    fn from(repo: RepoSummary) -> Self {
        let description = repo
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        Self {
            title: repo.name,
            description,
            href: repo.html_url,
        }
    }
}

/// DOM side of the project list.
pub trait ProjectListSurface {
    /// Replace the placeholder with `cards`, in order.
    fn show_cards(&mut self, cards: &[RepoCard]);
    /// Replace the placeholder with a static failure message.
    fn show_failure(&mut self, message: &str);
}

/// Listing endpoint for `user`, most recently updated first.
pub fn listing_url(api_base: &str, user: &str) -> String {
    format!(
        "{}/users/{}/repos?sort=updated&direction=desc",
        api_base.trim_end_matches('/'),
        user.trim()
    )
}

/// Decode a listing and keep the first `limit` entries.
pub fn parse_listing(body: &[u8], limit: usize) -> Result<Vec<RepoSummary>, serde_json::Error> {
    let mut repos: Vec<RepoSummary> = serde_json::from_slice(body)?;
    repos.truncate(limit);
    Ok(repos)
}

/// Fetch the listing once. No retry, no pagination.
pub async fn fetch_repositories<C: HttpClient>(
    client: &C,
    config: &RepoListConfig,
    user: &str,
) -> Result<Vec<RepoSummary>, RepoError> {
    let request = HttpRequest::get(listing_url(&config.api_base, user))
        .header("Accept", "application/json")
        .timeout_ms(config.request_timeout_ms);
    let response = client.send(request).await?;
    if !response.is_success() {
        return Err(RepoError::Status(response.status));
    }
    Ok(parse_listing(&response.body, config.limit)?)
}

/// Fetch and render. Returns the number of cards shown.
pub async fn load_repositories<C, S>(
    client: &C,
    surface: &mut S,
    config: &RepoListConfig,
    user: &str,
) -> Result<usize, RepoError>
where
    C: HttpClient,
    S: ProjectListSurface + ?Sized,
{
    match fetch_repositories(client, config, user).await {
        Ok(repos) => {
            let cards: Vec<RepoCard> = repos.into_iter().map(RepoCard::from).collect();
            surface.show_cards(&cards);
            log::debug!("rendered {} project cards for {user}", cards.len());
            Ok(cards.len())
        }
        Err(e) => {
            log::error!("failed to load repositories for {user}: {e}");
            surface.show_failure(LOAD_FAILURE_MESSAGE);
            Err(e)
        }
    }
}
