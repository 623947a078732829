//! Fetching a release list and rendering it into a container.
//!
//! [`ReleaseListRenderer`] drives one fetch-render cycle:
//! `idle -> loading -> {rendered | empty | errored}`. Every failure inside the
//! cycle ends in the same degraded state, an error message linking to the
//! project's release page, and nothing is propagated to the caller.

mod template;

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::format::DEFAULT_DECIMALS;
use crate::markdown::MarkdownRenderer;
use crate::source::{RepoId, Source};

pub use template::Templates;

/// Element the renderer writes into.
pub trait RenderTarget {
    /// Replaces everything inside the element.
    fn replace_content(&mut self, html: &str);

    /// Appends a fragment after the element's current content.
    fn append_child(&mut self, html: &str);
}

/// Terminal state of one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No container to render into; nothing was fetched.
    Skipped,
    /// The given number of release cards were written.
    Rendered(usize),
    /// The source returned no releases.
    Empty,
    /// Fetching or decoding failed; the error message was written.
    Errored,
}

/// Renders a repository's releases as cards.
#[derive(Debug)]
pub struct ReleaseListRenderer<S: Source, M: MarkdownRenderer> {
    source: S,
    markdown: M,
    repo: RepoId,
    templates: Templates,
    /// Rendered once up front so the error branch cannot fail itself.
    error_html: String,
    decimals: usize,
}

impl<S: Source, M: MarkdownRenderer> ReleaseListRenderer<S, M> {
    pub fn new(source: S, markdown: M, repo: RepoId) -> Result<Self> {
        let templates = Templates::new().context("Failed to register templates")?;
        let error_html = templates.error_message(&repo)?;
        Ok(Self {
            source,
            markdown,
            repo,
            templates,
            error_html,
            decimals: DEFAULT_DECIMALS,
        })
    }

    /// Decimal places for asset sizes.
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Runs one fetch-render cycle against `target`.
    ///
    /// `None` means the page has no container, which is not an error: the
    /// cycle is skipped without touching the network. Otherwise the target
    /// first shows a loading indicator and ends up with either every card,
    /// the empty-state message, or the error message. Cards are only written
    /// once all of them have been composed.
    #[tracing::instrument(skip(self, target), fields(repo = %self.repo))]
    pub async fn render<T: RenderTarget + ?Sized>(&self, target: Option<&mut T>) -> RenderState {
        let Some(target) = target else {
            debug!("No release container present, skipping");
            return RenderState::Skipped;
        };

        target.replace_content(self.templates.loading());

        match self.compose_cards().await {
            Ok(cards) if cards.is_empty() => {
                info!("No releases found for {}", self.repo);
                target.replace_content(self.templates.empty());
                RenderState::Empty
            }
            Ok(cards) => {
                target.replace_content("");
                for card in &cards {
                    target.append_child(card);
                }
                info!("Rendered {} releases for {}", cards.len(), self.repo);
                RenderState::Rendered(cards.len())
            }
            Err(e) => {
                error!("Error fetching releases: {:#}", e);
                target.replace_content(&self.error_html);
                RenderState::Errored
            }
        }
    }

    async fn compose_cards(&self) -> Result<Vec<String>> {
        let releases = self
            .source
            .get_releases(&self.repo)
            .await
            .with_context(|| format!("Failed to fetch releases for {}", self.repo))?;

        debug!("Composing {} release cards", releases.len());

        releases
            .iter()
            .map(|release| {
                self.templates
                    .release_card(release, &self.markdown, self.decimals)
                    .with_context(|| format!("Failed to render release {}", release.tag))
            })
            .collect()
    }
}
