//! Handlebars templates for the release list markup.
//!
//! Every piece of markup the renderer writes comes from one of the `.hbs`
//! files next to this module. Values are passed in through small view
//! structs and HTML-escaped by handlebars; only the rendered Markdown body
//! is inserted raw (`{{{body}}}`).

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;
use std::fmt;

use crate::format::{format_bytes, format_date};
use crate::markdown::MarkdownRenderer;
use crate::source::{Release, ReleaseAsset, RepoId};

pub const RELEASE_CARD_TEMPLATE: &str = "release_card";
/// Registered as a template so the card can pull it in as a partial.
pub const ASSET_LINK_TEMPLATE: &str = "asset_link";
pub const ERROR_MESSAGE_TEMPLATE: &str = "error_message";
pub const LOADING_TEMPLATE: &str = "loading";
pub const EMPTY_TEMPLATE: &str = "empty";

pub fn handlebars<'hb>() -> Result<Handlebars<'hb>> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(true);

    hb.register_template_string(RELEASE_CARD_TEMPLATE, include_str!("./release_card.hbs"))?;
    hb.register_template_string(ASSET_LINK_TEMPLATE, include_str!("./asset_link.hbs"))?;
    hb.register_template_string(ERROR_MESSAGE_TEMPLATE, include_str!("./error_message.hbs"))?;
    hb.register_template_string(LOADING_TEMPLATE, include_str!("./loading.hbs"))?;
    hb.register_template_string(EMPTY_TEMPLATE, include_str!("./empty.hbs"))?;

    Ok(hb)
}

#[derive(Debug, Serialize)]
struct AssetView<'a> {
    name: &'a str,
    url: &'a str,
    size: String,
}

impl<'a> AssetView<'a> {
    fn new(asset: &'a ReleaseAsset, decimals: usize) -> Self {
        Self {
            name: &asset.name,
            url: &asset.download_url,
            size: format_bytes(asset.size, decimals),
        }
    }
}

#[derive(Debug, Serialize)]
struct CardView<'a> {
    title: &'a str,
    prerelease: bool,
    date: String,
    /// Already rendered HTML.
    body: String,
    assets: Vec<AssetView<'a>>,
}

#[derive(Debug, Serialize)]
struct ErrorView {
    releases_url: String,
}

/// Registered templates plus the markup that never changes between renders.
pub struct Templates {
    hb: Handlebars<'static>,
    loading: String,
    empty: String,
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("loading", &self.loading)
            .field("empty", &self.empty)
            .finish_non_exhaustive()
    }
}

impl Templates {
    pub fn new() -> Result<Self> {
        let hb = handlebars()?;
        let loading = hb.render(LOADING_TEMPLATE, &())?;
        let empty = hb.render(EMPTY_TEMPLATE, &())?;
        Ok(Self { hb, loading, empty })
    }

    pub fn loading(&self) -> &str {
        &self.loading
    }

    pub fn empty(&self) -> &str {
        &self.empty
    }

    /// Fallback shown in place of the whole list when fetching fails.
    pub fn error_message(&self, repo: &RepoId) -> Result<String> {
        let view = ErrorView {
            releases_url: repo.releases_page_url(),
        };
        Ok(self.hb.render(ERROR_MESSAGE_TEMPLATE, &view)?)
    }

    /// One `release-card` element. The body is inserted exactly as the Markdown renderer returns it.
    pub fn release_card<M: MarkdownRenderer + ?Sized>(
        &self,
        release: &Release,
        markdown: &M,
        decimals: usize,
    ) -> Result<String> {
        let view = CardView {
            title: release.title(),
            prerelease: release.prerelease,
            date: release
                .published_at
                .as_ref()
                .map(format_date)
                .unwrap_or_else(|| "Unpublished".to_string()),
            body: markdown.to_html(&release.body),
            assets: release
                .assets
                .iter()
                .map(|asset| AssetView::new(asset, decimals))
                .collect(),
        };
        Ok(self.hb.render(RELEASE_CARD_TEMPLATE, &view)?)
    }
}
