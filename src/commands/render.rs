use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;

use crate::{
    format::DEFAULT_DECIMALS,
    markdown::MarkdownRenderer,
    page::{self, Fragment, Page},
    render::{ReleaseListRenderer, RenderState},
    runtime::Runtime,
    source::{RepoId, Source},
};

use super::config::Config;

/// Element id the release list is rendered into.
pub const DEFAULT_CONTAINER_ID: &str = "releases-container";

/// Repository whose releases are shown when none is given.
pub const DEFAULT_REPO: &str = "frost2k5/ExposeHost";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Repository in `owner/repo` form.
    pub repo: String,
    /// Id of the element that receives the release list.
    pub container: String,
    /// Page to render into; a bare document is used when absent.
    pub template: Option<PathBuf>,
    /// Where to write the page; stdout when absent.
    pub output: Option<PathBuf>,
    /// Decimal places for asset sizes.
    pub decimals: usize,
    /// Emit only the container's content instead of a whole page.
    pub fragment: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            container: DEFAULT_CONTAINER_ID.to_string(),
            template: None,
            output: None,
            decimals: DEFAULT_DECIMALS,
            fragment: false,
        }
    }
}

/// Render the release list into a page and write the page out.
///
/// A failed fetch still produces a page (showing the error message) and is
/// not an error here; only local I/O and invalid options are.
#[tracing::instrument(skip(runtime, api_url))]
pub async fn render<R: Runtime>(
    runtime: R,
    api_url: Option<String>,
    options: RenderOptions,
) -> Result<RenderState> {
    let config = Config::new(runtime, api_url)?;
    run(config, &options).await
}

#[tracing::instrument(skip(config))]
pub async fn run<R: Runtime, S: Source, M: MarkdownRenderer>(
    config: Config<R, S, M>,
    options: &RenderOptions,
) -> Result<RenderState> {
    let repo: RepoId = options.repo.parse()?;
    page::check_id(&options.container)?;
    let Config {
        runtime,
        source,
        markdown,
    } = config;

    let renderer =
        ReleaseListRenderer::new(source, markdown, repo)?.with_decimals(options.decimals);

    let (state, html) = if options.fragment {
        let mut fragment = Fragment::new();
        let state = renderer.render(Some(&mut fragment)).await;
        (state, fragment.into_html())
    } else {
        let mut page = match &options.template {
            Some(path) => {
                debug!("Loading page from {}", path.display());
                let html = runtime
                    .read_to_string(path)
                    .with_context(|| format!("Failed to read page template {}", path.display()))?;
                Page::new(html)
            }
            None => Page::with_container(&options.container)?,
        };

        let mut container = page.container(&options.container);
        let state = renderer.render(container.as_mut()).await;
        (state, page.into_html())
    };

    if state == RenderState::Skipped {
        warn!(
            "No element with id '{}' in the page, releases were not rendered",
            options.container
        );
    }

    match &options.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !runtime.exists(parent) {
                    runtime.create_dir_all(parent)?;
                }
            }
            runtime
                .write(path, html.as_bytes())
                .with_context(|| format!("Failed to write page to {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => runtime.write_stdout(html.as_bytes())?,
    }

    Ok(state)
}
