use anyhow::Result;
use clap::Parser;
use releasepage::commands::{DEFAULT_CONTAINER_ID, DEFAULT_REPO, RenderOptions, render};
use releasepage::format::DEFAULT_DECIMALS;
use std::path::PathBuf;

/// releasepage - render a project's GitHub releases into a web page
///
/// Fetches the release list once and writes a card per release into the
/// element with the given id. If fetching fails, the element shows an error
/// message linking to the project's release page instead.
///
/// Examples:
///   releasepage render --template index.html --output releases.html
///   releasepage render --repo owner/repo > releases.html
#[derive(Parser, Debug)]
#[command(author, version = env!("RELEASEPAGE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(
        long = "api-url",
        env = "RELEASEPAGE_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Render the release list into a page
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// The GitHub repository in the format "owner/repo"
    #[arg(long, env = "RELEASEPAGE_REPO", value_name = "OWNER/REPO", default_value = DEFAULT_REPO)]
    pub repo: String,

    /// HTML page containing the release container (a bare page is used if omitted)
    #[arg(long, short = 't', value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Write the page here instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Id of the element that receives the release list
    #[arg(long, value_name = "ID", default_value = DEFAULT_CONTAINER_ID)]
    pub container: String,

    /// Decimal places for asset sizes
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DECIMALS)]
    pub decimals: usize,

    /// Emit only the release list markup, without a surrounding page
    #[arg(long, conflicts_with = "template")]
    pub fragment: bool,
}

impl From<RenderArgs> for RenderOptions {
    fn from(args: RenderArgs) -> Self {
        RenderOptions {
            repo: args.repo,
            container: args.container,
            template: args.template,
            output: args.output,
            decimals: args.decimals,
            fragment: args.fragment,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = releasepage::runtime::RealRuntime;

    match cli.command {
        Commands::Render(args) => {
            render(runtime, cli.api_url, args.into()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_render_defaults() {
        let cli = Cli::try_parse_from(["releasepage", "render"]).unwrap();
        let Commands::Render(args) = cli.command;
        let options: RenderOptions = args.into();
        assert_eq!(options.container, "releases-container");
        assert_eq!(options.decimals, 2);
        assert_eq!(options.template, None);
        assert_eq!(options.output, None);
        assert!(!options.fragment);
    }

    #[test]
    fn test_cli_fragment_conflicts_with_template() {
        let result =
            Cli::try_parse_from(["releasepage", "render", "--fragment", "-t", "index.html"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["releasepage", "render", "--fragment"]).unwrap();
        let Commands::Render(args) = cli.command;
        assert!(args.fragment);
    }

    #[test]
    fn test_cli_render_parsing() {
        let cli = Cli::try_parse_from([
            "releasepage",
            "render",
            "--repo",
            "owner/repo",
            "-t",
            "index.html",
            "-o",
            "out.html",
            "--container",
            "downloads",
            "--decimals",
            "1",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command;
        assert_eq!(args.repo, "owner/repo");
        assert_eq!(args.template, Some(PathBuf::from("index.html")));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.container, "downloads");
        assert_eq!(args.decimals, 1);
    }

    #[test]
    fn test_cli_global_api_url_parsing() {
        let cli = Cli::try_parse_from(["releasepage", "--api-url", "http://localhost:1234", "render"])
            .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:1234"));
    }

    #[test]
    fn test_cli_rejects_negative_decimals() {
        let result = Cli::try_parse_from(["releasepage", "render", "--decimals", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["releasepage"]);
        assert!(result.is_err());
    }
}
