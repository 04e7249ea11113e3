//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `sitescope`.
#[derive(Debug, Parser)]
#[command(
    name = "sitescope",
    version,
    about = "Infer site structure: platform fingerprints, sitemap trees and design tokens"
)]
pub struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log level selected by `--verbose` / `--quiet`, if either was given.
    #[must_use]
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        if self.verbose {
            Some(log::LevelFilter::Debug)
        } else if self.quiet {
            Some(log::LevelFilter::Warn)
        } else {
            None
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch pages of a site and fingerprint its platform.
    Detect {
        /// Project the detection is stored under.
        #[arg(long)]
        project: String,
        /// Page URLs to fetch.
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Build, import and inspect sitemap trees.
    #[command(subcommand)]
    Sitemap(SitemapCommand),
    /// Work with design token files.
    #[command(subcommand)]
    Tokens(TokensCommand),
    /// List stored projects with their detected platform.
    Projects,
}

/// Project selector shared by the sitemap subcommands.
#[derive(Debug, Args)]
pub struct ProjectArg {
    /// Project id in the store.
    #[arg(long)]
    pub project: String,
}

/// `sitemap` subcommands.
#[derive(Debug, Subcommand)]
pub enum SitemapCommand {
    /// Build the current tree from scraped page rows.
    Build {
        /// Project selector.
        #[command(flatten)]
        project: ProjectArg,
        /// Project root URL.
        #[arg(long)]
        url: String,
        /// JSON file holding an array of `{url, title?, content?}` rows.
        #[arg(long)]
        pages: PathBuf,
    },
    /// Build the current tree from a sitemap XML document.
    Import {
        /// Project selector.
        #[command(flatten)]
        project: ProjectArg,
        /// Project root URL.
        #[arg(long)]
        url: String,
        /// URL of the sitemap or sitemap index.
        sitemap_url: String,
    },
    /// Store a sitemap tree from a JSON file.
    Save {
        /// Project selector.
        #[command(flatten)]
        project: ProjectArg,
        /// Store the tree as the recommended one instead of the current one.
        #[arg(long)]
        recommended: bool,
        /// JSON file holding a sitemap tree.
        file: PathBuf,
    },
    /// Print a stored tree as an outline.
    Show {
        /// Project selector.
        #[command(flatten)]
        project: ProjectArg,
        /// Show the recommended tree instead of the current one.
        #[arg(long)]
        recommended: bool,
    },
    /// Compare the current tree with the recommended one.
    Diff {
        /// Project selector.
        #[command(flatten)]
        project: ProjectArg,
    },
    /// Mark a node of the current tree as having scraped content.
    MarkScraped {
        /// Project selector.
        #[command(flatten)]
        project: ProjectArg,
        /// Node id to mark.
        #[arg(long)]
        node: String,
        /// Stored page id to attach to the node.
        #[arg(long)]
        page_id: Option<String>,
    },
}

/// `tokens` subcommands.
#[derive(Debug, Subcommand)]
pub enum TokensCommand {
    /// List every token as `path<TAB>type<TAB>value`.
    Flatten {
        /// Token JSON file.
        file: PathBuf,
    },
    /// Print tokens grouped by type for a language model prompt.
    Prompt {
        /// Token JSON file.
        file: PathBuf,
    },
    /// Replace the value of one token.
    Set {
        /// Token JSON file.
        file: PathBuf,
        /// Dot-separated token path.
        path: String,
        /// New value, parsed as JSON or taken as a plain string.
        value: String,
        /// Write the result here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_detect_with_many_urls() {
        let cli = Cli::parse_from([
            "sitescope",
            "detect",
            "--project",
            "p1",
            "https://a.test/",
            "https://a.test/cart",
        ]);
        match cli.command {
            Command::Detect { project, urls } => {
                assert_eq!(project, "p1");
                assert_eq!(urls.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn detect_requires_a_url() {
        assert!(Cli::try_parse_from(["sitescope", "detect", "--project", "p1"]).is_err());
    }

    #[test]
    fn parses_sitemap_mark_scraped() {
        let cli = Cli::parse_from([
            "sitescope",
            "sitemap",
            "mark-scraped",
            "--project",
            "p1",
            "--node",
            "n3",
            "--page-id",
            "pg-9",
        ]);
        let Command::Sitemap(SitemapCommand::MarkScraped {
            project,
            node,
            page_id,
        }) = cli.command
        else {
            panic!("expected sitemap mark-scraped");
        };
        assert_eq!(project.project, "p1");
        assert_eq!(node, "n3");
        assert_eq!(page_id.as_deref(), Some("pg-9"));
    }

    #[test]
    fn parses_sitemap_save_recommended() {
        let cli = Cli::parse_from([
            "sitescope",
            "sitemap",
            "save",
            "--project",
            "p1",
            "--recommended",
            "tree.json",
        ]);
        let Command::Sitemap(SitemapCommand::Save {
            project,
            recommended,
            file,
        }) = cli.command
        else {
            panic!("expected sitemap save");
        };
        assert_eq!(project.project, "p1");
        assert!(recommended);
        assert_eq!(file, PathBuf::from("tree.json"));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["sitescope", "tokens", "flatten", "t.json", "-v"]);
        assert_eq!(cli.log_level(), Some(log::LevelFilter::Debug));
        let both = ["sitescope", "-v", "-q", "tokens", "flatten", "t.json"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn parses_tokens_set_with_output() {
        let cli = Cli::parse_from([
            "sitescope",
            "tokens",
            "set",
            "t.json",
            "color.primary",
            "#fff",
            "--output",
            "out.json",
        ]);
        let Command::Tokens(TokensCommand::Set {
            path,
            value,
            output,
            ..
        }) = cli.command
        else {
            panic!("expected tokens set");
        };
        assert_eq!(path, "color.primary");
        assert_eq!(value, "#fff");
        assert_eq!(output, Some(PathBuf::from("out.json")));
    }
}
