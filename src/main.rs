//! gitai - CLI entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use gitai::commands::commit::{self, CommitOptions};
use gitai::commands::init::{self, InitOptions};
use gitai::commands::pr::{self, PrOptions};
use gitai::commands::{Terminal, show_config};
use gitai::config::{SearchContext, global_config_dir, load_config};
use gitai::env::{Environment, ProcessEnv, load_dotenv};
use gitai::git;
use gitai::llm::LlmClient;
use gitai::logging::{LogLevel, init_tracing};

/// AI-powered commit messages and pull-request drafts.
#[derive(Parser, Debug)]
#[command(name = "gitai")]
#[command(about = "AI-powered commit messages and pull-request drafts")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error logs
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate AI-powered commit messages for staged changes
    Commit {
        /// Additional instructions to guide the AI
        #[arg(short, long)]
        prompt: Option<String>,

        /// Number of suggestions to generate
        #[arg(short = 'n', long)]
        suggestions: Option<usize>,

        /// Print the AI prompt instead of calling the model
        #[arg(long)]
        print_prompt: bool,
    },

    /// Generate a pull-request title and body from the current branch diff
    Pr {
        /// Additional instructions to guide the AI
        #[arg(short, long)]
        prompt: Option<String>,

        /// Target branch to diff against
        #[arg(short, long)]
        target: Option<String>,

        /// Include unstaged changes
        #[arg(short, long)]
        unstaged: bool,

        /// Exclude the file tree snapshot
        #[arg(long)]
        no_tree: bool,

        /// Print the AI prompt instead of calling the model
        #[arg(long)]
        print_prompt: bool,
    },

    /// Show the resolved config path and content
    ShowConfig {
        /// Print the config path only
        #[arg(short, long)]
        path_only: bool,
    },

    /// Initialize gitai configuration in the current directory
    Init {
        /// Overwrite existing configuration (a backup is kept)
        #[arg(short, long)]
        force: bool,

        /// Copy the configuration from ~/.gitai
        #[arg(long, conflicts_with = "from_default")]
        from_global: bool,

        /// Use the built-in template configuration
        #[arg(long)]
        from_default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let repo_root = git::repo_root(&cwd);
    if let Some(root) = &repo_root {
        load_dotenv(root);
    }

    let env: Arc<dyn Environment> = Arc::new(ProcessEnv);
    init_tracing(
        LogLevel::select(cli.quiet, cli.verbose, env.as_ref()),
        env.as_ref(),
    );

    let ctx = SearchContext {
        repo_root,
        cwd: cwd.clone(),
        global_dir: global_config_dir(),
    };
    if let Err(e) = init::bootstrap_global(&ctx.global_dir) {
        debug!("Could not create global configuration: {}", e);
    }

    match cli.command {
        Command::Init {
            force,
            from_global,
            from_default,
        } => {
            let opts = InitOptions {
                force,
                from_global,
                from_default,
            };
            init::run(&cwd, &ctx.global_dir, opts).context("Failed to initialize configuration")?;
        }
        Command::ShowConfig { path_only } => {
            show_config::run(&ctx, path_only)?;
        }
        Command::Commit {
            prompt,
            suggestions,
            print_prompt,
        } => {
            let loaded = load_config(&ctx)?;
            let repo = git::open(&cwd)?;
            let llm = LlmClient::new(Arc::clone(&env));
            let opts = CommitOptions {
                prompt,
                suggestions,
                print_prompt,
            };
            commit::run(&opts, &loaded.config, &repo, &llm, env.as_ref(), &Terminal)
                .await
                .context("Commit failed")?;
        }
        Command::Pr {
            prompt,
            target,
            unstaged,
            no_tree,
            print_prompt,
        } => {
            let loaded = load_config(&ctx)?;
            let repo = git::open(&cwd)?;
            let llm = LlmClient::new(Arc::clone(&env));
            let opts = PrOptions {
                prompt,
                target,
                unstaged,
                no_tree,
                print_prompt,
            };
            pr::run(&opts, &loaded.config, &repo, &llm, env.as_ref(), &cwd)
                .await
                .context("Failed to generate PR description")?;
        }
    }

    Ok(())
}
