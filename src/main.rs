use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotcollect::{cli, config, error, management::SourceKind};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Collect listening data for a user and store it
    Collect(CollectOptions),

    /// Start the collection trigger server
    Serve(ServeOptions),

    /// Look up preview links for stored songs
    Previews(PreviewsOptions),

    /// Show row counts of the stored tables
    Summary,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CollectOptions {
    /// Spotify access token (defaults to SPOTIFY_ACCESS_TOKEN)
    #[clap(long)]
    pub token: Option<String>,

    /// Collection pass to skip; can be repeated
    #[clap(long, value_enum, action = ArgAction::Append)]
    pub skip: Vec<SourceKind>,

    /// Collect without writing to the database
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Collection pass to skip for triggered runs; can be repeated
    #[clap(long, value_enum, action = ArgAction::Append)]
    pub skip: Vec<SourceKind>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewsOptions {
    /// List songs lacking a preview without looking them up
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Collect(opt) => cli::collect(opt.token, opt.skip, opt.dry_run).await,
        Command::Serve(opt) => cli::serve(opt.skip).await,
        Command::Previews(opt) => cli::previews(opt.dry_run).await,
        Command::Summary => cli::summary().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
