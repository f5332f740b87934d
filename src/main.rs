use clap::{Parser, Subcommand};
use mono_release::commands;
use mono_release::core::error::{MonoError, MonoResult, ResultExt, print_error};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Coordinated version releases for monorepo modules
#[derive(Parser)]
#[command(name = "mono")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct MonoCli {
  /// Show debug-level progress on stderr (MONO_LOG takes precedence)
  #[arg(long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Move every module to VERSION and refresh lock file hashes
  Release {
    /// Target version, e.g. v1.4.0 or v2.0.0-rc.1
    #[arg(value_name = "VERSION")]
    target: String,
    /// Repository root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    context: Option<PathBuf>,
    /// Compute everything but write nothing
    #[arg(long)]
    dry_run: bool,
    /// Output the release report in JSON format
    #[arg(long)]
    json: bool,
    /// Draw a progress bar while modules are processed
    #[arg(long)]
    progress: bool,
  },

  /// Print the dependencies-first release order without changing anything
  Order {
    /// Repository root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    context: Option<PathBuf>,
    /// Output the order in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Log to stderr; `MONO_LOG` wins over `--debug`
fn init_logging(debug: bool) {
  let filter = match std::env::var("MONO_LOG") {
    Ok(directives) => EnvFilter::new(directives),
    Err(_) if debug => EnvFilter::new("mono_release=debug"),
    Err(_) => EnvFilter::new("warn"),
  };

  tracing_subscriber::registry()
    .with(
      fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::env::var("NO_COLOR").is_err()),
    )
    .with(filter)
    .init();
}

fn resolve_root(context: Option<PathBuf>) -> MonoResult<PathBuf> {
  match context {
    Some(dir) => Ok(dir),
    None => std::env::current_dir().context("failed to get current directory"),
  }
}

fn main() {
  let cli = MonoCli::parse();
  init_logging(cli.debug);

  let result = match cli.command {
    Commands::Release {
      target,
      context,
      dry_run,
      json,
      progress,
    } => resolve_root(context).and_then(|root| commands::run_release(&root, &target, dry_run, json, progress)),
    Commands::Order { context, json } => resolve_root(context).and_then(|root| commands::run_order(&root, json)),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: MonoError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
