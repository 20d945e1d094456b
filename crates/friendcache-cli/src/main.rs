//! friendcache - a friend directory that works offline.
//!
//! On every start the directory is fetched once and merged into the local
//! cache; if the fetch fails the cached copy is shown instead.
//!
//! Usage:
//!   friendcache [--offline]            list all users
//!   friendcache show <id> [--offline]  show one user with their friends
//!   friendcache set-url <url>          save the directory URL to the config file

mod app;
mod render;

use std::io;

use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use friendcache_core::Config;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Show(String),
    SetUrl(String),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    command: Command,
    offline: bool,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn parse_args(args: &[String]) -> Result<Args> {
    let offline = args.iter().any(|a| a == "--offline");
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--offline")
        .collect();

    let command = match positional.as_slice() {
        [] | ["list"] => Command::List,
        ["show", id] => Command::Show(id.to_string()),
        ["show"] => bail!("show needs a user id"),
        ["set-url", url] => Command::SetUrl(url.to_string()),
        ["set-url"] => bail!("set-url needs a URL"),
        ["-h"] | ["--help"] | ["help"] => Command::Help,
        [other, ..] => bail!("unknown command: {}", other),
    };

    Ok(Args { command, offline })
}

/// A missing `.env` is normal; anything else is worth reporting
fn dotenv_problem<T>(result: &dotenvy::Result<T>) -> Option<&dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

fn print_help() {
    println!("friendcache [--offline]            list all users");
    println!("friendcache show <id> [--offline]  show one user");
    println!("friendcache set-url <url>          save the directory URL");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present; report problems once logging is up
    let dotenv = dotenvy::dotenv();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv)?;
    if args.command == Command::Help {
        print_help();
        return Ok(());
    }

    init_tracing();
    info!("friendcache starting");
    if let Some(e) = dotenv_problem(&dotenv) {
        warn!(error = %e, "Failed to load .env file");
    }

    if let Command::SetUrl(url) = args.command {
        let mut config = Config::load()?;
        config.source_url = Some(url);
        config.save()?;
        println!("Saved source URL to {}", Config::config_path()?.display());
        return Ok(());
    }

    let config = Config::load()?;
    let mut app = App::new(&config)?;

    if args.offline {
        app.offline();
    } else {
        app.refresh().await;
    }

    if let Some(ref message) = app.status_message {
        eprintln!("{}", message);
    }

    let mut stdout = io::stdout().lock();
    match args.command {
        Command::List => render::render_list(&mut stdout, &app.users())?,
        Command::Show(id) => match app.user(&id) {
            Some(user) => render::render_detail(&mut stdout, &user)?,
            None => bail!("no cached user with id {}", id),
        },
        Command::SetUrl(_) | Command::Help => print_help(),
    }

    info!("friendcache shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_default_is_list() {
        let parsed = parse_args(&args(&[])).unwrap();
        assert_eq!(parsed, Args { command: Command::List, offline: false });
    }

    #[test]
    fn test_parse_show_offline() {
        let parsed = parse_args(&args(&["show", "abc", "--offline"])).unwrap();
        assert_eq!(parsed, Args { command: Command::Show("abc".to_string()), offline: true });
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["show"])).is_err());
        assert!(parse_args(&args(&["delete"])).is_err());
        assert!(parse_args(&args(&["set-url"])).is_err());
    }

    #[test]
    fn test_dotenv_problem_ignores_missing_file() {
        let missing: dotenvy::Result<()> =
            Err(dotenvy::Error::Io(io::Error::new(io::ErrorKind::NotFound, "no .env")));
        assert!(dotenv_problem(&missing).is_none());
        assert!(dotenv_problem(&Ok(())).is_none());

        let malformed: dotenvy::Result<()> = Err(dotenvy::Error::LineParse("KEY='x".to_string(), 4));
        assert!(dotenv_problem(&malformed).is_some());
    }

    #[test]
    fn test_parse_set_url() {
        let parsed = parse_args(&args(&["set-url", "http://localhost:8080/users.json"])).unwrap();
        assert_eq!(
            parsed.command,
            Command::SetUrl("http://localhost:8080/users.json".to_string())
        );
    }
}
