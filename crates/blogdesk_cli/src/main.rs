//! `blogdesk` console entry point.
//!
//! # Responsibility
//! - Parse flags, start file logging, open the database, and hand the
//!   console to the menu shell.
//! - Map startup failures to a non-zero exit code.

mod shell;

use blogdesk_core::db::open_db;
use blogdesk_core::{core_version, default_log_level, init_logging, logging_status};
use clap::Parser;
use log::info;
use shell::Shell;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Interactive manager for blog users, posts and comments.
#[derive(Debug, Parser)]
#[command(name = "blogdesk", version)]
struct Args {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, env = "BLOGDESK_DB", default_value = "blogdesk.sqlite3")]
    db: PathBuf,
    /// Directory for rolling log files [default: <tmp>/blogdesk-logs].
    #[arg(long, env = "BLOGDESK_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace | debug | info | warn | error
    #[arg(long, env = "BLOGDESK_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blogdesk: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let log_dir = resolve_log_dir(args.log_dir)?;
    init_logging(&args.log_level, &log_dir)?;
    if let Some((level, dir)) = logging_status() {
        info!(
            "event=app_start module=cli status=ok version={} level={} log_dir={} db={}",
            core_version(),
            level,
            dir.display(),
            args.db.display()
        );
    }

    let conn = open_db(&args.db)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(&conn, stdin.lock(), stdout.lock())?;
    shell.run()?;
    Ok(())
}

fn resolve_log_dir(flag: Option<PathBuf>) -> io::Result<PathBuf> {
    let dir = flag.unwrap_or_else(|| std::env::temp_dir().join("blogdesk-logs"));
    if dir.is_absolute() {
        return Ok(dir);
    }
    Ok(std::env::current_dir()?.join(dir))
}

#[cfg(test)]
mod tests {
    use super::{resolve_log_dir, Args};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "blogdesk",
            "--db",
            "/tmp/blog.sqlite3",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(args.db, PathBuf::from("/tmp/blog.sqlite3"));
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn relative_log_dir_is_anchored_to_cwd() {
        let resolved = resolve_log_dir(Some(PathBuf::from("logs"))).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
        assert!(resolve_log_dir(None).unwrap().is_absolute());
    }
}
