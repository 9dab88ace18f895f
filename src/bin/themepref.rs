//! Command-line front-end for the theme preference.
//!
//! Reads and writes the same preference file desktop hosts use, and
//! resolves `system` against the OS setting.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use themepref::{
    format_date, FileStore, HeadlessSurface, MemoryStore, OsSignal, PreferenceStore,
    ThemeController, ThemePreference,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "themepref", version, about = "Inspect and change the light/dark theme preference")]
struct Cli {
    /// Preference file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stored preference
    Get,
    /// Set the preference (light, dark or system)
    Set { theme: ThemePreference },
    /// Switch to the opposite of the mode currently shown
    Toggle,
    /// Print the effective color mode
    Mode,
    /// Format a date as "Month YYYY"
    Date { text: String },
}

fn open_store(path: Option<PathBuf>) -> Box<dyn PreferenceStore> {
    match path.map(FileStore::new).or_else(FileStore::open_default) {
        Some(store) => Box::new(store),
        None => {
            tracing::warn!("no configuration directory; preference will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn start_controller(store: Option<PathBuf>) -> ThemeController {
    ThemeController::builder()
        .store(open_store(store))
        .signal(OsSignal::new())
        .surface(HeadlessSurface)
        .init()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("THEMEPREF_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { store, command } = Cli::parse();

    match command {
        Command::Get => {
            let controller = start_controller(store);
            println!("{}", style(controller.preference()).bold());
        }
        Command::Set { theme } => {
            let controller = start_controller(store);
            controller.set_theme(theme);
            report(&controller);
        }
        Command::Toggle => {
            let controller = start_controller(store);
            controller.toggle();
            report(&controller);
        }
        Command::Mode => {
            let controller = start_controller(store);
            println!("{}", style(controller.effective_mode()).bold());
        }
        Command::Date { text } => println!("{}", format_date(&text)),
    }
}

fn report(controller: &ThemeController) {
    let preference = controller.preference();
    let mode = controller.effective_mode();
    if preference == ThemePreference::System {
        println!(
            "theme set to {} {}",
            style(preference).bold(),
            style(format!("(following the system, currently {mode})")).dim()
        );
    } else {
        println!("theme set to {}", style(preference).bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_set_rejects_unknown_theme() {
        let err = Cli::try_parse_from(["themepref", "set", "sepia"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_set_accepts_any_case() {
        let cli = Cli::try_parse_from(["themepref", "set", "DARK"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Set {
                theme: ThemePreference::Dark
            }
        ));
    }

    #[test]
    fn test_store_flag_is_global() {
        let cli = Cli::try_parse_from(["themepref", "get", "--store", "/tmp/prefs.json"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/prefs.json")));
        assert!(matches!(cli.command, Command::Get));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["themepref"]).is_err());
    }

    #[test]
    fn test_date_takes_text() {
        let cli = Cli::try_parse_from(["themepref", "date", "2024-03-15"]).unwrap();
        match cli.command {
            Command::Date { text } => assert_eq!(format_date(&text), "March 2024"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
