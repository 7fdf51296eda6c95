//! Command-line surface: `naruken <command> [flags]`.
//!
//! Flags are written Go-style with a single dash (`-name`, `-flag`); they
//! are rewritten to clap's `--name` form before parsing, so both spellings
//! work.

use crate::api::ScoreServer;
use crate::state::StateStore;
use crate::ui::{self, Outcome};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;

pub const USAGE: &str = "Usage: ./naruken <command> [options...]

Available commands:
init\tCreates your CTF account
\t\t-name Your full name (example: \"Naru Koshin\")
\t\t-course Your course of study (example: 4KT)
\t\t-interactive Ask for any value that was not given

submit\tWhen you found the flag, you need to submit it
\t\t-flag\tThe flag that you found in your scope

score\tYou can view the scoreboard

end\tRemoves your local registration data";

const COMMANDS: [&str; 4] = ["init", "submit", "score", "end"];
const LONG_FLAGS: [&str; 4] = ["name", "course", "flag", "interactive"];

#[derive(Parser, Debug)]
#[command(name = "naruken")]
#[command(about = "CTF participant client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Creates your CTF account
    Init {
        /// Your full name (example: "Naru Koshin")
        #[arg(long)]
        name: Option<String>,
        /// Your course of study (example: 4KT)
        #[arg(long)]
        course: Option<String>,
        /// Prompt for any value that was not given
        #[arg(short, long)]
        interactive: bool,
    },
    /// Submit a flag you found
    Submit {
        /// The flag that you found in vulnerable site
        #[arg(long)]
        flag: Option<String>,
    },
    /// View the scoreboard
    Score,
    /// Remove your local registration data
    End,
}

/// What the argument list asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Usage,
    Unknown(String),
    Run(Command),
}

/// Rewrite `-name value` / `-name=value` into `--name ...` for the flags
/// this tool knows. Anything else is passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| if is_single_dash_long_flag(&arg) { format!("-{arg}") } else { arg })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') => {
            let key = rest.split_once('=').map_or(rest, |(key, _)| key);
            LONG_FLAGS.contains(&key)
        }
        _ => false,
    }
}

/// Decide what to run. An empty argument list or `help` means usage; an
/// unrecognized command is reported, not treated as an error. Bad flags
/// for a known command are a clap error, and so is `--version` (clap's
/// `DisplayVersion`, which prints the version when exited).
pub fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args = normalize_args(args);
    let Some(command) = args.get(1) else {
        return Ok(Invocation::Usage);
    };
    if matches!(command.as_str(), "help" | "-h" | "--help") {
        return Ok(Invocation::Usage);
    }
    let is_version = matches!(command.as_str(), "--version" | "-V");
    if !is_version && !COMMANDS.contains(&command.as_str()) {
        return Ok(Invocation::Unknown(command.clone()));
    }
    let cli = Cli::try_parse_from(args)?;
    Ok(Invocation::Run(cli.command))
}

/// Run one invocation against `server` and the local `store`.
pub fn execute<S: ScoreServer, W: Write>(
    invocation: Invocation,
    server: &S,
    store: &StateStore,
    out: &mut W,
) -> Result<Outcome> {
    match invocation {
        Invocation::Usage => {
            writeln!(out, "{USAGE}")?;
            Ok(Outcome::Usage)
        }
        Invocation::Unknown(command) => {
            writeln!(out, "Unknown command {command}")?;
            Ok(Outcome::UnknownCommand(command))
        }
        Invocation::Run(Command::Init {
            name,
            course,
            interactive,
        }) => {
            let (name, course) = if interactive {
                let (name, course) = ui::prompt_registration(name, course)?;
                (Some(name), Some(course))
            } else {
                (name, course)
            };
            ui::handle_init(server, store, name.as_deref(), course.as_deref(), out)
        }
        Invocation::Run(Command::Submit { flag }) => ui::handle_submit(server, store, flag.as_deref(), out),
        Invocation::Run(Command::Score) => ui::handle_score(server, store, out),
        Invocation::Run(Command::End) => ui::handle_end(store, out),
    }
}
