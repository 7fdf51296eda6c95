// UI layer: one handler per command. Handlers write user-facing text to
// the supplied writer and report what happened as an `Outcome`; an `Err`
// means the command hit a fatal failure and the process should stop.

use crate::api::ScoreServer;
use crate::flag::parse_flag;
use crate::model::{FlagSubmission, ParticipantRecord, RegisterRequest, ScoreboardEntry};
use crate::state::{StateError, StateStore};
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::Write;

pub const INIT_MISSING_FLAGS: &str = "Please provide the required flags\n\n\
*Before the registration ensure that your data provided is correct, otherwise, your participation will be declined\n\n\
Required flags:\n\
-name\t\tYour full name (example: \"Naru Koshin\")\n\
-course\t\tYour course of study (example: 4KT)";
pub const ALREADY_REGISTERED: &str =
    "You are already registered for the CTF.\nIf there is any mistake, please contact your CTF organizer.";
pub const REGISTERED: &str = "You successfully registered for the CTF... Good Luck and Have Fun. :)";
pub const SUBMIT_MISSING_FLAGS: &str =
    "Please provide the required flags\n\nRequired flags:\n-flag\t\tThe flag that you found in vulnerable site";
pub const SUBMIT_NOT_REGISTERED: &str = "To submit the flag, please run the init command at first.";
pub const CORRUPT_STATE: &str = "Failed to verify your data, please contact your CTF organizer.";
pub const WRONG_FLAG_FORMAT: &str = "Wrong flag format provided.";
pub const SCORE_NOT_REGISTERED: &str = "You need to register for the CTF to use this command.";
pub const NO_SCORES: &str = "No data to show...";
pub const END_NOT_REGISTERED: &str = "You are not registered for the CTF, there is nothing to remove.";
pub const REMOVED: &str = "Your local registration data has been removed.";

const SCOREBOARD_HEADER: [&str; 3] = [
    " ________________________________________________________________",
    "|[ID] [FULL NAME] [COURSE] [POINTS] [LAST SUBMIT DATE] [IS ADMIN]|",
    " ￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣￣",
];
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// `2022-05-01 10:00:00 +0000 UTC`. A zero offset is named `UTC`; any other
/// offset has no zone name, so the numeric offset is repeated.
fn format_submit_time(date: &DateTime<FixedOffset>) -> String {
    let zone = if date.offset().local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        date.format("%z").to_string()
    };
    format!("{} {zone}", date.format(DATE_FORMAT))
}

/// Recoverable result of a command. Each variant corresponds to a message
/// the user has already been shown (or, for `ServerDeclined`, deliberately
/// not shown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Usage,
    UnknownCommand(String),
    MissingFlags,
    AlreadyRegistered,
    Registered { user_id: String },
    /// The server answered with a non-200 status. Nothing is printed.
    ServerDeclined,
    NotRegistered,
    CorruptState,
    InvalidFlag,
    /// The server's verdict was echoed verbatim.
    Submitted,
    NoScores,
    Scoreboard { rows: usize },
    Removed,
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message);
    spinner
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Ask for whichever of name and course was not given on the command line.
pub fn prompt_registration(name: Option<String>, course: Option<String>) -> Result<(String, String)> {
    let name = match name {
        Some(name) if !is_blank(&name) => name,
        _ => Input::new().with_prompt("Full name (example: Naru Koshin)").interact_text()?,
    };
    let course = match course {
        Some(course) if !is_blank(&course) => course,
        _ => Input::new().with_prompt("Course of study (example: 4KT)").interact_text()?,
    };
    Ok((name, course))
}

/// Register with the server and cache the assigned id locally.
///
/// Refuses when a local registration already exists; the server is not
/// consulted in that case.
pub fn handle_init<S: ScoreServer, W: Write>(
    server: &S,
    store: &StateStore,
    name: Option<&str>,
    course: Option<&str>,
    out: &mut W,
) -> Result<Outcome> {
    let (name, course) = match (name, course) {
        (Some(name), Some(course)) if !is_blank(name) && !is_blank(course) => (name, course),
        _ => {
            writeln!(out, "{INIT_MISSING_FLAGS}")?;
            return Ok(Outcome::MissingFlags);
        }
    };

    if store.exists() {
        writeln!(out, "{ALREADY_REGISTERED}")?;
        return Ok(Outcome::AlreadyRegistered);
    }
    // A leftover folder without settings would make `create` fail after the
    // server has already issued an id.
    store.ensure_vacant()?;

    let mut record = ParticipantRecord::new(name, course);
    let spinner = spinner("Registering...");
    let resp = server.register(&RegisterRequest::from(&record));
    spinner.finish_and_clear();

    let Some(resp) = resp? else {
        return Ok(Outcome::ServerDeclined);
    };
    record.user_id = resp.uid;
    store.create()?;
    store.write(&record)?;
    info!("registered {} as {}", record.name, record.user_id);

    writeln!(out, "{REGISTERED}")?;
    Ok(Outcome::Registered {
        user_id: record.user_id,
    })
}

/// Validate a flag and send it to the server, echoing the server's answer.
pub fn handle_submit<S: ScoreServer, W: Write>(
    server: &S,
    store: &StateStore,
    flag: Option<&str>,
    out: &mut W,
) -> Result<Outcome> {
    let Some(flag) = flag.filter(|f| !is_blank(f)) else {
        writeln!(out, "{SUBMIT_MISSING_FLAGS}")?;
        return Ok(Outcome::MissingFlags);
    };

    if !store.exists() {
        writeln!(out, "{SUBMIT_NOT_REGISTERED}")?;
        return Ok(Outcome::NotRegistered);
    }
    let record = match store.read() {
        Ok(record) => record,
        Err(err @ StateError::Parse { .. }) => {
            debug!("{err}");
            writeln!(out, "{CORRUPT_STATE}")?;
            return Ok(Outcome::CorruptState);
        }
        Err(err) => return Err(err.into()),
    };

    if parse_flag(flag).is_none() {
        writeln!(out, "{WRONG_FLAG_FORMAT}")?;
        return Ok(Outcome::InvalidFlag);
    }

    // Only the format check sees the trimmed text; the flag goes out as typed.
    let submission = FlagSubmission {
        flag: flag.to_string(),
        user_id: record.user_id,
    };
    let spinner = spinner("Submitting...");
    let resp = server.submit(&submission);
    spinner.finish_and_clear();

    match resp? {
        Some(body) => {
            writeln!(out, "{body}")?;
            Ok(Outcome::Submitted)
        }
        None => Ok(Outcome::ServerDeclined),
    }
}

/// Fetch and print the scoreboard. Only registered participants may look.
pub fn handle_score<S: ScoreServer, W: Write>(server: &S, store: &StateStore, out: &mut W) -> Result<Outcome> {
    if !store.exists() {
        writeln!(out, "{SCORE_NOT_REGISTERED}")?;
        return Ok(Outcome::NotRegistered);
    }

    let spinner = spinner("Loading scoreboard...");
    let entries = server.scoreboard();
    spinner.finish_and_clear();

    let rows = render_scoreboard(&entries?, out)?;
    if rows == 0 {
        return Ok(Outcome::NoScores);
    }
    Ok(Outcome::Scoreboard { rows })
}

/// Print the header and one ranked line per entry. Every timestamp is
/// parsed before anything is written, so a bad one leaves no half table.
pub fn render_scoreboard<W: Write>(entries: &[ScoreboardEntry], out: &mut W) -> Result<usize> {
    let dates = entries
        .iter()
        .map(ScoreboardEntry::last_submission)
        .collect::<Result<Vec<_>>>()?;

    for line in SCOREBOARD_HEADER {
        writeln!(out, "{line}")?;
    }
    for (rank, (entry, date)) in entries.iter().zip(&dates).enumerate() {
        writeln!(
            out,
            "[{}] {{{}}} {{{}}} {{{}}} {{{}}} {{⊝ }}",
            rank + 1,
            entry.name,
            entry.course,
            entry.points,
            format_submit_time(date)
        )?;
    }
    if entries.is_empty() {
        writeln!(out, "{NO_SCORES}")?;
    }
    Ok(entries.len())
}

/// Remove the local registration so `init` can run again.
pub fn handle_end<W: Write>(store: &StateStore, out: &mut W) -> Result<Outcome> {
    if !store.exists() {
        writeln!(out, "{END_NOT_REGISTERED}")?;
        return Ok(Outcome::NotRegistered);
    }
    store.delete()?;
    info!("removed local registration at {}", store.dir().display());
    writeln!(out, "{REMOVED}")?;
    Ok(Outcome::Removed)
}
