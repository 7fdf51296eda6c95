// Flag format check run before anything is sent to the server.

use regex::Regex;
use std::sync::OnceLock;

/// `NARU{` + at least 32 uppercase letters or digits + `}`.
pub const FLAG_PATTERN: &str = r"^NARU\{[A-Z0-9]{32,}\}$";

fn flag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FLAG_PATTERN).expect("flag pattern compiles"))
}

/// Trim surrounding whitespace and check the result against the flag
/// format. Returns the trimmed flag when it matches.
pub fn parse_flag(input: &str) -> Option<&str> {
    let flag = input.trim();
    flag_regex().is_match(flag).then_some(flag)
}
