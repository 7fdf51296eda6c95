// Library root
// -----------
// The binary (`main.rs`) is a thin wrapper; everything it does lives here
// so it can be tested without a terminal or a live scoring server.
//
// Module responsibilities:
// - `config`: API base URL, marker folder and request timeout.
// - `model`: the participant record, flag submission and scoreboard row.
// - `state`: the marker folder / `settings.json` that records registration.
// - `flag`: flag format validation.
// - `api`: blocking HTTP calls to the scoring server behind `ScoreServer`.
// - `ui`: command handlers and console output.
// - `cli`: argument parsing and routing to `ui`.
pub mod api;
pub mod cli;
pub mod config;
pub mod flag;
pub mod model;
pub mod state;
pub mod ui;
