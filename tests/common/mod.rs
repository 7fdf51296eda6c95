#![allow(dead_code)]

use anyhow::{bail, Result};
use naruken::api::{decode_scoreboard, ScoreServer};
use naruken::model::{FlagSubmission, ParticipantRecord, RegisterRequest, RegisterResponse, ScoreboardEntry};
use naruken::state::StateStore;
use std::cell::RefCell;
use tempfile::TempDir;

pub const VALID_FLAG: &str = "NARU{AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA}";

/// Canned answer for one endpoint.
#[derive(Clone, Debug)]
pub enum Reply {
    Ok(String),
    Status(u16),
    TransportError,
}

/// In-process stand-in for the scoring server. Records every request it
/// receives and answers with the configured replies.
pub struct FakeServer {
    pub register_reply: Reply,
    pub submit_reply: Reply,
    pub score_reply: Reply,
    pub registrations: RefCell<Vec<(String, String)>>,
    pub submissions: RefCell<Vec<FlagSubmission>>,
    pub score_requests: RefCell<usize>,
}

impl FakeServer {
    pub fn new() -> Self {
        FakeServer {
            register_reply: Reply::Ok(r#"{"uid":"u1"}"#.into()),
            submit_reply: Reply::Ok("Correct flag! +100 points".into()),
            score_reply: Reply::Ok("[]".into()),
            registrations: RefCell::new(Vec::new()),
            submissions: RefCell::new(Vec::new()),
            score_requests: RefCell::new(0),
        }
    }

    pub fn with_register(mut self, reply: Reply) -> Self {
        self.register_reply = reply;
        self
    }

    pub fn with_submit(mut self, reply: Reply) -> Self {
        self.submit_reply = reply;
        self
    }

    pub fn with_score(mut self, reply: Reply) -> Self {
        self.score_reply = reply;
        self
    }

    pub fn calls(&self) -> usize {
        self.registrations.borrow().len() + self.submissions.borrow().len() + *self.score_requests.borrow()
    }
}

impl ScoreServer for FakeServer {
    fn register(&self, req: &RegisterRequest<'_>) -> Result<Option<RegisterResponse>> {
        self.registrations
            .borrow_mut()
            .push((req.name.to_string(), req.course.to_string()));
        match &self.register_reply {
            Reply::Ok(body) => Ok(Some(serde_json::from_str(body)?)),
            Reply::Status(_) => Ok(None),
            Reply::TransportError => bail!("connection refused"),
        }
    }

    fn submit(&self, submission: &FlagSubmission) -> Result<Option<String>> {
        self.submissions.borrow_mut().push(submission.clone());
        match &self.submit_reply {
            Reply::Ok(body) => Ok(Some(body.clone())),
            Reply::Status(_) => Ok(None),
            Reply::TransportError => bail!("operation timed out"),
        }
    }

    fn scoreboard(&self) -> Result<Vec<ScoreboardEntry>> {
        *self.score_requests.borrow_mut() += 1;
        match &self.score_reply {
            Reply::Ok(body) => Ok(decode_scoreboard(body)),
            Reply::Status(_) => Ok(Vec::new()),
            Reply::TransportError => bail!("dns error"),
        }
    }
}

/// A marker folder inside a fresh temporary directory.
pub struct TestState {
    pub tmp: TempDir,
    pub store: StateStore,
}

impl TestState {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let store = StateStore::new(tmp.path().join(".narukeFolder"));
        TestState { tmp, store }
    }

    pub fn registered(user_id: &str) -> Self {
        let state = TestState::new();
        state.store.create().expect("create settings");
        state
            .store
            .write(&ParticipantRecord {
                user_id: user_id.into(),
                name: "Naru Koshin".into(),
                course: "4KT".into(),
            })
            .expect("write settings");
        state
    }
}

pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf-8 output")
}
