//! Current-session state: the single "current analysis result" slot.
//!
//! Every analysis request is issued a [`RequestTicket`] carrying a sequence
//! number. A response is installed only if its ticket is the latest one
//! issued; anything older is stale and dropped. Installation replaces the
//! previous result wholesale, so readers never see a half-updated result.

use serde_json::Value;

use crate::error::Result;
use crate::model::{adapt_result, AnalysisResult};

/// Proof that a request was issued, used to match its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    sequence: u64,
}

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The response was adapted and is now the current result
    Installed { version: u64 },
    /// A newer request was issued after this one; the response was ignored
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    current: Option<AnalysisResult>,
    /// Bumped on every install
    version: u64,
    /// Sequence of the most recently issued ticket
    issued: u64,
    pending: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new outstanding request, superseding any earlier one
    pub fn begin_run(&mut self) -> RequestTicket {
        self.issued += 1;
        if let Some(previous) = self.pending.replace(self.issued) {
            log::debug!("Request #{} superseded by #{}", previous, self.issued);
        }
        RequestTicket {
            sequence: self.issued,
        }
    }

    /// True while the latest request has not completed or failed
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Latest issued and not yet completed or failed
    fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.sequence == self.issued && self.pending == Some(ticket.sequence)
    }

    /// Install the response for `ticket`.
    ///
    /// Stale tickets are ignored, as is a second delivery for a ticket that
    /// already completed. A malformed response is an error and leaves the
    /// previous result in place.
    pub fn complete_run(&mut self, ticket: RequestTicket, raw: &Value) -> Result<RunOutcome> {
        if !self.is_latest(ticket) {
            log::warn!(
                "Ignoring stale or repeated response for request #{} (latest is #{})",
                ticket.sequence,
                self.issued
            );
            return Ok(RunOutcome::Stale);
        }
        self.pending = None;

        let result = adapt_result(raw)?;
        Ok(RunOutcome::Installed {
            version: self.install(result),
        })
    }

    /// Mark the latest request as failed without touching the current result
    pub fn fail_run(&mut self, ticket: RequestTicket) {
        if self.is_latest(ticket) {
            self.pending = None;
        }
    }

    /// Replace the current result. Returns the new version.
    pub fn install(&mut self, result: AnalysisResult) -> u64 {
        self.version += 1;
        self.current = Some(result);
        log::info!("Installed analysis result v{}", self.version);
        self.version
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Drop the current result and forget any outstanding request
    pub fn reset(&mut self) {
        self.current = None;
        self.pending = None;
        self.issued += 1;
        log::debug!("Session reset");
    }
}
