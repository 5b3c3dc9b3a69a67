//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::ConfigPush;
use crate::api::Request;
use crate::debug::Debug;
use crate::error::Error;

// In-memory push collaborator.
//
// Keeps every accepted request in arrival order. Requests addressed to a
// path under one of the rejected prefixes fail with `Error::Rejected` and
// are not recorded.
#[derive(Debug, Default)]
pub struct Recorder {
    requests: Vec<Request>,
    rejected_prefixes: Vec<(String, String)>,
}

// ===== impl Recorder =====

impl Recorder {
    pub fn new() -> Recorder {
        Default::default()
    }

    // Rejects all future requests whose path starts with `prefix`.
    pub fn reject(
        mut self,
        prefix: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.rejected_prefixes.push((prefix.into(), reason.into()));
        self
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }
}

impl ConfigPush for Recorder {
    fn push(&mut self, request: Request) -> Result<(), Error> {
        if let Some((_, reason)) = self
            .rejected_prefixes
            .iter()
            .find(|(prefix, _)| request.path.starts_with(prefix.as_str()))
        {
            return Err(Error::Rejected(request.path, reason.clone()));
        }

        Debug::RequestRecorded(&request).log();
        self.requests.push(request);
        Ok(())
    }
}
