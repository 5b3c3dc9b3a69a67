//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{trace, trace_span};

use crate::api::Request;

#[derive(Debug)]
pub enum Debug<'a> {
    RequestTx(&'a Request),
    RequestRecorded(&'a Request),
}

// ===== impl Debug =====

impl Debug<'_> {
    pub fn log(&self) {
        match self {
            Debug::RequestTx(request) | Debug::RequestRecorded(request) => {
                trace_span!("northbound").in_scope(|| {
                    trace!(
                        operation = %request.operation,
                        path = %request.path,
                        "{}", self
                    );
                });
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::RequestTx(..) => {
                write!(f, "sending request")
            }
            Debug::RequestRecorded(..) => {
                write!(f, "request recorded")
            }
        }
    }
}
