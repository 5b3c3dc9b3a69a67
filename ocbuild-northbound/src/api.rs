//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use derive_new::new;
use serde::{Deserialize, Serialize};

// Kind of change carried by a push request.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    // Replace the subtree at the given path.
    Replace,
    // Merge the payload into the subtree at the given path.
    #[default]
    Update,
    // Remove the subtree at the given path.
    Delete,
}

// Configuration change addressed to a single path.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct Request {
    pub operation: Operation,
    pub path: String,
    // JSON payload. Always `None` for deletions.
    #[new(default)]
    pub data: Option<serde_json::Value>,
}

// ===== impl Operation =====

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Replace => write!(f, "replace"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

// ===== impl Request =====

impl Request {
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
