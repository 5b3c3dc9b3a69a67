//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Boundary between the configuration builders and whatever applies the
//! finished configuration to a device.
//!
//! The builders never talk to a device themselves. They serialize the tree
//! they produced into a [`Request`] and hand it to a [`ConfigPush`]
//! implementation, which is free to send it over gNMI, write it to a file,
//! or, as [`Recorder`] does, keep it in memory.

mod debug;

pub mod api;
pub mod config;
pub mod error;
pub mod recorder;

pub use api::{Operation, Request};
pub use config::Config;
pub use error::Error;
pub use recorder::Recorder;

use crate::debug::Debug;

/// Collaborator that applies serialized configuration to a device.
pub trait ConfigPush {
    /// Applies a single request. Implementations must either apply the
    /// request in full or return an error.
    fn push(&mut self, request: Request) -> Result<(), Error>;
}

// ===== global functions =====

// Sends a batch of requests in order, stopping at the first failure.
pub fn push_all<P>(pusher: &mut P, requests: Vec<Request>) -> Result<(), Error>
where
    P: ConfigPush + ?Sized,
{
    for request in requests {
        Debug::RequestTx(&request).log();
        if let Err(error) = pusher.push(request) {
            error.log();
            return Err(error);
        }
    }

    Ok(())
}
