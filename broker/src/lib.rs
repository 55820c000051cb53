// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Notifications published to a message broker.
//!
//! Services announce interesting events by publishing short text messages to named topics.
//! Publication is best-effort: callers decide what to do when a `Notifier` fails, but they should
//! never let such a failure undo the work that triggered the notification.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use async_trait::async_trait;

mod activemq;
pub use activemq::{ActiveMqNotifier, ActiveMqOptions};
mod logging;
pub use logging::LogNotifier;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Broker errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BrokerError {
    /// Indicates that the broker accepted the connection but refused the message.
    #[error("Broker rejected message: {0}")]
    Rejected(String),

    /// Indicates that the broker could not be contacted.
    #[error("Broker unreachable: {0}")]
    Unreachable(String),
}

/// Result type for this crate.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Interface to publish messages to a topic.
#[async_trait]
pub trait Notifier {
    /// Publishes `message` to `topic`.
    ///
    /// Delivery is attempted at most once.
    async fn publish(&self, topic: &str, message: &str) -> BrokerResult<()>;
}
