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

//! Test utilities for message publication.

use crate::{BrokerError, BrokerResult, Notifier};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Notifier that captures published messages.
#[derive(Clone, Default)]
pub struct RecorderNotifier {
    /// Storage for captured `(topic, message)` pairs in publication order.
    pub messages: Arc<Mutex<Vec<(String, String)>>>,

    /// Topics for which publication fails.
    errors: Arc<Mutex<HashSet<String>>>,
}

impl RecorderNotifier {
    /// Makes trying to publish to `topic` fail with an error.
    pub async fn inject_error_for<T: Into<String>>(&self, topic: T) {
        let mut errors = self.errors.lock().await;
        errors.insert(topic.into());
    }

    /// Expects that no messages were published.
    pub async fn expect_no_messages(&self) {
        let messages = self.messages.lock().await;
        assert!(messages.is_empty(), "Expected to find no messages but got {:?}", messages);
    }

    /// Expects that exactly one message was published, to `exp_topic`, and returns it.
    pub async fn expect_one_message(&self, exp_topic: &str) -> String {
        let mut messages = self.messages.lock().await;
        assert_eq!(1, messages.len(), "Expected to find just one message");
        let (topic, message) = messages.pop().unwrap();
        assert_eq!(exp_topic, topic);
        message
    }
}

#[async_trait]
impl Notifier for RecorderNotifier {
    async fn publish(&self, topic: &str, message: &str) -> BrokerResult<()> {
        {
            let errors = self.errors.lock().await;
            if errors.contains(topic) {
                return Err(BrokerError::Unreachable(format!("Publishing to {} failed", topic)));
            }
        }

        let mut messages = self.messages.lock().await;
        messages.push((topic.to_owned(), message.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::catch_unwind;

    #[tokio::test]
    async fn test_recorder_inject_error() {
        let notifier = RecorderNotifier::default();
        notifier.inject_error_for("bad").await;

        notifier.publish("good", "first").await.unwrap();
        assert_eq!(
            BrokerError::Unreachable("Publishing to bad failed".to_owned()),
            notifier.publish("bad", "second").await.unwrap_err()
        );
        notifier.publish("good", "third").await.unwrap();

        let messages = notifier.messages.lock().await;
        assert_eq!(
            [("good".to_owned(), "first".to_owned()), ("good".to_owned(), "third".to_owned())],
            messages.as_slice()
        );
    }

    #[tokio::test]
    async fn test_recorder_expect_no_messages_ok() {
        let notifier = RecorderNotifier::default();
        notifier.expect_no_messages().await;
    }

    #[test]
    fn test_recorder_expect_no_messages_fail() {
        #[tokio::main(flavor = "current_thread")]
        async fn do_test() {
            let notifier = RecorderNotifier::default();
            notifier.publish("topic", "message").await.unwrap();
            notifier.expect_no_messages().await; // Will panic.
        }
        assert!(catch_unwind(do_test).is_err());
    }

    #[tokio::test]
    async fn test_recorder_expect_one_message_ok() {
        let notifier = RecorderNotifier::default();
        notifier.publish("topic", "the message").await.unwrap();
        assert_eq!("the message", notifier.expect_one_message("topic").await);
    }

    #[test]
    fn test_recorder_expect_one_message_too_many() {
        #[tokio::main(flavor = "current_thread")]
        async fn do_test() {
            let notifier = RecorderNotifier::default();
            notifier.publish("topic", "first").await.unwrap();
            notifier.publish("topic", "second").await.unwrap();
            notifier.expect_one_message("topic").await; // Will panic.
        }
        assert!(catch_unwind(do_test).is_err());
    }

    #[test]
    fn test_recorder_expect_one_message_wrong_topic() {
        #[tokio::main(flavor = "current_thread")]
        async fn do_test() {
            let notifier = RecorderNotifier::default();
            notifier.publish("topic", "first").await.unwrap();
            notifier.expect_one_message("other").await; // Will panic.
        }
        assert!(catch_unwind(do_test).is_err());
    }
}
