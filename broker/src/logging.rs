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

//! Notifier that only records messages in the log.

use crate::{BrokerResult, Notifier};
use async_trait::async_trait;
use log::info;

/// Notifier that writes every message to the log instead of sending it anywhere.
///
/// Useful for deployments that have no broker available.
#[derive(Clone, Default)]
pub struct LogNotifier {}

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, topic: &str, message: &str) -> BrokerResult<()> {
        info!("Message for topic {}: {}", topic, message);
        Ok(())
    }
}
