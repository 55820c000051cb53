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

//! Notifier backed by the REST messaging API of an ActiveMQ broker.

use crate::{BrokerError, BrokerResult, Notifier};
use async_trait::async_trait;
use derivative::Derivative;
use log::debug;
use reqwest::{Client, Response};
use staffdir_core::env::{get_optional_var, get_required_var};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default value for the `timeout` configuration property.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Options to configure an `ActiveMqNotifier`.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct ActiveMqOptions {
    /// Base URL of the broker's web console, such as `http://localhost:8161/`.
    pub url: Url,

    /// Username to authenticate with.
    pub username: String,

    /// Password to authenticate with.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Maximum time to wait for the broker to accept a message.
    pub timeout: Duration,
}

impl ActiveMqOptions {
    /// Creates a set of options from environment variables whose name is prefixed with the given
    /// `prefix`.
    ///
    /// This will use variables such as `<prefix>_URL`, `<prefix>_USERNAME`, `<prefix>_PASSWORD`
    /// and `<prefix>_TIMEOUT`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let raw_url = get_required_var::<String>(prefix, "URL")?;
        let url = Url::parse(&raw_url)
            .map_err(|e| format!("Invalid URL in environment variable {}_URL: {}", prefix, e))?;
        Ok(Self {
            url,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            timeout: get_optional_var::<Duration>(prefix, "TIMEOUT")?.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

/// Converts a `reqwest::Response` with a non-successful status to a `BrokerError`.
async fn http_response_to_broker_error(response: Response) -> BrokerError {
    let status = response.status();
    match response.text().await {
        Ok(text) => BrokerError::Rejected(format!(
            "HTTP request returned status {} with text '{}'",
            status, text
        )),
        Err(e) => BrokerError::Rejected(format!(
            "HTTP request returned status {} and failed to get text due to {}",
            status, e
        )),
    }
}

/// Notifier that posts messages to topics via ActiveMQ's `/api/message` endpoint.
#[derive(Clone)]
pub struct ActiveMqNotifier {
    /// Asynchronous HTTP client with which to issue the broker requests.
    client: Client,

    /// Configuration of the broker connection.
    opts: Arc<ActiveMqOptions>,
}

impl ActiveMqNotifier {
    /// Creates a new notifier that talks to the broker described by `opts`.
    pub fn new(opts: ActiveMqOptions) -> Result<Self, String> {
        if opts.url.cannot_be_a_base() {
            return Err(format!("Broker URL {} cannot be used as a base", opts.url));
        }
        let client = Client::builder()
            .timeout(opts.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client, opts: Arc::from(opts) })
    }

    /// Computes the URL to which messages for `topic` have to be posted.
    fn topic_url(&self, topic: &str) -> Url {
        let mut url = self.opts.url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "message", topic]);
        }
        url.query_pairs_mut().append_pair("type", "topic");
        url
    }
}

#[async_trait]
impl Notifier for ActiveMqNotifier {
    async fn publish(&self, topic: &str, message: &str) -> BrokerResult<()> {
        let url = self.topic_url(topic);
        debug!("Posting message to {}", url);

        let response = self
            .client
            .post(url.clone())
            .basic_auth(&self.opts.username, Some(&self.opts.password))
            .form(&[("body", message)])
            .send()
            .await
            .map_err(|e| BrokerError::Unreachable(format!("POST to {} failed: {}", url, e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(http_response_to_broker_error(response).await)
        }
    }
}
