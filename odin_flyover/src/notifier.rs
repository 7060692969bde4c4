/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{fmt::Write, time::Duration};
use reqwest::Client;
use serde::{Serialize,Deserialize};
use serde_json::json;
use async_trait::async_trait;
use tracing::{debug,info,warn,error};
use odin_common::{slack, datetime::{deserialize_duration, secs}};
use crate::{Detection, errors::{op_failed,Result}};

/// create the text for a set of detections. Each detection gets its own block, blocks are separated by
/// blank lines. The text uses Markdown emphasis for the callsign
pub fn format_message (detections: &[Detection])->String {
    let mut msg = String::new();

    for (i,d) in detections.iter().enumerate() {
        if i > 0 { msg.push_str("\n\n") }

        let alt = d.altitude.map( |a| a.to_string()).unwrap_or_else( || "?".to_string());
        let spd = d.speed.map( |s| s.to_string()).unwrap_or_else( || "?".to_string());

        // writing to a String can't fail
        let _ = write!( msg, "✈️ *{}* — {} ({}) → {} ({})  \nDistance: {} km | Alt: {} ft | Speed: {} knots | Heading: {}",
            d.callsign, d.from_iata, d.from_country, d.to_iata, d.to_country,
            d.distance, alt, spd, d.direction);
    }

    msg
}

/// abstract interface for the channels we send notifications through.
/// Implementations have to make sure this returns in bounded time
#[async_trait]
pub trait Messenger: Send + Sync {
    fn name (&self)->&str;

    async fn send_msg (&self, text: &str)->Result<()>;
}

/* #region Telegram ***********************************************************************************/

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default="default_telegram_url")]
    pub api_url: String,
    #[serde(default="default_send_timeout", deserialize_with="deserialize_duration", skip_serializing)]
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new (bot_token: impl ToString, chat_id: impl ToString)->Self {
        TelegramConfig {
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            api_url: default_telegram_url(),
            timeout: default_send_timeout()
        }
    }
}

fn default_telegram_url()->String { TELEGRAM_API_URL.to_string() }

/// upper bound for a single send request. Messengers are awaited by the detection cycle
pub fn default_send_timeout()->Duration { secs(10) }

fn create_client (timeout: Duration)->Result<Client> {
    Ok( Client::builder().timeout( timeout).build()? )
}

#[derive(Deserialize,Debug)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>
}

/// sends notifications through the Telegram bot API
pub struct TelegramMessenger {
    config: TelegramConfig,
    client: Client,
}

impl TelegramMessenger {
    pub fn new (config: TelegramConfig)->Result<Self> {
        let client = create_client( config.timeout)?;
        Ok( TelegramMessenger { config, client } )
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    fn name (&self)->&str { "telegram" }

    async fn send_msg (&self, text: &str)->Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.config.api_url, self.config.bot_token);
        let body = json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "Markdown"
        });

        // telegram returns a JSON object with `ok: false` for api errors, also for non-200 status codes
        let resp: TelegramResponse = self.client.post( &url).json( &body).send().await?.json().await?;
        if resp.ok {
            Ok(())
        } else {
            Err( op_failed!("telegram sendMessage rejected: {}", resp.description.unwrap_or_else( || "unknown".to_string())) )
        }
    }
}

/* #endregion Telegram */

/* #region Slack **************************************************************************************/

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct SlackConfig {
    pub token: String,
    pub channel_id: String,
    #[serde(default="default_slack_url")]
    pub api_url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default="default_send_timeout", deserialize_with="deserialize_duration", skip_serializing)]
    pub timeout: Duration,
}

impl SlackConfig {
    pub fn new (token: impl ToString, channel_id: impl ToString)->Self {
        SlackConfig {
            token: token.to_string(),
            channel_id: channel_id.to_string(),
            api_url: default_slack_url(),
            icon: None,
            timeout: default_send_timeout()
        }
    }
}

fn default_slack_url()->String { slack::SLACK_API_URL.to_string() }

pub struct SlackMessenger {
    config: SlackConfig,
    client: Client,
}

impl SlackMessenger {
    pub fn new (config: SlackConfig)->Result<Self> {
        let client = create_client( config.timeout)?;
        Ok( SlackMessenger { config, client } )
    }
}

#[async_trait]
impl Messenger for SlackMessenger {
    fn name (&self)->&str { "slack" }

    async fn send_msg (&self, text: &str)->Result<()> {
        let cfg = &self.config;
        slack::send_msg_to( &self.client, &cfg.api_url, &cfg.token, &cfg.channel_id, text, cfg.icon.as_deref()).await?;
        Ok(())
    }
}

/* #endregion Slack */

/// a messenger that just prints to stdout, mostly for testing and debugging purposes
pub struct ConsoleMessenger {}

#[async_trait]
impl Messenger for ConsoleMessenger {
    fn name (&self)->&str { "console" }

    async fn send_msg (&self, text: &str)->Result<()> {
        println!("{text}\n");
        Ok(())
    }
}

/// fan out of detection reports to all configured messengers
pub struct Notifier {
    messengers: Vec<Box<dyn Messenger>>
}

impl Notifier {
    pub fn new (messengers: Vec<Box<dyn Messenger>>)->Self {
        Notifier { messengers }
    }

    pub fn add_messenger (&mut self, messenger: impl Messenger + 'static) {
        self.messengers.push( Box::new(messenger));
    }

    pub fn num_messengers (&self)->usize { self.messengers.len() }

    /// send one message for the given detections to each messenger. Failures are logged and not retried.
    /// Returns the number of messengers that accepted the message
    pub async fn dispatch (&self, detections: &[Detection])->usize {
        if detections.is_empty() { return 0 }

        let msg = format_message( detections);
        let mut n_sent = 0;

        for messenger in &self.messengers {
            match messenger.send_msg( &msg).await {
                Ok(()) => {
                    debug!("notification for {} aircraft sent via {}", detections.len(), messenger.name());
                    n_sent += 1;
                }
                Err(e) => error!("failed to send notification via {}: {}", messenger.name(), e)
            }
        }

        if n_sent == 0 && !self.messengers.is_empty() {
            warn!("notification for {} aircraft could not be delivered", detections.len());
        }
        n_sent
    }
}
