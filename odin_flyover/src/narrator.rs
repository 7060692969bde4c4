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

//! spoken announcements of detections.
//!
//! Detections are queued through a [NarratorHandle] and processed one at a time by a worker task that
//! turns each detection into a short text (through a [Summarizer]), speaks it (through a
//! [SpeechSynthesizer]) and then pauses for the configured delay before taking the next one. Failures
//! are logged and only affect the item that caused them

use std::{sync::Arc, time::Duration, process::ExitStatus};
use reqwest::Client;
use serde::{Serialize,Deserialize};
use serde_json::{json,Value};
use async_trait::async_trait;
use tokio::{process::Command, sync::mpsc, task::JoinHandle, time::{sleep,timeout}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn,error};
use odin_common::datetime::{deserialize_duration, secs, millis};
use crate::{Detection, errors::{op_failed,OdinFlyoverError,Result}};

pub const DEFAULT_PROMPT: &str = "Say only from which city and country to which city and country this flight is going, \
using the full country names. Do not say anything else.";

/// turns a detection into a short text that can be spoken
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// returns None if the service did not produce any text
    async fn summarize (&self, detection: &Detection)->Result<Option<String>>;
}

/// converts text into audible speech
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak (&self, text: &str)->Result<()>;
}

/* #region Gemini ************************************************************************************/

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    #[serde(default="default_prompt")]
    pub prompt: String,
    #[serde(default="default_request_timeout", deserialize_with="deserialize_duration", skip_serializing)]
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new (api_key: impl ToString, api_url: impl ToString)->Self {
        GeminiConfig {
            api_key: api_key.to_string(),
            api_url: api_url.to_string(),
            prompt: default_prompt(),
            timeout: default_request_timeout()
        }
    }
}

fn default_prompt()->String { DEFAULT_PROMPT.to_string() }
fn default_request_timeout()->Duration { secs(30) }

/// [Summarizer] that uses the Google Gemini generateContent API
pub struct GeminiSummarizer {
    config: GeminiConfig,
    client: Client,
}

impl GeminiSummarizer {
    pub fn new (config: GeminiConfig)->Result<Self> {
        let client = Client::builder().timeout( config.timeout).build()?;
        Ok( GeminiSummarizer { config, client } )
    }

    pub fn prompt_for (&self, detection: &Detection)->Result<String> {
        let json = serde_json::to_string_pretty( detection)?;
        Ok( format!("{}\n\n{}", self.config.prompt, json) )
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize (&self, detection: &Detection)->Result<Option<String>> {
        let prompt = self.prompt_for( detection)?;
        let body = json!({ "contents": [ { "parts": [ { "text": prompt } ] } ] });

        let response: Value = self.client.post( &self.config.api_url)
            .query( &[("key", self.config.api_key.as_str())])
            .json( &body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok( extract_gemini_text( &response) )
    }
}

/// get the `candidates[0].content.parts[0].text` value of a generateContent response
pub fn extract_gemini_text (response: &Value)->Option<String> {
    response.pointer("/candidates/0/content/parts/0/text")
        .and_then( Value::as_str)
        .map( str::trim)
        .filter( |s| !s.is_empty())
        .map( str::to_string)
}

/* #endregion Gemini */

/* #region speech command ****************************************************************************/

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct SpeakerConfig {
    pub cmd: String,
    /// argument template, `{voice}`, `{rate}` and `{text}` are replaced with the respective values
    pub args: Vec<String>,
    pub voice: String,
    /// relative speech rate, 1.0 is normal speed
    pub rate: f64,
    /// words per minute that correspond to rate 1.0
    pub base_wpm: f64,
    #[serde(deserialize_with="deserialize_duration", skip_serializing)]
    pub timeout: Duration,
}

impl Default for SpeakerConfig {
    fn default()->Self {
        SpeakerConfig {
            cmd: "say".to_string(),
            args: vec!["-v".into(), "{voice}".into(), "-r".into(), "{rate}".into(), "{text}".into()],
            voice: "Yelda".to_string(),
            rate: 0.8,
            base_wpm: 175.0,
            timeout: secs(60),
        }
    }
}

/// [SpeechSynthesizer] that runs an external text-to-speech program such as the macOS `say` command
pub struct CommandSpeaker {
    config: SpeakerConfig,
}

impl CommandSpeaker {
    pub fn new (config: SpeakerConfig)->Self {
        CommandSpeaker { config }
    }

    /// the rate value we pass to the command, in words per minute
    pub fn wpm (&self)->u32 {
        (self.config.rate * self.config.base_wpm).round().max(1.0) as u32
    }

    pub fn command_args (&self, text: &str)->Vec<String> {
        let rate = self.wpm().to_string();
        self.config.args.iter().map( |a| {
            a.replace("{voice}", &self.config.voice)
             .replace("{rate}", &rate)
             .replace("{text}", text)
        }).collect()
    }
}

fn exit_ok (status: ExitStatus)->Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err( OdinFlyoverError::CommandError( format!("child status: {}", status)))
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSpeaker {
    async fn speak (&self, text: &str)->Result<()> {
        let mut cmd = Command::new( self.config.cmd.as_str());
        cmd.args( self.command_args( text)).kill_on_drop(true);

        match cmd.spawn() {
            Ok(mut child) => exit_ok( timeout( self.config.timeout, child.wait()).await?? ),
            Err(e) => Err( OdinFlyoverError::CommandError( format!("failed to run {}: {}", self.config.cmd, e)) )
        }
    }
}

/* #endregion speech command */

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct NarratorConfig {
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub speaker: SpeakerConfig,
    #[serde(default="default_delay", deserialize_with="deserialize_duration", skip_serializing)]
    pub delay: Duration,
}

fn default_delay()->Duration { millis(4000) }

impl NarratorConfig {
    pub fn new (gemini: GeminiConfig)->Self {
        NarratorConfig { gemini, speaker: SpeakerConfig::default(), delay: default_delay() }
    }
}

pub struct Narrator {}

impl Narrator {
    /// start the worker task. The worker terminates when `cancel` is cancelled or when the
    /// returned handle is shut down and the queue is drained
    pub fn spawn (summarizer: Arc<dyn Summarizer>, speaker: Arc<dyn SpeechSynthesizer>, delay: Duration, cancel: CancellationToken)->NarratorHandle {
        let (tx, rx) = mpsc::unbounded_channel::<Detection>();
        let task = tokio::spawn( run_narrator( rx, summarizer, speaker, delay, cancel));
        NarratorHandle { tx, task }
    }

    pub fn spawn_from_config (config: &NarratorConfig, cancel: CancellationToken)->Result<NarratorHandle> {
        let summarizer = Arc::new( GeminiSummarizer::new( config.gemini.clone())?);
        let speaker = Arc::new( CommandSpeaker::new( config.speaker.clone()));
        Ok( Self::spawn( summarizer, speaker, config.delay, cancel) )
    }
}

pub struct NarratorHandle {
    tx: mpsc::UnboundedSender<Detection>,
    task: JoinHandle<usize>,
}

impl NarratorHandle {
    /// queue a detection for narration. This never blocks. Returns false if the worker is gone
    pub fn enqueue (&self, detection: Detection)->bool {
        self.tx.send( detection).is_ok()
    }

    /// close the queue and wait for the worker to process what is left in it.
    /// Returns the number of detections that were spoken
    pub async fn shutdown (self)->Result<usize> {
        let NarratorHandle { tx, task } = self;
        drop(tx);
        task.await.map_err( |e| op_failed!("narrator task failed: {}", e))
    }
}

async fn run_narrator (mut rx: mpsc::UnboundedReceiver<Detection>, summarizer: Arc<dyn Summarizer>, speaker: Arc<dyn SpeechSynthesizer>,
                       delay: Duration, cancel: CancellationToken)->usize
{
    let mut n_spoken = 0;

    loop {
        let detection = tokio::select! {
            _ = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(detection) => detection,
                None => break
            }
        };

        let spoken = tokio::select! {
            _ = cancel.cancelled() => break,
            res = narrate( summarizer.as_ref(), speaker.as_ref(), &detection) => res
        };

        match spoken {
            Ok(true) => n_spoken += 1,
            Ok(false) => warn!("no narration text for {}", detection.callsign),
            Err(e) => error!("narration of {} failed: {}", detection.callsign, e)
        }

        // also after failures, the summarizer might be rate limited
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep( delay) => {}
        }
    }

    debug!("narrator terminated after {n_spoken} announcements");
    n_spoken
}

async fn narrate (summarizer: &dyn Summarizer, speaker: &dyn SpeechSynthesizer, detection: &Detection)->Result<bool> {
    if let Some(text) = summarizer.summarize( detection).await? {
        info!("narrating: {text}");
        speaker.speak( &text).await?;
        Ok(true)
    } else {
        Ok(false)
    }
}
