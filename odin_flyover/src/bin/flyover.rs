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

#![allow(unused)]

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;
use odin_flyover::{config::FlyoverConfig, scheduler::Scheduler, service::FlyoverService};

const LONG_ABOUT: &str = "report aircraft that fly over a configured location

Without --config the settings are read from environment variables, which have to be exported in the
shell that starts this program (no .env file is read):
  LATITUDE, LONGITUDE, RADIUS_METERS, CHECK_INTERVAL_MS, AIRPORTS_FILE
  TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID
  SLACK_TOKEN, SLACK_CHANNEL_ID
  GEMINI_API_KEY, GEMINI_API_URL, GEMINI_PROMPT
RON config files can refer to exported variables as ${VAR}.
Log levels are set with RUST_LOG (default: info)";

#[derive(Parser, Debug)]
#[command(version, about = "report aircraft that fly over a configured location", long_about = LONG_ABOUT)]
pub struct Args {
    /// RON config file. If not set the configuration is taken from exported environment variables
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// run a single detection cycle and exit
    #[arg(long)]
    pub once: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"))) // use RUST_LOG to override
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FlyoverConfig::from_ron_file( path)?,
        None => FlyoverConfig::from_env()?
    };

    let cancel = CancellationToken::new();
    let mut service = FlyoverService::from_config( &config, cancel.clone())?;
    let scheduler = Scheduler::new( config.check_interval);

    if args.once {
        scheduler.run_once( &mut service).await;
        service.shutdown().await?;

    } else {
        let ctrl_c_cancel = cancel.clone();
        tokio::spawn( async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received Ctrl-C, terminating");
                    ctrl_c_cancel.cancel();
                }
                Err(e) => warn!("cannot listen for Ctrl-C: {e}")
            }
        });

        let n_cycles = scheduler.run( &mut service, cancel.clone()).await;
        info!("terminated after {n_cycles} cycles");
    }

    Ok(())
}
