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

 //! slack web api abstraction

use reqwest::Client;
use serde::Deserialize;
use crate::define_error;

pub const SLACK_API_URL: &str = "https://slack.com/api";

define_error!{ pub OdinSlackError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    ApiError(String) : "slack api error: {0}"
}

pub type SlackResult<T> = Result<T,OdinSlackError>;

#[derive(Deserialize,Debug)]
struct SlackResponse {
    ok: bool,
    error: Option<String>
}

/// send chat text message through an explicit client and api base url.
/// note - icon replaces avatar, but ony in the first of a sequence of messages from the same sender.
/// Slack reports most failures (unknown channel, invalid token) with a 200 status, hence we have to check the
/// `ok` field of the response
pub async fn send_msg_to (client: &Client, api_url: &str, token: &str, channel_id: &str, msg: &str, icon: Option<&str>) -> SlackResult<()> {
    let mut params: Vec<(&str,&str)> = Vec::new();
    params.push( ("channel", channel_id) );
    params.push( ("text", msg) );
    if let Some(icon_name) = icon { params.push( ("icon_emoji", icon_name) ); }

    let resp: SlackResponse = client.post( format!("{api_url}/chat.postMessage"))
        .bearer_auth( token)
        .query( &params)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if resp.ok {
        Ok(())
    } else {
        Err( OdinSlackError::ApiError( resp.error.unwrap_or_else( || "unknown".to_string())) )
    }
}
