#![allow(unused)]

/// tests for the narration queue and its services
/// run with "cargo test --test test_narrator -- --nocapture"

use std::{collections::HashMap, net::SocketAddr, sync::{Arc,Mutex}};
use async_trait::async_trait;
use axum::{Json, Router, extract::Query, routing::post};
use serde_json::{json,Value};
use tokio::{net::TcpListener, time::{timeout, Instant}};
use tokio_util::sync::CancellationToken;
use odin_common::datetime::{millis, secs};
use odin_flyover::{
    Detection,
    errors::{OdinFlyoverError,Result},
    narrator::{
        extract_gemini_text, CommandSpeaker, GeminiConfig, GeminiSummarizer, Narrator, SpeakerConfig,
        SpeechSynthesizer, Summarizer, DEFAULT_PROMPT
    }
};

/// fails for callsign "FAIL", returns no text for "EMPTY"
struct MockSummarizer {}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize (&self, d: &Detection)->Result<Option<String>> {
        match d.callsign.as_str() {
            "FAIL" => Err( OdinFlyoverError::OpFailedError("no quota".into())),
            "EMPTY" => Ok(None),
            cs => Ok( Some( format!("{cs} from {} to {}", d.from_country, d.to_country)))
        }
    }
}

#[derive(Clone,Default)]
struct MockSpeaker {
    spoken: Arc<Mutex<Vec<String>>>
}

#[async_trait]
impl SpeechSynthesizer for MockSpeaker {
    async fn speak (&self, text: &str)->Result<()> {
        self.spoken.lock().unwrap().push( text.to_string());
        Ok(())
    }
}

fn detection (callsign: &str)->Detection {
    Detection {
        id: callsign.to_lowercase(),
        callsign: callsign.into(),
        aircraft: "A321".into(),
        registration: "TC-JSA".into(),
        airline: "TK".into(),
        from_iata: "IST".into(),
        to_iata: "LHR".into(),
        from_country: "Istanbul, Turkey".into(),
        to_country: "London, United Kingdom".into(),
        distance: 7,
        altitude: Some(12000),
        speed: Some(300),
        direction: "West".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_queue_continues_after_failure () {
    let speaker = MockSpeaker::default();
    let handle = Narrator::spawn( Arc::new( MockSummarizer{}), Arc::new( speaker.clone()), secs(4), CancellationToken::new());

    for cs in ["TK1", "FAIL", "EMPTY", "TK2"] {
        assert!( handle.enqueue( detection(cs)));
    }

    let n_spoken = handle.shutdown().await.unwrap();
    let spoken = speaker.spoken.lock().unwrap().clone();
    println!("{spoken:#?}");

    assert_eq!( n_spoken, 2);
    assert_eq!( spoken, vec![
        "TK1 from Istanbul, Turkey to London, United Kingdom".to_string(),
        "TK2 from Istanbul, Turkey to London, United Kingdom".to_string()
    ]);
}

/// always fails, records when it was called
#[derive(Clone,Default)]
struct FailingSummarizer {
    calls: Arc<Mutex<Vec<Instant>>>
}

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize (&self, _d: &Detection)->Result<Option<String>> {
        self.calls.lock().unwrap().push( Instant::now());
        Err( OdinFlyoverError::OpFailedError("429 Too Many Requests".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_delay_after_failures () {
    let summarizer = FailingSummarizer::default();
    let speaker = MockSpeaker::default();
    let handle = Narrator::spawn( Arc::new( summarizer.clone()), Arc::new( speaker.clone()), secs(4), CancellationToken::new());

    for cs in ["TK1", "TK2", "TK3"] {
        handle.enqueue( detection(cs));
    }
    assert_eq!( handle.shutdown().await.unwrap(), 0);

    let calls = summarizer.calls.lock().unwrap().clone();
    assert_eq!( calls.len(), 3);
    for w in calls.windows(2) {
        let gap = w[1] - w[0];
        println!("gap between summarizer calls: {gap:?}");
        assert!( gap >= secs(4));
    }
    assert!( speaker.spoken.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancel () {
    let speaker = MockSpeaker::default();
    let cancel = CancellationToken::new();
    let handle = Narrator::spawn( Arc::new( MockSummarizer{}), Arc::new( speaker.clone()), secs(60), cancel.clone());

    handle.enqueue( detection("TK1"));
    handle.enqueue( detection("TK2"));
    tokio::time::sleep( secs(1)).await; // TK1 spoken, worker now waits for the delay
    cancel.cancel();

    assert_eq!( handle.shutdown().await.unwrap(), 1);
    assert_eq!( speaker.spoken.lock().unwrap().len(), 1);
}

#[test]
fn test_extract_gemini_text () {
    let response = json!({
        "candidates": [ { "content": { "parts": [ { "text": " From Istanbul, Turkey to New York, United States. \n" } ], "role": "model" } } ]
    });
    assert_eq!( extract_gemini_text( &response).as_deref(), Some("From Istanbul, Turkey to New York, United States."));

    assert_eq!( extract_gemini_text( &json!({ "candidates": [] })), None);
    assert_eq!( extract_gemini_text( &json!({ "promptFeedback": { "blockReason": "OTHER" } })), None);
}

#[tokio::test]
async fn test_gemini_summarizer () {
    let prompts: Arc<Mutex<Vec<String>>> = Arc::new( Mutex::new( Vec::new()));
    let p = prompts.clone();

    let router = Router::new()
        .route( "/generate", post( move |Query(params): Query<HashMap<String,String>>, Json(body): Json<Value>| {
            let p = p.clone();
            async move {
                assert_eq!( params.get("key").map( String::as_str), Some("test-key"));
                if let Some(prompt) = body.pointer("/contents/0/parts/0/text").and_then( Value::as_str) {
                    p.lock().unwrap().push( prompt.to_string());
                }
                Json( json!({ "candidates": [ { "content": { "parts": [ { "text": "Istanbul to London" } ] } } ] }))
            }
        }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn( async move { axum::serve( listener, router).await.unwrap() });

    let config = GeminiConfig::new( "test-key", format!("http://{addr}/generate"));
    let summarizer = GeminiSummarizer::new( config).unwrap();
    let text = summarizer.summarize( &detection("TK1")).await.unwrap();
    assert_eq!( text.as_deref(), Some("Istanbul to London"));

    let prompt = prompts.lock().unwrap()[0].clone();
    println!("{prompt}");
    assert!( prompt.starts_with( &format!("{DEFAULT_PROMPT}\n\n{{")));
    assert!( prompt.contains("\"fromIata\": \"IST\""));
    assert!( prompt.contains("\"toCountry\": \"London, United Kingdom\""));
}

#[tokio::test]
async fn test_gemini_unresponsive () {
    let router = Router::new()
        .route( "/generate", post( || async { tokio::time::sleep( secs(3600)).await; Json( json!({})) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn( async move { axum::serve( listener, router).await.unwrap() });

    let config = GeminiConfig { timeout: millis(500), ..GeminiConfig::new( "test-key", format!("http://{addr}/generate")) };
    let summarizer = GeminiSummarizer::new( config).unwrap();
    let res = timeout( secs(10), summarizer.summarize( &detection("TK1"))).await.expect("summarize did not return in time");
    println!("{res:?}");
    assert!( res.is_err());
}

#[test]
fn test_speaker_args () {
    let speaker = CommandSpeaker::new( SpeakerConfig::default());
    assert_eq!( speaker.wpm(), 140);
    assert_eq!( speaker.command_args("hello there"), vec!["-v", "Yelda", "-r", "140", "hello there"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_speaker_command () {
    let config = SpeakerConfig { cmd: "echo".into(), args: vec!["{text}".into()], ..SpeakerConfig::default() };
    CommandSpeaker::new( config).speak("hello").await.unwrap();

    let config = SpeakerConfig { cmd: "no-such-tts-command".into(), ..SpeakerConfig::default() };
    let res = CommandSpeaker::new( config).speak("hello").await;
    assert!( matches!( res, Err(OdinFlyoverError::CommandError(_))));
}
