//! Local stand-in for the Moedict API.
//!
//! Serves a handful of fixed entries on 127.0.0.1 and counts requests, so
//! tests can check both the mapping of each response and that lookups only
//! hit the network when they should.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use libzhuyin::ZhuyinConfig;

pub struct FakeDictionary {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl FakeDictionary {
    pub fn start() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind fake dictionary");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                counter.fetch_add(1, Ordering::SeqCst);
                let accepts_json = request.headers().iter().any(|h| {
                    h.field.equiv("Accept") && h.value.as_str() == "application/json"
                });
                if accepts_json && entry_word(request.url()) == "缺" {
                    // Advertises more body than it sends
                    let _ = request.respond(tiny_http::Response::new(
                        tiny_http::StatusCode(404),
                        Vec::new(),
                        std::io::Cursor::new(b"{}".to_vec()),
                        Some(4096),
                        None,
                    ));
                    continue;
                }
                let (status, body) = if accepts_json {
                    respond(request.url())
                } else {
                    (406, String::new())
                };
                let _ = request.respond(
                    tiny_http::Response::from_string(body).with_status_code(status),
                );
            }
        });

        Self { addr, hits }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Service config pointing at this server and the sample data, cache off.
    pub fn config(&self) -> ZhuyinConfig {
        let mut config = ZhuyinConfig {
            dictionary_url: self.base_url(),
            timeout_ms: 2000,
            cache_ttl_secs: 0,
            ..ZhuyinConfig::default()
        };
        // Integration tests run from the crate directory, not the workspace root
        config.base_mut().phrases_path = "../data/phrases.json".into();
        config.base_mut().reading_index_path = "../data/readingIndex.json".into();
        config
    }
}

fn entry_word(url: &str) -> String {
    url.strip_prefix("/a/")
        .and_then(|rest| rest.strip_suffix(".json"))
        .and_then(|w| urlencoding::decode(w).ok())
        .map(|w| w.into_owned())
        .unwrap_or_default()
}

fn respond(url: &str) -> (u16, String) {
    match entry_word(url).as_str() {
        "我" => (
            200,
            r#"{"t":"我","h":[{"b":"（語音）ㄨㄛˇ","d":[]},{"b":"ㄨㄛˇ"}]}"#.to_string(),
        ),
        "行" => (200, r#"{"t":"行","h":[{"b":"ㄒㄧㄥˊ"},{"b":"ㄏㄤˊ"}]}"#.to_string()),
        "不" => (200, r#"{"t":"不","h":[{"b":"ㄅㄨˋ"}]}"#.to_string()),
        "們" => (200, r#"{"t":"們","h":[{"b":"˙"}]}"#.to_string()),
        "空" => (200, r#"{"t":"空","h":[]}"#.to_string()),
        "亂" => (200, "<html>oops</html>".to_string()),
        "壞" => (500, "{}".to_string()),
        _ => (404, String::new()),
    }
}
