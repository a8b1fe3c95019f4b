//! HTTP lookup service.
//!
//! Routes (all `GET`, JSON bodies from [`crate::payload`]):
//! - `/word-to-zhuyin?word=我` - readings for a word
//! - `/zhuyin-to-phrases?key=ㄨㄛ` - idioms for a tone-free reading key
//! - `/suggest-phrases?word=我` - idioms for a single character
//!
//! A fixed pool of worker threads pulls requests from one listener; each
//! request runs to completion on its worker.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use zhuyin_core::{LookupError, PhrasePipeline, ReadingResolver};

use crate::payload::{
    key_suggestions_reply, phrase_suggestions_reply, word_to_zhuyin_reply, LookupFailure, Reply,
};

/// Request routing over a pipeline. Socket-free, so it can be driven directly.
pub struct Service<R> {
    pipeline: PhrasePipeline<R>,
}

impl<R: ReadingResolver> Service<R> {
    pub fn new(pipeline: PhrasePipeline<R>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &PhrasePipeline<R> {
        &self.pipeline
    }

    /// Answer one request given its method and raw URL (path + query).
    pub fn handle(&self, method: &str, url: &str) -> Reply {
        if !method.eq_ignore_ascii_case("GET") {
            return Reply {
                status: 405,
                body: r#"{"ok":false,"error":"METHOD_NOT_ALLOWED"}"#.to_string(),
            };
        }

        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let route = match path {
            "/word-to-zhuyin" => Route::WordToZhuyin,
            "/zhuyin-to-phrases" => Route::KeyToPhrases,
            "/suggest-phrases" => Route::SuggestPhrases,
            _ => {
                return Reply {
                    status: 404,
                    body: r#"{"ok":false,"error":"NOT_FOUND"}"#.to_string(),
                }
            }
        };

        let Some(params) = parse_query(query) else {
            let failure = match route {
                Route::KeyToPhrases => LookupFailure::for_key("", LookupError::BadInput),
                _ => LookupFailure::for_word("", LookupError::BadInput),
            };
            return Reply::failure(failure);
        };

        match route {
            Route::WordToZhuyin => {
                let word = param(&params, "word");
                word_to_zhuyin_reply(word, self.pipeline.to_reading(word))
            }
            Route::KeyToPhrases => {
                let key = param(&params, "key");
                key_suggestions_reply(key, self.pipeline.suggest(key))
            }
            Route::SuggestPhrases => {
                let word = param(&params, "word");
                phrase_suggestions_reply(word, self.pipeline.suggest_for_char(word))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Route {
    WordToZhuyin,
    KeyToPhrases,
    SuggestPhrases,
}

/// Decode `a=1&b=2` pairs. `None` if any component is not valid UTF-8 once
/// percent-decoded.
fn parse_query(query: &str) -> Option<Vec<(String, String)>> {
    let mut out = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        out.push((decode_component(k)?, decode_component(v)?));
    }
    Some(out)
}

/// First value for `name`, or empty when absent.
fn param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

fn decode_component(s: &str) -> Option<String> {
    urlencoding::decode(&s.replace('+', " "))
        .ok()
        .map(|c| c.into_owned())
}

/// A running server; dropping it does not stop the workers, call [`shutdown`](Self::shutdown).
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<tiny_http::Server>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting requests and wait for the workers to exit.
    pub fn shutdown(self) {
        for _ in &self.workers {
            self.server.unblock();
        }
        for w in self.workers {
            let _ = w.join();
        }
    }

    /// Block until every worker exits.
    pub fn join(self) {
        for w in self.workers {
            let _ = w.join();
        }
    }
}

/// Bind `addr` and start `workers` request threads.
pub fn spawn<R>(addr: &str, service: Arc<Service<R>>, workers: usize) -> Result<ServerHandle>
where
    R: ReadingResolver + Send + Sync + 'static,
{
    let server = tiny_http::Server::http(addr).map_err(|e| anyhow!("binding {addr}: {e}"))?;
    let local = server
        .server_addr()
        .to_ip()
        .context("listener has no IP address")?;
    let server = Arc::new(server);

    let workers = (0..workers.max(1))
        .map(|i| {
            let server = Arc::clone(&server);
            let service = Arc::clone(&service);
            std::thread::Builder::new()
                .name(format!("zhuyin-http-{i}"))
                .spawn(move || worker_loop(&server, &service))
                .context("spawning server worker")
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(addr = %local, workers = workers.len(), "lookup service listening");
    Ok(ServerHandle {
        addr: local,
        server,
        workers,
    })
}

fn worker_loop<R: ReadingResolver>(server: &tiny_http::Server, service: &Service<R>) {
    loop {
        let request = match server.recv() {
            Ok(rq) => rq,
            Err(e) => {
                tracing::debug!(error = %e, "server worker stopping");
                break;
            }
        };

        let method = request.method().as_str().to_string();
        let url = request.url().to_string();
        let reply = service.handle(&method, &url);
        tracing::debug!(%method, %url, status = reply.status, "request");

        let mut response =
            tiny_http::Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(h) = tiny_http::Header::from_bytes(
            &b"Content-Type"[..],
            &b"application/json; charset=utf-8"[..],
        ) {
            response.add_header(h);
        }
        if let Err(e) = request.respond(response) {
            tracing::warn!(error = %e, "failed to send response");
        }
    }
}
