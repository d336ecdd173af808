//! A throwaway Ollama look-alike served by axum on a random local port.
#![allow(dead_code)]

use axum::{ http::header, response::IntoResponse, routing::{ get, post }, Json, Router };
use serde_json::{ json, Value };

pub const MICKIEWICZ_ANSWER: &str = "Adam Mickiewicz był polskim poetą.";

pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn chat_body(content: &str) -> Value {
    json!({
        "model": "bielik-11b",
        "created_at": "2024-05-01T12:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true,
        "done_reason": "stop",
        "eval_count": 9
    })
}

/// NDJSON body that spells out `content` a few characters per line, followed by the
/// terminal `done` line the real server sends.
pub fn ndjson_body(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut body = String::new();
    for piece in chars.chunks(4) {
        let fragment: String = piece.iter().collect();
        let line = json!({
            "model": "bielik-11b",
            "message": { "role": "assistant", "content": fragment },
            "done": false
        });
        body.push_str(&line.to_string());
        body.push('\n');
    }
    body.push('\n');
    body.push_str(&json!({ "model": "bielik-11b", "done": true, "eval_count": 9 }).to_string());
    body.push('\n');
    body
}

/// Answers every chat with `reply`, honouring the `stream` flag, and lists one model.
pub fn ollama_router(reply: &'static str) -> Router {
    Router::new()
        .route(
            "/api/chat",
            post(move |Json(req): Json<Value>| async move {
                if req["stream"].as_bool() == Some(true) {
                    (
                        [(header::CONTENT_TYPE, "application/x-ndjson")],
                        ndjson_body(reply),
                    ).into_response()
                } else {
                    Json(chat_body(reply)).into_response()
                }
            })
        )
        .route(
            "/api/tags",
            get(|| async { Json(json!({ "models": [{ "name": "bielik-11b", "size": 6700000000u64 }] })) })
        )
}
