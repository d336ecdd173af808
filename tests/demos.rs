mod common;

use bielik_chat::cli::Demo;
use bielik_chat::demos::{ interactive, run_demo, ASSISTANT_PROMPT };
use bielik_chat::llm::chat::new_client;
use bielik_chat::llm::{ ChatError, LlmConfig };
use common::{ ollama_router, spawn_stub, MICKIEWICZ_ANSWER };

#[tokio::test]
async fn all_demos_print_every_section() {
    let base = spawn_stub(ollama_router(MICKIEWICZ_ANSWER)).await;
    let client = new_client(&LlmConfig::new(&base)).unwrap();
    let mut out = Vec::new();

    run_demo(Demo::All, client, None, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    for header in [
        "Example 1: Basic question",
        "Example 2: With a system prompt",
        "Example 3: Conversation with history",
        "Example 4: Available models",
        "Example 5: Streaming",
        "Example 6: Conversation manager",
    ] {
        assert!(text.contains(header), "missing '{header}' in:\n{text}");
    }
    assert!(text.contains("  - bielik-11b"));
    assert!(text.contains(&format!("Bielik: {}", MICKIEWICZ_ANSWER)));
    assert!(!text.contains("Interactive chat"));
}

#[tokio::test]
async fn demo_stops_on_first_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = new_client(&LlmConfig::new(format!("http://{}", addr))).unwrap();
    let mut out = Vec::new();

    let err = run_demo(Demo::All, client, None, &mut out).await.unwrap_err();

    assert!(matches!(err, ChatError::Connection(_)));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Example 1"));
    assert!(!text.contains("Example 2"));
}

#[tokio::test]
async fn interactive_session_handles_commands() {
    let base = spawn_stub(ollama_router(MICKIEWICZ_ANSWER)).await;
    let client = new_client(&LlmConfig::new(&base)).unwrap();
    let input: &[u8] = "Kim był Adam Mickiewicz?\n\n/clear\nA Słowacki?\n/quit\nnigdy wysłane\n".as_bytes();
    let mut out = Vec::new();

    interactive(client, ASSISTANT_PROMPT, input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches(&format!("Bielik: {}", MICKIEWICZ_ANSWER)).count(), 2);
    assert!(text.contains("(history cleared)"));
}
