//! Walkthroughs of the client API that print to a writer.
//!
//! Each routine issues real requests through the [`ChatClient`] it is given and
//! propagates every error unchanged; the binary decides how to report them.

use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };
use crate::cli::Demo;
use crate::conversation::ConversationManager;
use crate::llm::chat::ChatClient;
use crate::llm::ChatError;
use crate::models::chat::Message;

pub const LITERATURE_EXPERT_PROMPT: &str =
    "Jesteś ekspertem od literatury polskiej. Odpowiadaj zwięźle i konkretnie.";
pub const ASSISTANT_PROMPT: &str =
    "Jesteś pomocnym asystentem AI specjalizującym się w literaturze polskiej.";

pub const MANAGER_QUESTIONS: [&str; 3] = [
    "Kim był Adam Mickiewicz?",
    "Jakie napisał najważniejsze dzieła?",
    "W którym roku powstał Pan Tadeusz?",
];

pub async fn run_demo(
    demo: Demo,
    client: Arc<dyn ChatClient>,
    system_prompt: Option<&str>,
    out: &mut dyn Write
) -> Result<(), ChatError> {
    for step in demo.expand() {
        match step {
            Demo::Basic => basic_chat(client.as_ref(), out).await?,
            Demo::SystemPrompt => {
                let prompt = system_prompt.unwrap_or(LITERATURE_EXPERT_PROMPT);
                with_system_prompt(client.as_ref(), prompt, out).await?
            }
            Demo::Conversation => conversation(client.as_ref(), out).await?,
            Demo::Models => list_models(client.as_ref(), out).await?,
            Demo::Stream => streaming(client.as_ref(), out).await?,
            Demo::Manager => {
                let prompt = system_prompt.unwrap_or(ASSISTANT_PROMPT);
                conversation_manager(client.clone(), prompt, out).await?
            }
            Demo::Interactive => {
                let prompt = system_prompt.unwrap_or(ASSISTANT_PROMPT);
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                interactive(client.clone(), prompt, stdin, out).await?
            }
            Demo::All => unreachable!("expand() never yields All"),
        }
    }
    Ok(())
}

pub async fn basic_chat(client: &dyn ChatClient, out: &mut dyn Write) -> Result<(), ChatError> {
    writeln!(out, "=== Example 1: Basic question ===\n")?;
    let response = client.chat("Kim jest Adam Mickiewicz?", None, &[]).await?;
    writeln!(out, "Answer: {}\n", response.content())?;
    Ok(())
}

pub async fn with_system_prompt(
    client: &dyn ChatClient,
    system_prompt: &str,
    out: &mut dyn Write
) -> Result<(), ChatError> {
    writeln!(out, "=== Example 2: With a system prompt ===\n")?;
    let response = client.chat(
        "Jakie są najważniejsze dzieła Adama Mickiewicza?",
        Some(system_prompt),
        &[]
    ).await?;
    writeln!(out, "Answer: {}\n", response.content())?;
    Ok(())
}

pub async fn conversation(client: &dyn ChatClient, out: &mut dyn Write) -> Result<(), ChatError> {
    writeln!(out, "=== Example 3: Conversation with history ===\n")?;

    let first_question = "Kim był Adam Mickiewicz?";
    let first = client.chat(first_question, None, &[]).await?;
    writeln!(out, "User: {}", first_question)?;
    writeln!(out, "Bielik: {}\n", first.content())?;

    let history = vec![Message::user(first_question), first.message];
    let second_question = "Kiedy się urodził?";
    let second = client.chat(second_question, None, &history).await?;
    writeln!(out, "User: {}", second_question)?;
    writeln!(out, "Bielik: {}\n", second.content())?;
    Ok(())
}

pub async fn list_models(client: &dyn ChatClient, out: &mut dyn Write) -> Result<(), ChatError> {
    writeln!(out, "=== Example 4: Available models ===\n")?;
    let models = client.list_models().await?;
    writeln!(out, "Models:")?;
    for name in models.names() {
        writeln!(out, "  - {}", name)?;
    }
    writeln!(out)?;
    Ok(())
}

pub async fn streaming(client: &dyn ChatClient, out: &mut dyn Write) -> Result<(), ChatError> {
    writeln!(out, "=== Example 5: Streaming ===\n")?;
    let question = "Opowiedz krótko o historii Polski.";
    writeln!(out, "User: {}", question)?;
    write!(out, "Bielik: ")?;
    out.flush()?;

    let mut stream = client.chat_stream(question, None, &[]).await?;
    while let Some(fragment) = stream.next().await {
        write!(out, "{}", fragment?)?;
        out.flush()?;
    }
    writeln!(out, "\n")?;
    Ok(())
}

pub async fn conversation_manager(
    client: Arc<dyn ChatClient>,
    system_prompt: &str,
    out: &mut dyn Write
) -> Result<(), ChatError> {
    writeln!(out, "=== Example 6: Conversation manager ===\n")?;
    let mut manager = ConversationManager::new(client, Some(system_prompt));

    for question in MANAGER_QUESTIONS {
        writeln!(out, "User: {}", question)?;
        let answer = manager.send_message(question).await?;
        writeln!(out, "Bielik: {}\n", answer)?;
    }
    Ok(())
}

/// Line-by-line chat over `input`. `/clear` resets the history, `/quit` or EOF ends it.
pub async fn interactive<R>(
    client: Arc<dyn ChatClient>,
    system_prompt: &str,
    input: R,
    out: &mut dyn Write
) -> Result<(), ChatError>
    where R: AsyncBufRead + Unpin
{
    writeln!(out, "=== Interactive chat ({}) ===", client.model())?;
    writeln!(out, "Type /clear to forget the conversation, /quit to leave.\n")?;
    let mut manager = ConversationManager::new(client, Some(system_prompt));
    let mut lines = input.lines();

    loop {
        write!(out, "User: ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                manager.clear_history();
                writeln!(out, "(history cleared)\n")?;
            }
            text => {
                let answer = manager.send_message(text).await?;
                writeln!(out, "Bielik: {}\n", answer)?;
            }
        }
    }
    Ok(())
}
