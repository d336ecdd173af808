pub mod cli;
pub mod conversation;
pub mod demos;
pub mod llm;
pub mod models;

use cli::Args;
use llm::chat::new_client;
use llm::ChatError;
use log::info;

pub async fn run(args: Args) -> Result<(), ChatError> {
    info!("--- Chat Configuration ---");
    info!("Base URL: {}", args.base_url);
    info!("Model: {}", args.model);
    info!("Timeout: {}s", args.timeout_secs);
    info!("Demo: {}", args.demo);
    if let Some(prompt) = &args.system_prompt {
        info!("System Prompt Override: {}", prompt);
    }
    info!("--------------------------");

    let client = new_client(&args.llm_config())?;
    let mut stdout = std::io::stdout();
    demos::run_demo(args.demo, client, args.system_prompt.as_deref(), &mut stdout).await
}
