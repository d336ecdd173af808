use bielik_chat::cli::Args;
use clap::Parser;
use dotenv::dotenv;
use log::error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let base_url = args.base_url.clone();

    println!("{}", "=".repeat(60));
    println!("Bielik chat client examples");
    println!("{}", "=".repeat(60));
    println!();

    match bielik_chat::run(args).await {
        Ok(()) => {
            println!("{}", "=".repeat(60));
            println!("All examples finished!");
            println!("{}", "=".repeat(60));
            ExitCode::SUCCESS
        }
        Err(e) if e.is_connection() => {
            error!("{}", e);
            println!("❌ Error: cannot connect to the Ollama API.");
            println!("Make sure Ollama is running at {}", base_url);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            println!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
