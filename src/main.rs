//! Interactive terminal front end.
//!
//! Reads user messages from stdin, one per line, and prints each reply.
//! Pass a session id as the first argument to resume a stored session.

use std::error::Error;
use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use architect_agent::adapters::ai::{
    AnthropicConfig, AnthropicProvider, MockAIProvider, ProviderGenerator, RetryPolicy,
};
use architect_agent::adapters::storage::{FileSessionRepository, InMemorySessionRepository};
use architect_agent::application::{ConversationOrchestrator, SendMessageCommand, SendMessageHandler};
use architect_agent::config::{AiConfig, AiProvider, AppConfig, LoggingConfig, StorageBackend, StorageConfig};
use architect_agent::domain::foundation::SessionId;
use architect_agent::domain::knowledge::StaticKnowledgeBase;
use architect_agent::ports::{Generator, SessionRepository};

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let generator = build_generator(&config.ai)?;
    let repository = build_repository(&config.storage);
    let orchestrator = Arc::new(ConversationOrchestrator::new(
        generator,
        Arc::new(StaticKnowledgeBase::new()),
        config.agent.clone(),
    ));
    let handler = SendMessageHandler::new(repository, orchestrator);

    let mut session_id = match std::env::args().nth(1) {
        Some(raw) => Some(SessionId::from_uuid(Uuid::parse_str(&raw)?)),
        None => None,
    };
    info!(provider = ?config.ai.provider, storage = ?config.storage.backend, "architect agent ready");

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Describe your project (type `exit` to quit).\n> ")
        .await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if EXIT_COMMANDS.contains(&message.to_lowercase().as_str()) {
            break;
        }
        if !message.is_empty() {
            let result = handler
                .handle(SendMessageCommand::new(session_id, message))
                .await?;
            session_id = Some(result.session_id);

            stdout.write_all(format!("\n{}\n", result.reply).as_bytes()).await?;
            if !result.persisted {
                stdout.write_all(b"\n(warning: the session could not be saved)\n").await?;
            }
        }
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
    }

    if let Some(id) = session_id {
        stdout.write_all(format!("\nSession id: {id}\n").as_bytes()).await?;
    }
    Ok(())
}

/// Logs go to stderr so replies on stdout stay readable.
///
/// `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

fn build_generator(ai: &AiConfig) -> Result<Arc<dyn Generator>, Box<dyn Error>> {
    match (ai.provider, ai.anthropic_api_key.as_ref()) {
        (AiProvider::Anthropic, Some(key)) => {
            let provider_config =
                AnthropicConfig::from_secret(Secret::new(key.expose_secret().clone()))
                    .with_model(ai.model.clone())
                    .with_timeout(ai.timeout())
                    .with_max_tokens(ai.max_tokens)
                    .with_temperature(ai.temperature);
            let provider = Arc::new(AnthropicProvider::new(provider_config)?);
            let retry = RetryPolicy::default().with_max_attempts(ai.max_retries);
            Ok(Arc::new(ProviderGenerator::new(provider).with_retry_policy(retry)))
        }
        (AiProvider::Anthropic, None) => Err("ANTHROPIC_API_KEY is required for the anthropic provider".into()),
        (AiProvider::Mock, _) => {
            let provider = Arc::new(MockAIProvider::new());
            Ok(Arc::new(
                ProviderGenerator::new(provider).with_retry_policy(RetryPolicy::immediate(1)),
            ))
        }
    }
}

fn build_repository(storage: &StorageConfig) -> Arc<dyn SessionRepository> {
    match storage.backend {
        StorageBackend::Memory => Arc::new(InMemorySessionRepository::new()),
        StorageBackend::File => Arc::new(FileSessionRepository::new(&storage.data_dir)),
    }
}
