use campus_assistant::config::{CliConfig, Command, ListTarget};
use campus_assistant::core::formatter::{self, to_plain_text};
use campus_assistant::domain::model::{ChatReply, FormattedResponse};
use campus_assistant::domain::ports::ConfigProvider;
use campus_assistant::utils::error::{AssistantError, ErrorSeverity, Result};
use campus_assistant::utils::{logger, validation::mask_secret};
use campus_assistant::{AssistantConfig, AssistantEngine, GeminiModel, KnowledgeStore, LocalStorage};
use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

async fn load_store(config: &AssistantConfig) -> KnowledgeStore {
    KnowledgeStore::load_or_empty(&LocalStorage::default(), config.knowledge_path()).await
}

async fn build_engine(config: &AssistantConfig) -> Result<AssistantEngine<GeminiModel>> {
    let generalist = config.generalist();
    // Checked before the store is read: no key means nothing is served.
    let model = GeminiModel::new(generalist.api_key()?, generalist.model.clone())
        .with_base_url(generalist.base_url.clone())
        .with_request_timeout(generalist.timeout());

    let store = load_store(config).await;
    Ok(AssistantEngine::from_config(config, store, model))
}

fn print_response(response: &FormattedResponse) {
    println!("{}", to_plain_text(&response.text));
    if let Some(coordinates) = response.coordinates {
        println!("📍 {}, {}", coordinates.lat, coordinates.lng);
    }
}

fn print_reply(reply: &ChatReply) {
    tracing::debug!("Reply source: {:?}", reply.source);
    print_response(&reply.response);
}

async fn chat(engine: &AssistantEngine<GeminiModel>) -> Result<()> {
    println!("💬 Ask about departments, staff, syllabuses, facilities or holidays. Type 'exit' to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match engine.reply(line).await {
            Ok(reply) => print_reply(&reply),
            Err(e) => eprintln!("❌ {}", e.user_friendly_message()),
        }
    }
    println!("👋 Goodbye!");
    Ok(())
}

async fn list(config: &AssistantConfig, target: &ListTarget) -> Result<()> {
    let store = load_store(config).await;
    match target {
        ListTarget::Departments => {
            print_response(&formatter::render_department_index(store.departments()))
        }
        ListTarget::Facilities => print_response(&formatter::render_facility_index(store.facilities())),
        ListTarget::Syllabi { level } => {
            for (position, level) in level.levels().iter().enumerate() {
                if position > 0 {
                    println!();
                }
                print_response(&formatter::render_syllabus_catalogue(
                    *level,
                    store.syllabuses(*level),
                ));
            }
        }
    }
    Ok(())
}

fn check_key(config: &AssistantConfig) -> Result<()> {
    let key = config.generalist().api_key()?;
    println!("✅ API key configured: {}", mask_secret(&key));
    println!("🤖 Model: {}", config.generalist().model);
    Ok(())
}

async fn run(cli: &CliConfig) -> Result<()> {
    let config = cli.resolve()?;
    if cli.verbose {
        tracing::debug!("Configuration: {:?}", config.knowledge);
    }

    match &cli.command {
        Command::Ask { query } => {
            let engine = build_engine(&config).await?;
            let reply = engine.reply(&CliConfig::query_text(query)).await?;
            print_reply(&reply);
        }
        Command::Chat => {
            let engine = build_engine(&config).await?;
            chat(&engine).await?;
        }
        Command::List { target } => list(&config, target).await?,
        Command::CheckKey => check_key(&config)?,
    }
    Ok(())
}

fn exit_code(e: &AssistantError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting campus-assistant");
    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}
