use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use campus_assistant::config::lambda::{LambdaConfig, S3Storage};
use campus_assistant::domain::ports::ConfigProvider;
use campus_assistant::utils::{logger, validation::Validate};
use campus_assistant::{AssistantEngine, GeminiModel, KnowledgeStore};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

type Engine = AssistantEngine<GeminiModel>;

async fn function_handler(engine: &Engine, event: LambdaEvent<Value>) -> Result<Value, Error> {
    tracing::info!("Handling campus query, request id {}", event.context.request_id);
    Ok(engine.reply_json(&event.payload).await)
}

/// Built once per cold start and shared by every invocation.
async fn build_engine() -> anyhow::Result<Engine> {
    let lambda_config = LambdaConfig::from_env().context("reading Lambda environment")?;
    lambda_config
        .validate()
        .context("validating Lambda configuration")?;

    let generalist = lambda_config.generalist();
    let api_key = generalist
        .api_key()
        .context("the AI service key is required before serving")?;
    let model = GeminiModel::new(api_key, generalist.model.clone())
        .with_base_url(generalist.base_url.clone())
        .with_request_timeout(generalist.timeout());

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let mut s3_config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .force_path_style(lambda_config.path_style_addressing());
    if let Some(endpoint) = &lambda_config.s3_endpoint {
        s3_config = s3_config.endpoint_url(endpoint);
    }
    let storage = S3Storage::new(
        S3Client::from_conf(s3_config.build()),
        lambda_config.knowledge_bucket.clone(),
    );

    let store = KnowledgeStore::load_or_empty(&storage, lambda_config.knowledge_path()).await;
    Ok(AssistantEngine::from_config(&lambda_config, store, model))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let engine = match build_engine().await {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("❌ Lambda initialisation failed: {:#}", e);
            return Err(e.into());
        }
    };
    tracing::info!("🚀 Campus assistant ready");

    run(service_fn(move |event: LambdaEvent<Value>| {
        let engine = Arc::clone(&engine);
        async move { function_handler(&engine, event).await }
    }))
    .await
}
