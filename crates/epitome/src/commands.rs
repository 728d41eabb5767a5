//! CLI command implementations.

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};

use alembic::PipelineRegistry;
use athanor::{Engine, EngineConfig, ModelLoader, Summarizer};
use epitome_core::{ModelSource, SummarizeRequest, SummaryParams};
use epitome_server::{ApiVersion, Server, ServerConfig};

/// Splits a `<id>=<repo>` pipeline spec. A bare repo ID doubles as its own
/// registry id.
fn parse_model_spec(spec: &str) -> (&str, &str) {
    match spec.split_once('=') {
        Some((id, repo)) if !id.is_empty() => (id, repo),
        _ => (spec, spec),
    }
}

/// Start the inference server.
pub async fn serve(
    host: String,
    port: u16,
    api: String,
    specs: Vec<String>,
    default_model: Option<String>,
) -> Result<()> {
    let addr = format!("{}:{}", host, port).parse()?;
    let api: ApiVersion = api.parse().map_err(|e: String| eyre!(e))?;

    tracing::info!("Starting Epitome server...");

    let mut builder = PipelineRegistry::builder();
    for spec in &specs {
        let (id, repo) = parse_model_spec(spec);

        let config = EngineConfig::builder().model(repo).id(id).build()?;
        match Engine::new(config).await {
            Ok(engine) => {
                builder = builder.register(id, Arc::new(engine) as Arc<dyn Summarizer>);
            }
            Err(e) => {
                // A bad checkpoint should not take the whole server down;
                // serve whatever did load.
                tracing::error!(model = %id, repo = %repo, error = %e, "Failed to load pipeline, skipping");
            }
        }
    }

    if let Some(default_model) = default_model {
        builder = builder.default_model(default_model);
    }

    let registry = builder.build()?;
    if registry.is_empty() {
        eprintln!("\n\x1b[33m!\x1b[0m No pipelines loaded. All inference requests will fail.");
        eprintln!("  Start with: epitome serve --model <id>=<repo>\n");
    }

    let config = ServerConfig::builder().addr(addr).api(api).build();
    let server = Server::new(config, Arc::new(registry));
    server.run().await?;

    Ok(())
}

/// Summarize a prompt with a locally loaded model.
pub async fn summarize(
    prompt: String,
    model: Option<String>,
    max_length: u32,
    min_length: u32,
) -> Result<()> {
    let model_id = model.ok_or_else(|| eyre!("Model is required. Use --model <model>"))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Loading model {}...", model_id));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let config = EngineConfig::builder().model(&model_id).build()?;
    let engine = Engine::new(config).await?;

    spinner.finish_and_clear();
    println!("Model loaded: {}\n", engine.model_info().id);

    let request = SummarizeRequest::new(prompt)
        .with_params(SummaryParams::greedy(max_length, min_length));

    let start = Instant::now();
    let response = engine.summarize(request).await?;
    let elapsed = start.elapsed();

    match response.text() {
        Some(text) => println!("{}", text),
        None => println!("(no summary generated)"),
    }
    println!("\n[{:.2}s]", elapsed.as_secs_f64());

    Ok(())
}

/// Download a model into the local cache.
pub fn model_pull(model: String, revision: Option<String>) -> Result<()> {
    let source = match revision {
        Some(revision) => ModelSource::huggingface_rev(&model, revision),
        None => ModelSource::huggingface(&model),
    };

    println!("Pulling {}...", model);

    let loader = ModelLoader::new()?;
    let files = loader.resolve(&source)?;

    println!("Downloaded:");
    println!("  config:    {}", files.config.display());
    if let Some(tokenizer) = &files.tokenizer {
        println!("  tokenizer: {}", tokenizer.display());
    }
    for weight in &files.weights {
        println!("  weights:   {}", weight.display());
    }

    Ok(())
}

/// Display version and build info.
pub fn version() {
    println!("epitome {}", env!("CARGO_PKG_VERSION"));
    println!("  summarization model serving");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_spec() {
        assert_eq!(parse_model_spec("t5=t5-small"), ("t5", "t5-small"));
        assert_eq!(
            parse_model_spec("bart=facebook/bart-large-cnn"),
            ("bart", "facebook/bart-large-cnn")
        );
        assert_eq!(parse_model_spec("t5-small"), ("t5-small", "t5-small"));
        assert_eq!(parse_model_spec("=repo"), ("=repo", "=repo"));
    }
}
