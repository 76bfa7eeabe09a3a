//! `bolt ask` - send a one-shot prompt to a model.

use anyhow::{Result, bail};
use bolt_models::providers::{ChatRequest, Message, ModelInstanceRequest};
use clap::Args;
use tracing::debug;

use super::Context;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Provider name (defaults to the configured default provider)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model id (defaults to the provider's first built-in model)
    #[arg(long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(long)]
    pub system: Option<String>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Prompt text
    #[arg(required = true, trailing_var_arg = true)]
    pub prompt: Vec<String>,
}

pub async fn run(args: AskArgs) -> Result<()> {
    let ctx = Context::load()?;
    let provider = ctx.provider(args.provider.as_deref())?;

    let model = match args.model {
        Some(model) => model,
        None => match provider.static_models().first() {
            Some(model) => model.name.clone(),
            None => bail!(
                "Provider '{}' has no built-in models; pass --model",
                provider.name()
            ),
        },
    };

    let handle = provider.model_instance(ModelInstanceRequest {
        model: &model,
        options: &ctx.options,
    })?;

    let request = build_request(
        args.system,
        args.prompt.join(" "),
        args.max_tokens,
        args.temperature,
    );
    let response = handle.chat(request).await?;

    debug!(
        model = %response.model,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        stop_reason = ?response.stop_reason,
        "chat completed"
    );
    println!("{}", response.content);
    Ok(())
}

fn build_request(
    system: Option<String>,
    prompt: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(prompt));

    let mut request = ChatRequest::new(messages);
    request.max_tokens = max_tokens;
    request.temperature = temperature;
    request
}
