//! Model listing and API credential commands.
//!
//! Provides commands for listing models across providers, inspecting how a
//! provider's credentials resolve, and managing keys in the system keyring.

use anyhow::{Result, bail};
use bolt_models::ModelInfo;
use bolt_models::auth::KeyringStore;
use bolt_models::providers::{LlmProvider, ModelInstanceRequest};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use dialoguer::{Password, theme::ColorfulTheme};

use super::{Context, KEYRING_SERVICE};

/// Models management arguments.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommands,
}

/// Models subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelsCommands {
    /// List available models
    List {
        /// Only list this provider's models
        #[arg(long)]
        provider: Option<String>,

        /// Skip vendor listing endpoints and show built-in models only
        #[arg(long = "static")]
        static_only: bool,
    },
    /// Show where a provider's base URL and API key come from
    Resolve {
        /// Provider name (e.g., Deepseek, OpenAI)
        provider: String,
    },
    /// Manage API credentials
    Auth {
        /// Provider to configure (e.g., Anthropic, OpenAI)
        provider: Option<String>,

        /// List providers with stored keys
        #[arg(long)]
        list: bool,

        /// Delete stored credentials
        #[arg(long)]
        delete: bool,
    },
}

/// Run models command.
pub async fn run(args: ModelsArgs) -> Result<()> {
    let ctx = Context::load()?;
    match args.command {
        ModelsCommands::List {
            provider,
            static_only,
        } => list_models(&ctx, provider.as_deref(), static_only).await,
        ModelsCommands::Resolve { provider } => resolve(&ctx, &provider),
        ModelsCommands::Auth {
            provider,
            list,
            delete,
        } => manage_auth(&ctx, provider.as_deref(), list, delete),
    }
}

/// List models with optional provider filter.
async fn list_models(ctx: &Context, provider: Option<&str>, static_only: bool) -> Result<()> {
    let models = match (provider, static_only) {
        (Some(name), true) => ctx.registry.static_model_list_from_provider(name)?,
        (Some(name), false) => {
            ctx.registry
                .model_list_from_provider(name, &ctx.options)
                .await?
        }
        (None, true) => ctx.registry.static_model_list(),
        (None, false) => ctx.registry.update_model_list(&ctx.options).await,
    };

    if models.is_empty() {
        if provider.is_some() {
            println!("No models available for this provider.");
        } else {
            println!("No models available.");
        }
        return Ok(());
    }

    println!("{}", models_table(&models));
    Ok(())
}

fn models_table(models: &[ModelInfo]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::Cyan),
        Cell::new("Model").fg(Color::Cyan),
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("Context").fg(Color::Cyan),
    ]);

    for model in models {
        table.add_row(vec![
            Cell::new(&model.provider),
            Cell::new(&model.name),
            Cell::new(&model.label),
            Cell::new(format_context(model.max_token_allowed)),
        ]);
    }
    table
}

/// Print the resolved credentials for a provider. Never prints the key.
fn resolve(ctx: &Context, name: &str) -> Result<()> {
    let provider = ctx.provider(Some(name))?;
    let resolved = provider.resolve_base_url_and_key(&ctx.options);

    println!("Provider: {}", provider.name());
    println!(
        "Base URL: {} ({})",
        if resolved.base_url.is_empty() {
            "-"
        } else {
            resolved.base_url.as_str()
        },
        resolved.base_url_source
    );
    match resolved.api_key_source {
        Some(source) => println!("API key:  set ({source})"),
        None => println!("API key:  not set"),
    }
    println!(
        "Enabled:  {}",
        if ctx.options.is_enabled(name) {
            "yes"
        } else {
            "no"
        }
    );

    let model = readiness_model(provider.as_ref());
    match provider.model_instance(ModelInstanceRequest {
        model: &model,
        options: &ctx.options,
    }) {
        Ok(_) => println!("Ready:    yes"),
        Err(e) => {
            println!("Ready:    no ({e})");
            if let Some(key) = provider.config().api_token_key {
                println!();
                println!("Set {key} or run: bolt models auth {}", provider.name());
            }
        }
    }
    Ok(())
}

fn readiness_model(provider: &dyn LlmProvider) -> String {
    provider
        .static_models()
        .first()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "default".to_string())
}

/// Manage API credentials for providers.
fn manage_auth(ctx: &Context, provider: Option<&str>, list: bool, delete: bool) -> Result<()> {
    let store = KeyringStore::new(KEYRING_SERVICE);

    // List configured providers
    if list {
        let stored: Vec<&str> = ctx
            .registry
            .all_providers()
            .iter()
            .map(|p| p.name())
            .filter(|name| store.get(name).is_ok())
            .collect();
        if stored.is_empty() {
            println!("No API keys stored in the keyring.");
            println!();
            println!("Store a key with: bolt models auth <provider>");
        } else {
            println!("Providers with stored keys:");
            println!();
            for name in stored {
                println!("  {}", name);
            }
        }
        return Ok(());
    }

    // Require provider for other operations
    let Some(name) = provider else {
        bail!("Provider required. Use --list to see configured providers.");
    };
    let provider = ctx.provider(Some(name))?;

    // Delete credentials
    if delete {
        match store.delete(provider.name()) {
            Ok(()) => {
                println!("Credentials for '{}' deleted.", provider.name());
            }
            Err(bolt_models::Error::CredentialsNotFound(_)) => {
                println!("No credentials found for '{}'.", provider.name());
            }
            Err(e) => {
                bail!("Failed to delete credentials: {}", e);
            }
        }
        return Ok(());
    }

    // Store new credentials (interactive)
    let env_hint = provider
        .config()
        .api_token_key
        .map(|v| format!(" (or set {})", v))
        .unwrap_or_default();

    println!("Enter API key for {}{}", provider.name(), env_hint);

    let key = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API key")
        .interact()?;

    if key.is_empty() {
        bail!("API key cannot be empty");
    }

    store.set(provider.name(), &key)?;
    println!("Credentials for '{}' saved to keyring.", provider.name());

    Ok(())
}

/// Format a context budget.
fn format_context(tokens: u32) -> String {
    if tokens >= 1_000_000 {
        format!("{}M", tokens / 1_000_000)
    } else if tokens >= 1_000 {
        format!("{}K", tokens / 1_000)
    } else {
        format!("{}", tokens)
    }
}
