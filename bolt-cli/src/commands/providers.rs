//! `bolt providers` - list the provider catalog and credential status.

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use super::Context;
use bolt_models::auth::CredentialSource;

#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Print provider summaries as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ProvidersArgs) -> Result<()> {
    let ctx = Context::load()?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(ctx.registry.provider_infos())?
        );
        return Ok(());
    }

    let default = ctx.registry.default_provider().map(|p| p.name().to_string());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::Cyan),
        Cell::new("Key variable").fg(Color::Cyan),
        Cell::new("Key").fg(Color::Cyan),
        Cell::new("Models").fg(Color::Cyan),
        Cell::new("Get API key").fg(Color::Cyan),
    ]);

    for provider in ctx.registry.all_providers() {
        let name = provider.name();
        let marker = if default.as_deref() == Some(name) {
            format!("{name} *")
        } else {
            name.to_string()
        };
        let resolved = provider.resolve_base_url_and_key(&ctx.options);
        let enabled = ctx.options.is_enabled(name);

        let models = match (provider.supports_dynamic_models(), enabled) {
            (_, false) => "disabled".to_string(),
            (true, true) => format!("{} + dynamic", provider.static_models().len()),
            (false, true) => provider.static_models().len().to_string(),
        };

        table.add_row(vec![
            Cell::new(marker),
            Cell::new(provider.config().api_token_key.unwrap_or("-")),
            key_cell(resolved.api_key_source),
            Cell::new(models),
            Cell::new(provider.api_key_link().unwrap_or("-")),
        ]);
    }

    println!("{table}");
    println!("* default provider");
    Ok(())
}

fn key_cell(source: Option<CredentialSource>) -> Cell {
    match source {
        Some(source) => Cell::new(source.to_string()).fg(Color::Green),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}
