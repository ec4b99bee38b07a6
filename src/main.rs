use anyhow::Context;
use clap::Parser;
use connections_map::app::{connect, export_geojson};
use connections_map::core::renderer::MapPanel;
use connections_map::core::selector::{search_failure_message, selection_for};
use connections_map::utils::logger;
use connections_map::{CliConfig, Lookup, SelectionOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = cli.app_config().context("loading configuration")?;
    let explorer = connect(&config).await.context("connecting to the API")?;

    if let MapPanel::Unavailable { message } = explorer.renderer().await.map_panel() {
        eprintln!("⚠️  {}", message);
    }

    let hits = match explorer.query(cli.scope, &cli.query).await {
        Ok(Lookup::Hits(hits)) => hits,
        Ok(Lookup::Superseded) => Vec::new(),
        Err(e) => {
            eprintln!(
                "❌ {}: {}",
                search_failure_message(cli.scope),
                e.user_friendly_message()
            );
            if e.is_network() {
                eprintln!("💡 Check that {} is reachable", config.api.base_url);
            }
            std::process::exit(2);
        }
    };

    if hits.is_empty() {
        println!("No matches for '{}'", cli.query);
        return Ok(());
    }
    for hit in &hits {
        match &hit.domain {
            Some(domain) => println!("  {} ({})", hit.name, domain),
            None => println!("  {}", hit.name),
        }
    }

    let picked = match (&cli.select, cli.first) {
        (Some(name), _) => hits.iter().find(|h| h.name.eq_ignore_ascii_case(name)),
        (None, true) => hits.first(),
        (None, false) => return Ok(()),
    };
    let Some(hit) = picked else {
        eprintln!(
            "❌ '{}' is not among the search results",
            cli.select.as_deref().unwrap_or_default()
        );
        std::process::exit(1);
    };

    let selection = selection_for(hit, cli.scope)?;
    println!();
    match explorer.on_select(&selection).await {
        Ok(SelectionOutcome::Rendered(summary)) => {
            tracing::debug!("Render summary: {:?}", summary);
            print!("{}", explorer.renderer().await.panel());
        }
        Ok(SelectionOutcome::Superseded) => {}
        Err(e) => {
            println!("{}", explorer.renderer().await.panel());
            eprintln!("💡 {}", e.user_friendly_message());
            std::process::exit(2);
        }
    }
    println!();

    if let Some(path) = &cli.geojson {
        let features = export_geojson(&explorer, path)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        println!("📁 {} map features saved to {}", features, path.display());
    }

    Ok(())
}
