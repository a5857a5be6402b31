//! Command handlers.

use super::Commands;
use serde::Serialize;
use serde_json::{Value, json};
use syncro::{PaginationParams, QueryParams, SyncroClient, SyncroConfig};
use tracing::{debug, instrument};

/// Execute `command` against a client built from `config`.
#[instrument(skip(config))]
pub async fn execute(
    command: Commands,
    config: SyncroConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = SyncroClient::new(config)?;

    match command {
        Commands::Me => print_json(&client.me::<Value>().await?)?,

        Commands::Settings => print_json(&client.settings::<Value>().await?)?,

        Commands::List {
            resource,
            page,
            per_page,
            all,
            filters,
        } => {
            let filters: QueryParams = filters.into_iter().collect();
            let handle = client.resource(resource);
            if all {
                let items = handle.list_all(per_page, filters).collect_all().await?;
                debug!(count = items.len(), "Fetched all pages");
                print_json(&items)?;
            } else {
                let mut params = PaginationParams::default();
                if let Some(page) = page {
                    params = params.with_page(page);
                }
                if let Some(per_page) = per_page {
                    params = params.with_per_page(per_page);
                }
                let listed = handle.list(params, filters).await?;
                print_json(&json!({
                    resource.collection_key(): listed.items(),
                    "meta": listed.meta(),
                }))?;
            }
        }

        Commands::Get { resource, id } => {
            print_json(&client.resource(resource).get(id).await?)?;
        }

        Commands::Quota => {
            let quota = client.config().rate_limit();
            print_json(&json!({
                "enabled": quota.enabled(),
                "max_requests": quota.max_requests(),
                "window_ms": quota.window_ms(),
                "remaining_requests": client.remaining_requests(),
                "current_rate": client.current_rate(),
            }))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
