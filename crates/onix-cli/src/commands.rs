//! Command execution

use eyre::{WrapErr, eyre};
use onix_api::{ModuleOutcome, SetupFacts};
use onix_client::{WapiClient, issuer};
use onix_inventory::{AnsibleInventory, materialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::cli::InventoryArgs;
use crate::config::{OnixConfig, Settings};
use crate::crud::CrudRequest;

/// Resolve the `Authorization` header value
///
/// A pre-issued token wins over the configured auth mode.
async fn access_token(settings: &Settings) -> eyre::Result<Option<String>> {
    if let Some(token) = &settings.token {
        return Ok(Some(token.clone()));
    }

    let client_settings = settings.client_settings()?;
    let token = issuer(settings.auth_mode, &settings.credentials, &client_settings)?
        .issue()
        .await?;
    Ok(token)
}

async fn connect(settings: &Settings) -> eyre::Result<WapiClient> {
    let token = access_token(settings).await?;
    Ok(WapiClient::new(&settings.client_settings()?, token)?)
}

/// `ox inventory`: fetch, materialize and render
///
/// # Errors
/// Returns error if configuration is incomplete, the fetch fails or the
/// response is not an inventory document.
#[instrument(skip_all)]
pub async fn inventory(
    settings: &Settings,
    file: &OnixConfig,
    args: &InventoryArgs,
) -> eyre::Result<Value> {
    let key = args
        .inventory_key
        .as_ref()
        .or(file.inventory_key.as_ref())
        .ok_or_else(|| eyre!("inventory_key is not set (use --inventory-key or OX_INVENTORY_KEY)"))?;
    let tag = args
        .inventory_tag
        .as_ref()
        .or(file.inventory_tag.as_ref())
        .ok_or_else(|| eyre!("inventory_tag is not set (use --inventory-tag or OX_INVENTORY_TAG)"))?;

    let client = connect(settings).await?;
    let document = client
        .fetch_inventory(key, tag)
        .await
        .wrap_err_with(|| format!("failed to fetch inventory {key}/{tag}"))?;
    info!(
        items = document.items.len(),
        links = document.links.len(),
        "fetched inventory"
    );

    let mut inventory = AnsibleInventory::new();
    materialize(&document, &mut inventory)?;

    Ok(match &args.host {
        Some(host) => inventory.host_vars(host),
        None => inventory.to_list_json(),
    })
}

/// `ox setup`: issue a token and export it with the WAPI address
///
/// # Errors
/// Returns error if the host is not set or the token cannot be issued.
#[instrument(skip_all, fields(auth_mode = %settings.auth_mode))]
pub async fn setup(settings: &Settings) -> eyre::Result<SetupFacts> {
    let client_settings = settings.client_settings()?;
    let token = access_token(settings).await?.unwrap_or_default();
    Ok(SetupFacts::new(token, client_settings.uri))
}

/// Run one CRUD request and translate the result into the module contract
#[instrument(skip_all)]
pub async fn crud(settings: &Settings, request: onix_client::Result<CrudRequest>) -> ModuleOutcome {
    let outcome = async {
        let request = request?;
        let client = connect(settings).await?;
        info!(resource = %request.resource, key = %request.key, "sending request");
        let result = request.send(&client).await?;
        Ok::<_, eyre::Report>(result)
    }
    .await;

    match outcome {
        Ok(result) => ModuleOutcome::from_result(result),
        Err(err) => ModuleOutcome::failure(err.to_string()),
    }
}
