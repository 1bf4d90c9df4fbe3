//! A bot that logs in, finds a match and plays it to the end.
//!
//! Environment:
//! - `KITTYWAR_CONFIG`: optional path to a JSON `ClientConfig`
//! - `KITTYWAR_WEB`: account server base URL
//! - `KITTYWAR_USER` / `KITTYWAR_PASSWORD`: used when no credentials are stored
//! - `KITTYWAR_CREDENTIALS`: credential file, default `kittywar-credentials.json`
//! - `KITTYWAR_CAT`: cat id to pick, default `0`

use std::sync::Arc;
use std::time::Duration;

use kittywar::game::ChanceCategory;
use kittywar::prelude::*;

type BoxError = Box<dyn std::error::Error>;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Rotates through the three attacking moves, one per round.
fn pick_move(round: u32) -> Move {
    match round % 3 {
        1 => Move::Purr,
        2 => Move::Guard,
        _ => Move::Scratch,
    }
}

/// First held chance card that backs `movement`.
fn matching_chance(state: &MatchState, movement: Move) -> Option<ChanceId> {
    state.player().chance_cards().iter().copied().find(|id| {
        state
            .catalog()
            .chance(*id)
            .is_ok_and(|card| card.category.basic_move() == movement)
    })
}

/// The granted ability, if it can be used in `phase` right now.
fn usable_ability(state: &MatchState, phase: TurnPhase) -> Option<AbilityId> {
    let id = state.player().granted_ability()?;
    let card = state.catalog().ability(id).ok()?;
    let ready = state.player().cooldown().is_ready();
    (ready && card.trigger == kittywar::game::AbilityTrigger::Phase(phase)).then_some(id)
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn load_config() -> Result<ClientConfig, BoxError> {
    match std::env::var("KITTYWAR_CONFIG") {
        Ok(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        Err(_) => Ok(ClientConfig::default()),
    }
}

async fn load_credentials() -> Result<Credentials, BoxError> {
    let path = std::env::var("KITTYWAR_CREDENTIALS")
        .unwrap_or_else(|_| "kittywar-credentials.json".to_string());
    let store = FileCredentialStore::new(path);
    if let Some(credentials) = store.load()? {
        return Ok(credentials);
    }

    let mut web = WebConfig::default();
    if let Ok(url) = std::env::var("KITTYWAR_WEB") {
        web.base_url = url;
    }
    let username = std::env::var("KITTYWAR_USER")?;
    let password = std::env::var("KITTYWAR_PASSWORD")?;
    let credentials = WebAuthenticator::new(web).login(&username, &password).await?;
    store.save(&credentials)?;
    Ok(credentials)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    kittywar::init_tracing();

    let config = load_config()?;
    let credentials = load_credentials().await?;
    let cat = CatId(
        std::env::var("KITTYWAR_CAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
    );

    let catalog = Arc::new(Catalog::standard());
    let (client, mut events) =
        GameClient::connect_with_retry(&config, catalog, &credentials).await?;
    client.find_match().await?;

    loop {
        tokio::select! {
            Some(event) = events.session.recv() => {
                tracing::info!(?event, "session");
                match event {
                    SessionEvent::MatchFound => client.select_cat(cat).await?,
                    SessionEvent::MatchNotFound => {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        client.find_match().await?;
                    }
                    _ => {}
                }
            }
            Some(event) = events.phases.recv() => {
                tracing::info!(banner = %event.banner(), "phase");
                match event {
                    PhaseEvent::Changed { phase, round, .. } => {
                        play_phase(&client, phase, round).await;
                    }
                    PhaseEvent::Decided(outcome) => {
                        tracing::info!(?outcome, "match over");
                        client.end_match().await?;
                        break;
                    }
                }
            }
            Some(event) = events.connection.recv() => {
                tracing::info!(?event, "connection");
                if matches!(event, ConnectionEvent::Disconnected { .. }) {
                    return Ok(());
                }
            }
            else => break,
        }
    }

    client.disconnect().await;
    Ok(())
}

/// Plays whatever the phase allows. Refusals are logged and the bot
/// carries on with the next phase.
async fn play_phase(client: &GameClient, phase: TurnPhase, round: u32) {
    let state = match client.snapshot().await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "no snapshot");
            return;
        }
    };

    if let Some(ability) = usable_ability(&state, phase) {
        if let Err(e) = client.use_ability(ability).await {
            tracing::warn!(error = %e, %ability, "ability not used");
        }
    }

    if phase == TurnPhase::EnactingStrategies {
        let movement = pick_move(round);
        if let Err(e) = client.select_move(movement).await {
            tracing::warn!(error = %e, %movement, "move not sent");
        }
        if let Some(card) = matching_chance(&state, movement) {
            if let Err(e) = client.select_chance_card(card).await {
                tracing::warn!(error = %e, %card, "chance card not sent");
            }
        }
        if let Err(e) = client.ready().await {
            tracing::warn!(error = %e, "ready not sent");
        }
    }
}
