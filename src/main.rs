//! Mask Forge Demo
//!
//! Plays one seeded session with a simple shape-matching policy, then
//! replays it from the recorded seed and checks the state hashes agree.
//!
//! Usage: `mask-forge [config.json]`

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mask_forge::{
    GameSession, GameEventData, HandState, MaskPosition, SessionConfig, Token, VERSION,
};

/// Upper bound on policy steps; a session can never need more.
const MAX_STEPS: usize = 200;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Mask Forge v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_path(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => SessionConfig::default(),
    };
    if let Err(e) = config.validate() {
        info!("{} (value will be clamped)", e);
    }

    info!("=== Starting Demo Session ===");
    let mut session = GameSession::new(&config);
    info!("Seed: {}", session.seed());
    info!("Cache capacity: {}", session.cache_capacity());

    session.start_game();
    let submitted = play(&mut session);

    let events = session.take_events();
    let discards = events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::TokenDiscarded { .. }))
        .count();
    info!("Events: {} ({} discards)", events.len(), discards);
    info!("Submitted: {}", submitted);

    let view = serde_json::to_string_pretty(&session.view())?;
    info!("Final view:\n{}", view);

    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let replay_config = SessionConfig {
        seed: Some(session.seed()),
        ..config
    };
    let mut replay = GameSession::new(&replay_config);
    replay.start_game();
    play(&mut replay);

    let replay_hash = replay.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        anyhow::bail!("DETERMINISM FAILURE: Hashes differ")
    }
}

/// Preferred shape for a position: slots cycle triangle, ellipse, rectangle.
fn fits(token: Token, position: MaskPosition) -> bool {
    position.index() % 3 == token.shape().index() as usize
}

/// Empty position this token fits, if any.
fn target_for(session: &GameSession, token: Token) -> Option<MaskPosition> {
    MaskPosition::ALL
        .into_iter()
        .find(|p| !session.board().is_occupied(*p) && fits(token, *p))
}

/// Play until the mask is submitted or no move remains.
fn play(session: &mut GameSession) -> bool {
    for _ in 0..MAX_STEPS {
        if session.is_complete() {
            return session.submit().is_ok();
        }

        match session.hand_state() {
            HandState::Holding(token) => {
                // Once the pile is dry any open slot beats losing the token
                let target = target_for(session, token).or_else(|| {
                    if session.remaining_count() == 0 {
                        session.board().first_empty()
                    } else {
                        None
                    }
                });
                let result = match target {
                    Some(position) => {
                        info!("Placing {} at {}", token, position);
                        session.place(position)
                    }
                    None if !session.is_cache_full() => {
                        info!("Caching {}", token);
                        session.cache_current()
                    }
                    None => {
                        info!("Discarding {}", token);
                        session.discard()
                    }
                };
                if let Err(e) = result {
                    info!("Move rejected: {}", e);
                    return false;
                }
            }
            HandState::Empty => {
                let view: &GameSession = session;
                let contents = view.cache_contents();
                let cached = contents
                    .iter()
                    .copied()
                    .find(|t| target_for(view, *t).is_some())
                    .or_else(|| contents.first().copied());
                match cached {
                    Some(token) => {
                        info!("Retrieving {}", token);
                        if session.retrieve(token).is_err() {
                            return false;
                        }
                    }
                    None => {
                        info!("Out of tokens with {} slots filled", session.board().occupied_count());
                        return false;
                    }
                }
            }
        }
    }
    false
}
