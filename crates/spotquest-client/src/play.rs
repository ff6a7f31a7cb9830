//! Interactive terminal play loop.
//!
//! Presentation glue only: reads guesses and hint commands from stdin,
//! renders countdown ticks and round results, and drives the
//! `SessionController` with the resulting events. All game rules live
//! in the core crate.

use std::sync::Arc;

use spotquest_core::difficulty::Difficulty;
use spotquest_core::error::{GameError, GameResult};
use spotquest_core::scoring;
use spotquest_core::session::{
    Guess, RoundAdvance, RoundRecord, SessionController, SessionEvent,
};
use spotquest_protocol::{HintContent, HintType};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::http::HttpGateway;

pub async fn run_play(
    backend_url: String,
    principal: String,
    difficulty: Difficulty,
    region: Option<String>,
) -> GameResult<()> {
    let gateway = Arc::new(HttpGateway::new(backend_url));
    let (mut controller, mut events) = SessionController::new(gateway, principal, difficulty);

    controller.create_session().await?;
    info!(
        "🎮 Session {} started on {} difficulty",
        controller.session_id().unwrap_or("?"),
        difficulty
    );
    info!("💰 Balance: {} units", controller.balance());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match controller.next_round(region.as_deref()).await? {
            RoundAdvance::SessionOver => break,
            RoundAdvance::Started(start) => {
                info!(
                    "📷 Round {} — photo {} ({}s on the clock, zoom {})",
                    start.info.round_number,
                    start.info.photo_id,
                    start.time_limit_secs,
                    start.starting_zoom
                );
                info!("   Guess with \"<lat> <lon> [azimuth]\"; hints: \"hint basic_radius|premium_radius|direction_hint\"");
                play_round(&mut controller, &mut events, &mut lines).await?;
            }
        }
        if controller.phase().is_terminal() {
            break;
        }
    }

    print_summary(&controller);
    Ok(())
}

async fn play_round(
    controller: &mut SessionController,
    events: &mut UnboundedReceiver<SessionEvent>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> GameResult<()> {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Tick { remaining_secs }) => {
                    if remaining_secs % 10 == 0 || remaining_secs <= 5 {
                        info!("⏱️  {}s remaining", remaining_secs);
                    }
                }
                Some(SessionEvent::TimedOut) => {
                    warn!("⏰ Time's up!");
                    if let Some(record) = controller.submit_guess(None, true).await? {
                        report_round(&record);
                    }
                    return Ok(());
                }
                None => return Ok(()),
            },
            line = lines.next_line() => match line {
                Ok(Some(input)) => {
                    if handle_input(controller, input.trim()).await? {
                        return Ok(());
                    }
                }
                // EOF: the player walked away from the terminal.
                Ok(None) => {
                    controller.leave().await?;
                    return Ok(());
                }
                Err(e) => {
                    warn!("stdin error: {}", e);
                    controller.leave().await?;
                    return Ok(());
                }
            },
        }
    }
}

/// Returns `true` when the round is over and the loop should exit.
async fn handle_input(controller: &mut SessionController, input: &str) -> GameResult<bool> {
    if input.is_empty() {
        return Ok(false);
    }

    if let Some(rest) = input.strip_prefix("hint") {
        match rest.trim().parse::<HintType>() {
            Ok(kind) => match controller.purchase_hint(kind).await {
                Ok(content) => report_hint(&content),
                Err(GameError::Hint(e)) => warn!("🔒 {}", e),
                Err(e) => return Err(e),
            },
            Err(_) => warn!("Unknown hint type '{}'", rest.trim()),
        }
        return Ok(false);
    }

    if input == "balance" {
        info!("💰 Balance: {} units", controller.refresh_balance().await);
        return Ok(false);
    }

    if input == "quit" {
        controller.leave().await?;
        return Ok(true);
    }

    let Some(guess) = parse_guess(input) else {
        warn!("Could not parse '{}'; expected \"<lat> <lon> [azimuth]\"", input);
        return Ok(false);
    };
    match controller.submit_guess(Some(guess), false).await {
        Ok(Some(record)) => {
            report_round(&record);
            Ok(true)
        }
        // The countdown won the race while we were typing.
        Ok(None) => Ok(true),
        Err(GameError::Validation(msg)) => {
            warn!("❌ {}", msg);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn parse_guess(input: &str) -> Option<Guess> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let lat = parts[0].parse().ok()?;
    let lon = parts[1].parse().ok()?;
    let azimuth = match parts.get(2) {
        Some(s) => Some(s.parse().ok()?),
        None => None,
    };
    Some(Guess {
        lat,
        lon,
        azimuth,
        confidence_radius: 1000.0,
    })
}

fn report_hint(content: &HintContent) {
    match content {
        HintContent::Radius {
            center_lat,
            center_lon,
            radius_m,
        } => info!(
            "💡 The photo is within {:.0} m of ({:.4}, {:.4})",
            radius_m, center_lat, center_lon
        ),
        HintContent::Direction { direction } => {
            info!("🧭 The photo is to the {}", direction)
        }
    }
}

fn report_round(record: &RoundRecord) {
    let source = if record.authoritative { "" } else { " (offline score)" };
    match &record.guess {
        Some(g) => {
            let distance =
                scoring::distance_meters(g.lat, g.lon, record.actual_lat, record.actual_lon)
                    .unwrap_or(f64::NAN);
            info!(
                "🎯 {:.1} km off — {} points ({}/100){} in {}s",
                distance / 1000.0,
                record.score,
                record.score_norm,
                source,
                record.elapsed_secs
            );
        }
        None => info!("💤 No guess placed — 0 points"),
    }
    info!(
        "📍 Actual location: ({:.4}, {:.4})",
        record.actual_lat, record.actual_lon
    );
}

fn print_summary(controller: &SessionController) {
    info!("🏁 Session over ({:?})", controller.phase());
    for record in controller.results() {
        info!(
            "   Round {}: {} points ({}/100)",
            record.round_number, record.score, record.score_norm
        );
    }
    info!("🏆 Total: {} points", controller.total_score());
}
