//! Synchronization receiver.
//!
//! Handles values arriving from the peer node: checks the mode, validates
//! the message, folds it into the [`PeerSample`], evaluates the local
//! reading against the peer's limits and computes the fused temperature.
//!
//! [`PeerSample`]: crate::data::PeerSample

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::data::{BreachKind, PeerField, TelemetryRecord};
use crate::device::Glyph;
use crate::error::ErrorKind;
use crate::mode::Mode;
use crate::radio::RadioMessage;
use crate::sampler::format_temperature;
use crate::state::NodeContext;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    /// The message was discarded.
    Rejected(ErrorKind),
    /// The message went through the full pipeline.
    Processed {
        /// Whether every peer field is now known.
        complete: bool,
        /// Breaches of the peer's limits by the local reading.
        breaches: Vec<BreachKind>,
        /// Fused temperature, once the peer temperature is known.
        fused: Option<f64>,
    },
}

impl ReceiveOutcome {
    /// Check if the message was discarded.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Process a single message from the peer.
pub async fn handle_message(ctx: &NodeContext, message: &RadioMessage) -> ReceiveOutcome {
    let mode = ctx.mode.current();
    if mode != Mode::Receiver {
        debug!("Discarding '{}' received in {} mode", message.name, mode);
        ctx.log(TelemetryRecord::error(ErrorKind::ModeReceivedWhileSending));
        return ReceiveOutcome::Rejected(ErrorKind::ModeReceivedWhileSending);
    }

    let field = PeerField::from_name(&message.name);

    // Only unknown names are checked for an empty value; a known name with
    // a zero value is accepted.
    if field.is_none() && message.is_empty_value() {
        debug!("Invalid message '{}' = {:?}", message.name, message.value);
        ctx.log(TelemetryRecord::error(ErrorKind::InvalidReceivedValues));
        ctx.peripherals
            .actuator
            .show_glyph(Glyph::Question, Some(ctx.config.error_glyph_duration))
            .await;
        return ReceiveOutcome::Rejected(ErrorKind::InvalidReceivedValues);
    }

    let peer = {
        let mut state = ctx.state.write();
        match (field, message.value) {
            (Some(field), Some(value)) => state.peer.absorb(field, value),
            (Some(field), None) => debug!("'{}' carried no value, keeping old one", field),
            (None, _) => debug!("Ignoring unknown value '{}'", message.name),
        }
        state.peer
    };

    let complete = peer.is_complete();
    if !complete {
        debug!("Peer data incomplete, missing {:?}", peer.missing_fields());
        ctx.peripherals
            .actuator
            .show_text(ErrorKind::DataNotYetReceived.message())
            .await;
        ctx.log(TelemetryRecord::error(ErrorKind::DataNotYetReceived));
    }

    let reading = ctx.read_temperature();
    let breaches = peer.thresholds().breaches(reading);
    for kind in &breaches {
        ctx.alerts.evaluate(*kind).await;
    }

    let fused = peer.fuse(reading);
    if let Some(fused) = fused {
        ctx.state.write().fused = Some(fused);
        ctx.peripherals
            .actuator
            .show_text(&format_temperature(fused))
            .await;
    }

    ctx.log(TelemetryRecord::received_snapshot(
        peer.temperature,
        fused,
        peer.upper_limit,
        peer.lower_limit,
    ));

    ReceiveOutcome::Processed {
        complete,
        breaches,
        fused,
    }
}

/// Subscribe to the radio and handle messages until the channel closes.
///
/// The subscription is taken before the task starts, so nothing sent after
/// this call returns is missed.
pub fn spawn(ctx: Arc<NodeContext>) -> JoinHandle<()> {
    let rx = ctx.peripherals.radio.subscribe();
    tokio::spawn(run(ctx, rx))
}

async fn run(ctx: Arc<NodeContext>, mut rx: broadcast::Receiver<RadioMessage>) {
    info!("Radio receiver listening on group {}", ctx.config.radio_group);

    loop {
        match rx.recv().await {
            Ok(message) => {
                let outcome = handle_message(&ctx, &message).await;
                debug!("Handled '{}': {:?}", message.name, outcome);
                ctx.interrupt();
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Radio receiver lagged, {} message(s) lost", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Radio receiver stopped");
}
