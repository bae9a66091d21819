//! Sampling loop.
//!
//! Blocks until a mode has been chosen. A sender reads its sensor, shows
//! the reading, warns on breaches of its own thresholds and (when enabled)
//! broadcasts the reading and thresholds. A receiver shows the fused
//! temperature on every cycle instead.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::data::{BreachKind, PeerField};
use crate::mode::Mode;
use crate::state::NodeContext;

/// Shown by a receiver before a fused value exists.
pub const UNKNOWN_TEMPERATURE: &str = "?";

/// Format a temperature for the display.
pub fn format_temperature(value: f64) -> String {
    value.to_string()
}

/// Summary of one sender cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The sensor reading for this cycle.
    pub reading: f64,
    /// Breaches of the local thresholds, upper first.
    pub breaches: Vec<BreachKind>,
    /// Number of values put on the radio.
    pub sent: usize,
}

/// Run one sender cycle.
pub async fn sender_cycle(ctx: &NodeContext) -> CycleReport {
    let actuator = &ctx.peripherals.actuator;
    let reading = ctx.read_temperature();
    let thresholds = ctx.state.read().thresholds;

    actuator.clear().await;
    actuator.show_text(&format_temperature(reading)).await;

    let breaches = thresholds.breaches(reading);
    for kind in &breaches {
        ctx.alerts.evaluate(*kind).await;
    }

    tokio::time::sleep(ctx.config.sample_interval).await;

    let mut sent = 0;
    if ctx.config.broadcast_enabled {
        for field in PeerField::ALL {
            let value = match field {
                PeerField::Temperature => Some(reading),
                PeerField::UpperLimit => thresholds.upper,
                PeerField::LowerLimit => thresholds.lower,
            };
            let Some(value) = value else {
                debug!("Not broadcasting unset {}", field);
                continue;
            };
            match ctx.peripherals.radio.send(field.name(), value).await {
                Ok(()) => sent += 1,
                Err(e) => warn!("Failed to broadcast {}: {}", field, e),
            }
        }
    }

    debug!(
        "Sender cycle: reading={}, breaches={:?}, sent={}",
        reading, breaches, sent
    );

    CycleReport {
        reading,
        breaches,
        sent,
    }
}

/// Run one receiver idle cycle. Returns the value shown.
pub async fn receiver_cycle(ctx: &NodeContext) -> Option<f64> {
    let fused = ctx.state.read().fused;
    let text = fused.map_or_else(|| UNKNOWN_TEMPERATURE.to_string(), format_temperature);

    ctx.peripherals.actuator.show_text(&text).await;
    tokio::time::sleep(ctx.config.sample_interval).await;

    fused
}

/// Spawn the sampling loop.
pub fn spawn(ctx: Arc<NodeContext>) -> JoinHandle<()> {
    tokio::spawn(run(ctx))
}

async fn run(ctx: Arc<NodeContext>) {
    let mode = ctx.mode.wait_resolved().await;
    info!("Sampling loop started in {} mode", mode);

    match mode {
        Mode::Sender => loop {
            sender_cycle(&ctx).await;
        },
        Mode::Receiver => loop {
            receiver_cycle(&ctx).await;
        },
        Mode::Unresolved => warn!("Sampling loop woke without a mode"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::data::Thresholds;
    use crate::device::{ActuatorEvent, Glyph};
    use crate::mode::Button;
    use crate::radio::{RadioMessage, WirelessChannel};
    use crate::state::testing::{fixed, harness};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(30.0), "30");
        assert_eq!(format_temperature(22.5), "22.5");
        assert_eq!(format_temperature(-4.0), "-4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sender_cycle_upper_breach_without_broadcast() {
        let h = harness(NodeConfig::default(), fixed(30.0));
        h.ctx.mode.press(Button::A);
        let listener = h.air.endpoint(25, 9);
        let mut rx = listener.subscribe();

        let report = sender_cycle(&h.ctx).await;

        assert_eq!(
            report,
            CycleReport {
                reading: 30.0,
                breaches: vec![BreachKind::UpperBreach],
                sent: 0,
            }
        );
        assert_eq!(
            &h.actuator.events()[..4],
            &[
                ActuatorEvent::Clear,
                ActuatorEvent::Text("30".to_string()),
                ActuatorEvent::Clear,
                ActuatorEvent::Glyph(Glyph::UpArrow, None),
            ]
        );
        assert_eq!(h.actuator.beep_count(), 5);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sender_cycle_broadcasts_when_enabled() {
        let h = harness(NodeConfig::default().with_broadcast(true), fixed(20.0));
        h.ctx.mode.press(Button::A);
        let listener = h.air.endpoint(25, 9);
        let mut rx = listener.subscribe();

        let report = sender_cycle(&h.ctx).await;

        assert_eq!(report.sent, 3);
        assert!(report.breaches.is_empty());

        let received: Vec<RadioMessage> = (0..3).map(|_| rx.try_recv().unwrap()).collect();
        let pairs: Vec<_> = received
            .iter()
            .map(|m| (m.name.as_str(), m.value))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("temperature", Some(20.0)),
                ("upperLimit", Some(25.0)),
                ("lowerLimit", Some(18.0)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unset_bound_is_not_broadcast() {
        let config = NodeConfig::default()
            .with_broadcast(true)
            .with_thresholds(Thresholds::new(Some(25.0), None));
        let h = harness(config, fixed(10.0));

        let report = sender_cycle(&h.ctx).await;

        assert_eq!(report.sent, 2);
        assert!(report.breaches.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_crossed_bounds_fire_both_alerts() {
        let config =
            NodeConfig::default().with_thresholds(Thresholds::new(Some(15.0), Some(25.0)));
        let h = harness(config, fixed(20.0));

        let report = sender_cycle(&h.ctx).await;

        assert_eq!(
            report.breaches,
            vec![BreachKind::UpperBreach, BreachKind::LowerBreach]
        );
        assert_eq!(h.actuator.beep_count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_takes_alerts_plus_interval() {
        let h = harness(NodeConfig::default(), fixed(30.0));
        let start = tokio::time::Instant::now();

        sender_cycle(&h.ctx).await;

        assert_eq!(
            start.elapsed(),
            crate::device::BEEP_DURATION * 5 + Duration::from_millis(2500)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_receiver_cycle_shows_fused_or_unknown() {
        let h = harness(NodeConfig::default(), fixed(20.0));

        assert_eq!(receiver_cycle(&h.ctx).await, None);
        h.ctx.state.write().fused = Some(24.0);
        assert_eq!(receiver_cycle(&h.ctx).await, Some(24.0));

        assert_eq!(h.actuator.texts(), vec!["?".to_string(), "24".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_waits_for_mode() {
        let h = harness(NodeConfig::default(), fixed(30.0));
        let handle = spawn(h.ctx.clone());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(h.actuator.events().is_empty());

        h.ctx.mode.press(Button::A);
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert!(h.actuator.glyph_count(Glyph::UpArrow) >= 2);

        handle.abort();
    }

    proptest! {
        #[test]
        fn up_arrow_iff_reading_above_upper(reading in -40.0f64..80.0, upper in -40.0f64..80.0) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();
            let config = NodeConfig::default().with_thresholds(Thresholds::new(Some(upper), None));
            let h = harness(config, fixed(reading));

            let report = runtime.block_on(sender_cycle(&h.ctx));

            prop_assert_eq!(h.actuator.glyph_count(Glyph::UpArrow) == 1, reading > upper);
            prop_assert_eq!(h.actuator.glyph_count(Glyph::DownArrow), 0);
            prop_assert_eq!(report.breaches.is_empty(), reading <= upper);
        }
    }
}
