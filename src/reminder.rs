//! Periodic reminder.
//!
//! Once per period the node flashes the reminder glyph with a beep a few
//! times, then logs a snapshot of what it currently knows. Nothing happens
//! while the mode is still unresolved.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::ReminderPolicy;
use crate::data::TelemetryRecord;
use crate::device::Glyph;
use crate::mode::Mode;
use crate::state::NodeContext;

/// Summary of one reminder firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderReport {
    /// Mode the reminder ran in.
    pub mode: Mode,
    /// Repetitions run (one beep and one pause each).
    pub repetitions: u32,
    /// Repetitions that also drew the reminder glyph.
    pub glyphs: u32,
    /// Whether an interrupt took the display away.
    pub interrupted: bool,
}

/// Fire the reminder once.
///
/// Every repetition beeps and pauses. Under
/// [`ReminderPolicy::Interruptible`], once an interrupt arrives during a
/// pause the remaining repetitions stop clearing the display and drawing the
/// glyph.
///
/// # Returns
///
/// `None` when the mode is unresolved, otherwise what was shown.
pub async fn fire(ctx: &NodeContext) -> Option<ReminderReport> {
    let mode = ctx.mode.current();
    if !mode.is_resolved() {
        debug!("Reminder skipped, mode unresolved");
        return None;
    }

    let actuator = &ctx.peripherals.actuator;
    let mut repetitions = 0;
    let mut glyphs = 0;
    let mut interrupted = false;

    while repetitions < ctx.config.reminder_repetitions {
        if !interrupted {
            actuator.clear().await;
        }
        actuator.beep().await;
        if !interrupted {
            actuator.show_glyph(Glyph::Reminder, None).await;
            glyphs += 1;
        }
        repetitions += 1;

        if pause(ctx).await && !interrupted {
            debug!("Reminder yielded the display after {} repetition(s)", repetitions);
            interrupted = true;
        }
    }

    ctx.log(snapshot(ctx, mode));

    debug!(
        "Reminder done: {} repetition(s), {} glyph(s), interrupted={}",
        repetitions, glyphs, interrupted
    );

    Some(ReminderReport {
        mode,
        repetitions,
        glyphs,
        interrupted,
    })
}

/// Sleep for the full reminder pause. Returns `true` if an interrupt
/// arrived while sleeping and the policy listens for them.
async fn pause(ctx: &NodeContext) -> bool {
    let sleep = tokio::time::sleep(ctx.config.reminder_pause);
    tokio::pin!(sleep);

    match ctx.config.reminder_policy {
        ReminderPolicy::Atomic => {
            sleep.await;
            false
        }
        ReminderPolicy::Interruptible => {
            let interrupted = tokio::select! {
                _ = &mut sleep => false,
                _ = ctx.interrupts.notified() => true,
            };
            if interrupted {
                sleep.await;
            }
            interrupted
        }
    }
}

/// The row logged at the end of a reminder.
fn snapshot(ctx: &NodeContext, mode: Mode) -> TelemetryRecord {
    match mode {
        Mode::Receiver => {
            let state = ctx.snapshot();
            TelemetryRecord::received_snapshot(
                state.peer.temperature,
                state.fused,
                state.peer.upper_limit,
                state.peer.lower_limit,
            )
        }
        _ => {
            let thresholds = ctx.state.read().thresholds;
            TelemetryRecord::local_snapshot(
                ctx.read_temperature(),
                thresholds.upper,
                thresholds.lower,
            )
        }
    }
}

/// Spawn the reminder. The first firing is one period after the call.
pub fn spawn(ctx: Arc<NodeContext>) -> JoinHandle<()> {
    tokio::spawn(run(ctx))
}

async fn run(ctx: Arc<NodeContext>) {
    let period = ctx.config.reminder_period;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Reminder scheduled every {:?}", period);

    loop {
        ticker.tick().await;
        fire(&ctx).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::data::PeerField;
    use crate::device::ActuatorEvent;
    use crate::mode::Button;
    use crate::radio::WirelessChannel;
    use crate::state::testing::{fixed, harness};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_unresolved_has_no_effect() {
        let h = harness(NodeConfig::default(), fixed(20.0));

        assert_eq!(fire(&h.ctx).await, None);
        assert!(h.actuator.events().is_empty());
        assert!(h.telemetry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sender_reminder() {
        let h = harness(NodeConfig::default(), fixed(21.0));
        h.ctx.mode.press(Button::A);
        let start = Instant::now();

        let report = fire(&h.ctx).await;

        assert_eq!(
            report,
            Some(ReminderReport {
                mode: Mode::Sender,
                repetitions: 3,
                glyphs: 3,
                interrupted: false,
            })
        );

        let cycle = [
            ActuatorEvent::Clear,
            ActuatorEvent::Beep,
            ActuatorEvent::Glyph(Glyph::Reminder, None),
        ];
        let expected: Vec<_> = cycle.iter().cloned().cycle().take(9).collect();
        assert_eq!(h.actuator.events(), expected);
        assert_eq!(
            start.elapsed(),
            (crate::device::BEEP_DURATION + Duration::from_millis(5000)) * 3
        );

        assert_eq!(h.telemetry.len(), 1);
        let row = h.telemetry.last().unwrap();
        assert_eq!(row.temperature_input, Some(21.0));
        assert_eq!(row.upper_limit_input, Some(25.0));
        assert_eq!(row.lower_limit_input, Some(18.0));
        assert_eq!(row.temperature_received, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receiver_reminder_logs_received_columns() {
        let h = harness(NodeConfig::default(), fixed(20.0));
        h.ctx.mode.press(Button::B);
        {
            let mut state = h.ctx.state.write();
            state.peer.absorb(PeerField::Temperature, 24.0);
            state.peer.absorb(PeerField::UpperLimit, 30.0);
            state.fused = Some(22.0);
        }

        fire(&h.ctx).await;

        let row = h.telemetry.last().unwrap();
        assert_eq!(row.temperature_received, Some(24.0));
        assert_eq!(row.avg_temp_received, Some(22.0));
        assert_eq!(row.upper_limit_received, Some(30.0));
        assert_eq!(row.lower_limit_received, None);
        assert_eq!(row.temperature_input, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_yields_display_but_keeps_beeping() {
        let config = NodeConfig::default().with_reminder_policy(ReminderPolicy::Interruptible);
        let h = harness(config, fixed(20.0));
        h.ctx.mode.press(Button::A);
        let start = Instant::now();

        let ctx = h.ctx.clone();
        let task = tokio::spawn(async move { fire(&ctx).await });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        h.ctx.interrupt();

        let report = task.await.unwrap().unwrap();
        assert_eq!(report.repetitions, 3);
        assert_eq!(report.glyphs, 1);
        assert!(report.interrupted);
        assert_eq!(h.actuator.beep_count(), 3);
        assert_eq!(h.actuator.glyph_count(Glyph::Reminder), 1);
        assert_eq!(
            start.elapsed(),
            (crate::device::BEEP_DURATION + Duration::from_millis(5000)) * 3
        );
        assert_eq!(h.telemetry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_atomic_policy_ignores_interrupts() {
        let h = harness(NodeConfig::default(), fixed(20.0));
        h.ctx.mode.press(Button::A);

        let ctx = h.ctx.clone();
        let task = tokio::spawn(async move { fire(&ctx).await });

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            h.ctx.interrupt();
        }

        let report = task.await.unwrap().unwrap();
        assert_eq!(report.repetitions, 3);
        assert_eq!(report.glyphs, 3);
        assert!(!report.interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_radio_message_interrupts_receiver_reminder() {
        let config = NodeConfig::default().with_reminder_policy(ReminderPolicy::Interruptible);
        let h = harness(config, fixed(20.0));
        h.ctx.mode.press(Button::B);
        let listener = crate::receiver::spawn(h.ctx.clone());
        let peer = h.air.endpoint(25, 7);

        let ctx = h.ctx.clone();
        let task = tokio::spawn(async move { fire(&ctx).await });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        peer.send("temperature", 28.0).await.unwrap();

        let report = task.await.unwrap().unwrap();
        assert!(report.interrupted);
        assert_eq!(report.repetitions, 3);
        assert_eq!(report.glyphs, 1);
        assert_eq!(h.actuator.beep_count(), 3);
        assert_eq!(h.ctx.snapshot().peer.temperature, Some(28.0));

        listener.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_fires_hourly() {
        let h = harness(NodeConfig::default(), fixed(20.0));
        h.ctx.mode.press(Button::A);
        let handle = spawn(h.ctx.clone());

        tokio::time::sleep(Duration::from_secs(3599)).await;
        assert!(h.telemetry.is_empty());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(h.telemetry.len(), 1);
        assert_eq!(h.actuator.glyph_count(Glyph::Reminder), 3);

        handle.abort();
    }
}
