//! Paired nodes example.
//!
//! Boots a sender and a receiver on the same simulated radio group, picks
//! their modes and lets them run for a while. The receiver's telemetry is
//! written to stdout as CSV.

use std::sync::Arc;
use std::time::Duration;
use twin_thermo::{
    Airwaves, Button, CsvTelemetry, MemoryTelemetry, Node, NodeConfig, Peripherals, Result,
    SharedSensor, TracingActuator,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn,twin_thermo=info")
        .init();

    println!("Paired Nodes");
    println!("============\n");

    let air = Airwaves::new();

    let sender_config = NodeConfig::default()
        .with_radio_serial(0x0000_0001)
        .with_broadcast(true);
    let sender_sensor = SharedSensor::new(22.0);
    let sender = Node::start(
        sender_config.clone(),
        Peripherals::new(
            Arc::new(sender_sensor.clone()),
            Arc::new(TracingActuator::new("sender")),
            Arc::new(MemoryTelemetry::new()),
            Arc::new(air.endpoint(sender_config.radio_group, sender_config.radio_serial)),
        ),
    )?;

    let receiver_config = NodeConfig::default().with_radio_serial(0x0000_0002);
    let receiver = Node::start(
        receiver_config.clone(),
        Peripherals::new(
            Arc::new(SharedSensor::new(20.0)),
            Arc::new(TracingActuator::new("receiver")),
            Arc::new(CsvTelemetry::new(std::io::stdout())?),
            Arc::new(air.endpoint(
                receiver_config.radio_group,
                receiver_config.radio_serial,
            )),
        ),
    )?;

    receiver.press(Button::B).await;
    sender.press(Button::A).await;

    tokio::time::sleep(Duration::from_secs(12)).await;

    // Push the sender over its upper limit.
    sender_sensor.set(31.0);
    tokio::time::sleep(Duration::from_secs(12)).await;

    let state = receiver.state();
    println!();
    println!("Receiver peer sample: {:?}", state.peer);
    match state.fused {
        Some(fused) => println!("Receiver fused temperature: {:.1}°C", fused),
        None => println!("Receiver fused temperature: not yet known"),
    }

    sender.shutdown().await;
    receiver.shutdown().await;

    Ok(())
}
