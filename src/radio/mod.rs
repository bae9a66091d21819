//! Radio module.
//!
//! This module contains:
//! - the [`WirelessChannel`] capability the node core sends and receives through
//! - the frame codec and its CRC
//! - [`Airwaves`], an in-process broadcast medium for host runs

pub mod airwaves;
pub mod crc;
pub mod packet;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

pub use airwaves::{Airwaves, RadioEndpoint};
pub use crc::calculate_crc;
pub use packet::{PacketType, RadioMessage, MAX_NAME_LEN};

/// Named-value radio scoped to one group.
///
/// Delivery is best effort: at most once per transmission, no ordering
/// between names, no acknowledgement.
#[async_trait]
pub trait WirelessChannel: Send + Sync {
    /// The group this radio transmits and listens on.
    fn group(&self) -> u8;

    /// Broadcast a named value to the group.
    async fn send(&self, name: &str, value: f64) -> Result<()>;

    /// Subscribe to values received from other nodes in the group.
    fn subscribe(&self) -> broadcast::Receiver<RadioMessage>;
}
