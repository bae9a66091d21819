//! In-process radio medium.
//!
//! Every frame sent on [`Airwaves`] is encoded, then decoded by each other
//! registered endpoint as if it had been picked out of the air. Frames that
//! fail to decode or belong to another group are dropped.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, trace};

use super::{RadioMessage, WirelessChannel};
use crate::error::Result;

/// Inbound queue depth per endpoint.
const INBOX_CAPACITY: usize = 64;

/// A registered listener. Dead once every clone of its endpoint is dropped.
struct Station {
    group: u8,
    serial: u32,
    inbox: broadcast::Sender<RadioMessage>,
    alive: Weak<()>,
}

impl Station {
    fn is_alive(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

/// Shared broadcast medium.
#[derive(Clone, Default)]
pub struct Airwaves {
    stations: Arc<RwLock<Vec<Station>>>,
    jammed: Arc<AtomicBool>,
}

impl Airwaves {
    /// Create an empty medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a radio on `group` with the given serial number.
    pub fn endpoint(&self, group: u8, serial: u32) -> RadioEndpoint {
        let (inbox, _) = broadcast::channel(INBOX_CAPACITY);
        let alive = Arc::new(());

        let mut stations = self.stations.write();
        stations.retain(Station::is_alive);
        stations.push(Station {
            group,
            serial,
            inbox: inbox.clone(),
            alive: Arc::downgrade(&alive),
        });
        drop(stations);

        debug!("Radio {:08X} joined group {}", serial, group);

        RadioEndpoint {
            air: self.clone(),
            group,
            serial,
            inbox,
            _alive: alive,
        }
    }

    /// Drop every frame until unjammed. Models a lost link.
    pub fn set_jammed(&self, jammed: bool) {
        self.jammed.store(jammed, Ordering::SeqCst);
    }

    /// Put a raw frame on the air as if `from_serial` had sent it.
    ///
    /// Returns the number of stations that accepted it.
    pub fn inject(&self, from_serial: u32, frame: &[u8]) -> usize {
        if self.jammed.load(Ordering::SeqCst) {
            trace!("Air jammed, dropping {} byte frame", frame.len());
            return 0;
        }

        let message = match RadioMessage::decode(frame) {
            Ok(message) => message,
            Err(e) => {
                debug!("Dropping undecodable frame: {}", e);
                return 0;
            }
        };

        let mut stations = self.stations.write();
        stations.retain(Station::is_alive);

        let mut delivered = 0;
        for station in stations.iter() {
            if station.serial == from_serial || station.group != message.group {
                continue;
            }
            // No subscriber yet is not a failure: nobody was listening.
            if station.inbox.send(message.clone()).is_ok() {
                delivered += 1;
            }
        }

        trace!(
            "Frame '{}' from {:08X} reached {} station(s)",
            message.name,
            from_serial,
            delivered
        );
        delivered
    }

    /// Number of radios still attached.
    pub fn station_count(&self) -> usize {
        self.stations.read().iter().filter(|s| s.is_alive()).count()
    }
}

impl std::fmt::Debug for Airwaves {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Airwaves")
            .field("stations", &self.station_count())
            .field("jammed", &self.jammed.load(Ordering::SeqCst))
            .finish()
    }
}

/// One radio attached to an [`Airwaves`] medium.
#[derive(Clone)]
pub struct RadioEndpoint {
    air: Airwaves,
    group: u8,
    serial: u32,
    inbox: broadcast::Sender<RadioMessage>,
    _alive: Arc<()>,
}

impl RadioEndpoint {
    /// Encode and transmit a message with an explicit (possibly absent) value.
    pub fn transmit(&self, name: &str, value: Option<f64>) -> Result<Bytes> {
        let message = match value {
            Some(v) => RadioMessage::new(self.group, self.serial, name, v),
            None => RadioMessage::without_value(self.group, self.serial, name),
        };
        let frame = message.encode()?;
        self.air.inject(self.serial, &frame);
        Ok(frame)
    }
}

impl std::fmt::Debug for RadioEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioEndpoint")
            .field("group", &self.group)
            .field("serial", &format_args!("{:08X}", self.serial))
            .finish()
    }
}

#[async_trait]
impl WirelessChannel for RadioEndpoint {
    fn group(&self) -> u8 {
        self.group
    }

    async fn send(&self, name: &str, value: f64) -> Result<()> {
        self.transmit(name, Some(value)).map(|_| ())
    }

    fn subscribe(&self) -> broadcast::Receiver<RadioMessage> {
        self.inbox.subscribe()
    }
}
