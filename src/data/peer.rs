//! Peer sample data structures.
//!
//! The values a receiver has heard from its sender. Each field fills in on
//! its own as radio messages arrive and stays filled for the rest of the
//! session.

use super::thresholds::Thresholds;

/// A radio value name the receiver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeerField {
    /// The peer's temperature reading.
    Temperature,
    /// The peer's upper bound.
    UpperLimit,
    /// The peer's lower bound.
    LowerLimit,
}

impl PeerField {
    /// All recognized fields, in broadcast order.
    pub const ALL: [PeerField; 3] = [Self::Temperature, Self::UpperLimit, Self::LowerLimit];

    /// Look up a field by its radio name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "temperature" => Some(Self::Temperature),
            "upperLimit" => Some(Self::UpperLimit),
            "lowerLimit" => Some(Self::LowerLimit),
            _ => None,
        }
    }

    /// The radio name of this field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::UpperLimit => "upperLimit",
            Self::LowerLimit => "lowerLimit",
        }
    }
}

impl std::fmt::Display for PeerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Values received from the peer node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerSample {
    /// Peer temperature in Celsius.
    pub temperature: Option<f64>,
    /// Peer upper bound.
    pub upper_limit: Option<f64>,
    /// Peer lower bound.
    pub lower_limit: Option<f64>,
}

impl PeerSample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value in one field. Other fields are untouched.
    pub fn absorb(&mut self, field: PeerField, value: f64) {
        match field {
            PeerField::Temperature => self.temperature = Some(value),
            PeerField::UpperLimit => self.upper_limit = Some(value),
            PeerField::LowerLimit => self.lower_limit = Some(value),
        }
    }

    /// Get one field.
    pub fn get(&self, field: PeerField) -> Option<f64> {
        match field {
            PeerField::Temperature => self.temperature,
            PeerField::UpperLimit => self.upper_limit,
            PeerField::LowerLimit => self.lower_limit,
        }
    }

    /// Check if every field has been received.
    pub fn is_complete(&self) -> bool {
        PeerField::ALL.iter().all(|f| self.get(*f).is_some())
    }

    /// Fields that are still missing.
    pub fn missing_fields(&self) -> Vec<PeerField> {
        PeerField::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// The received bounds, for comparison against the local reading.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.upper_limit, self.lower_limit)
    }

    /// Mean of the local reading and the peer temperature.
    ///
    /// `None` until the peer temperature has been received.
    pub fn fuse(&self, local_reading: f64) -> Option<f64> {
        self.temperature.map(|peer| (local_reading + peer) / 2.0)
    }
}
