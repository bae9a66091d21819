//! Temperature threshold data structures.
//!
//! An upper and a lower bound, either of which may be unset. The same shape
//! holds the operator's own bounds and the bounds received from the peer.

/// Which side of the band a reading fell out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BreachKind {
    /// Reading above the upper bound.
    UpperBreach,
    /// Reading below the lower bound.
    LowerBreach,
}

impl BreachKind {
    /// Parse the identifier used by the firmware (`"upperLimit"` / `"lowerLimit"`).
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "upperLimit" => Some(Self::UpperBreach),
            "lowerLimit" => Some(Self::LowerBreach),
            _ => None,
        }
    }

    /// The firmware identifier for this breach.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::UpperBreach => "upperLimit",
            Self::LowerBreach => "lowerLimit",
        }
    }
}

impl std::fmt::Display for BreachKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpperBreach => write!(f, "HIGH"),
            Self::LowerBreach => write!(f, "LOW"),
        }
    }
}

/// Upper and lower temperature bounds in Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    /// Alert when a reading is strictly above this value.
    pub upper: Option<f64>,
    /// Alert when a reading is strictly below this value.
    pub lower: Option<f64>,
}

/// The operator-configured bounds of this node.
pub type LocalThresholds = Thresholds;

impl Thresholds {
    /// Default upper bound.
    pub const DEFAULT_UPPER: f64 = 25.0;
    /// Default lower bound.
    pub const DEFAULT_LOWER: f64 = 18.0;

    /// Create bounds from optional values.
    pub fn new(upper: Option<f64>, lower: Option<f64>) -> Self {
        Self { upper, lower }
    }

    /// Bounds with neither side set.
    pub fn unset() -> Self {
        Self {
            upper: None,
            lower: None,
        }
    }

    /// Check whether a reading is above the upper bound.
    ///
    /// An unset bound never fires.
    pub fn is_above(&self, reading: f64) -> bool {
        self.upper.is_some_and(|upper| reading > upper)
    }

    /// Check whether a reading is below the lower bound.
    pub fn is_below(&self, reading: f64) -> bool {
        self.lower.is_some_and(|lower| reading < lower)
    }

    /// Every breach the reading causes, upper first.
    ///
    /// Both can be reported at once when the bounds are inverted
    /// (upper < lower); that configuration is not rejected.
    pub fn breaches(&self, reading: f64) -> Vec<BreachKind> {
        let mut breaches = Vec::with_capacity(2);
        if self.is_above(reading) {
            breaches.push(BreachKind::UpperBreach);
        }
        if self.is_below(reading) {
            breaches.push(BreachKind::LowerBreach);
        }
        breaches
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            upper: Some(Self::DEFAULT_UPPER),
            lower: Some(Self::DEFAULT_LOWER),
        }
    }
}
