//! 5×5 LED glyphs.
//!
//! Glyphs are stored as one bitmask per row, most significant of the five
//! bits being the leftmost LED.

/// A fixed image shown on the LED matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Glyph {
    /// Reading above the upper bound.
    UpArrow,
    /// Reading below the lower bound.
    DownArrow,
    /// Malformed radio message.
    Question,
    /// Hydration reminder (a water drop).
    Reminder,
}

impl Glyph {
    /// Matrix width and height.
    pub const SIZE: usize = 5;

    /// Row bitmasks, top row first.
    pub fn rows(&self) -> [u8; Self::SIZE] {
        match self {
            Self::UpArrow => [0b00100, 0b01110, 0b11111, 0b00100, 0b00100],
            Self::DownArrow => [0b00100, 0b00100, 0b11111, 0b01110, 0b00100],
            Self::Question => [0b01110, 0b00001, 0b00110, 0b00000, 0b00100],
            Self::Reminder => [0b00100, 0b01010, 0b10001, 0b10001, 0b01110],
        }
    }

    /// Check whether the LED at (`x`, `y`) is lit.
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        if x >= Self::SIZE || y >= Self::SIZE {
            return false;
        }
        self.rows()[y] & (1 << (Self::SIZE - 1 - x)) != 0
    }

    /// Render as the `# .` text grid used in firmware sources.
    pub fn to_pattern(&self) -> String {
        (0..Self::SIZE)
            .map(|y| {
                (0..Self::SIZE)
                    .map(|x| if self.is_lit(x, y) { "#" } else { "." })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse a `# .` text grid into row bitmasks.
    ///
    /// Whitespace is ignored. Returns `None` unless exactly 25 cells are given.
    pub fn parse_pattern(pattern: &str) -> Option<[u8; Self::SIZE]> {
        let cells: Vec<bool> = pattern
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '#' => Some(true),
                '.' => Some(false),
                _ => None,
            })
            .collect::<Option<_>>()?;

        if cells.len() != Self::SIZE * Self::SIZE {
            return None;
        }

        let mut rows = [0u8; Self::SIZE];
        for (i, lit) in cells.into_iter().enumerate() {
            if lit {
                rows[i / Self::SIZE] |= 1 << (Self::SIZE - 1 - i % Self::SIZE);
            }
        }
        Some(rows)
    }
}
