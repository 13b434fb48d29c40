//! Core button masks and button-state tracking.
//!
//! The controller reports its eleven core buttons as a 16-bit big-endian
//! bitfield in the first two payload bytes of most input reports.  Bits 5, 6,
//! 13 and 14 carry accelerometer LSBs, so [`ButtonMask::ALL`] excludes them.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// A set of core buttons, one bit per button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonMask(pub u16);

impl ButtonMask {
    pub const NONE: Self = Self(0x0000);
    pub const TWO: Self = Self(0x0001);
    pub const ONE: Self = Self(0x0002);
    pub const B: Self = Self(0x0004);
    pub const A: Self = Self(0x0008);
    pub const MINUS: Self = Self(0x0010);
    pub const HOME: Self = Self(0x0080);
    pub const LEFT: Self = Self(0x0100);
    pub const RIGHT: Self = Self(0x0200);
    pub const DOWN: Self = Self(0x0400);
    pub const UP: Self = Self(0x0800);
    pub const PLUS: Self = Self(0x1000);
    /// Every real button bit.
    pub const ALL: Self = Self(0x1F9F);

    const NAMED: [(ButtonMask, &'static str); 11] = [
        (Self::TWO, "TWO"),
        (Self::ONE, "ONE"),
        (Self::B, "B"),
        (Self::A, "A"),
        (Self::MINUS, "MINUS"),
        (Self::HOME, "HOME"),
        (Self::LEFT, "LEFT"),
        (Self::RIGHT, "RIGHT"),
        (Self::DOWN, "DOWN"),
        (Self::UP, "UP"),
        (Self::PLUS, "PLUS"),
    ];

    /// Builds a mask from raw report bits, discarding the accelerometer bits.
    pub fn from_raw(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every button in `other` is also in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Human-readable button names in bit order, for logs.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(mask, _)| self.contains(*mask))
            .map(|(_, name)| name)
    }
}

impl BitOr for ButtonMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for ButtonMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for ButtonMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for ButtonMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join("+"))
    }
}

/// Button state after one input report.
///
/// `pressed` is everything currently down (not only the buttons that went
/// down on this report); `held` is the subset that was already down before;
/// `released` is what was down before and is up now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: ButtonMask,
    pub held: ButtonMask,
    pub released: ButtonMask,
}

impl ButtonState {
    /// Computes the state for a report showing `now` down, given the previous
    /// report's `pressed` set.
    pub fn advance(previous: ButtonMask, now: ButtonMask) -> Self {
        Self {
            pressed: now,
            held: now & previous,
            released: previous & !now,
        }
    }

    /// `true` when neither a press nor a release is reported.
    pub fn is_idle(&self) -> bool {
        self.pressed.is_empty() && self.released.is_empty()
    }
}
