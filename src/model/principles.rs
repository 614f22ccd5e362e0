use std::fmt;

use serde::{Deserialize, Serialize};

pub const PRINCIPLE_COUNT: usize = 10;

/// One of the ten usability evaluation principles, numbered 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PrincipleId(u8);

const PRINCIPLE_KEYS: [&str; PRINCIPLE_COUNT] =
    ["N1", "N2", "N3", "N4", "N5", "N6", "N7", "N8", "N9", "N10"];

const PRINCIPLE_NAMES: [&str; PRINCIPLE_COUNT] = [
    "Visibility of system status",
    "Match between system and the real world",
    "User control and freedom",
    "Consistency and standards",
    "Error prevention",
    "Recognition rather than recall",
    "Flexibility and efficiency of use",
    "Aesthetic and minimalist design",
    "Help users recognize, diagnose, and recover from errors",
    "Help and documentation",
];

impl PrincipleId {
    pub fn new(id: u8) -> Option<Self> {
        if (1..=PRINCIPLE_COUNT as u8).contains(&id) {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Zero-based slot in per-principle arrays.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn key(self) -> &'static str {
        PRINCIPLE_KEYS[self.index()]
    }

    pub fn name(self) -> &'static str {
        PRINCIPLE_NAMES[self.index()]
    }

    pub fn all() -> impl Iterator<Item = PrincipleId> {
        (1..=PRINCIPLE_COUNT as u8).map(PrincipleId)
    }
}

impl TryFrom<u8> for PrincipleId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PrincipleId::new(value)
            .ok_or_else(|| format!("principle id {value} is outside 1..={PRINCIPLE_COUNT}"))
    }
}

impl From<PrincipleId> for u8 {
    fn from(value: PrincipleId) -> Self {
        value.0
    }
}

impl fmt::Display for PrincipleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
