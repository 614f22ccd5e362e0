use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Citizen,
    Krds,
    Heuristic,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Citizen, SourceKind::Krds, SourceKind::Heuristic];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Citizen => "citizen",
            SourceKind::Krds => "krds",
            SourceKind::Heuristic => "heuristic",
        }
    }

    fn bit(self) -> u8 {
        match self {
            SourceKind::Citizen => 0b001,
            SourceKind::Krds => 0b010,
            SourceKind::Heuristic => 0b100,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of score sources, iterated in citizen, krds, heuristic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSet(u8);

impl SourceSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn of(kinds: &[SourceKind]) -> Self {
        let mut set = Self::empty();
        for &kind in kinds {
            set.insert(kind);
        }
        set
    }

    pub fn insert(&mut self, kind: SourceKind) {
        self.0 |= kind.bit();
    }

    pub fn contains(self, kind: SourceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = SourceKind> {
        SourceKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl Serialize for SourceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for kind in self.iter() {
            seq.serialize_element(&kind)?;
        }
        seq.end()
    }
}

/// One of the four fixed weighting schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    CitizenOnly,
    CitizenKrds,
    CitizenHeuristic,
    AllSources,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::CitizenOnly,
        Variant::CitizenKrds,
        Variant::CitizenHeuristic,
        Variant::AllSources,
    ];

    /// Selects the variant for a set of present sources. Citizen is the
    /// entry condition; without it no variant applies.
    pub fn for_sources(sources: SourceSet) -> Option<Variant> {
        if !sources.contains(SourceKind::Citizen) {
            return None;
        }
        let krds = sources.contains(SourceKind::Krds);
        let heuristic = sources.contains(SourceKind::Heuristic);
        Some(match (krds, heuristic) {
            (false, false) => Variant::CitizenOnly,
            (true, false) => Variant::CitizenKrds,
            (false, true) => Variant::CitizenHeuristic,
            (true, true) => Variant::AllSources,
        })
    }

    pub fn sources(self) -> SourceSet {
        match self {
            Variant::CitizenOnly => SourceSet::of(&[SourceKind::Citizen]),
            Variant::CitizenKrds => SourceSet::of(&[SourceKind::Citizen, SourceKind::Krds]),
            Variant::CitizenHeuristic => {
                SourceSet::of(&[SourceKind::Citizen, SourceKind::Heuristic])
            }
            Variant::AllSources => SourceSet::of(&SourceKind::ALL),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::CitizenOnly => "citizen_only",
            Variant::CitizenKrds => "citizen_krds",
            Variant::CitizenHeuristic => "citizen_heuristic",
            Variant::AllSources => "all_sources",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
