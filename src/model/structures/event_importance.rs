use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::EnumIter;

const OLYMPIC_TERMS: [&str; 3] = ["olympic", "olympics", "world championship"];
const WORLD_TERMS: [&str; 7] = [
    "world cup",
    "world series",
    "world triathlon championship series",
    "wtcs",
    "wts",
    "grand final",
    "championship final"
];
const MAJOR_TERMS: [&str; 11] = [
    "continental championship",
    "european championship",
    "asian championship",
    "american championship",
    "oceania championship",
    "african championship",
    "ironman",
    "70.3",
    "half ironman",
    "challenge",
    "super league"
];
const REGIONAL_TERMS: [&str; 9] = [
    "national championship",
    "cup",
    "series",
    "continental cup",
    "european cup",
    "asian cup",
    "american cup",
    "oceania cup",
    "african cup"
];

/// How prestigious an event is, derived from its title. Display-only: ratings ignore it.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[repr(u8)]
pub enum EventImportance {
    Local = 1,
    Regional = 2,
    Major = 3,
    World = 4,
    Olympic = 5
}

impl EventImportance {
    /// Levels are checked from most to least important; the first match wins.
    pub fn from_title(title: &str) -> EventImportance {
        let title = title.to_lowercase();
        let mentions = |terms: &[&str]| terms.iter().any(|t| title.contains(t));

        if mentions(&OLYMPIC_TERMS) {
            EventImportance::Olympic
        } else if mentions(&WORLD_TERMS) {
            EventImportance::World
        } else if mentions(&MAJOR_TERMS) {
            EventImportance::Major
        } else if mentions(&REGIONAL_TERMS) {
            EventImportance::Regional
        } else {
            EventImportance::Local
        }
    }
}
