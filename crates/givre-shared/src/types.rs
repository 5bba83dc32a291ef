use serde::{Deserialize, Serialize};

/// Cosmetic category tag attached to a whisper. Carries no algorithmic
/// weight anywhere in the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Essence {
    #[default]
    Aurora,
    Stardust,
}

impl Essence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Essence::Aurora => "aurora",
            Essence::Stardust => "stardust",
        }
    }
}

impl std::fmt::Display for Essence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Essence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aurora" => Ok(Essence::Aurora),
            "stardust" => Ok(Essence::Stardust),
            other => Err(format!("unknown essence '{other}' (expected aurora or stardust)")),
        }
    }
}
