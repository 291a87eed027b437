use std::fmt;

use serde::{Deserialize, Serialize};

/// Gas bottles feeding the network. Only one may be open at a time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GasSource {
    Neon,
    Argon,
    Krypton,
}

impl GasSource {
    pub const ALL: [GasSource; 3] = [GasSource::Neon, GasSource::Argon, GasSource::Krypton];

    pub fn name(self) -> &'static str {
        match self {
            GasSource::Neon => "Neon",
            GasSource::Argon => "Argon",
            GasSource::Krypton => "Krypton",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gas| gas.name() == name)
    }

    /// Bottle fill while the source is open.
    pub fn color(self) -> &'static str {
        match self {
            GasSource::Neon => "#f472b6",
            GasSource::Argon => "#60a5fa",
            GasSource::Krypton => "#a78bfa",
        }
    }

    /// Position attributes of the bottle rectangle in the schematic.
    pub fn anchor(self) -> &'static str {
        match self {
            GasSource::Neon => r#"x="801" y="470""#,
            GasSource::Argon => r#"x="801" y="510""#,
            GasSource::Krypton => r#"x="801" y="550""#,
        }
    }
}

impl fmt::Display for GasSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
