use serde::{Deserialize, Serialize};

/// One physical station of the SET-Box. The numeric code is what the remote
/// table stores; the label is what players see and what the local file keys on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Puzzle {
    Inversion,
    Schiebetuer,
    Falltuer,
    Ablage,
    Schublade,
    Guillotine,
    Versteck,
}

impl Puzzle {
    pub fn all() -> Vec<Puzzle> {
        vec![
            Puzzle::Inversion,
            Puzzle::Schiebetuer,
            Puzzle::Falltuer,
            Puzzle::Ablage,
            Puzzle::Schublade,
            Puzzle::Guillotine,
            Puzzle::Versteck,
        ]
    }

    pub fn code(&self) -> i64 {
        match self {
            Puzzle::Inversion => 1,
            Puzzle::Schiebetuer => 2,
            Puzzle::Falltuer => 3,
            Puzzle::Ablage => 4,
            Puzzle::Schublade => 5,
            Puzzle::Guillotine => 6,
            Puzzle::Versteck => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Puzzle::Inversion => "1 Inversion",
            Puzzle::Schiebetuer => "2 Schiebetür",
            Puzzle::Falltuer => "3 Falltür",
            Puzzle::Ablage => "4 Ablage",
            Puzzle::Schublade => "5 Schublade",
            Puzzle::Guillotine => "6 Guillotine",
            Puzzle::Versteck => "7 Versteck",
        }
    }

    pub fn from_code(code: i64) -> Option<Puzzle> {
        Puzzle::all().into_iter().find(|p| p.code() == code)
    }

    pub fn from_label(label: &str) -> Option<Puzzle> {
        Puzzle::all().into_iter().find(|p| p.label() == label)
    }

    /// Accepts either a full label or a bare code such as `"3"`.
    pub fn parse(input: &str) -> Option<Puzzle> {
        let input = input.trim();
        Puzzle::from_label(input).or_else(|| input.parse().ok().and_then(Puzzle::from_code))
    }
}

impl std::fmt::Display for Puzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
