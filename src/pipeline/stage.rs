// src/pipeline/stage.rs

use std::fmt;
use std::str::FromStr;

/// Stage of the standard pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageName {
    Planning,
    Research,
    Writing,
    Editing,
    Seo,
    Formatting,
}

impl StageName {
    /// All stages in registration order.
    pub const ALL: [StageName; 6] = [
        StageName::Planning,
        StageName::Research,
        StageName::Writing,
        StageName::Editing,
        StageName::Seo,
        StageName::Formatting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Planning => "planning",
            StageName::Research => "research",
            StageName::Writing => "writing",
            StageName::Editing => "editing",
            StageName::Seo => "seo",
            StageName::Formatting => "formatting",
        }
    }

    /// Direct dependencies in the standard topology.
    pub fn dependencies(self) -> &'static [StageName] {
        match self {
            StageName::Planning => &[],
            StageName::Research => &[StageName::Planning],
            StageName::Writing => &[StageName::Research],
            StageName::Editing | StageName::Seo => &[StageName::Writing],
            StageName::Formatting => &[StageName::Editing, StageName::Seo],
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StageName::ALL
            .into_iter()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown stage: {s} (expected one of planning, research, writing, editing, seo, formatting)"
                )
            })
    }
}
