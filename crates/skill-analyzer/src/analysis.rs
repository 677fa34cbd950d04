//! Skill classification — pure functions only
//! (No engine or PGN dependencies)

use std::fmt;
use std::str::FromStr;

use chess_core::PlayerColor;
use serde::{Deserialize, Serialize};

/// Classification thresholds on the scaled CPL (exclusive)
const THRESHOLD_BEGINNER: f64 = 50.0;
const THRESHOLD_INTERMEDIATE: f64 = 20.0;
const THRESHOLD_EXPERT: f64 = 10.0;

/// Assumed dataset maximum for average CPL; scaling divides by it
pub const MAX_CPL: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Beginner,
    Intermediate,
    Expert,
    Professional,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Beginner,
        SkillCategory::Intermediate,
        SkillCategory::Expert,
        SkillCategory::Professional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Beginner => "Beginner",
            SkillCategory::Intermediate => "Intermediate",
            SkillCategory::Expert => "Expert",
            SkillCategory::Professional => "Professional",
        }
    }

    /// Study material titles recommended for this level.
    pub fn learning_resources(self) -> [&'static str; 3] {
        match self {
            SkillCategory::Beginner => [
                "Chess Basics Tutorial",
                "Pawn Structure Strategies",
                "Opening Principles",
            ],
            SkillCategory::Intermediate => [
                "Tactics Training",
                "Middle Game Planning",
                "Endgame Essentials",
            ],
            SkillCategory::Expert => [
                "Advanced Tactics and Combinations",
                "Strategic Planning",
                "Endgame Mastery",
            ],
            SkillCategory::Professional => [
                "Grandmaster Game Analysis",
                "Advanced Opening Theory",
                "Positional Sacrifices",
            ],
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for SkillCategory {
    type Err = UnknownCategory;

    /// Exact, case-sensitive match on the category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Lower CPL means stronger play, so tiers go up as the score goes down.
pub fn classify(scaled_cpl: f64) -> SkillCategory {
    if scaled_cpl > THRESHOLD_BEGINNER {
        SkillCategory::Beginner
    } else if scaled_cpl > THRESHOLD_INTERMEDIATE {
        SkillCategory::Intermediate
    } else if scaled_cpl > THRESHOLD_EXPERT {
        SkillCategory::Expert
    } else {
        SkillCategory::Professional
    }
}

pub fn average_cpl(total_cpl: u64, move_count: u32) -> f64 {
    if move_count == 0 {
        return 0.0;
    }
    total_cpl as f64 / move_count as f64
}

pub fn scale_cpl(average_cpl: f64) -> f64 {
    average_cpl / MAX_CPL * 100.0
}

/// Running totals for the analyzed player's moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CplTally {
    pub moves: u32,
    pub total_cpl: u64,
}

impl CplTally {
    /// Count one analyzed move; a missing score counts the move but adds no loss.
    pub fn record(&mut self, score: Option<i32>) {
        self.moves += 1;
        if let Some(cp) = score {
            self.total_cpl += u64::from(cp.unsigned_abs());
        }
    }

    pub fn finish(self, player_color: PlayerColor) -> AnalysisResult {
        let average = average_cpl(self.total_cpl, self.moves);
        let scaled = scale_cpl(average);
        let category = classify(scaled);

        AnalysisResult {
            total_games: 1,
            total_moves: self.moves,
            average_cpl: average,
            scaled_cpl: scaled,
            category,
            learning_resources: category
                .learning_resources()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            player_color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_games: u32,
    /// Moves made by the analyzed player
    pub total_moves: u32,
    /// Mean absolute engine score after the player's moves, in centipawns
    pub average_cpl: f64,
    /// `average_cpl` normalized against [`MAX_CPL`], as a percentage
    pub scaled_cpl: f64,
    pub category: SkillCategory,
    pub learning_resources: Vec<String>,
    pub player_color: PlayerColor,
}
