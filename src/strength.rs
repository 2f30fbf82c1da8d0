// src/strength.rs
//! Simple strength heuristic shown next to a freshly generated password.

/// Strength band for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthBand {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => StrengthBand::VeryWeak,
            25..=49 => StrengthBand::Weak,
            50..=74 => StrengthBand::Moderate,
            75..=89 => StrengthBand::Strong,
            _ => StrengthBand::VeryStrong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthBand::VeryWeak => "Very Weak",
            StrengthBand::Weak => "Weak",
            StrengthBand::Moderate => "Moderate",
            StrengthBand::Strong => "Strong",
            StrengthBand::VeryStrong => "Very Strong",
        }
    }
}

/// Scores a password from 0 to 100.
///
/// Length contributes 4 points per character up to 40; each of uppercase,
/// lowercase, digit and "anything else" adds 15 when present.
pub fn score(password: &str) -> u8 {
    let length_points = password.chars().count().saturating_mul(4).min(40);

    let variety: [fn(&char) -> bool; 4] = [
        |c| c.is_ascii_uppercase(),
        |c| c.is_ascii_lowercase(),
        |c| c.is_ascii_digit(),
        |c| !c.is_ascii_alphanumeric(),
    ];
    let variety_points: usize = variety
        .iter()
        .filter(|present| password.chars().any(|c| present(&c)))
        .count()
        * 15;

    (length_points + variety_points).min(100) as u8
}
