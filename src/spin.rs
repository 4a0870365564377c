//! Spin-wheel campaigns: prize lists and the client-side random pick.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{models::Promotion, pricing::DiscountToken};

/// Shown when the active campaign carries no prizes of its own.
pub const DEFAULT_PRIZES: [&str; 6] = [
    "5% OFF",
    "10% OFF",
    "Free Item",
    "15% OFF",
    "Try Again",
    "20% OFF",
];

/// Used by the worker creator when the prize field is left blank.
pub const CREATOR_DEFAULT_PRIZES: [&str; 4] = ["10% OFF", "5% OFF", "Free Item", "Try Again"];

pub const MIN_PRIZES: usize = 4;

/// Full turns before the wheel settles.
const SPIN_TURNS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SpinWheel {
    pub promotion_id: Option<i64>,
    pub title: String,
    pub prizes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SpinOutcome {
    pub index: usize,
    pub prize: String,
    /// Degrees the wheel turns so the chosen segment lands under the pointer.
    pub landing_angle: f64,
    pub wins_discount: bool,
}

impl SpinOutcome {
    pub fn token(&self) -> Option<DiscountToken> {
        DiscountToken::parse(&self.prize)
    }
}

impl SpinWheel {
    pub fn from_promotion(promotion: &Promotion) -> Self {
        let prizes: Vec<String> = promotion
            .content
            .prizes
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            promotion_id: Some(promotion.id),
            title: promotion
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "SPIN & WIN!".to_string()),
            prizes: if prizes.is_empty() {
                default_prizes()
            } else {
                prizes
            },
        }
    }

    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> SpinOutcome {
        let prizes: Vec<String> = if self.prizes.is_empty() {
            default_prizes()
        } else {
            self.prizes.clone()
        };
        let index = rng.gen_range(0..prizes.len());
        let prize = prizes[index].clone();
        let segment = 360.0 / prizes.len() as f64;
        let landing_angle =
            f64::from(SPIN_TURNS) * 360.0 + (360.0 - index as f64 * segment - segment / 2.0);

        SpinOutcome {
            index,
            wins_discount: DiscountToken::parse(&prize).is_some(),
            prize,
            landing_angle,
        }
    }
}

pub fn default_prizes() -> Vec<String> {
    DEFAULT_PRIZES.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrizeListError {
    #[error("Enter title")]
    MissingTitle,
    #[error("Please enter at least 4 prizes.")]
    TooFewPrizes(usize),
}

/// Parses the creator's comma-separated prize field. Blank input falls back to
/// the creator defaults; one to three prizes are rejected.
pub fn parse_prize_list(raw: &str) -> Result<Vec<String>, PrizeListError> {
    let prizes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    match prizes.len() {
        0 => Ok(CREATOR_DEFAULT_PRIZES.iter().map(|p| p.to_string()).collect()),
        n if n < MIN_PRIZES => Err(PrizeListError::TooFewPrizes(n)),
        _ => Ok(prizes),
    }
}
