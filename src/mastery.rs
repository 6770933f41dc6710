//! Mastery Model
//!
//! Core rules:
//! - Correct answer -> mastery + 10, incorrect -> mastery - 15
//! - Result always clamped to [0, 100]
//! - Selection weight is an inverse-ish function of mastery, steep below 50
//!
//! Weight bands:
//! - mastery < 50:        ((100 - m) / 50)^1.5 * 100
//! - 50 <= mastery < 80:  100 - m
//! - 80 <= mastery < 90:  10
//! - mastery >= 90:       5
//!
//! Every band is strictly positive, so mastered questions still recur occasionally.

use crate::types::{
    MASTERY_DECREMENT, MASTERY_INCREMENT, MASTERY_THRESHOLD_HIGH, MASTERY_THRESHOLD_MASTERED,
    MAX_MASTERY, MIN_MASTERY,
};

// ==================== Constants ====================

/// Boundary below which weights grow super-linearly
const STEEP_BAND_UPPER: f64 = 50.0;

/// Exponent applied in the steep band
const STEEP_EXPONENT: f64 = 1.5;

/// Weight for mastered questions
const MASTERED_WEIGHT: f64 = 5.0;

/// Weight for high-mastery questions
const HIGH_MASTERY_WEIGHT: f64 = 10.0;

// ==================== Functions ====================

/// Clamp a mastery value into [0, 100]; NaN collapses to 0
pub fn clamp_mastery(mastery: f64) -> f64 {
    if mastery.is_nan() {
        return MIN_MASTERY;
    }
    mastery.clamp(MIN_MASTERY, MAX_MASTERY)
}

/// New mastery after answering a question
pub fn update_mastery(current: f64, is_correct: bool) -> f64 {
    let next = if is_correct {
        current + MASTERY_INCREMENT
    } else {
        current - MASTERY_DECREMENT
    };
    clamp_mastery(next)
}

/// Selection weight for a mastery score; higher weight means drawn more often
pub fn selection_weight(mastery: f64) -> f64 {
    let mastery = clamp_mastery(mastery);
    let inverted = MAX_MASTERY - mastery;

    if mastery < STEEP_BAND_UPPER {
        return (inverted / STEEP_BAND_UPPER).powf(STEEP_EXPONENT) * 100.0;
    }

    if mastery >= MASTERY_THRESHOLD_MASTERED {
        return MASTERED_WEIGHT;
    }

    if mastery >= MASTERY_THRESHOLD_HIGH {
        return HIGH_MASTERY_WEIGHT;
    }

    inverted
}

pub fn is_mastered(mastery: f64) -> bool {
    mastery >= MASTERY_THRESHOLD_MASTERED
}

pub fn is_high_mastery(mastery: f64) -> bool {
    mastery >= MASTERY_THRESHOLD_HIGH
}
