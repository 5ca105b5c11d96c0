use crate::app::collectors::profile::{UserProfile, MAX_EXAM_HORIZON_DAYS};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Headline numbers shown next to the recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub stress_level: Option<u8>,
    pub days_until_exam: Option<i64>,
    pub monthly_savings: Option<f64>,
    /// 0-10, derived from stress and sleep
    pub health_score: Option<f64>,
}

impl DashboardSummary {
    pub fn from_profile(profile: &UserProfile, today: NaiveDate) -> Self {
        let health_score = match (profile.health.stress_level, profile.health.sleep_hours) {
            (Some(stress), Some(sleep)) => {
                Some((10.0 - f64::from(stress) + (sleep - 5.0)).clamp(0.0, 10.0))
            }
            _ => None,
        };

        Self {
            stress_level: profile.health.stress_level,
            days_until_exam: profile.study.days_until_exam(today),
            monthly_savings: profile.finance.monthly_savings(),
            health_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyDay {
    pub date: NaiveDate,
    pub hours: f64,
}

const DEFAULT_PLAN_DAYS: i64 = 7;
const HIGH_STRESS_LEVEL: u8 = 7;
const FINAL_REVIEW_HOURS: f64 = 2.0;
const TAPER_FACTOR: f64 = 0.7;

/// Daily study hours leading up to an exam.
///
/// High stress (above 7) cuts the daily load by two hours, never below one.
/// The last three days taper to 70% and the final day is a two-hour review.
/// A missing or past exam produces a one-week plan, and no plan runs past
/// `MAX_EXAM_HORIZON_DAYS`.
pub fn study_schedule(
    today: NaiveDate,
    days_until_exam: i64,
    hours_per_day: f64,
    stress_level: Option<u8>,
) -> Vec<StudyDay> {
    let days = if days_until_exam <= 0 {
        DEFAULT_PLAN_DAYS
    } else {
        days_until_exam.min(MAX_EXAM_HORIZON_DAYS)
    };

    let hours = match stress_level {
        Some(stress) if stress > HIGH_STRESS_LEVEL => (hours_per_day - 2.0).max(1.0),
        _ => hours_per_day,
    };

    (0..days)
        .map(|i| {
            let planned = if i < days - 3 {
                hours
            } else if i == days - 1 {
                FINAL_REVIEW_HOURS
            } else {
                hours * TAPER_FACTOR
            };
            StudyDay {
                date: today + Duration::days(i),
                hours: planned,
            }
        })
        .collect()
}

/// Convenience wrapper that reads the inputs from the profile.
pub fn study_schedule_for(profile: &UserProfile, today: NaiveDate) -> Option<Vec<StudyDay>> {
    let hours = profile.study.current_study_hours?;
    let days = profile.study.days_until_exam(today).unwrap_or(0);
    Some(study_schedule(today, days, hours, profile.health.stress_level))
}
