use crate::utils::error::{LifeOpsError, Result};
use crate::utils::validation::{validate_range, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exams further out than this are rejected; study plans never exceed it.
pub const MAX_EXAM_HORIZON_DAYS: i64 = 365;
/// Upper bound for daily sleep and study hours.
pub const MAX_DAILY_HOURS: f64 = 12.0;

/// Form-style inputs describing the user's current situation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub health: HealthProfile,
    #[serde(default)]
    pub finance: FinanceProfile,
    #[serde(default)]
    pub study: StudyProfile,
    pub problem: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    /// 1 = very relaxed, 10 = extremely stressed
    pub stress_level: Option<u8>,
    pub sleep_hours: Option<f64>,
    /// `Rarely`, `1-2 times/week`, `3-4 times/week` or `Daily`
    pub exercise_frequency: Option<String>,
    pub diet_quality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceProfile {
    pub monthly_budget: Option<f64>,
    pub current_expenses: Option<f64>,
    pub financial_goals: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyProfile {
    pub exam_date: Option<NaiveDate>,
    /// Used when `exam_date` is absent.
    pub days_until_exam: Option<i64>,
    pub current_study_hours: Option<f64>,
    pub subjects: Option<String>,
}

impl StudyProfile {
    pub fn days_until_exam(&self, today: NaiveDate) -> Option<i64> {
        self.exam_date
            .map(|date| (date - today).num_days())
            .or(self.days_until_exam)
    }
}

impl FinanceProfile {
    /// 每月結餘，最低為 0
    pub fn monthly_savings(&self) -> Option<f64> {
        let budget = self.monthly_budget?;
        let expenses = self.current_expenses.unwrap_or(0.0);
        Some((budget - expenses).max(0.0))
    }
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.health == HealthProfile::default()
            && self.finance == FinanceProfile::default()
            && self.study == StudyProfile::default()
    }
}

impl UserProfile {
    /// Range checks; exam dates are measured from `today`.
    pub fn validate_as_of(&self, today: NaiveDate) -> Result<()> {
        if let Some(stress) = self.health.stress_level {
            validate_range("profile.health.stress_level", stress, 1, 10)?;
        }
        if let Some(sleep) = self.health.sleep_hours {
            validate_range("profile.health.sleep_hours", sleep, 0.0, MAX_DAILY_HOURS)?;
        }
        if let Some(budget) = self.finance.monthly_budget {
            validate_range("profile.finance.monthly_budget", budget, 0.0, f64::MAX)?;
        }
        if let Some(expenses) = self.finance.current_expenses {
            validate_range("profile.finance.current_expenses", expenses, 0.0, f64::MAX)?;
        }
        if let Some(days) = self.study.days_until_exam {
            validate_range("profile.study.days_until_exam", days, 0, MAX_EXAM_HORIZON_DAYS)?;
        }
        if let Some(date) = self.study.exam_date {
            // 已過的考試日期允許，收集時會略過
            let days = (date - today).num_days();
            if days > MAX_EXAM_HORIZON_DAYS {
                return Err(LifeOpsError::InvalidConfigValueError {
                    field: "profile.study.exam_date".to_string(),
                    value: date.to_string(),
                    reason: format!(
                        "Exam must be at most {} days after {}",
                        MAX_EXAM_HORIZON_DAYS, today
                    ),
                });
            }
        }
        if let Some(hours) = self.study.current_study_hours {
            validate_range("profile.study.current_study_hours", hours, 0.0, MAX_DAILY_HOURS)?;
        }
        Ok(())
    }
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<()> {
        self.validate_as_of(chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_until_exam_prefers_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let study = StudyProfile {
            exam_date: NaiveDate::from_ymd_opt(2026, 11, 18),
            days_until_exam: Some(3),
            ..Default::default()
        };
        assert_eq!(study.days_until_exam(today), Some(30));

        let study = StudyProfile {
            days_until_exam: Some(3),
            ..Default::default()
        };
        assert_eq!(study.days_until_exam(today), Some(3));
    }

    #[test]
    fn test_monthly_savings_never_negative() {
        let finance = FinanceProfile {
            monthly_budget: Some(1000.0),
            current_expenses: Some(1500.0),
            financial_goals: None,
        };
        assert_eq!(finance.monthly_savings(), Some(0.0));
    }

    #[test]
    fn test_profile_validation() {
        let mut profile = UserProfile::default();
        assert!(profile.is_empty());
        assert!(profile.validate().is_ok());

        profile.health.stress_level = Some(11);
        assert!(profile.validate().is_err());

        profile.health.stress_level = Some(8);
        profile.finance.current_expenses = Some(-5.0);
        assert!(profile.validate().is_err());

        profile.finance.current_expenses = Some(500.0);
        profile.health.sleep_hours = Some(12.0);
        profile.study.current_study_hours = Some(12.0);
        assert!(profile.validate().is_ok());

        profile.health.sleep_hours = Some(12.5);
        assert!(profile.validate().is_err());

        profile.health.sleep_hours = Some(7.0);
        profile.study.current_study_hours = Some(12.5);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_exam_horizon_is_bounded() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut profile = UserProfile::default();

        profile.study.days_until_exam = Some(365);
        assert!(profile.validate_as_of(today).is_ok());

        profile.study.days_until_exam = Some(100_000_000_000);
        assert!(profile.validate_as_of(today).is_err());

        profile.study.days_until_exam = Some(-1);
        assert!(profile.validate_as_of(today).is_err());

        profile.study.days_until_exam = None;
        profile.study.exam_date = NaiveDate::from_ymd_opt(2027, 10, 19);
        assert!(profile.validate_as_of(today).is_ok());

        profile.study.exam_date = NaiveDate::from_ymd_opt(2027, 10, 20);
        let err = profile.validate_as_of(today).unwrap_err();
        assert!(err.to_string().contains("profile.study.exam_date"));

        // 過去的考試日期不算錯誤
        profile.study.exam_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        assert!(profile.validate_as_of(today).is_ok());
    }
}
