use crate::app::collectors::profile::StudyProfile;
use crate::domain::model::{Domain, DomainSignal};
use chrono::NaiveDate;

/// Exams further away than this add no pressure.
const EXAM_HORIZON_DAYS: f64 = 30.0;
const MAX_STUDY_HOURS: f64 = 10.0;

pub fn collect(profile: &StudyProfile, today: NaiveDate) -> Vec<DomainSignal> {
    let mut signals = Vec::new();

    match profile.days_until_exam(today) {
        Some(days) if days < 0 => {
            tracing::warn!("⚠️ Exam date is {} days in the past, skipping exam pressure", -days);
        }
        Some(days) => {
            let severity = (1.0 - days as f64 / EXAM_HORIZON_DAYS).clamp(0.0, 1.0);
            signals.push(DomainSignal::new(Domain::Study, "exam_pressure", days as f64, severity));
        }
        None => {}
    }

    if let Some(hours) = profile.current_study_hours {
        let severity = (hours / MAX_STUDY_HOURS).clamp(0.0, 1.0);
        signals.push(DomainSignal::new(Domain::Study, "load", hours, severity));
    }

    signals
}
