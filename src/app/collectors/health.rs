use crate::app::collectors::profile::HealthProfile;
use crate::domain::model::{Domain, DomainSignal};

const RECOMMENDED_SLEEP_HOURS: f64 = 8.0;

/// Health signals from the profile: stress, sleep deficit and inactivity.
pub fn collect(profile: &HealthProfile) -> Vec<DomainSignal> {
    let mut signals = Vec::new();

    if let Some(stress) = profile.stress_level {
        let severity = (f64::from(stress) / 10.0).clamp(0.0, 1.0);
        signals.push(DomainSignal::new(Domain::Health, "stress", f64::from(stress), severity));
    }

    if let Some(hours) = profile.sleep_hours {
        // 少睡 4 小時以上即視為最嚴重
        let severity = ((RECOMMENDED_SLEEP_HOURS - hours) / 4.0).clamp(0.0, 1.0);
        signals.push(DomainSignal::new(Domain::Health, "sleep_deficit", hours, severity));
    }

    if let Some(frequency) = profile.exercise_frequency.as_deref() {
        match exercise_sessions(frequency) {
            Some((sessions, severity)) => {
                signals.push(DomainSignal::new(Domain::Health, "inactivity", sessions, severity));
            }
            None => {
                tracing::warn!("⚠️ Unrecognised exercise frequency '{}', skipping", frequency);
            }
        }
    }

    signals
}

/// Maps a frequency label to (sessions per week, inactivity severity).
fn exercise_sessions(label: &str) -> Option<(f64, f64)> {
    match label.trim().to_ascii_lowercase().as_str() {
        "rarely" | "never" => Some((0.0, 0.9)),
        "1-2 times/week" => Some((1.5, 0.6)),
        "3-4 times/week" => Some((3.5, 0.3)),
        "daily" => Some((7.0, 0.0)),
        _ => None,
    }
}
