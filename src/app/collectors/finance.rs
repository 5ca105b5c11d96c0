use crate::app::collectors::profile::FinanceProfile;
use crate::domain::model::{Domain, DomainSignal};

/// Savings rate at or above this level is considered healthy.
const TARGET_SAVINGS_RATE: f64 = 0.2;

pub fn collect(profile: &FinanceProfile) -> Vec<DomainSignal> {
    let mut signals = Vec::new();

    let budget = profile.monthly_budget.unwrap_or(0.0);
    let expenses = profile.current_expenses.unwrap_or(0.0);

    if budget > 0.0 {
        let rate = (budget - expenses) / budget;
        let severity = (1.0 - rate / TARGET_SAVINGS_RATE).clamp(0.0, 1.0);
        signals.push(DomainSignal::new(Domain::Finance, "savings_rate", rate, severity));
    } else if expenses > 0.0 {
        // 沒有預算但有支出
        signals.push(DomainSignal::new(Domain::Finance, "savings_rate", -1.0, 1.0));
    }

    signals
}
