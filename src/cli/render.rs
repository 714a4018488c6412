use colored::Colorize;

use crate::forecast::{MonthStatus, MonthlyForecast, ProviderForecast, WorkPlan};

/// Fixed-point currency rendering for table cells.
pub fn amount(value: f64) -> String {
    format!("{value:.2}")
}

fn signed(value: f64) -> String {
    let text = format!("{value:>10.2}");
    if value < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

pub fn monthly_table(result: &MonthlyForecast) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:<8} {:>10} {:>10} {:>9} {:>9} {:>8} {:>8} {:>10} {:>10}",
        "Month", "Received", "Expected", "Fixed", "Var", "Card", "Bills", "Balance", "Carryover"
    ));
    for summary in &result.summaries {
        let marker = if summary.is_current { "*" } else { " " };
        let track = summary.display();
        lines.push(format!(
            "{marker}{:<7} {:>10} {:>10} {:>9} {:>9} {:>8} {:>8} {} {:>10}",
            summary.month.to_string(),
            amount(summary.received_income),
            amount(summary.expected_income),
            amount(summary.fixed_expenses),
            amount(summary.variable_expenses),
            amount(summary.credit_card_expenses),
            amount(summary.bill_expenses),
            signed(track.balance_after_savings),
            amount(track.carryover_out),
        ));
    }
    lines.push(format!(
        "Estimated monthly bills across providers: {}",
        amount(result.total_bill_estimate)
    ));
    lines.join("\n")
}

pub fn provider_table(forecasts: &[ProviderForecast]) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:<12} {:<16} {:>9} {:>7} {:<12} {:>6}",
        "Type", "Provider", "Average", "Cycle", "Last bill", "Next"
    ));
    for forecast in forecasts {
        lines.push(format!(
            "{:<12} {:<16} {:>9} {:>6}m {:<12} {:>6}",
            format!("{:?}", forecast.kind).to_lowercase(),
            forecast.provider,
            amount(forecast.avg_amount),
            forecast.billing_frequency_months,
            forecast.last_bill_date.to_string(),
            forecast.next_bill_dates.len(),
        ));
    }
    lines.join("\n")
}

pub fn work_plan_table(plan: &WorkPlan) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Starting balance {} ({:?})",
        amount(plan.initial_balance),
        plan.initial_balance_source
    ));
    lines.push(format!(
        "{:<8} {:>10} {:>10} {:>6} {:>6} {:>11} {:<8}",
        "Month", "Income", "Expenses", "Days", "Extra", "Balance", "Status"
    ));
    for month in &plan.months {
        let status = match month.status {
            MonthStatus::Deficit => "deficit".red().to_string(),
            MonthStatus::Surplus => "surplus".green().to_string(),
            MonthStatus::Ok => "ok".normal().to_string(),
        };
        lines.push(format!(
            "{:<8} {:>10} {:>10} {:>6} {:>6} {} {:<8}",
            month.month.to_string(),
            amount(month.income),
            amount(month.total_expenses),
            month.required_work_days,
            month.deficit_recovery_days,
            signed(month.cumulative_balance),
            status,
        ));
    }
    let summary = &plan.summary;
    lines.push(format!(
        "Average {:.1} days/month, {} deficit / {} surplus months, final balance {}, buffer {}",
        summary.average_work_days,
        summary.total_deficit_months,
        summary.total_surplus_months,
        amount(summary.final_balance),
        amount(summary.recommended_buffer),
    ));
    if let Some(goal) = &plan.pension_goal {
        lines.push(format!(
            "Pension goal {}: requires {}/month (configured {}, gap {}, +{} days)",
            amount(goal.target_amount),
            amount(goal.required_monthly_contribution),
            amount(goal.configured_contribution),
            amount(goal.monthly_gap),
            goal.extra_work_days_per_month,
        ));
    }
    lines.join("\n")
}
