use time::macros::format_description;
use time::Date;

/// INR with Indian digit grouping: `₹1,23,456.50`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0.00".to_string();
    }
    let paise = (amount.abs() * 100.0).round() as u128;
    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!(
        "{sign}₹{}.{:02}",
        group_indian(&(paise / 100).to_string()),
        paise % 100
    )
}

/// Groups the last three digits, then pairs: `1234567` -> `12,34,567`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// en-IN short date: `dd/mm/yyyy`.
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn format_optional_date(date: Option<Date>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// Display-only outstanding balance; a missing fee counts as zero.
pub fn balance(fee_amount: Option<f64>, total_paid: f64) -> f64 {
    fee_amount.unwrap_or(0.0) - total_paid
}
