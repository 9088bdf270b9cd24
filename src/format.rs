//! Display formatting helpers.
//!
//! Every monetary amount in the system is stored as integer cents and passes
//! through [`format_currency`] exactly once on its way to the client. No other
//! module does its own currency formatting.

/// Format an amount in integer cents as en-US USD text, e.g. `123456` ->
/// `"$1,234.56"`. Negative amounts render with a leading minus sign.
pub fn format_currency(cents: i64) -> String {
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let dollars = cents / 100;
    let remainder = cents % 100;

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(dollars), remainder)
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_as_dollars() {
        assert_eq!(format_currency(0), "$0.00");
        assert_eq!(format_currency(5), "$0.05");
        assert_eq!(format_currency(666), "$6.66");
        assert_eq!(format_currency(123456), "$1,234.56");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_currency(100_000_00), "$100,000.00");
        assert_eq!(format_currency(1_234_567_89), "$1,234,567.89");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_currency(-450), "-$4.50");
        assert_eq!(format_currency(-1_000_00), "-$1,000.00");
    }
}
