//! Text formatting for report values

/// Whole kilograms with thousands separators: `1,900 kg`.
pub fn format_kg(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{}{} kg", sign, grouped)
}

/// Fraction as a percentage with one decimal: `0.76` -> `76.0%`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Fraction as a whole percentage: `0.10` -> `10%`.
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kg() {
        assert_eq!(format_kg(0.0), "0 kg");
        assert_eq!(format_kg(950.4), "950 kg");
        assert_eq!(format_kg(1900.0), "1,900 kg");
        assert_eq!(format_kg(1234567.0), "1,234,567 kg");
        assert_eq!(format_kg(-2050.0), "-2,050 kg");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(0.76), "76.0%");
        assert_eq!(format_ratio(1900.0 / 2900.0), "65.5%");
        assert_eq!(format_percent(0.10), "10%");
    }
}
