//! Brazilian real amounts, always carried as integer cents.

/// Format cents as `R$ 1.234,56`.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (i, ch) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("R$ {sign}{grouped},{fraction:02}")
}

/// Convert a cents amount to the decimal number the payment provider expects.
pub fn cents_to_decimal(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parse a free-form price label (`"R$ 1.234,56"`, `"19,90"`, `"10"`) into cents.
///
/// Everything except digits, `,` and `.` is dropped. `.` is a thousands
/// separator and `,` the decimal separator. Rounds half up to the cent.
/// Input with no digits yields 0.
pub fn parse_price_to_cents(text: &str) -> i64 {
    let normalized: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let mut parts = normalized.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    let reais = whole.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);

    reais
        .saturating_mul(100)
        .saturating_add(tenths * 10 + hundredths)
        .saturating_add(i64::from(round_up))
}
