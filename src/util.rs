pub fn format_lines(lines: f64) -> String {
    let whole = if lines.is_finite() { lines.round().max(0.0) as u64 } else { 0 };
    let digits = whole.to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_share(fraction: Option<f64>) -> String {
    match fraction.filter(|fraction| fraction.is_finite()) {
        Some(fraction) => format!("{:.1}%", fraction * 100.0),
        None => "not available".to_owned(),
    }
}
