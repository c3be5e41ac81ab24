/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// assert_eq!(format_number(0), "0");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Amount for spreadsheet cells: 2 decimals, decimal comma, no grouping
///
/// ```
/// use backend::shared::format::format_excel_amount;
/// assert_eq!(format_excel_amount(1234.5), "1234,50");
/// ```
pub fn format_excel_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value).replace('.', ",")
}

/// Quantity for spreadsheet cells: whole numbers without decimals
pub fn format_excel_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string().replace('.', ",")
    }
}
