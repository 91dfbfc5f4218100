/// Format a float as Brazilian currency: R$ 1.234,56 (dot thousands
/// separator, comma decimals).
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-R$ {grouped},{dec_part}")
    } else {
        format!("R$ {grouped},{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "R$ 1.234,56");
        assert_eq!(money(-500.00), "-R$ 500,00");
        assert_eq!(money(0.0), "R$ 0,00");
        assert_eq!(money(1000000.99), "R$ 1.000.000,99");
        assert_eq!(money(42.10), "R$ 42,10");
    }
}
