//! Rendering of evaluated values as C source text

use crate::trace::ctype::{classify, TypeClass};
use crate::trace::step::DataValue;

/// Format a value the way it is substituted into source
///
/// Integers print in decimal (a floating payload is truncated). `float`
/// values carry an `f` suffix and two decimals when whole; `double` values
/// print `N.0` when whole. Printable chars are quoted, pointers print in
/// hex. Unrecognized types fall back to the value's own `Display`.
pub fn format_value(data_type: &str, value: &DataValue) -> String {
    match (classify(data_type), value) {
        (_, DataValue::Text(text)) => text.clone(),
        (TypeClass::Integer { .. } | TypeClass::Bool, value) => {
            value.as_i64().map_or_else(|| value.to_string(), |n| n.to_string())
        }
        (TypeClass::Float, value) => match value.as_f64() {
            Some(x) if x.fract() == 0.0 && x.is_finite() => format!("{:.2}f", x),
            Some(x) => format!("{}f", x as f32),
            None => value.to_string(),
        },
        (TypeClass::Double, value) => match value.as_f64() {
            Some(x) if x.fract() == 0.0 && x.is_finite() => format!("{:.1}", x),
            Some(x) => x.to_string(),
            None => value.to_string(),
        },
        (TypeClass::Char { .. }, value) => match value.as_i64() {
            Some(code @ 0x20..=0x7e) => format_char(code as u8 as char),
            Some(code) => code.to_string(),
            None => value.to_string(),
        },
        (TypeClass::Pointer, DataValue::Pointer { address, .. }) => format!("0x{:08x}", address),
        (TypeClass::Pointer, DataValue::Int(address)) => format!("0x{:08x}", address),
        _ => value.to_string(),
    }
}

fn format_char(c: char) -> String {
    match c {
        '\'' => "'\\''".to_string(),
        '\\' => "'\\\\'".to_string(),
        _ => format!("'{}'", c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_formats_as_decimal() {
        assert_eq!(format_value("int", &DataValue::Float(1234.0)), "1234");
        assert_eq!(format_value("int", &DataValue::Int(-7)), "-7");
        assert_eq!(format_value("long", &DataValue::Float(2.9)), "2");
    }

    #[test]
    fn test_float_has_suffix() {
        assert_eq!(format_value("float", &DataValue::Float(2345.0)), "2345.00f");
        assert_eq!(format_value("float", &DataValue::Float(0.5)), "0.5f");
        assert_eq!(format_value("float", &DataValue::Int(3)), "3.00f");
    }

    #[test]
    fn test_double_formatting() {
        assert_eq!(format_value("double", &DataValue::Float(4.0)), "4.0");
        assert_eq!(format_value("double", &DataValue::Float(0.25)), "0.25");
    }

    #[test]
    fn test_char_formatting() {
        assert_eq!(format_value("char", &DataValue::Int(65)), "'A'");
        assert_eq!(format_value("char", &DataValue::Int(39)), "'\\''");
        assert_eq!(format_value("char", &DataValue::Int(10)), "10");
    }

    #[test]
    fn test_pointer_formatting() {
        let pointer = DataValue::Pointer {
            address: 0x1000,
            bytes: vec![],
        };
        assert_eq!(format_value("int *", &pointer), "0x00001000");
    }

    #[test]
    fn test_unknown_type_uses_display() {
        assert_eq!(format_value("struct point", &DataValue::Int(3)), "3");
        assert_eq!(format_value("struct point", &DataValue::Text("{1, 2}".into())), "{1, 2}");
    }
}
