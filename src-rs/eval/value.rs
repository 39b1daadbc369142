use std::fmt;

/// A numeric value with Python-style int/float semantics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    pub fn neg(self) -> Result<Number, String> {
        match self {
            Number::Int(value) => Ok(value
                .checked_neg()
                .map(Number::Int)
                .unwrap_or(Number::Float(-(value as f64)))),
            Number::Float(value) => Ok(Number::Float(-value)),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, String> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(int_or_float(a.checked_add(b), a as f64 + b as f64)),
            (a, b) => finite(a.as_f64() + b.as_f64()),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, String> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(int_or_float(a.checked_sub(b), a as f64 - b as f64)),
            (a, b) => finite(a.as_f64() - b.as_f64()),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, String> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(int_or_float(a.checked_mul(b), a as f64 * b as f64)),
            (a, b) => finite(a.as_f64() * b.as_f64()),
        }
    }

    /// True division, always yields a float.
    pub fn div(self, rhs: Number) -> Result<Number, String> {
        if rhs.as_f64() == 0.0 {
            return Err("division by zero".to_string());
        }
        finite(self.as_f64() / rhs.as_f64())
    }

    pub fn floor_div(self, rhs: Number) -> Result<Number, String> {
        match (self, rhs) {
            (_, Number::Int(0)) => Err("integer division or modulo by zero".to_string()),
            (Number::Int(a), Number::Int(b)) => {
                let Some(quotient) = a.checked_div(b) else {
                    return finite((a as f64 / b as f64).floor());
                };
                if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
                    Ok(Number::Int(quotient - 1))
                } else {
                    Ok(Number::Int(quotient))
                }
            }
            (a, b) => {
                if b.as_f64() == 0.0 {
                    return Err("float floor division by zero".to_string());
                }
                finite((a.as_f64() / b.as_f64()).floor())
            }
        }
    }

    pub fn rem(self, rhs: Number) -> Result<Number, String> {
        match (self, rhs) {
            (_, Number::Int(0)) => Err("integer division or modulo by zero".to_string()),
            (Number::Int(a), Number::Int(b)) => {
                let remainder = a.wrapping_rem(b);
                if remainder != 0 && ((remainder < 0) != (b < 0)) {
                    Ok(Number::Int(remainder + b))
                } else {
                    Ok(Number::Int(remainder))
                }
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                if b == 0.0 {
                    return Err("float modulo".to_string());
                }
                let remainder = a % b;
                if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
                    finite(remainder + b)
                } else {
                    finite(remainder)
                }
            }
        }
    }

    pub fn pow(self, rhs: Number) -> Result<Number, String> {
        match (self, rhs) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
                let checked = u32::try_from(exp).ok().and_then(|exp| base.checked_pow(exp));
                match checked {
                    Some(value) => Ok(Number::Int(value)),
                    None => finite((base as f64).powf(exp as f64)),
                }
            }
            (a, b) => {
                let (base, exp) = (a.as_f64(), b.as_f64());
                if base == 0.0 && exp < 0.0 {
                    return Err("0.0 cannot be raised to a negative power".to_string());
                }
                if base < 0.0 && exp.fract() != 0.0 {
                    return Err("negative number cannot be raised to a fractional power".to_string());
                }
                finite(base.powf(exp))
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(value) => write!(f, "{}", value),
            Number::Float(value) if value.fract() == 0.0 && value.abs() < 1e16 => {
                write!(f, "{:.1}", value)
            }
            Number::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Formats a fully evaluated numeric result, dropping the fraction when the
/// value is integral.
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        let rendered = format!("{:.0}", value);
        if rendered == "-0" {
            return "0".to_string();
        }
        rendered
    } else {
        format!("{}", value)
    }
}

fn int_or_float(checked: Option<i64>, fallback: f64) -> Number {
    checked.map(Number::Int).unwrap_or(Number::Float(fallback))
}

fn finite(value: f64) -> Result<Number, String> {
    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err("numerical result out of range".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        assert_eq!(Number::Int(7).floor_div(Number::Int(2)).unwrap(), Number::Int(3));
        assert_eq!(Number::Int(-7).floor_div(Number::Int(2)).unwrap(), Number::Int(-4));
        assert_eq!(Number::Int(-7).rem(Number::Int(3)).unwrap(), Number::Int(2));
    }

    #[test]
    fn overflowing_floor_division_falls_back_to_float() {
        let quotient = Number::Int(i64::MIN).floor_div(Number::Int(-1)).unwrap();
        assert_eq!(quotient, Number::Float(9_223_372_036_854_775_808.0));
        assert_eq!(Number::Int(i64::MIN).rem(Number::Int(-1)).unwrap(), Number::Int(0));
    }

    #[test]
    fn true_division_is_float() {
        assert_eq!(Number::Int(10).div(Number::Int(4)).unwrap(), Number::Float(2.5));
        assert_eq!(Number::Int(8).div(Number::Int(4)).unwrap().to_string(), "2.0");
        assert!(Number::Int(1).div(Number::Int(0)).is_err());
    }

    #[test]
    fn float_formatting_drops_integral_fraction() {
        assert_eq!(format_float(14.0), "14");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-0.0), "0");
    }
}
