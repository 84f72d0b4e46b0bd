//! Literal to scalar conversions

use crate::destination::{Dest, Scalar, Unmarshal};
use crate::error::{BoxError, ConversionError};

/// Parse a boolean literal
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(literal: &str) -> Option<bool> {
    match literal {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn conversion_error(literal: &str, target: &'static str) -> BoxError {
    Box::new(ConversionError {
        literal: literal.to_string(),
        target,
    })
}

impl Scalar for String {
    fn set_literal(&mut self, literal: &str) -> Result<(), BoxError> {
        self.clear();
        self.push_str(literal);
        Ok(())
    }
}

impl Scalar for bool {
    fn set_literal(&mut self, literal: &str) -> Result<(), BoxError> {
        *self = parse_bool(literal).ok_or_else(|| conversion_error(literal, "bool"))?;
        Ok(())
    }
}

impl Scalar for char {
    fn set_literal(&mut self, literal: &str) -> Result<(), BoxError> {
        let mut chars = literal.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                *self = c;
                Ok(())
            }
            _ => Err(conversion_error(literal, "char")),
        }
    }
}

/// Generic slot, always receives the literal as a JSON string
impl Scalar for serde_json::Value {
    fn set_literal(&mut self, literal: &str) -> Result<(), BoxError> {
        *self = serde_json::Value::String(literal.to_string());
        Ok(())
    }
}

macro_rules! parsed_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn set_literal(&mut self, literal: &str) -> Result<(), BoxError> {
                    *self = literal.parse::<$ty>()?;
                    Ok(())
                }
            }
        )*
    };
}

parsed_scalar!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

macro_rules! scalar_destination {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'doc> Unmarshal<'doc> for $ty {
                fn destination(&mut self) -> Dest<'_, 'doc> {
                    Dest::Scalar(self)
                }
            }
        )*
    };
}

scalar_destination!(
    String,
    bool,
    char,
    serde_json::Value,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);
