use std::{cmp::Ordering, fmt, sync::Arc};

use arrow::{
    array::{
        new_null_array, Array, ArrayRef, AsArray, BinaryArray, BooleanArray, Float64Array,
        Int64Array, StringArray, UInt64Array,
    },
    datatypes::{
        i256, DataType, Date32Type, Date64Type, Decimal128Type, Decimal256Type,
        DurationMicrosecondType, DurationMillisecondType, DurationNanosecondType,
        DurationSecondType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
        Time32MillisecondType, Time32SecondType, Time64MicrosecondType, Time64NanosecondType,
        TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
        TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
};

/// Literal values accepted by comparison conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Represents Arrow `NULL`.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Binary blob.
    Binary(Vec<u8>),
}

impl ScalarValue {
    /// Returns true when the literal is the `Null` variant.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Returns a borrowed view over this scalar value.
    #[must_use]
    pub fn as_ref(&self) -> ScalarValueRef<'_> {
        match self {
            ScalarValue::Null => ScalarValueRef::Null,
            ScalarValue::Boolean(value) => ScalarValueRef::Boolean(*value),
            ScalarValue::Int64(value) => ScalarValueRef::Int64(*value),
            ScalarValue::UInt64(value) => ScalarValueRef::UInt64(*value),
            ScalarValue::Float64(value) => ScalarValueRef::Float64(*value),
            ScalarValue::Utf8(value) => ScalarValueRef::Utf8(value.as_str()),
            ScalarValue::Binary(value) => ScalarValueRef::Binary(value.as_slice()),
        }
    }

    /// Arrow type of the single-element array produced by [`ScalarValue::to_array`].
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Null => DataType::Null,
            ScalarValue::Boolean(_) => DataType::Boolean,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::UInt64(_) => DataType::UInt64,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::Utf8(_) => DataType::Utf8,
            ScalarValue::Binary(_) => DataType::Binary,
        }
    }

    /// Materializes the literal as a one-row Arrow array.
    #[must_use]
    pub fn to_array(&self) -> ArrayRef {
        match self {
            ScalarValue::Null => new_null_array(&DataType::Null, 1),
            ScalarValue::Boolean(value) => Arc::new(BooleanArray::from(vec![*value])),
            ScalarValue::Int64(value) => Arc::new(Int64Array::from(vec![*value])),
            ScalarValue::UInt64(value) => Arc::new(UInt64Array::from(vec![*value])),
            ScalarValue::Float64(value) => Arc::new(Float64Array::from(vec![*value])),
            ScalarValue::Utf8(value) => Arc::new(StringArray::from(vec![value.as_str()])),
            ScalarValue::Binary(value) => Arc::new(BinaryArray::from_vec(vec![value.as_slice()])),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

/// Borrowed view over a scalar value, also used for row values read out of chunks.
///
/// Temporal values keep their raw Arrow encoding: days or milliseconds since the
/// epoch for dates, and a count of `unit` for times, timestamps and durations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValueRef<'a> {
    /// Represents Arrow `NULL`.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Signed integer, widened to 64 bits.
    Int64(i64),
    /// Unsigned integer, widened to 64 bits.
    UInt64(u64),
    /// Floating point, widened to 64 bits.
    Float64(f64),
    /// UTF-8 string slice.
    Utf8(&'a str),
    /// Binary slice.
    Binary(&'a [u8]),
    /// Days since the epoch.
    Date32(i32),
    /// Milliseconds since the epoch.
    Date64(i64),
    /// Time of day, widened to 64 bits.
    Time {
        /// Count of `unit` since midnight.
        value: i64,
        /// Resolution of `value`.
        unit: TimeUnit,
    },
    /// Instant since the epoch; the column's time zone is not carried.
    Timestamp {
        /// Count of `unit` since the epoch.
        value: i64,
        /// Resolution of `value`.
        unit: TimeUnit,
    },
    /// Elapsed time.
    Duration {
        /// Count of `unit`.
        value: i64,
        /// Resolution of `value`.
        unit: TimeUnit,
    },
    /// 128-bit decimal, `value * 10^-scale`.
    Decimal128 {
        /// Unscaled value.
        value: i128,
        /// Digits after the decimal point.
        scale: i8,
    },
    /// 256-bit decimal, `value * 10^-scale`.
    Decimal256 {
        /// Unscaled value.
        value: i256,
        /// Digits after the decimal point.
        scale: i8,
    },
}

impl<'a> ScalarValueRef<'a> {
    /// Reads the value stored at `index` of `array`.
    ///
    /// Dictionary arrays are read through their keys. Returns `None` when the
    /// array's data type has no scalar view.
    #[must_use]
    pub fn try_from_array(array: &'a dyn Array, index: usize) -> Option<Self> {
        if array.is_null(index) {
            return supports_data_type(array.data_type()).then_some(ScalarValueRef::Null);
        }
        let value = match array.data_type() {
            DataType::Null => ScalarValueRef::Null,
            DataType::Boolean => ScalarValueRef::Boolean(array.as_boolean().value(index)),
            DataType::Int8 => {
                ScalarValueRef::Int64(array.as_primitive::<Int8Type>().value(index).into())
            }
            DataType::Int16 => {
                ScalarValueRef::Int64(array.as_primitive::<Int16Type>().value(index).into())
            }
            DataType::Int32 => {
                ScalarValueRef::Int64(array.as_primitive::<Int32Type>().value(index).into())
            }
            DataType::Int64 => {
                ScalarValueRef::Int64(array.as_primitive::<Int64Type>().value(index))
            }
            DataType::UInt8 => {
                ScalarValueRef::UInt64(array.as_primitive::<UInt8Type>().value(index).into())
            }
            DataType::UInt16 => {
                ScalarValueRef::UInt64(array.as_primitive::<UInt16Type>().value(index).into())
            }
            DataType::UInt32 => {
                ScalarValueRef::UInt64(array.as_primitive::<UInt32Type>().value(index).into())
            }
            DataType::UInt64 => {
                ScalarValueRef::UInt64(array.as_primitive::<UInt64Type>().value(index))
            }
            DataType::Float32 => {
                ScalarValueRef::Float64(array.as_primitive::<Float32Type>().value(index).into())
            }
            DataType::Float64 => {
                ScalarValueRef::Float64(array.as_primitive::<Float64Type>().value(index))
            }
            DataType::Utf8 => ScalarValueRef::Utf8(array.as_string::<i32>().value(index)),
            DataType::LargeUtf8 => ScalarValueRef::Utf8(array.as_string::<i64>().value(index)),
            DataType::Utf8View => ScalarValueRef::Utf8(array.as_string_view().value(index)),
            DataType::Binary => ScalarValueRef::Binary(array.as_binary::<i32>().value(index)),
            DataType::LargeBinary => ScalarValueRef::Binary(array.as_binary::<i64>().value(index)),
            DataType::BinaryView => ScalarValueRef::Binary(array.as_binary_view().value(index)),
            DataType::Date32 => {
                ScalarValueRef::Date32(array.as_primitive::<Date32Type>().value(index))
            }
            DataType::Date64 => {
                ScalarValueRef::Date64(array.as_primitive::<Date64Type>().value(index))
            }
            DataType::Time32(unit) => {
                let value = match unit {
                    TimeUnit::Second => array.as_primitive::<Time32SecondType>().value(index),
                    TimeUnit::Millisecond => {
                        array.as_primitive::<Time32MillisecondType>().value(index)
                    }
                    _ => return None,
                };
                ScalarValueRef::Time {
                    value: value.into(),
                    unit: *unit,
                }
            }
            DataType::Time64(unit) => {
                let value = match unit {
                    TimeUnit::Microsecond => {
                        array.as_primitive::<Time64MicrosecondType>().value(index)
                    }
                    TimeUnit::Nanosecond => {
                        array.as_primitive::<Time64NanosecondType>().value(index)
                    }
                    _ => return None,
                };
                ScalarValueRef::Time { value, unit: *unit }
            }
            DataType::Timestamp(unit, _) => {
                let value = match unit {
                    TimeUnit::Second => array.as_primitive::<TimestampSecondType>().value(index),
                    TimeUnit::Millisecond => {
                        array.as_primitive::<TimestampMillisecondType>().value(index)
                    }
                    TimeUnit::Microsecond => {
                        array.as_primitive::<TimestampMicrosecondType>().value(index)
                    }
                    TimeUnit::Nanosecond => {
                        array.as_primitive::<TimestampNanosecondType>().value(index)
                    }
                };
                ScalarValueRef::Timestamp { value, unit: *unit }
            }
            DataType::Duration(unit) => {
                let value = match unit {
                    TimeUnit::Second => array.as_primitive::<DurationSecondType>().value(index),
                    TimeUnit::Millisecond => {
                        array.as_primitive::<DurationMillisecondType>().value(index)
                    }
                    TimeUnit::Microsecond => {
                        array.as_primitive::<DurationMicrosecondType>().value(index)
                    }
                    TimeUnit::Nanosecond => {
                        array.as_primitive::<DurationNanosecondType>().value(index)
                    }
                };
                ScalarValueRef::Duration { value, unit: *unit }
            }
            DataType::Decimal128(_, scale) => ScalarValueRef::Decimal128 {
                value: array.as_primitive::<Decimal128Type>().value(index),
                scale: *scale,
            },
            DataType::Decimal256(_, scale) => ScalarValueRef::Decimal256 {
                value: array.as_primitive::<Decimal256Type>().value(index),
                scale: *scale,
            },
            DataType::Dictionary(_, _) => {
                let dictionary = array.as_any_dictionary_opt()?;
                let key = ScalarValueRef::try_from_array(dictionary.keys(), index)?.as_u64()?;
                let key = usize::try_from(key).ok()?;
                return ScalarValueRef::try_from_array(dictionary.values().as_ref(), key);
            }
            _ => return None,
        };
        Some(value)
    }

    /// Returns true when the value is the `Null` variant.
    #[must_use]
    pub fn is_null(self) -> bool {
        matches!(self, ScalarValueRef::Null)
    }

    /// Compares this value with another, returning the ordering when both sides are comparable.
    ///
    /// Integers of different signedness and integer/float pairs compare numerically.
    /// Temporal and decimal values compare only with the same unit or scale.
    pub fn compare(self, other: ScalarValueRef<'_>) -> Option<Ordering> {
        use ScalarValueRef::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Boolean(lhs), Boolean(rhs)) => Some(lhs.cmp(&rhs)),
            (Int64(lhs), Int64(rhs)) => Some(lhs.cmp(&rhs)),
            (UInt64(lhs), UInt64(rhs)) => Some(lhs.cmp(&rhs)),
            (Int64(lhs), UInt64(rhs)) => Some(i128::from(lhs).cmp(&i128::from(rhs))),
            (UInt64(lhs), Int64(rhs)) => Some(i128::from(lhs).cmp(&i128::from(rhs))),
            (Float64(lhs), Float64(rhs)) => lhs.partial_cmp(&rhs),
            (Float64(lhs), Int64(rhs)) => lhs.partial_cmp(&(rhs as f64)),
            (Float64(lhs), UInt64(rhs)) => lhs.partial_cmp(&(rhs as f64)),
            (Int64(lhs), Float64(rhs)) => (lhs as f64).partial_cmp(&rhs),
            (UInt64(lhs), Float64(rhs)) => (lhs as f64).partial_cmp(&rhs),
            (Utf8(lhs), Utf8(rhs)) => Some(lhs.cmp(rhs)),
            (Binary(lhs), Binary(rhs)) => Some(lhs.cmp(rhs)),
            (Date32(lhs), Date32(rhs)) => Some(lhs.cmp(&rhs)),
            (Date64(lhs), Date64(rhs)) => Some(lhs.cmp(&rhs)),
            (Time { value: lhs, unit: lu }, Time { value: rhs, unit: ru })
            | (Timestamp { value: lhs, unit: lu }, Timestamp { value: rhs, unit: ru })
            | (Duration { value: lhs, unit: lu }, Duration { value: rhs, unit: ru })
                if lu == ru =>
            {
                Some(lhs.cmp(&rhs))
            }
            (Decimal128 { value: lhs, scale: ls }, Decimal128 { value: rhs, scale: rs })
                if ls == rs =>
            {
                Some(lhs.cmp(&rhs))
            }
            (Decimal256 { value: lhs, scale: ls }, Decimal256 { value: rhs, scale: rs })
                if ls == rs =>
            {
                Some(lhs.cmp(&rhs))
            }
            _ => None,
        }
    }

    /// Extract as `bool` when possible.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            ScalarValueRef::Boolean(value) => Some(value),
            _ => None,
        }
    }

    /// Extract as `i64`, converting unsigned values that fit.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            ScalarValueRef::Int64(value) => Some(value),
            ScalarValueRef::UInt64(value) => i64::try_from(value).ok(),
            _ => None,
        }
    }

    /// Extract as `u64`, converting non-negative signed values.
    #[must_use]
    pub fn as_u64(self) -> Option<u64> {
        match self {
            ScalarValueRef::UInt64(value) => Some(value),
            ScalarValueRef::Int64(value) => u64::try_from(value).ok(),
            _ => None,
        }
    }

    /// Extract as `f64`, widening integers and scaling decimals.
    #[must_use]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ScalarValueRef::Float64(value) => Some(value),
            ScalarValueRef::Int64(value) => Some(value as f64),
            ScalarValueRef::UInt64(value) => Some(value as f64),
            ScalarValueRef::Decimal128 { value, scale } => {
                Some(value as f64 / 10f64.powi(i32::from(scale)))
            }
            ScalarValueRef::Decimal256 { .. } => self.to_string().parse().ok(),
            _ => None,
        }
    }

    /// Extract as UTF-8 string slice.
    #[must_use]
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            ScalarValueRef::Utf8(value) => Some(value),
            _ => None,
        }
    }

    /// Extract as binary slice.
    #[must_use]
    pub fn as_bytes(self) -> Option<&'a [u8]> {
        match self {
            ScalarValueRef::Binary(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValueRef::Null => f.write_str("NULL"),
            ScalarValueRef::Boolean(value) => write!(f, "{value}"),
            ScalarValueRef::Int64(value) => write!(f, "{value}"),
            ScalarValueRef::UInt64(value) => write!(f, "{value}"),
            ScalarValueRef::Float64(value) => write!(f, "{value}"),
            ScalarValueRef::Utf8(value) => write!(f, "'{value}'"),
            ScalarValueRef::Binary(value) => {
                f.write_str("0x")?;
                for byte in *value {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            ScalarValueRef::Date32(days) => write!(f, "date32({days})"),
            ScalarValueRef::Date64(millis) => write!(f, "date64({millis})"),
            ScalarValueRef::Time { value, unit } => write!(f, "time({value} {unit:?})"),
            ScalarValueRef::Timestamp { value, unit } => {
                write!(f, "timestamp({value} {unit:?})")
            }
            ScalarValueRef::Duration { value, unit } => write!(f, "duration({value} {unit:?})"),
            ScalarValueRef::Decimal128 { value, scale } => {
                write_decimal(f, &value.to_string(), *scale)
            }
            ScalarValueRef::Decimal256 { value, scale } => {
                write_decimal(f, &value.to_string(), *scale)
            }
        }
    }
}

/// Writes an unscaled decimal with the point placed `scale` digits from the right.
fn write_decimal(f: &mut fmt::Formatter<'_>, unscaled: &str, scale: i8) -> fmt::Result {
    let (sign, digits) = match unscaled.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", unscaled),
    };
    if scale <= 0 {
        let zeros = usize::from(scale.unsigned_abs());
        return write!(f, "{sign}{digits}{:0<zeros$}", "");
    }
    let scale = usize::from(scale.unsigned_abs());
    let digits = format!("{digits:0>width$}", width = scale + 1);
    let (whole, fraction) = digits.split_at(digits.len() - scale);
    write!(f, "{sign}{whole}.{fraction}")
}

/// Returns true when [`ScalarValueRef::try_from_array`] can read values of `data_type`.
#[must_use]
pub(crate) fn supports_data_type(data_type: &DataType) -> bool {
    match data_type {
        DataType::Null
        | DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64
        | DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View
        | DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(_, _)
        | DataType::Duration(_)
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => true,
        DataType::Time32(unit) => matches!(unit, TimeUnit::Second | TimeUnit::Millisecond),
        DataType::Time64(unit) => matches!(unit, TimeUnit::Microsecond | TimeUnit::Nanosecond),
        DataType::Dictionary(key, value) => key.is_integer() && supports_data_type(value),
        _ => false,
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ScalarValue {
                fn from(value: $ty) -> Self {
                    ScalarValue::$variant(value.into())
                }
            }
        )*
    };
}

scalar_from!(
    bool => Boolean,
    i8 => Int64,
    i16 => Int64,
    i32 => Int64,
    i64 => Int64,
    u8 => UInt64,
    u16 => UInt64,
    u32 => UInt64,
    u64 => UInt64,
    f32 => Float64,
    f64 => Float64,
    String => Utf8,
    &str => Utf8,
    Vec<u8> => Binary,
    &[u8] => Binary,
);

impl<T> From<Option<T>> for ScalarValue
where
    T: Into<ScalarValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(ScalarValue::Null, Into::into)
    }
}
