//! Arithmetic on quantities which may be unavailable.
//!
//! A derived figure is represented as an `Option` of a quantity, where `None` means the figure is
//! unavailable (because an input was missing or invalid). These helpers are the only place where
//! the pipeline does arithmetic on derived figures, which guarantees that no `NaN` or infinite
//! value is ever produced.
use crate::units::UnitType;
use std::ops::{Add, Div, Mul};

/// Keep a value only if it is finite
pub fn finite<T: UnitType>(value: T) -> Option<T> {
    value.is_finite().then_some(value)
}

/// Divide `numerator` by `denominator`.
///
/// The result is unavailable if either input is unavailable or non-finite, or if the denominator
/// is not strictly positive.
pub fn divide<N, D, O>(numerator: Option<N>, denominator: Option<D>) -> Option<O>
where
    N: UnitType + Div<D, Output = O>,
    D: UnitType,
    O: UnitType,
{
    let numerator = numerator.and_then(finite)?;
    let denominator = denominator.and_then(finite)?;
    if denominator.value() <= 0.0 {
        return None;
    }

    finite(numerator / denominator)
}

/// Multiply two values, propagating unavailability
pub fn multiply<L, R, O>(lhs: Option<L>, rhs: Option<R>) -> Option<O>
where
    L: UnitType + Mul<R, Output = O>,
    R: UnitType,
    O: UnitType,
{
    let lhs = lhs.and_then(finite)?;
    let rhs = rhs.and_then(finite)?;
    finite(lhs * rhs)
}

/// Add two values, propagating unavailability.
///
/// There is no substitution of zero for a missing operand: if either is unavailable, so is the sum.
pub fn add<T>(lhs: Option<T>, rhs: Option<T>) -> Option<T>
where
    T: UnitType + Add<Output = T>,
{
    let lhs = lhs.and_then(finite)?;
    let rhs = rhs.and_then(finite)?;
    finite(lhs + rhs)
}

/// Parse a raw text field into a non-negative, finite number.
///
/// Blank, unparsable, negative and non-finite values are all treated as unavailable.
pub fn parse_quantity<T: UnitType>(raw: &str) -> Option<T> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then(|| T::new(value))
}
