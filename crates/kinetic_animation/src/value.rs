//! Value model
//!
//! A property value is split into the numbers it contains and the literal
//! text around them. Interpolation only ever touches the numbers; the text
//! is stitched back in unchanged.
//!
//! ```text
//! "rgb(255,128,0)"  ->  numbers [255, 128, 0]
//!                       strings ["rgb(", ",", ",", ")"]
//! ```

use crate::color::color_to_rgb;
use kinetic_core::PathProgress;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt::{self, Write};
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d*\.?\d+").expect("number pattern compiles"));

static UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\+\-]?[0-9#\.]+)(%|px|pt|em|rem|in|cm|mm|ex|pc|vw|vh|deg|rad|turn)?")
        .expect("unit pattern compiles")
});

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("float pattern compiles")
});

/// Numeric slots of a value; most values carry four or fewer
pub type Numbers = SmallVec<[f64; 4]>;

/// A property value split into interpolable numbers and literal fragments
///
/// `strings` always holds `numbers.len() + 1` fragments, except for values
/// without any number, which decompose to a single constant `0` slot and
/// the whole text as the only fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecomposedValue {
    pub numbers: Numbers,
    pub strings: Vec<String>,
    /// The normalized text the split was taken from
    pub original: String,
}

impl DecomposedValue {
    /// Rebuild the textual form
    pub fn recompose(&self) -> String {
        recompose(&self.numbers, &self.strings)
    }
}

/// A property value as supplied by the caller
#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Distance along a motion path
    Path(PathProgress),
}

impl Value {
    /// Textual form fed to decomposition
    pub fn to_text(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Path(p) => format_number(p.total_length()),
        }
    }

    /// Unit suffix, if any
    pub fn unit(&self) -> Option<String> {
        match self {
            Value::Text(s) => get_unit(s).map(str::to_string),
            Value::Number(_) | Value::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathProgress> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<PathProgress> for Value {
    fn from(p: PathProgress) -> Self {
        Value::Path(p)
    }
}

/// Unit of the first number in `value` (`"10px"` -> `px`)
pub fn get_unit(value: &str) -> Option<&str> {
    if value == "auto" {
        return None;
    }
    UNIT.captures(value)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Normalize `value` before decomposition
///
/// Colors become `rgb(...)`. Otherwise the value's own trailing unit is
/// replaced by `unit`, or `unit` is appended to a unitless number.
pub fn validate_value(value: &str, unit: Option<&str>) -> String {
    if let Some(rgb) = color_to_rgb(value) {
        return rgb;
    }
    let Some(unit) = unit else {
        return value.to_string();
    };
    if !value.bytes().any(|b| b.is_ascii_digit()) {
        return value.to_string();
    }
    match get_unit(value) {
        Some(own) if value.ends_with(own) => {
            format!("{}{}", &value[..value.len() - own.len()], unit)
        }
        Some(_) => value.to_string(),
        None => format!("{value}{unit}"),
    }
}

/// Split `value` into numbers and literal fragments, resolving `unit` first
pub fn decompose(value: &str, unit: Option<&str>) -> DecomposedValue {
    let original = validate_value(value, unit);
    let mut numbers: Numbers = NUMBER
        .find_iter(&original)
        .map(|m| m.as_str().parse().unwrap_or(0.0))
        .collect();
    if numbers.is_empty() {
        numbers.push(0.0);
    }
    let strings = NUMBER.split(&original).map(str::to_string).collect();
    DecomposedValue {
        numbers,
        strings,
        original,
    }
}

/// Interleave fragments and numbers: `strings[0] n[0] strings[1] ... strings[n]`
pub fn recompose(numbers: &[f64], strings: &[String]) -> String {
    let mut out = String::new();
    recompose_into(&mut out, numbers.iter().copied(), strings);
    out
}

/// [`recompose`] into a reused buffer
pub fn recompose_into(out: &mut String, numbers: impl IntoIterator<Item = f64>, strings: &[String]) {
    out.clear();
    let mut fragments = strings.iter();
    if let Some(first) = fragments.next() {
        out.push_str(first);
    }
    for (fragment, number) in fragments.zip(numbers) {
        push_number(out, number);
        out.push_str(fragment);
    }
}

/// Shortest round-tripping decimal text; `-0` prints as `0`
pub fn format_number(n: f64) -> String {
    let mut out = String::new();
    push_number(&mut out, n);
    out
}

pub(crate) fn push_number(out: &mut String, n: f64) {
    let n = if n == 0.0 { 0.0 } else { n };
    let _ = write!(out, "{n}");
}

/// Leading float of `text`, ignoring any trailing unit (`"10px"` -> 10)
pub fn parse_float(text: &str) -> Option<f64> {
    FLOAT_PREFIX
        .find(text)
        .and_then(|m| m.as_str().trim().parse().ok())
}

/// Relative value operators (`+=`, `-=`, `*=`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
}

impl Operator {
    /// Split an operator prefix off `value`
    pub fn split(value: &str) -> Option<(Operator, &str)> {
        let op = match value.get(..2)? {
            "+=" => Operator::Add,
            "-=" => Operator::Sub,
            "*=" => Operator::Mul,
            _ => return None,
        };
        Some((op, &value[2..]))
    }

    pub fn apply(self, from: f64, operand: f64) -> f64 {
        match self {
            Operator::Add => from + operand,
            Operator::Sub => from - operand,
            Operator::Mul => from * operand,
        }
    }
}

/// Resolve an operator-prefixed destination against `from`
///
/// Returns `None` when `to` carries no operator. Unparsable operands count
/// as zero.
pub fn resolve_operator(from: &str, to: &str) -> Option<String> {
    let (op, operand) = Operator::split(to)?;
    let x = parse_float(from).unwrap_or_else(|| {
        tracing::warn!("relative value `{}` applied to non-numeric `{}`", to, from);
        0.0
    });
    let y = parse_float(operand).unwrap_or_else(|| {
        tracing::warn!("unparsable relative operand `{}`", to);
        0.0
    });
    Some(format_number(op.apply(x, y)))
}
