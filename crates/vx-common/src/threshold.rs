//! Single-value thresholds such as `>0.5` or `ge5`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bad_data::{is_bad_data, is_eq};
use crate::error::VxError;

/// Tolerance used by the equality operators.
const THRESH_EQ_TOL: f64 = 1.0e-10;

/// Comparison operator of a [`SingleThresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreshOp {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    /// No threshold; every valid value passes.
    Na,
}

impl ThreshOp {
    /// Symbolic form used when printing.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Na => "NA",
        }
    }

    /// Abbreviated form (`lt`, `le`, ...).
    pub fn abbr(&self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Ge => "ge",
            Self::Gt => "gt",
            Self::Na => "na",
        }
    }
}

/// A comparison operator paired with a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SingleThresh {
    pub op: ThreshOp,
    pub value: f64,
}

impl SingleThresh {
    pub fn new(op: ThreshOp, value: f64) -> Self {
        Self { op, value }
    }

    /// Threshold that accepts every valid value.
    pub fn na() -> Self {
        Self {
            op: ThreshOp::Na,
            value: 0.0,
        }
    }

    /// Test a value. Missing values never pass.
    pub fn check(&self, v: f64) -> bool {
        if is_bad_data(v) {
            return false;
        }
        match self.op {
            ThreshOp::Lt => v < self.value,
            ThreshOp::Le => v <= self.value,
            ThreshOp::Eq => is_eq(v, self.value, THRESH_EQ_TOL),
            ThreshOp::Ne => !is_eq(v, self.value, THRESH_EQ_TOL),
            ThreshOp::Ge => v >= self.value,
            ThreshOp::Gt => v > self.value,
            ThreshOp::Na => true,
        }
    }
}

impl FromStr for SingleThresh {
    type Err = VxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("na") {
            return Ok(Self::na());
        }

        // Longer symbols first so "<=" is not read as "<".
        const PREFIXES: [(&str, ThreshOp); 12] = [
            ("<=", ThreshOp::Le),
            (">=", ThreshOp::Ge),
            ("==", ThreshOp::Eq),
            ("!=", ThreshOp::Ne),
            ("<", ThreshOp::Lt),
            (">", ThreshOp::Gt),
            ("lt", ThreshOp::Lt),
            ("le", ThreshOp::Le),
            ("eq", ThreshOp::Eq),
            ("ne", ThreshOp::Ne),
            ("ge", ThreshOp::Ge),
            ("gt", ThreshOp::Gt),
        ];

        let lower = s.to_ascii_lowercase();
        let (op, rest) = PREFIXES
            .iter()
            .find_map(|(prefix, op)| lower.strip_prefix(prefix).map(|rest| (*op, rest)))
            .ok_or_else(|| VxError::InvalidThreshold(s.to_string()))?;

        let value = rest
            .trim()
            .parse::<f64>()
            .map_err(|_| VxError::InvalidThreshold(s.to_string()))?;

        Ok(Self { op, value })
    }
}

impl TryFrom<String> for SingleThresh {
    type Error = VxError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SingleThresh> for String {
    fn from(t: SingleThresh) -> Self {
        t.to_string()
    }
}

impl fmt::Display for SingleThresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            ThreshOp::Na => write!(f, "NA"),
            op => write!(f, "{}{}", op.symbol(), self.value),
        }
    }
}
