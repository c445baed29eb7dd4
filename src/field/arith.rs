//! Elementwise arithmetic between cubes, raw arrays and scalars.
//!
//! Every operation returns a new [`Cube`] carrying the left operand's grid and
//! molecule. No IEEE special value is trapped: dividing by zero yields an
//! infinity or NaN in the result.

use super::config::DivisionMode;
use super::cube::{Cube, dims};
use super::error::Error;
use ndarray::{Array3, ArrayView3, Zip};
use std::fmt;
use std::str::FromStr;

/// Right-hand side of a binary cube operation.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Scalar(f64),
    /// Raw values; must have the left cube's shape.
    Array(ArrayView3<'a, f64>),
    /// Another cube; only its value shape is checked, not its grid or atoms.
    Field(&'a Cube),
}

enum Resolved<'a> {
    Scalar(f64),
    Values(ArrayView3<'a, f64>),
}

impl<'a> Operand<'a> {
    fn resolve(self, lhs: &Cube) -> Result<Resolved<'a>, Error> {
        match self {
            Operand::Scalar(x) => Ok(Resolved::Scalar(x)),
            Operand::Array(values) => {
                let found = dims(&values);
                if found != lhs.shape() {
                    return Err(Error::UnsupportedOperand {
                        expected: lhs.shape(),
                        found,
                    });
                }
                Ok(Resolved::Values(values))
            }
            Operand::Field(cube) => {
                if cube.shape() != lhs.shape() {
                    return Err(Error::shape_mismatch(lhs.shape(), cube.shape()));
                }
                Ok(Resolved::Values(cube.values().view()))
            }
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(x: f64) -> Self {
        Operand::Scalar(x)
    }
}

impl<'a> From<&'a Cube> for Operand<'a> {
    fn from(cube: &'a Cube) -> Self {
        Operand::Field(cube)
    }
}

impl<'a> From<&'a Array3<f64>> for Operand<'a> {
    fn from(values: &'a Array3<f64>) -> Self {
        Operand::Array(values.view())
    }
}

impl<'a> From<ArrayView3<'a, f64>> for Operand<'a> {
    fn from(values: ArrayView3<'a, f64>) -> Self {
        Operand::Array(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    #[inline]
    fn eval(self, a: f64, b: f64, division: DivisionMode) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => match division {
                DivisionMode::Elementwise => a / b,
                DivisionMode::LegacyMultiply => a * b,
            },
            BinaryOp::Pow => a.powf(b),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBinaryOpError(String);

impl fmt::Display for ParseBinaryOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown operator '{}' (expected one of + - * / ^ or add, sub, mul, div, pow)",
            self.0
        )
    }
}

impl std::error::Error for ParseBinaryOpError {}

impl FromStr for BinaryOp {
    type Err = ParseBinaryOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+" | "add" => Ok(BinaryOp::Add),
            "-" | "sub" => Ok(BinaryOp::Sub),
            "*" | "x" | "mul" => Ok(BinaryOp::Mul),
            "/" | "div" => Ok(BinaryOp::Div),
            "^" | "**" | "pow" => Ok(BinaryOp::Pow),
            other => Err(ParseBinaryOpError(other.to_string())),
        }
    }
}

impl Cube {
    /// Applies `op` elementwise with `self` on the left.
    pub fn apply<'a>(
        &self,
        op: BinaryOp,
        rhs: impl Into<Operand<'a>>,
        division: DivisionMode,
    ) -> Result<Cube, Error> {
        let values = match rhs.into().resolve(self)? {
            Resolved::Scalar(b) => self.values().mapv(|a| op.eval(a, b, division)),
            Resolved::Values(other) => Zip::from(self.values())
                .and(&other)
                .map_collect(|&a, &b| op.eval(a, b, division)),
        };
        Ok(self.derive(values))
    }

    pub fn try_add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Cube, Error> {
        self.apply(BinaryOp::Add, rhs, DivisionMode::Elementwise)
    }

    pub fn try_sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Cube, Error> {
        self.apply(BinaryOp::Sub, rhs, DivisionMode::Elementwise)
    }

    pub fn try_mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Cube, Error> {
        self.apply(BinaryOp::Mul, rhs, DivisionMode::Elementwise)
    }

    /// True elementwise division.
    pub fn try_div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Cube, Error> {
        self.apply(BinaryOp::Div, rhs, DivisionMode::Elementwise)
    }

    /// Division under an explicit [`DivisionMode`].
    pub fn try_div_with<'a>(
        &self,
        rhs: impl Into<Operand<'a>>,
        mode: DivisionMode,
    ) -> Result<Cube, Error> {
        self.apply(BinaryOp::Div, rhs, mode)
    }

    pub fn try_pow<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Cube, Error> {
        self.apply(BinaryOp::Pow, rhs, DivisionMode::Elementwise)
    }

    pub fn abs(&self) -> Cube {
        self.derive(self.values().mapv(f64::abs))
    }
}
