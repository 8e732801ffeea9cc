//! Operation chains for `manipulate`: `e` extends, `t<margin>` trims.

use std::fmt;
use std::str::FromStr;

use crate::error::ImageOpError;

/// Trim margin used by a bare `t`.
pub const DEFAULT_CHAIN_MARGIN: u32 = 20;

/// One step of an operation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Center on a 3x canvas of the edge color
    Extend,
    /// Crop to content, keeping this many pixels of background
    Trim(u32),
}

impl FromStr for EditOp {
    type Err = ImageOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = s.trim().to_ascii_lowercase();
        if op == "e" {
            return Ok(Self::Extend);
        }
        match op.strip_prefix('t') {
            Some("") => Ok(Self::Trim(DEFAULT_CHAIN_MARGIN)),
            Some(margin) => margin
                .parse()
                .map(Self::Trim)
                .map_err(|_| ImageOpError::InvalidOperation(format!("Invalid trim margin: {margin}"))),
            None => Err(ImageOpError::InvalidOperation(format!("Unknown operation: {op}"))),
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extend => write!(f, "e"),
            Self::Trim(margin) => write!(f, "t{margin}"),
        }
    }
}

/// Parse a comma-separated chain such as `e,t48`. Empty segments are ignored.
pub fn parse_ops(chain: &str) -> Result<Vec<EditOp>, ImageOpError> {
    let ops = chain
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<EditOp>, _>>()?;

    if ops.is_empty() {
        return Err(ImageOpError::InvalidOperation(
            "No operations given".to_string(),
        ));
    }
    Ok(ops)
}
