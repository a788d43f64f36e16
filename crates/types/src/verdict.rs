//! Safety verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a safety evaluation.
///
/// `Safe { order: vec![] }` (no processes) and `Unsafe` are distinct values;
/// an unsafe verdict carries no partial order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum SafetyResult {
    /// Every process can finish; `order` is the completion sequence
    Safe { order: Vec<usize> },
    /// No completion order exists from this state
    Unsafe,
}

impl SafetyResult {
    #[must_use]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe { .. })
    }

    /// Completion order, if the state is safe
    #[must_use]
    pub fn order(&self) -> Option<&[usize]> {
        match self {
            Self::Safe { order } => Some(order),
            Self::Unsafe => None,
        }
    }
}

impl fmt::Display for SafetyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe { order } => {
                write!(f, "safe [")?;
                for (i, process) in order.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{process}")?;
                }
                write!(f, "]")
            }
            Self::Unsafe => write!(f, "unsafe"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_safe_differs_from_unsafe() {
        let empty = SafetyResult::Safe { order: Vec::new() };
        assert_ne!(empty, SafetyResult::Unsafe);
        assert_eq!(empty.order(), Some(&[] as &[usize]));
        assert_eq!(SafetyResult::Unsafe.order(), None);
    }

    #[test]
    fn test_json_shape() {
        let safe = SafetyResult::Safe { order: vec![1, 0] };
        assert_eq!(
            serde_json::to_string(&safe).unwrap(),
            r#"{"verdict":"safe","order":[1,0]}"#
        );
        assert_eq!(
            serde_json::to_string(&SafetyResult::Unsafe).unwrap(),
            r#"{"verdict":"unsafe"}"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SafetyResult::Safe { order: vec![1, 3, 4, 0, 2] }.to_string(),
            "safe [1, 3, 4, 0, 2]"
        );
        assert_eq!(SafetyResult::Unsafe.to_string(), "unsafe");
    }
}
