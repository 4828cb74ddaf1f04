//! Non-throwing verdict surface for test helpers.
//!
//! Test frameworks want a pass/fail answer plus a message to report, not an
//! error to unwind with. These helpers evaluate checks exactly once.

use crate::expect::{check_all, Check};

/// Are all `checks` met?
pub fn met(checks: &[Check]) -> bool {
    check_all(checks).is_ok()
}

/// Is at least one of `checks` unmet?
pub fn unmet(checks: &[Check]) -> bool {
    !met(checks)
}

/// Pass, or the first failure's rendered message.
pub fn verdict(checks: &[Check]) -> Result<(), String> {
    check_all(checks).map_err(|mismatch| mismatch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::{pair, truthy};

    #[test]
    fn verdicts_do_not_unwind() {
        assert!(met(&[pair(1, 1), truthy(true)]));
        assert!(unmet(&[pair(1, 2)]));
        assert_eq!(
            verdict(&[pair(1, 2)]),
            Err("1 does not match 2".to_string())
        );
    }
}
