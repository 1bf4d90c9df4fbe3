//! Cooldown counter for the granted ability.
//!
//! The counter recharges in stages instead of ticking down every round:
//! a used ability sits at [`Cooldown::USED`], and every round boundary
//! that finds it at a checkpoint (0 or 5) adds [`Cooldown::STEP`] until it
//! reaches [`Cooldown::READY`].
//!
//! ```text
//! NOT_GRANTED (-1) ──grant──▶ READY (10) ──use──▶ USED (0) ──round──▶ 5 ──round──▶ 10
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cooldown(i8);

impl Cooldown {
    pub const NOT_GRANTED: Cooldown = Cooldown(-1);
    pub const USED: Cooldown = Cooldown(0);
    pub const READY: Cooldown = Cooldown(10);
    pub const STEP: i8 = 5;

    pub fn value(self) -> i8 {
        self.0
    }

    pub fn is_granted(self) -> bool {
        self != Self::NOT_GRANTED
    }

    pub fn is_ready(self) -> bool {
        self == Self::READY
    }

    pub(crate) fn grant(&mut self) {
        *self = Self::READY;
    }

    pub(crate) fn mark_used(&mut self) {
        *self = Self::USED;
    }

    /// Applies one round boundary. Returns `true` if the counter moved.
    pub(crate) fn recharge(&mut self) -> bool {
        if self.0 == 0 || self.0 == Self::STEP {
            self.0 += Self::STEP;
            true
        } else {
            false
        }
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::NOT_GRANTED
    }
}

impl fmt::Display for Cooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NOT_GRANTED => f.write_str("not granted"),
            Self::READY => f.write_str("ready"),
            Self(v) => write!(f, "recharging ({v}/{})", Self::READY.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recharge_stages_from_used_to_ready() {
        let mut cd = Cooldown::USED;
        assert!(cd.recharge());
        assert_eq!(cd.value(), 5);
        assert!(cd.recharge());
        assert!(cd.is_ready());
        assert!(!cd.recharge());
        assert!(cd.is_ready());
    }

    #[test]
    fn test_recharge_not_granted_stays_put() {
        let mut cd = Cooldown::default();
        assert!(!cd.recharge());
        assert_eq!(cd, Cooldown::NOT_GRANTED);
        assert!(!cd.is_granted());
    }

    #[test]
    fn test_grant_then_use() {
        let mut cd = Cooldown::default();
        cd.grant();
        assert!(cd.is_ready());
        cd.mark_used();
        assert_eq!(cd, Cooldown::USED);
        assert!(cd.is_granted());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cooldown::READY.to_string(), "ready");
        assert_eq!(Cooldown(5).to_string(), "recharging (5/10)");
    }
}
