//! Tax, discount and shipping adjustments.
//!
//! Each adjustment can be hidden and shown again without losing what was
//! typed: hiding parks the value in `last_value`, showing restores it. Tax and
//! discount also carry a unit (percent of subtotal, or a fixed amount).
//! Changing the unit resets the value, since the two are not convertible.

pub mod totals;

pub use totals::{subtotal, TotalPolicy, Totals};

use serde::{Deserialize, Serialize};

use crate::draft::parse::{non_negative, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentMode {
    #[default]
    Percent,
    Fixed,
}

impl AdjustmentMode {
    /// Percent values live in `[0, 100]`, fixed amounts in `[0, ∞)`.
    pub fn clamp(self, value: f64) -> f64 {
        let value = non_negative(value);
        match self {
            Self::Percent => value.min(100.0),
            Self::Fixed => value,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Percent => Self::Fixed,
            Self::Fixed => Self::Percent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percent" | "percentage" | "%" => Some(Self::Percent),
            "fixed" | "amount" | "flat" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Tax or discount state.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentSetting {
    enabled: bool,
    mode: AdjustmentMode,
    value: f64,
    last_value: f64,
}

impl AdjustmentSetting {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            mode: AdjustmentMode::Percent,
            value: 0.0,
            last_value: 0.0,
        }
    }

    /// Rebuild from stored fields. A disabled adjustment keeps the stored
    /// value as the one to restore on re-enable.
    pub fn restore(enabled: bool, mode: AdjustmentMode, stored: f64) -> Self {
        let stored = mode.clamp(stored);
        Self {
            enabled,
            mode,
            value: if enabled { stored } else { 0.0 },
            last_value: stored,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> AdjustmentMode {
        self.mode
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    /// Show the adjustment, restoring the value it had when hidden.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.value = self.mode.clamp(self.last_value);
        self.enabled = true;
    }

    /// Hide the adjustment. Its contribution drops to 0 until re-enabled.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.last_value = self.value;
        self.value = 0.0;
        self.enabled = false;
    }

    pub fn toggle(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Switch units. Always resets the value (and the parked value) to 0.
    pub fn set_mode(&mut self, mode: AdjustmentMode) {
        self.mode = mode;
        self.value = 0.0;
        self.last_value = 0.0;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Apply raw form input.
    pub fn set_value(&mut self, input: &str) {
        self.set_amount(parse_number(input));
    }

    /// While hidden the amount is parked and shows up on the next `enable`.
    pub fn set_amount(&mut self, amount: f64) {
        let amount = self.mode.clamp(amount);
        if self.enabled {
            self.value = amount;
        } else {
            self.last_value = amount;
        }
    }

    /// Contribution of this adjustment for the given subtotal.
    pub fn amount_for(&self, subtotal: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        match self.mode {
            AdjustmentMode::Percent => subtotal * self.value / 100.0,
            AdjustmentMode::Fixed => self.value,
        }
    }
}

/// Shipping has no unit: it is always a fixed, non-negative amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingSetting {
    enabled: bool,
    value: f64,
    last_value: f64,
}

impl ShippingSetting {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            value: 0.0,
            last_value: 0.0,
        }
    }

    pub fn restore(enabled: bool, stored: f64) -> Self {
        let stored = non_negative(stored);
        Self {
            enabled,
            value: if enabled { stored } else { 0.0 },
            last_value: stored,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.value = self.last_value;
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.last_value = self.value;
        self.value = 0.0;
        self.enabled = false;
    }

    pub fn toggle(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn set_value(&mut self, input: &str) {
        self.set_amount(parse_number(input));
    }

    pub fn set_amount(&mut self, amount: f64) {
        let amount = non_negative(amount);
        if self.enabled {
            self.value = amount;
        } else {
            self.last_value = amount;
        }
    }

    pub fn amount(&self) -> f64 {
        if self.enabled {
            self.value
        } else {
            0.0
        }
    }
}
