//! Static currency table. Selecting a currency only changes display and the
//! three currency fields sent with the invoice; amounts are never converted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyOption {
    pub code: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
}

impl CurrencyOption {
    pub fn to_currency(&self) -> Currency {
        Currency {
            code: self.code.to_string(),
            symbol: self.symbol.to_string(),
            label: self.label.to_string(),
        }
    }
}

pub const CURRENCY_OPTIONS: &[CurrencyOption] = &[
    CurrencyOption { code: "USD", symbol: "$", label: "US Dollar ($)" },
    CurrencyOption { code: "EUR", symbol: "€", label: "Euro (€)" },
    CurrencyOption { code: "GBP", symbol: "£", label: "British Pound (£)" },
    CurrencyOption { code: "NGN", symbol: "₦", label: "Naira (₦)" },
    CurrencyOption { code: "CAD", symbol: "$", label: "Canadian Dollar ($)" },
    CurrencyOption { code: "AUD", symbol: "$", label: "Australian Dollar ($)" },
    CurrencyOption { code: "JPY", symbol: "¥", label: "Japanese Yen (¥)" },
    CurrencyOption { code: "CNY", symbol: "¥", label: "Chinese Yuan (¥)" },
    CurrencyOption { code: "INR", symbol: "₹", label: "Indian Rupee (₹)" },
    CurrencyOption { code: "ZAR", symbol: "R", label: "South African Rand (R)" },
    CurrencyOption { code: "BRL", symbol: "R$", label: "Brazilian Real (R$)" },
    CurrencyOption { code: "MXN", symbol: "$", label: "Mexican Peso ($)" },
    CurrencyOption { code: "CHF", symbol: "CHF", label: "Swiss Franc (CHF)" },
    CurrencyOption { code: "SEK", symbol: "kr", label: "Swedish Krona (kr)" },
    CurrencyOption { code: "NOK", symbol: "kr", label: "Norwegian Krone (kr)" },
    CurrencyOption { code: "DKK", symbol: "kr", label: "Danish Krone (kr)" },
    CurrencyOption { code: "RUB", symbol: "₽", label: "Russian Ruble (₽)" },
    CurrencyOption { code: "KRW", symbol: "₩", label: "South Korean Won (₩)" },
    CurrencyOption { code: "SGD", symbol: "$", label: "Singapore Dollar ($)" },
    CurrencyOption { code: "HKD", symbol: "$", label: "Hong Kong Dollar ($)" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub label: String,
}

impl Default for Currency {
    fn default() -> Self {
        CURRENCY_OPTIONS[0].to_currency()
    }
}

impl Currency {
    /// Format as symbol + amount with thousands separators and two decimals,
    /// e.g. `$1,234.50`.
    pub fn format_amount(&self, amount: f64) -> String {
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = (cents / 100).to_string();
        let frac = cents % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, self.symbol, grouped, frac)
    }
}

/// Case-insensitive lookup in the currency table.
pub fn find_currency(code: &str) -> Option<Currency> {
    let code = code.trim();
    CURRENCY_OPTIONS
        .iter()
        .find(|option| option.code.eq_ignore_ascii_case(code))
        .map(CurrencyOption::to_currency)
}
