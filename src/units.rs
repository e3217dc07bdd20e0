//! Conversion between the units a learner may type and SI base units.

/// The physical quantity a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Voltage,
    Time,
    Frequency,
}

/// A selectable unit and its multiplier to the SI base unit of its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// The symbol accepted from the learner, ASCII only.
    pub symbol: &'static str,
    /// The symbol shown to the learner.
    pub label: &'static str,
    pub factor: f64,
}

const VOLTAGE_UNITS: [Unit; 3] = [
    Unit { symbol: "V", label: "V", factor: 1.0 },
    Unit { symbol: "mV", label: "mV", factor: 1e-3 },
    Unit { symbol: "uV", label: "µV", factor: 1e-6 },
];

const TIME_UNITS: [Unit; 3] = [
    Unit { symbol: "s", label: "s", factor: 1.0 },
    Unit { symbol: "ms", label: "ms", factor: 1e-3 },
    Unit { symbol: "us", label: "µs", factor: 1e-6 },
];

const FREQUENCY_UNITS: [Unit; 3] = [
    Unit { symbol: "Hz", label: "Hz", factor: 1.0 },
    Unit { symbol: "kHz", label: "kHz", factor: 1e3 },
    Unit { symbol: "MHz", label: "MHz", factor: 1e6 },
];

impl UnitCategory {
    /// The units a learner can pick from for this category, base unit first.
    pub fn units(self) -> &'static [Unit] {
        match self {
            UnitCategory::Voltage => &VOLTAGE_UNITS,
            UnitCategory::Time => &TIME_UNITS,
            UnitCategory::Frequency => &FREQUENCY_UNITS,
        }
    }

    /// The SI base unit symbol of this category.
    pub fn base_symbol(self) -> &'static str {
        self.units()[0].symbol
    }

    /// Get the multiplier converting a value in `symbol` to the SI base unit.
    ///
    /// Both the ASCII and the display spelling are accepted. Unknown symbols convert with a factor
    /// of 1 rather than failing.
    pub fn factor(self, symbol: &str) -> f64 {
        let symbol = symbol.trim();
        self.units()
            .iter()
            .find(|unit| unit.symbol == symbol || unit.label == symbol)
            .map(|unit| unit.factor)
            .unwrap_or(1.0)
    }

    /// Convert a value expressed in `symbol` to the SI base unit.
    pub fn to_si(self, value: f64, symbol: &str) -> f64 {
        value * self.factor(symbol)
    }
}
