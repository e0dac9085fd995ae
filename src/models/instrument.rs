use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-instrument pip and contract assumptions used by position sizing.
/// Values mirror common retail CFD specs; adjust per broker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstrumentSpec {
    pub pip_value_per_lot: f64,
    pub contract_size: f64,
    pub pip_size: f64,
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Instrument {
    #[default]
    Xauusd,
    Nas100,
    Us30,
    Btcusd,
    Solusd,
    Spx500,
    Eurusd,
}

pub const ALL_INSTRUMENTS: &[Instrument] = &[
    Instrument::Xauusd,
    Instrument::Nas100,
    Instrument::Us30,
    Instrument::Btcusd,
    Instrument::Solusd,
    Instrument::Spx500,
    Instrument::Eurusd,
];

impl Instrument {
    pub fn symbol(&self) -> &'static str {
        match self {
            Instrument::Xauusd => "XAUUSD",
            Instrument::Nas100 => "NAS100",
            Instrument::Us30 => "US30",
            Instrument::Btcusd => "BTCUSD",
            Instrument::Solusd => "SOLUSD",
            Instrument::Spx500 => "SPX500",
            Instrument::Eurusd => "EURUSD",
        }
    }

    pub fn spec(&self) -> InstrumentSpec {
        match self {
            Instrument::Xauusd => InstrumentSpec {
                pip_value_per_lot: 1.0,
                contract_size: 100.0,
                pip_size: 0.1,
                note: "0.1 move on XAUUSD = 1 point, about $1 per lot",
            },
            Instrument::Nas100 => InstrumentSpec {
                pip_value_per_lot: 1.0,
                contract_size: 1.0,
                pip_size: 1.0,
                note: "1 index point = $1 per lot on NAS100",
            },
            Instrument::Us30 => InstrumentSpec {
                pip_value_per_lot: 1.0,
                contract_size: 1.0,
                pip_size: 1.0,
                note: "1 index point = $1 per lot on US30",
            },
            Instrument::Btcusd => InstrumentSpec {
                pip_value_per_lot: 1.0,
                contract_size: 1.0,
                pip_size: 1.0,
                note: "$1 move = $1 per lot on BTCUSD",
            },
            Instrument::Solusd => InstrumentSpec {
                pip_value_per_lot: 1.0,
                contract_size: 1.0,
                pip_size: 0.1,
                note: "$0.1 move = 1 point on SOLUSD",
            },
            Instrument::Spx500 => InstrumentSpec {
                pip_value_per_lot: 1.0,
                contract_size: 1.0,
                pip_size: 1.0,
                note: "1 index point = $1 per lot on SPX500",
            },
            Instrument::Eurusd => InstrumentSpec {
                pip_value_per_lot: 10.0,
                contract_size: 100_000.0,
                pip_size: 0.0001,
                note: "1 pip = $10 per 1.00 lot on EURUSD",
            },
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ALL_INSTRUMENTS
            .iter()
            .copied()
            .find(|i| i.symbol() == wanted)
            .ok_or_else(|| format!("unknown instrument: {}", s))
    }
}
