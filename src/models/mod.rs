pub mod direction;
pub mod instrument;
pub mod records;
pub mod settings;
pub mod timeframe;

pub use direction::*;
pub use instrument::{Instrument, InstrumentSpec, ALL_INSTRUMENTS};
pub use records::{ConfluenceLogRow, IccSetupRow, NewConfluenceLog, NewIccSetup, SortOrder};
pub use settings::{SettingsRow, TrendWeights, UserSettings};
pub use timeframe::{Timeframe, HTF_OPTIONS, LTF_OPTIONS, TREND_TIMEFRAMES};
