mod advisory;
pub use self::advisory::Advisory;

mod global_quote;
pub use self::global_quote::{GlobalQuote, GlobalQuoteResponse};

mod time_series;
pub use self::time_series::{DailyAdjustedBar, DailyAdjustedResponse, TimeSeriesMeta};
