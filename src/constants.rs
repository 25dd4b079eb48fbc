/// Shared constants for the reshape pipeline and the batch driver.
/// Input filenames match the broker export names verbatim, including the
/// misspelled announcement file.

// Sentinel the exports use for "no data" (besides a blank cell)
pub const SENTINEL_DASH: &str = "-";

/// Ratio of parseable values above which a text column is committed to
/// numeric. Strictly greater-than: 80/100 stays text, 81/100 converts.
pub const COERCION_THRESHOLD: f64 = 0.8;

// Output column names
pub const DATE_COLUMN: &str = "Date";
pub const STOCK_COLUMN: &str = "Stock";

// Tail appended to generated output filenames
pub const LONG_FORMAT_TAIL: &str = "_long_format.csv";

// Fixed output names used by the specialized flows
pub const PRICE_FIXED_OUTPUT: &str = "taiwan_stocks_long_format.csv";
pub const ANNOUNCEMENT_FIXED_OUTPUT: &str = "announcement_dates_fixed.csv";
pub const BOOK_VALUE_FIXED_OUTPUT: &str = "book_values_fixed.csv";

// Default input files as exported
pub const PRICE_FILE: &str = "stock price.xlsx";
pub const VOLUME_FILE: &str = "tv.xlsx";
pub const MARKET_CAP_FILE: &str = "mkt cap.xlsx";
pub const BOOK_VALUE_FILE: &str = "book value.xlsx";
pub const ANNOUNCEMENT_FILE: &str = "announcemnet date.xlsx";

// Value column labels
pub const PRICE_LABEL: &str = "Price";
pub const VOLUME_LABEL: &str = "Volume";
pub const MARKET_CAP_LABEL: &str = "MarketCap";
pub const BOOK_VALUE_LABEL: &str = "BookValue";
pub const ANNOUNCEMENT_LABEL: &str = "AnnouncementDate";
