//! Shared configuration constants for the contact sweep
//!
//! Default values used by the config builder and the CLI so both agree on
//! what an unconfigured run looks like.

/// Host serving the organisation detail pages
pub const DEFAULT_BASE_URL: &str = "https://bharatfpofinder.nafpo.in";

/// Path prefix of a detail page; the record identifier is appended to it
pub const DETAIL_PATH: &str = "/main/organisationDetails/";

/// First identifier of the default sweep (inclusive)
pub const DEFAULT_ID_START: u64 = 647;

/// End of the default sweep (exclusive)
pub const DEFAULT_ID_END: u64 = 69_122;

/// Output file written relative to the working directory
pub const DEFAULT_OUTPUT_PATH: &str = "extracted_emails.csv";

/// Visible label of the control that reveals the collapsed part of a page
pub const DEFAULT_EXPAND_LABEL: &str = "View More";

/// How long to look for (and click) the expand control before giving up
pub const DEFAULT_EXPAND_TIMEOUT_MS: u64 = 3_000;

/// Pause after a successful expand click so revealed content can render
pub const DEFAULT_EXPAND_SETTLE_MS: u64 = 1_000;

/// Interval between lookups of the expand control
pub const EXPAND_POLL_INTERVAL_MS: u64 = 100;

/// Timeout for `page.goto()`
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for `page.wait_for_navigation()`
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Header row of the output file
pub const CSV_HEADER: [&str; 2] = ["org_id", "email"];

/// Email pattern applied to captured page text
///
/// Local part, `@`, domain labels, then a top-level label of at least two
/// letters. Purely syntactic.
pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Chrome user agent string presented by the managed browser
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
