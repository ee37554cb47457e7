//! Shared default values for otakuscrape
//!
//! Central home for tuning knobs so the config layer, fetchers, and server
//! all agree on the same defaults.

/// User agent sent by the static HTTP strategy.
///
/// Deliberately a plain browser-family string with no Chrome version suffix:
/// the static strategy identifies itself as a generic browser engine and lets
/// the upstream decide whether to serve it. Sites that gate harder than this
/// are handled by the browser strategy instead.
pub const STATIC_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// User agent presented by scripted Chromium sessions.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default deadline for one static HTTP fetch, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default deadline for one scripted browser fetch, in seconds.
///
/// Covers navigation, challenge grace, readiness polling, and content
/// capture together. Individual phases have their own shorter limits.
pub const DEFAULT_BROWSER_TIMEOUT_SECS: u64 = 60;

/// How long the browser strategy waits for the readiness marker, in
/// milliseconds.
///
/// Listing pages render their grids client-side; ten seconds is enough for
/// slow upstreams while still failing fast when the marker never comes.
pub const DEFAULT_READINESS_TIMEOUT_MS: u64 = 10_000;

/// Interval between readiness marker probes, in milliseconds.
pub const READINESS_POLL_INTERVAL_MS: u64 = 200;

/// Grace period granted to anti-bot interstitials, in seconds.
///
/// Cloudflare-style challenges usually resolve within a few seconds when
/// they are going to resolve at all. One grace period, one re-check; a
/// challenge still standing after that fails the attempt.
pub const DEFAULT_CHALLENGE_GRACE_SECS: u64 = 8;

/// Default time-to-live for cached extraction results, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default cap on concurrently live Chromium sessions.
///
/// Each session costs hundreds of MB of RSS; two keeps a small host healthy
/// while still allowing one fetch to overlap another.
pub const DEFAULT_MAX_BROWSER_SESSIONS: usize = 2;

/// Default port for the JSON API server.
pub const DEFAULT_HTTP_PORT: u16 = 3001;
