#![forbid(unsafe_code)]

//! Build-mode and diagnostics configuration.
//!
//! The development/production switch is read once from `CSS_HANDLES_ENV`
//! and cached in a static. Hosts that need a different mode (tests, embedded
//! renderers) pass an explicit [`BuildMode`] instead of relying on the
//! environment.
//!
//! ```bash
//! CSS_HANDLES_ENV=production ./server
//! ```

use std::sync::LazyLock;
use std::time::Duration;

/// Environment variable consulted by [`BuildMode::from_env`].
pub const MODE_ENV_VAR: &str = "CSS_HANDLES_ENV";

/// Default window during which invalid modifiers are coalesced.
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(3000);

/// Process-wide mode, resolved on first access.
static ENV_MODE: LazyLock<BuildMode> = LazyLock::new(|| {
    BuildMode::parse(std::env::var(MODE_ENV_VAR).ok().as_deref())
});

/// Execution mode that gates developer diagnostics and provenance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    /// Diagnostics are recorded and override provenance is enforced.
    Development,
    /// Diagnostics are suppressed and provenance checks are skipped.
    Production,
}

impl BuildMode {
    /// Mode for this process, read once from [`MODE_ENV_VAR`].
    #[inline]
    pub fn from_env() -> Self {
        *ENV_MODE
    }

    /// Interpret a raw mode string.
    ///
    /// Unknown or missing values fall back to the compilation profile:
    /// debug builds are development, release builds are production.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("development") || v.eq_ignore_ascii_case("dev") => {
                Self::Development
            }
            Some(v) if v.eq_ignore_ascii_case("production") || v.eq_ignore_ascii_case("prod") => {
                Self::Production
            }
            _ => Self::profile_default(),
        }
    }

    #[inline]
    const fn profile_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Whether developer diagnostics and checks are active.
    #[inline]
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Configuration for [`ModifierDiagnostics`](crate::diagnostics::ModifierDiagnostics).
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    /// Quiet period after the last invalid modifier before the report fires.
    /// Every new invalid value restarts the window.
    pub flush_delay: Duration,

    /// Invalid modifiers are only recorded in development mode.
    pub mode: BuildMode,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            flush_delay: DEFAULT_FLUSH_DELAY,
            mode: BuildMode::from_env(),
        }
    }
}

impl DiagnosticsConfig {
    /// Set the coalescing window.
    #[must_use]
    pub fn with_flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay = delay;
        self
    }

    /// Set the build mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether invalid modifiers should be recorded at all.
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.mode.is_development()
    }
}
