#![forbid(unsafe_code)]

//! Coalesced reporting of invalid modifiers.
//!
//! A render loop may validate the same bad modifier many times per second.
//! Instead of logging each rejection, [`ModifierDiagnostics`] collects the
//! distinct invalid values and emits one aggregated error once no new invalid
//! value has arrived for [`DiagnosticsConfig::flush_delay`].
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use css_handles_core::config::{BuildMode, DiagnosticsConfig};
//! use css_handles_core::diagnostics::ModifierDiagnostics;
//!
//! let config = DiagnosticsConfig::default()
//!     .with_mode(BuildMode::Development)
//!     .with_flush_delay(Duration::from_millis(100));
//! let diagnostics = ModifierDiagnostics::new(config);
//!
//! let t0 = Instant::now();
//! diagnostics.record_at("bad value", t0);
//! assert!(diagnostics.tick_at(t0 + Duration::from_millis(50)).is_none());
//!
//! let report = diagnostics.tick_at(t0 + Duration::from_millis(100)).unwrap();
//! assert_eq!(report.values, ["bad value"]);
//! assert!(!diagnostics.has_pending());
//! ```
//!
//! # Invariants
//!
//! - **Single report per window**: each flush emits exactly one event.
//! - **Full drain**: after a flush the accumulator is empty.
//! - **Restartable window**: every new invalid value pushes the deadline out.
//! - **Idle reset**: `reset` on an empty accumulator does nothing.
//!
//! The host drives time by calling [`tick`](ModifierDiagnostics::tick) from its
//! frame loop; nothing here spawns threads or sleeps.

use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::DiagnosticsConfig;

static SHARED: LazyLock<Arc<ModifierDiagnostics>> =
    LazyLock::new(|| Arc::new(ModifierDiagnostics::new(DiagnosticsConfig::default())));

/// Aggregated result of one flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierReport {
    /// Distinct invalid values, in the order they were first seen.
    pub values: Vec<String>,
}

impl ModifierReport {
    /// Number of distinct invalid values in the report.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ModifierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid CSS modifiers. All modifiers should be strings, and only contain letters, numbers, or -. Found: {}",
            self.values.join(", ")
        )
    }
}

#[derive(Debug, Default)]
struct Window {
    values: Vec<String>,
    deadline: Option<Instant>,
}

impl Window {
    fn take(&mut self) -> Option<ModifierReport> {
        self.deadline = None;
        if self.values.is_empty() {
            return None;
        }
        Some(ModifierReport {
            values: std::mem::take(&mut self.values),
        })
    }
}

/// Debounced accumulator of invalid modifier values.
///
/// All state sits behind one mutex so a shared instance can be used from any
/// thread; in the expected single-threaded render loop the lock is never
/// contended.
#[derive(Debug)]
pub struct ModifierDiagnostics {
    config: DiagnosticsConfig,
    window: Mutex<Window>,
}

impl Default for ModifierDiagnostics {
    fn default() -> Self {
        Self::new(DiagnosticsConfig::default())
    }
}

impl ModifierDiagnostics {
    #[must_use]
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self {
            config,
            window: Mutex::new(Window::default()),
        }
    }

    /// Process-wide instance configured from the environment.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Window> {
        // Window holds plain data; a panic mid-update cannot break it.
        self.window
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Record an invalid value, restarting the coalescing window.
    pub fn record(&self, value: impl Into<String>) {
        self.record_at(value, Instant::now());
    }

    /// Record an invalid value at an explicit time.
    ///
    /// A window whose deadline already passed is flushed first, so values
    /// seen after a quiet period never join an older report. Suppressed
    /// outside development mode.
    pub fn record_at(&self, value: impl Into<String>, now: Instant) {
        if !self.config.enabled() {
            return;
        }
        let value = value.into();
        let expired = {
            let mut window = self.lock();
            let expired = match window.deadline {
                Some(deadline) if now >= deadline => window.take(),
                _ => None,
            };
            if !window.values.contains(&value) {
                window.values.push(value);
            }
            window.deadline = Some(now + self.config.flush_delay);
            expired
        };
        if let Some(report) = expired {
            emit(&report);
        }
    }

    /// Fire the pending report if its window has elapsed.
    pub fn tick(&self) -> Option<ModifierReport> {
        self.tick_at(Instant::now())
    }

    /// Fire the pending report if its window elapsed at `now`.
    pub fn tick_at(&self, now: Instant) -> Option<ModifierReport> {
        let report = {
            let mut window = self.lock();
            match window.deadline {
                Some(deadline) if now >= deadline => window.take(),
                _ => None,
            }
        };
        if let Some(report) = &report {
            emit(report);
        }
        report
    }

    /// Fire the pending report immediately, ignoring the window.
    pub fn flush(&self) -> Option<ModifierReport> {
        let report = self.lock().take();
        if let Some(report) = &report {
            emit(report);
        }
        report
    }

    /// Drop pending values and cancel the deadline without reporting.
    pub fn reset(&self) {
        let mut window = self.lock();
        window.values.clear();
        window.deadline = None;
    }

    /// Values waiting for the next report.
    pub fn pending(&self) -> Vec<String> {
        self.lock().values.clone()
    }

    pub fn has_pending(&self) -> bool {
        !self.lock().values.is_empty()
    }

    /// Time left until the pending report fires, or `None` when idle.
    pub fn time_until_flush(&self, now: Instant) -> Option<Duration> {
        self.lock()
            .deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

fn emit(report: &ModifierReport) {
    tracing::error!(
        target: "css_handles.modifier",
        count = report.len(),
        values = %report.values.join(", "),
        "{report}"
    );
}
