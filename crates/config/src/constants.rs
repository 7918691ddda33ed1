//! Default values shared across the workspace

/// Civil-time anchor for date resolution
pub mod anchor {
    /// India Standard Time, UTC+5:30. Fixed so that date resolution does not
    /// depend on the host locale.
    pub const UTC_OFFSET_MINUTES: i32 = 330;

    /// Widest offset accepted from configuration (±14h)
    pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;
}

/// Dialogue retry and escalation budgets
pub mod dialogue {
    pub const MAX_UNKNOWN_STREAK: u32 = 3;
    pub const MAX_SILENCE_RETRIES: u32 = 3;
    pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.4;
    pub const MAX_LOW_CONFIDENCE_RETRIES: u32 = 2;
    pub const MAX_PERSUASION_ATTEMPTS: u32 = 2;
    pub const MAX_TURNS: u32 = 20;
}

/// Session lifecycle
pub mod sessions {
    /// Sessions older than this are force-ended by the sweep
    pub const TTL_SECONDS: u64 = 900;
    pub const SWEEP_INTERVAL_SECONDS: u64 = 30;
}

/// Network endpoints
pub mod endpoints {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const SCYLLA_DEFAULT: &str = "127.0.0.1:9042";
    pub const SCYLLA_KEYSPACE: &str = "reminder_agent";
}
