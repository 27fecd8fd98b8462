//! # Logging Macros
//!
//! Convenience macros for structured logging of authorization decisions
//! and record lifecycle events.

/// Log the outcome of a permission check.
///
/// Denials carry their reason so a forbidden response can be traced back to
/// a missing membership, an alumni flag or a missing role permission.
///
/// # Example
///
/// ```rust
/// use logging::log_permission_check;
///
/// let user_id = "usr-1";
/// let team_id = "team-1";
/// log_permission_check!(user_id, team_id, "class:create", "allowed");
/// ```
#[macro_export]
macro_rules! log_permission_check {
    ($user_id:expr, $team_id:expr, $permission:expr, $outcome:expr) => {
        $crate::debug!(
            target: "authz",
            user_id = %$user_id,
            team_id = %$team_id,
            permission = %$permission,
            outcome = %$outcome,
            "Permission check"
        )
    };
}

/// Log a state transition of an invite or join request.
#[macro_export]
macro_rules! log_transition {
    ($kind:expr, $id:expr, $from:expr, $to:expr, $actor:expr) => {
        $crate::info!(
            target: "requests",
            kind = %$kind,
            id = %$id,
            from = %$from,
            to = %$to,
            actor = %$actor,
            "Request status changed"
        )
    };
}

/// Log a data integrity problem found in stored records.
#[macro_export]
macro_rules! log_integrity_violation {
    ($entity:expr, $id:expr, $details:expr) => {
        $crate::warn!(
            target: "integrity",
            entity = %$entity,
            id = %$id,
            details = %$details,
            "Integrity violation"
        )
    };
}

/// Measure and log the duration of a block of code.
///
/// # Example
///
/// ```rust
/// use logging::measure_duration;
///
/// let total = measure_duration!("cli", "sum", {
///     (1..=10).sum::<u32>()
/// });
/// assert_eq!(total, 55);
/// ```
#[macro_export]
macro_rules! measure_duration {
    ($target:expr, $context:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        $crate::debug!(
            target: $target,
            context = %$context,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "Operation completed"
        );
        result
    }};
}
