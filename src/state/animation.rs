//! Linear progress animation driving the ring fill

use chrono::{DateTime, Utc};

/// Progress animation for one countdown schedule
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressAnimation {
    /// Held at a fixed fraction (ready, paused, finished)
    Frozen(f64),
    /// Falling linearly from `from` to 0 over `duration_ms`
    Linear {
        from: f64,
        started_at: DateTime<Utc>,
        duration_ms: i64,
    },
}

impl ProgressAnimation {
    pub fn frozen(value: f64) -> Self {
        Self::Frozen(value.clamp(0.0, 1.0))
    }

    /// Animate from `from` down to 0 over `remaining_seconds`
    pub fn countdown(from: f64, started_at: DateTime<Utc>, remaining_seconds: u64) -> Self {
        Self::Linear {
            from: from.clamp(0.0, 1.0),
            started_at,
            duration_ms: i64::try_from(remaining_seconds)
                .unwrap_or(i64::MAX)
                .saturating_mul(1000),
        }
    }

    /// Progress value for the frame at `now`
    pub fn sample(&self, now: DateTime<Utc>) -> f64 {
        match *self {
            Self::Frozen(value) => value,
            Self::Linear { from, started_at, duration_ms } => {
                if duration_ms <= 0 {
                    return 0.0;
                }
                let elapsed = (now - started_at).num_milliseconds().max(0);
                let left = 1.0 - elapsed as f64 / duration_ms as f64;
                (from * left).clamp(0.0, from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn frozen_ignores_time() {
        let anim = ProgressAnimation::frozen(0.7);
        assert_eq!(anim.sample(Utc::now()), 0.7);
    }

    #[test]
    fn countdown_is_linear() {
        let start = Utc::now();
        let anim = ProgressAnimation::countdown(0.7, start, 7);
        assert_eq!(anim.sample(start), 0.7);
        let mid = anim.sample(start + Duration::milliseconds(3_500));
        assert!((mid - 0.35).abs() < 1e-9);
        assert_eq!(anim.sample(start + Duration::seconds(7)), 0.0);
        assert_eq!(anim.sample(start + Duration::seconds(60)), 0.0);
    }

    #[test]
    fn countdown_never_rises_above_start() {
        let start = Utc::now();
        let anim = ProgressAnimation::countdown(0.5, start, 5);
        assert_eq!(anim.sample(start - Duration::seconds(2)), 0.5);
    }
}
