use crate::error::{CaptionError, CaptionResult};

/// Shortest per-frame display time the GIF format reliably honors.
pub const LOWEST_VALID_DURATION_MS: u32 = 20;

/// Result of retiming an animation: adjusted per-frame durations plus the
/// stride at which frames must be kept to approximate the requested speed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Retimed {
    /// Adjusted duration for every original frame, each >= the format floor.
    pub durations_ms: Vec<u32>,
    /// Keep every `drop_interval`-th frame (stride from index 0); 1 keeps all.
    pub drop_interval: usize,
}

impl Retimed {
    /// Number of frames retained out of `total` at this drop interval.
    pub fn retained_count(&self, total: usize) -> usize {
        total.div_ceil(self.drop_interval)
    }
}

/// Adjust per-frame durations for a speed multiplier, honoring the GIF
/// minimum-duration floor.
///
/// Each ideal duration `d / speed` below the 20ms floor is clamped to 20ms.
/// When the ideal duration falls below 15ms (0.75 x floor), clamping alone
/// visibly undershoots the requested speed, so the drop interval is raised
/// to `round(floor / ideal)`; the largest requirement across the scan wins.
/// The caller trades frame count for perceived speed by keeping only every
/// `drop_interval`-th frame.
///
/// A zero-length input duration clamps to the floor without raising the
/// drop interval: its ideal multiplier is unbounded and dropping frames
/// cannot speed up a frame that already displays for no time.
pub fn retime(durations_ms: &[u32], speed: f64) -> CaptionResult<Retimed> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(CaptionError::validation(
            "speed multiplier must be finite and > 0",
        ));
    }

    let floor = f64::from(LOWEST_VALID_DURATION_MS);
    let (durations_ms, drop_interval) = durations_ms.iter().fold(
        (Vec::with_capacity(durations_ms.len()), 1usize),
        |(mut out, mut drop), &d| {
            let ideal = f64::from(d) / speed;
            if ideal < floor {
                out.push(LOWEST_VALID_DURATION_MS);
                if ideal > 0.0 && ideal < floor * 0.75 {
                    let desired = (floor / ideal + 0.5).floor() as usize;
                    drop = drop.max(desired);
                }
            } else {
                out.push(ideal.round() as u32);
            }
            (out, drop)
        },
    );

    Ok(Retimed {
        durations_ms,
        drop_interval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_speed_halves_durations_without_clamping() {
        let r = retime(&[50; 10], 2.0).unwrap();
        assert_eq!(r.durations_ms, vec![25; 10]);
        assert_eq!(r.drop_interval, 1);
        assert_eq!(r.retained_count(10), 10);
        let total: u32 = r.durations_ms.iter().sum();
        assert_eq!(total, 250);
    }

    #[test]
    fn extreme_speedup_clamps_and_drops_frames() {
        // ideal 12.5ms < 15ms: clamp to 20ms, interval = round(20/12.5) = 2
        let r = retime(&[50; 10], 4.0).unwrap();
        assert_eq!(r.durations_ms, vec![20; 10]);
        assert_eq!(r.drop_interval, 2);
        assert_eq!(r.retained_count(10), 5);
        // 5 frames * 20ms = 100ms, an actual speedup of 500/100 >= 4x
        assert_eq!(r.durations_ms.len(), 10);
    }

    #[test]
    fn slowdown_lengthens_durations() {
        let r = retime(&[50, 60], 0.5).unwrap();
        assert_eq!(r.durations_ms, vec![100, 120]);
        assert_eq!(r.drop_interval, 1);
        let total: u32 = r.durations_ms.iter().sum();
        assert!(total > 110);
    }

    #[test]
    fn just_under_floor_clamps_without_dropping() {
        // ideal 16ms: below the floor but above 15ms, interval stays 1
        let r = retime(&[32], 2.0).unwrap();
        assert_eq!(r.durations_ms, vec![20]);
        assert_eq!(r.drop_interval, 1);
    }

    #[test]
    fn every_output_duration_respects_the_floor() {
        let r = retime(&[5, 10, 20, 40, 100, 0], 3.0).unwrap();
        assert!(r.durations_ms.iter().all(|&d| d >= LOWEST_VALID_DURATION_MS));
    }

    #[test]
    fn largest_drop_requirement_wins() {
        // 100/10 = 10ms -> interval 2; 100/... mixed with 20/10 = 2ms -> interval 10
        let r = retime(&[100, 20, 100], 10.0).unwrap();
        assert_eq!(r.drop_interval, 10);
    }

    #[test]
    fn zero_duration_frames_do_not_raise_the_interval() {
        let r = retime(&[0, 50], 2.0).unwrap();
        assert_eq!(r.durations_ms, vec![20, 25]);
        assert_eq!(r.drop_interval, 1);
    }

    #[test]
    fn unity_speed_is_identity_above_the_floor() {
        let r = retime(&[30, 40, 50], 1.0).unwrap();
        assert_eq!(r.durations_ms, vec![30, 40, 50]);
        assert_eq!(r.drop_interval, 1);
    }

    #[test]
    fn invalid_speeds_are_rejected() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                retime(&[50], speed).unwrap_err(),
                CaptionError::Validation(_)
            ));
        }
    }

    #[test]
    fn retained_count_rounds_up() {
        let r = Retimed {
            durations_ms: vec![20; 9],
            drop_interval: 2,
        };
        assert_eq!(r.retained_count(9), 5);
    }
}
