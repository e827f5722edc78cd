//! Timeline milestones.
//!
//! Milestones are static configuration. Whether one is "active" is derived
//! from progress alone: with `n` milestones spread evenly over the scroll,
//! milestone `i` lights up once progress reaches `i / (n - 1)`.

use serde::{Deserialize, Serialize};

/// A dated event shown along the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Display date, e.g. "Feb 1".
    pub date: String,
    /// Short title of the event.
    pub title: String,
    /// Marker position in path units.
    pub x: f64,
    /// Marker position in path units.
    pub y: f64,
}

impl Milestone {
    /// Create a new milestone.
    #[must_use]
    pub fn new(date: impl Into<String>, title: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            x,
            y,
        }
    }
}

/// The milestones shown on the default wave.
#[must_use]
pub fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone::new("Feb 1", "Registration Opens", 30.0, 150.0),
        Milestone::new("Feb 20", "Registration Closes", 160.0, 120.0),
        Milestone::new("Feb 28", "Shortlisting", 320.0, 140.0),
        Milestone::new("Mar 14", "Hackathon Begins", 480.0, 130.0),
        Milestone::new("Mar 15", "Results & Awards", 780.0, 150.0),
    ]
}

/// Progress at which milestone `index` of `count` becomes active.
///
/// A lone milestone is active from the start.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn activation_threshold(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    index as f64 / (count - 1) as f64
}

/// Whether milestone `index` of `count` is active at `progress`.
///
/// Reaching the threshold exactly counts as active.
#[must_use]
pub fn is_active(index: usize, count: usize, progress: f64) -> bool {
    progress >= activation_threshold(index, count)
}

/// Activity flag for each milestone, in order.
#[must_use]
pub fn active_flags(milestones: &[Milestone], progress: f64) -> Vec<bool> {
    let count = milestones.len();
    (0..count).map(|i| is_active(i, count, progress)).collect()
}

/// Number of milestones active at `progress`.
#[must_use]
pub fn active_count(milestones: &[Milestone], progress: f64) -> usize {
    let count = milestones.len();
    (0..count).filter(|&i| is_active(i, count, progress)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_milestones() {
        let milestones = default_milestones();
        assert_eq!(milestones.len(), 5);
        assert_eq!(milestones[0].title, "Registration Opens");
        assert_eq!(milestones[4].date, "Mar 15");
        assert_eq!((milestones[2].x, milestones[2].y), (320.0, 140.0));
    }

    #[test]
    fn test_thresholds_for_five() {
        let thresholds: Vec<f64> = (0..5).map(|i| activation_threshold(i, 5)).collect();
        assert_eq!(thresholds, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_boundary_counts_as_active() {
        for i in 0..5 {
            #[allow(clippy::cast_precision_loss)]
            let boundary = i as f64 / 4.0;
            assert!(is_active(i, 5, boundary), "milestone {i} at {boundary}");
        }
    }

    #[test]
    fn test_just_below_boundary_is_inactive() {
        assert!(!is_active(1, 5, 0.249_999));
        assert!(!is_active(4, 5, 0.999_999));
    }

    #[test]
    fn test_first_milestone_always_active() {
        assert!(is_active(0, 5, 0.0));
    }

    #[test]
    fn test_single_milestone() {
        assert_eq!(activation_threshold(0, 1), 0.0);
        assert!(is_active(0, 1, 0.0));
    }

    #[test]
    fn test_active_flags() {
        let milestones = default_milestones();
        assert_eq!(
            active_flags(&milestones, 0.5),
            vec![true, true, true, false, false]
        );
        assert_eq!(active_flags(&milestones, 1.0), vec![true; 5]);
        assert!(active_flags(&[], 0.5).is_empty());
    }

    #[test]
    fn test_active_count() {
        let milestones = default_milestones();
        assert_eq!(active_count(&milestones, 0.0), 1);
        assert_eq!(active_count(&milestones, 0.8), 4);
        assert_eq!(active_count(&milestones, 1.0), 5);
    }

    #[test]
    fn test_milestone_serialization() {
        let milestone = Milestone::new("Feb 1", "Registration Opens", 30.0, 150.0);
        let json = serde_json::to_string(&milestone).unwrap();
        assert!(json.contains("\"date\":\"Feb 1\""));
        assert!(json.contains("\"title\":\"Registration Opens\""));
    }
}
