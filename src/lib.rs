//! Core game logic for BarTab Roulette.
//!
//! Everything in this crate root and its modules is free of DOM access so it
//! can be exercised natively. The Yew binary measures the page and feeds the
//! numbers in here.
//!
//! The wheel is split into equal segments, one per participant, starting at
//! 12 o'clock and running clockwise. Which segment the pointer indicates is
//! resolved in two tiers:
//! - [`resolve_lightweight`] maps the pointer's rotation straight to a
//!   segment. Cheap enough for every animation tick, used for live feedback.
//! - [`resolve_precise`] rebuilds the fingertip's on-screen position from the
//!   measured pointer box and its off-center rotation axis. Its answer is the
//!   one that gets committed as the payer.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub mod config;
pub mod layout;
pub mod precision;
pub mod registry;
pub mod spin;

use config::{
    POINTER_AXIS_X_RATIO, POINTER_AXIS_Y_RATIO, POINTER_BASE_ANGLE_DEG, POINTER_TIP_DISTANCE_PX,
};

pub const FULL_CIRCLE_DEG: f64 = 360.0;
/// Shifts angles so segment 0 starts at 12 o'clock.
pub const TWELVE_O_CLOCK_ADJUSTMENT_DEG: f64 = 90.0;

pub const PARTICIPANT_EMOJIS: [&str; 10] = [
    "🍺", "🍻", "🥃", "🍷", "🍸", "🍹", "🥂", "🍾", "🍵", "☕",
];

pub const PARTICIPANT_COLORS: [&str; 20] = [
    "#FF0000", // Bright Red
    "#87CEEB", // Sky Blue
    "#0000FF", // Bright Blue
    "#FFFF00", // Yellow
    "#FF00FF", // Magenta
    "#90EE90", // Light Green
    "#800080", // Purple
    "#FFA500", // Orange
    "#4682B4", // Steel Blue
    "#32CD32", // Lime Green
    "#FF1493", // Deep Pink
    "#8A2BE2", // Blue Violet
    "#FF8C00", // Dark Orange
    "#2E8B57", // Sea Green
    "#DC143C", // Crimson
    "#9932CC", // Dark Orchid
    "#40E0D0", // Turquoise
    "#FFB6C1", // Light Pink
    "#B22222", // Fire Brick
    "#20B2AA", // Light Sea Green
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub emoji: &'static str,
    pub color: &'static str,
    /// Reserved for weighted wheels; always 1.
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// The pointer element has not been rendered yet, so it cannot be measured.
    PointerNotMounted,
    NoParticipants,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::PointerNotMounted => write!(f, "Pointer element not found"),
            ResolveError::NoParticipants => write!(f, "No participants available"),
        }
    }
}

impl std::error::Error for ResolveError {}

static TRANSFORM_MATRIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"matrix.*\((.+)\)").unwrap());

/// Normalize any angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(FULL_CIRCLE_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= FULL_CIRCLE_DEG {
        0.0
    } else {
        normalized
    }
}

/// Rotation in degrees encoded in a computed CSS `transform` value.
///
/// Accepts `matrix(a, b, c, d, e, f)` and `matrix3d(...)`; `none`, empty and
/// unparseable values are treated as no rotation.
pub fn rotation_from_transform(transform: &str) -> f64 {
    let Some(captures) = TRANSFORM_MATRIX_REGEX.captures(transform.trim()) else {
        return 0.0;
    };
    let mut values = captures[1].split(',').map(|v| v.trim().parse::<f64>());
    match (values.next(), values.next()) {
        (Some(Ok(a)), Some(Ok(b))) => normalize_degrees(b.atan2(a).to_degrees()),
        _ => 0.0,
    }
}

/// Width of one segment for `count` participants.
#[inline]
pub fn segment_width(count: usize) -> f64 {
    FULL_CIRCLE_DEG / count as f64
}

/// Start and end angle of segment `index`, clockwise from 12 o'clock.
pub fn segment_bounds(index: usize, count: usize) -> (f64, f64) {
    let width = segment_width(count);
    (index as f64 * width, (index + 1) as f64 * width)
}

/// Segment containing `angle_from_top`, an angle in `[0, 360)`.
///
/// `count` must be non-zero.
#[inline]
pub fn segment_index(angle_from_top: f64, count: usize) -> usize {
    (angle_from_top / segment_width(count)).floor() as usize % count
}

/// Angle from 12 o'clock that the pointer indicates at the given rotation,
/// ignoring the offset of its rotation axis.
pub fn pointer_angle(rotation: f64) -> f64 {
    normalize_degrees(
        POINTER_BASE_ANGLE_DEG
            + normalize_degrees(rotation)
            + FULL_CIRCLE_DEG
            + TWELVE_O_CLOCK_ADJUSTMENT_DEG,
    )
}

/// Segment index for `rotation` without any layout measurement.
pub fn resolve_index_lightweight(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some(segment_index(pointer_angle(rotation), count))
}

/// Participant under the pointer, from the rotation alone.
///
/// Approximate near segment boundaries; only for live feedback.
pub fn resolve_lightweight(participants: &[Participant], rotation: f64) -> Option<&Participant> {
    resolve_index_lightweight(rotation, participants.len()).map(|idx| &participants[idx])
}

/// Measured bounding box of the pointer element, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PointerRect {
    /// Center of the box, which sits over the center of the wheel.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Where the pointer artwork rotates and where its tip is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGeometry {
    /// Rotation axis as a fraction of the box width, from the left edge.
    pub axis_x_ratio: f64,
    /// Rotation axis as a fraction of the box height, from the top edge.
    pub axis_y_ratio: f64,
    /// Distance from the axis to the indicating tip, in pixels.
    pub tip_distance: f64,
    /// Angle of the tip relative to the axis at zero rotation.
    pub base_angle: f64,
}

impl Default for PointerGeometry {
    fn default() -> Self {
        Self {
            axis_x_ratio: POINTER_AXIS_X_RATIO,
            axis_y_ratio: POINTER_AXIS_Y_RATIO,
            tip_distance: POINTER_TIP_DISTANCE_PX,
            base_angle: POINTER_BASE_ANGLE_DEG,
        }
    }
}

impl PointerGeometry {
    pub fn rotation_axis(&self, rect: &PointerRect) -> (f64, f64) {
        (
            rect.left + rect.width * self.axis_x_ratio,
            rect.top + rect.height * self.axis_y_ratio,
        )
    }

    /// Absolute position of the tip at `rotation` degrees.
    pub fn tip_position(&self, rect: &PointerRect, rotation: f64) -> (f64, f64) {
        let (axis_x, axis_y) = self.rotation_axis(rect);
        let radians = (self.base_angle + rotation).to_radians();
        (
            axis_x + radians.cos() * self.tip_distance,
            axis_y + radians.sin() * self.tip_distance,
        )
    }

    /// Angle from 12 o'clock of the line from the wheel center to the tip.
    pub fn tip_angle(&self, rect: &PointerRect, rotation: f64) -> f64 {
        let (tip_x, tip_y) = self.tip_position(rect, rotation);
        let (center_x, center_y) = rect.center();
        let raw = (tip_y - center_y).atan2(tip_x - center_x).to_degrees();
        normalize_degrees(raw + FULL_CIRCLE_DEG + TWELVE_O_CLOCK_ADJUSTMENT_DEG)
    }
}

/// Participant the pointer's tip actually lies over.
///
/// This is the authoritative resolution used to commit a result.
pub fn resolve_precise<'a>(
    participants: &'a [Participant],
    pointer: Option<&PointerRect>,
    rotation: f64,
    geometry: &PointerGeometry,
) -> Result<&'a Participant, ResolveError> {
    let rect = pointer.ok_or(ResolveError::PointerNotMounted)?;
    if participants.is_empty() {
        return Err(ResolveError::NoParticipants);
    }

    let angle = geometry.tip_angle(rect, rotation);
    let idx = segment_index(angle, participants.len());
    debug!(
        "Precise resolution: rotation {:.3}°, tip angle {:.3}°, segment {}",
        rotation, angle, idx
    );
    Ok(&participants[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn participants(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant {
                id: i.to_string(),
                name: format!("P{}", i),
                emoji: PARTICIPANT_EMOJIS[i % PARTICIPANT_EMOJIS.len()],
                color: PARTICIPANT_COLORS[i % PARTICIPANT_COLORS.len()],
                weight: 1,
            })
            .collect()
    }

    /// Rotation that puts the lightweight pointer angle at `target`.
    fn rotation_for_angle(target: f64) -> f64 {
        target - POINTER_BASE_ANGLE_DEG - TWELVE_O_CLOCK_ADJUSTMENT_DEG
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(-720.0), 0.0);
        let tiny = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_rotation_from_transform() {
        assert_eq!(rotation_from_transform("none"), 0.0);
        assert_eq!(rotation_from_transform(""), 0.0);
        assert_eq!(rotation_from_transform("matrix(1, 0, 0, 1, 0, 0)"), 0.0);
        // rotate(90deg) with a translation
        let r = rotation_from_transform("matrix(0, 1, -1, 0, -7.5, 4.8)");
        assert!((r - 90.0).abs() < 1e-9);
        // rotate(-90deg) normalizes to 270
        let r = rotation_from_transform("matrix(6.12323e-17, -1, 1, 6.12323e-17, 0, 0)");
        assert!((r - 270.0).abs() < 1e-9);
        let r = rotation_from_transform(
            "matrix3d(0.707107, 0.707107, 0, 0, -0.707107, 0.707107, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1)",
        );
        assert!((r - 45.0).abs() < 1e-4);
        assert_eq!(rotation_from_transform("matrix(garbage)"), 0.0);
    }

    #[test]
    fn test_lightweight_empty_list() {
        assert!(resolve_lightweight(&[], 123.0).is_none());
        assert_eq!(resolve_index_lightweight(123.0, 0), None);
    }

    #[test]
    fn test_lightweight_rest_position() {
        // Rest rotation -90°: -177.8 + 270 + 450 = 542.2 -> 182.2°
        let list = participants(2);
        let payer = resolve_lightweight(&list, -90.0).unwrap();
        assert_eq!(payer.id, "1");
        let list = participants(4);
        assert_eq!(resolve_lightweight(&list, -90.0).unwrap().id, "2");
    }

    #[test]
    fn test_every_segment_reachable() {
        for n in 2..=10 {
            for i in 0..n {
                let (start, end) = segment_bounds(i, n);
                let rotation = rotation_for_angle((start + end) / 2.0);
                assert_eq!(resolve_index_lightweight(rotation, n), Some(i));
            }
        }
    }

    #[test]
    fn test_segments_contiguous_and_exhaustive() {
        for n in 1..=10 {
            assert_eq!(segment_bounds(0, n).0, 0.0);
            assert!((segment_bounds(n - 1, n).1 - FULL_CIRCLE_DEG).abs() < 1e-9);
            for i in 1..n {
                assert_eq!(segment_bounds(i - 1, n).1, segment_bounds(i, n).0);
            }
        }
    }

    #[test]
    fn test_segment_index_boundaries() {
        assert_eq!(segment_index(0.0, 4), 0);
        assert_eq!(segment_index(89.999, 4), 0);
        assert_eq!(segment_index(90.0, 4), 1);
        assert_eq!(segment_index(359.999, 4), 3);
    }

    #[test]
    fn test_precise_requires_pointer_and_participants() {
        let geometry = PointerGeometry::default();
        let rect = PointerRect {
            left: 0.0,
            top: 0.0,
            width: 144.0,
            height: 144.0,
        };
        assert_eq!(
            resolve_precise(&participants(3), None, 0.0, &geometry),
            Err(ResolveError::PointerNotMounted)
        );
        assert_eq!(
            resolve_precise(&[], Some(&rect), 0.0, &geometry),
            Err(ResolveError::NoParticipants)
        );
    }

    #[test]
    fn test_precise_matches_lightweight_for_centered_axis() {
        let geometry = PointerGeometry {
            axis_x_ratio: 0.5,
            axis_y_ratio: 0.5,
            ..PointerGeometry::default()
        };
        let rect = PointerRect {
            left: 100.0,
            top: 50.0,
            width: 144.0,
            height: 144.0,
        };
        let list = participants(7);
        for step in 0..72 {
            // Stay clear of segment boundaries
            let rotation = step as f64 * 5.0 + 0.37;
            let light = resolve_lightweight(&list, rotation).unwrap();
            let precise = resolve_precise(&list, Some(&rect), rotation, &geometry).unwrap();
            assert_eq!(light, precise, "rotation {}", rotation);
        }
    }

    #[test]
    fn test_precise_uses_offset_axis() {
        let geometry = PointerGeometry::default();
        let rect = PointerRect {
            left: 0.0,
            top: 0.0,
            width: 144.0,
            height: 144.0,
        };
        // Axis at (79.5456, 67.2336), center (72, 72)
        let (ax, ay) = geometry.rotation_axis(&rect);
        assert!((ax - 79.5456).abs() < 1e-9);
        assert!((ay - 67.2336).abs() < 1e-9);

        let rotation = 270.0;
        let (tx, ty) = geometry.tip_position(&rect, rotation);
        let expected = normalize_degrees((ty - 72.0).atan2(tx - 72.0).to_degrees() + 450.0);
        assert!((geometry.tip_angle(&rect, rotation) - expected).abs() < 1e-9);

        let list = participants(5);
        let precise = resolve_precise(&list, Some(&rect), rotation, &geometry).unwrap();
        assert_eq!(*precise, list[segment_index(expected, 5)]);
    }

    proptest! {
        #[test]
        fn prop_lightweight_index_in_range(rotation in -1.0e7f64..1.0e7, n in 1usize..=10) {
            let idx = resolve_index_lightweight(rotation, n).unwrap();
            prop_assert!(idx < n);
        }

        #[test]
        fn prop_lightweight_periodic(steps in -1_000_000i64..1_000_000, turns in -50i64..50, n in 2usize..=10) {
            // Multiples of 1/64 keep the arithmetic exact
            let rotation = steps as f64 / 64.0;
            let shifted = rotation + FULL_CIRCLE_DEG * turns as f64;
            prop_assert_eq!(
                resolve_index_lightweight(rotation, n),
                resolve_index_lightweight(shifted, n)
            );
        }

        #[test]
        fn prop_precise_index_in_range(
            rotation in -1.0e6f64..1.0e6,
            left in -500.0f64..500.0,
            top in -500.0f64..500.0,
            size in 1.0f64..400.0,
            n in 1usize..=10,
        ) {
            let list = participants(n);
            let rect = PointerRect { left, top, width: size, height: size };
            let payer = resolve_precise(&list, Some(&rect), rotation, &PointerGeometry::default()).unwrap();
            prop_assert!(list.contains(payer));
        }

        #[test]
        fn prop_segment_index_matches_bounds(angle in 0.0f64..360.0, n in 1usize..=10) {
            let idx = segment_index(angle, n);
            prop_assert!(idx < n);
            let (start, end) = segment_bounds(idx, n);
            prop_assert!(angle >= start - 1e-9 && angle < end + 1e-9);
        }
    }
}
