// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides coordinate transformations between screen
//! coordinates and the rendered frame image's local pixel space.

use crate::models::Point;

/// Screen-space rectangle the frame image is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Convert a pointer position to image-local coordinates.
///
/// Returns `None` when the position falls outside `[0, width] × [0, height]`.
pub fn to_image_space(pointer_x: f64, pointer_y: f64, rect: &ImageRect) -> Option<Point> {
    let x = pointer_x - rect.left;
    let y = pointer_y - rect.top;
    // Comparisons are false for NaN, so non-finite input is rejected too
    let inside = (0.0..=rect.width).contains(&x) && (0.0..=rect.height).contains(&y);
    inside.then(|| Point::new(x, y))
}

/// Convert image-local coordinates back to screen coordinates.
pub fn to_screen_space(point: &Point, rect: &ImageRect) -> (f64, f64) {
    (rect.left + point.x, rect.top + point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_screen_roundtrip() {
        let rect = ImageRect::new(120.0, 45.0, 640.0, 480.0);

        let point = to_image_space(400.0, 300.0, &rect).unwrap();
        let (x, y) = to_screen_space(&point, &rect);

        assert!((x - 400.0).abs() < 0.0001);
        assert!((y - 300.0).abs() < 0.0001);
    }

    #[test]
    fn test_corners_are_inside() {
        let rect = ImageRect::new(10.0, 10.0, 100.0, 50.0);

        // Top-left corner
        let tl = to_image_space(10.0, 10.0, &rect).unwrap();
        assert_eq!(tl, Point::new(0.0, 0.0));

        // Bottom-right corner
        let br = to_image_space(110.0, 60.0, &rect).unwrap();
        assert_eq!(br, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_outside_is_rejected() {
        let rect = ImageRect::new(10.0, 10.0, 100.0, 50.0);

        assert!(to_image_space(9.9, 20.0, &rect).is_none());
        assert!(to_image_space(20.0, 60.1, &rect).is_none());
        assert!(to_image_space(110.5, 20.0, &rect).is_none());
        assert!(to_image_space(f64::NAN, 20.0, &rect).is_none());
    }
}
