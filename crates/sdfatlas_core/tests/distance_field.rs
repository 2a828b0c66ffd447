//! Numerical properties of the dead-reckoning transform

use sdfatlas_core::{DistanceField, GrayscaleBitmap};

fn is_boundary(bitmap: &GrayscaleBitmap, x: u32, y: u32) -> bool {
    if x == 0 || y == 0 || x + 1 >= bitmap.width() || y + 1 >= bitmap.height() {
        return false;
    }
    let here = bitmap.is_inside(x, y);
    bitmap.is_inside(x - 1, y) != here
        || bitmap.is_inside(x + 1, y) != here
        || bitmap.is_inside(x, y - 1) != here
        || bitmap.is_inside(x, y + 1) != here
}

fn circle(size: u32, radius: f32) -> GrayscaleBitmap {
    let c = size as f32 / 2.0;
    GrayscaleBitmap::from_fn(size, size, |x, y| {
        let dx = x as f32 - c;
        let dy = y as f32 - c;
        dx * dx + dy * dy <= radius * radius
    })
}

#[test]
fn test_circle_signs() {
    let bitmap = circle(32, 8.0);
    let field = DistanceField::from_bitmap(&bitmap).unwrap();

    for y in 0..32 {
        for x in 0..32 {
            let d = field.get(x, y);
            if is_boundary(&bitmap, x, y) {
                assert!(d.abs() <= 1.0, "boundary ({}, {}) = {}", x, y, d);
            } else if bitmap.is_inside(x, y) {
                assert!(d > 0.0, "inside ({}, {}) = {}", x, y, d);
            } else {
                assert!(d < 0.0, "outside ({}, {}) = {}", x, y, d);
            }
        }
    }
}

#[test]
fn test_circle_close_to_nearest_boundary_pixel() {
    let bitmap = circle(32, 8.0);
    let field = DistanceField::from_bitmap(&bitmap).unwrap();

    let boundary: Vec<(f32, f32)> = (0..32)
        .flat_map(|y| (0..32).map(move |x| (x, y)))
        .filter(|&(x, y)| is_boundary(&bitmap, x, y))
        .map(|(x, y)| (x as f32, y as f32))
        .collect();
    assert!(!boundary.is_empty());

    // Stay clear of the trailing rows and columns the scans never reconcile
    for y in 2..29 {
        for x in 2..29 {
            let exact = boundary
                .iter()
                .map(|&(bx, by)| (x as f32 - bx).hypot(y as f32 - by))
                .fold(f32::INFINITY, f32::min);
            let got = field.get(x, y).abs();
            assert!(
                (got - exact).abs() < 1.5,
                "({}, {}): got {}, nearest boundary pixel at {}",
                x,
                y,
                got,
                exact
            );
        }
    }
}

#[test]
fn test_vertical_edge_is_exact() {
    // Columns 0..8 inside; boundary pixels sit in columns 7 and 8
    let (w, h) = (16, 12);
    let bitmap = GrayscaleBitmap::from_fn(w, h, |x, _| x < 8);
    let field = DistanceField::from_bitmap(&bitmap).unwrap();

    for y in 1..h - 2 {
        for x in 1..w - 2 {
            let d = field.get(x, y);
            if x < 8 {
                assert_eq!(d, (7 - x) as f32, "inside ({}, {})", x, y);
            } else {
                assert_eq!(d.abs(), (x - 8) as f32, "outside ({}, {})", x, y);
                assert!(d.is_sign_negative());
            }
        }
    }
}

#[test]
fn test_horizontal_edge_is_exact() {
    // Rows 0..8 inside; boundary pixels sit in rows 7 and 8
    let (w, h) = (12, 16);
    let bitmap = GrayscaleBitmap::from_fn(w, h, |_, y| y < 8);
    let field = DistanceField::from_bitmap(&bitmap).unwrap();

    for y in 1..h - 2 {
        for x in 1..w - 2 {
            let d = field.get(x, y);
            if y < 8 {
                assert_eq!(d, (7 - y) as f32, "inside ({}, {})", x, y);
            } else {
                assert_eq!(d.abs(), (y - 8) as f32, "outside ({}, {})", x, y);
                assert!(d.is_sign_negative());
            }
        }
    }
}

#[test]
fn test_border_ring_keeps_initial_magnitude() {
    let bitmap = circle(20, 4.0);
    let field = DistanceField::from_bitmap(&bitmap).unwrap();
    let infinity = 20f32.hypot(20.0);

    for i in 0..20 {
        assert_eq!(field.get(i, 0), -infinity);
        assert_eq!(field.get(0, i), -infinity);
        assert_eq!(field.get(i, 19), -infinity);
        assert_eq!(field.get(19, i), -infinity);
    }
}
