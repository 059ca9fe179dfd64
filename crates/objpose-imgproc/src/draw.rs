use crate::bbox::PixelBox;
use objpose_image::Image;

/// Set a square of side `2 * half + 1` centered at (x, y), clipped to the image.
fn stamp<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, half: i64, color: [u8; C]) {
    let (cols, rows) = (img.cols() as i64, img.rows() as i64);
    for v in (y - half).max(0)..=(y + half).min(rows - 1) {
        for u in (x - half).max(0)..=(x + half).min(cols - 1) {
            let start = (v as usize * cols as usize + u as usize) * C;
            img.as_slice_mut()[start..start + C].copy_from_slice(&color);
        }
    }
}

/// Draw a straight line between two pixels, both included.
///
/// Pixels outside the image are skipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start pixel as (x, y).
/// * `p1` - The end pixel as (x, y).
/// * `color` - The line color.
/// * `line_width` - The line width in pixels.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    line_width: usize,
) {
    let half = line_width.saturating_sub(1) as i64 / 2;
    let (mut x, mut y) = p0;
    let (dx, dy) = ((p1.0 - x).abs(), -(p1.1 - y).abs());
    let (sx, sy) = ((p1.0 - x).signum(), (p1.1 - y).signum());
    let mut err = dx + dy;

    loop {
        stamp(img, x, y, half, color);
        if (x, y) == p1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Outline the pixels covered by a box.
///
/// The outline runs along the first and last covered rows and columns. Empty boxes draw
/// nothing.
pub fn draw_box<const C: usize>(
    img: &mut Image<u8, C>,
    bbox: &PixelBox,
    color: [u8; C],
    line_width: usize,
) {
    if bbox.width() == 0 || bbox.height() == 0 {
        return;
    }
    let (left, top) = (bbox.x1 as i64, bbox.y1 as i64);
    let (right, bottom) = (bbox.x2 as i64 - 1, bbox.y2 as i64 - 1);

    draw_line(img, (left, top), (right, top), color, line_width);
    draw_line(img, (left, bottom), (right, bottom), color, line_width);
    draw_line(img, (left, top), (left, bottom), color, line_width);
    draw_line(img, (right, top), (right, bottom), color, line_width);
}
