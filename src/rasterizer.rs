// Rasterizer module: polylines into a 1-bit packed mask.
//
// Rendering one frame runs in two passes: every record's segments are drawn
// with clipped Bresenham lines, then (optionally) each record is filled with an
// even-odd scanline pass that redraws its horizontal and closing edges. Setting
// a bit is idempotent, so drawing an edge twice is harmless.

use crate::records::{decode_polyline, Point};

/// Bit-packed mask, row-major; pixel `(x, y)` is bit `(y*width + x) % 8`
/// (least significant first) of byte `(y*width + x) / 8`.
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl std::fmt::Debug for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("set", &self.count_set())
            .finish()
    }
}

/// Bytes needed for a `width x height` mask: `ceil(width*height / 8)`
pub fn mask_len(width: u32, height: u32) -> usize {
    ((width as u64 * height as u64 + 7) / 8) as usize
}

/// Set pixel `(x, y)` in a raw packed buffer; out-of-bounds coordinates are ignored.
pub fn set_pixel(mask: &mut [u8], width: u32, height: u32, x: i64, y: i64) {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return;
    }
    let index = y as u64 * width as u64 + x as u64;
    if let Some(byte) = mask.get_mut((index >> 3) as usize) {
        *byte |= 1 << (index & 7);
    }
}

impl Mask {
    /// All-clear mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, bits: vec![0; mask_len(width, height)] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    pub fn set_pixel(&mut self, x: i64, y: i64) {
        set_pixel(&mut self.bits, self.width, self.height, x, y);
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as u64 * self.width as u64 + x as u64;
        self.bits[(index >> 3) as usize] & (1 << (index & 7)) != 0
    }

    /// Number of set pixels.
    pub fn count_set(&self) -> u64 {
        self.bits.iter().map(|b| b.count_ones() as u64).sum()
    }

    /// One byte per pixel, 0 or 255, row-major.
    pub fn to_gray8(&self) -> Vec<u8> {
        let total = self.width as usize * self.height as usize;
        (0..total)
            .map(|i| if self.bits[i >> 3] & (1 << (i & 7)) != 0 { 255 } else { 0 })
            .collect()
    }

    /// Set every pixel from `x_start` to `x_end` inclusive on row `y`.
    fn fill_span(&mut self, y: i64, x_start: i64, x_end: i64) {
        for x in x_start..=x_end {
            self.set_pixel(x, y);
        }
    }
}

/// Liang-Barsky clip of a segment against `[0, width-1] x [0, height-1]`.
///
/// Returns `None` when no part of the segment is inside; otherwise the clipped
/// endpoints rounded half-to-even.
pub fn clip_line(x0: i32, y0: i32, x1: i32, y1: i32, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
    let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
    let x_max = width as i64 - 1;
    let y_max = height as i64 - 1;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let p = [-dx, dx, -dy, dy];
    let q = [x0, x_max - x0, y0, y_max - y0];

    let mut u1 = 0.0f64;
    let mut u2 = 1.0f64;
    for (&pi, &qi) in p.iter().zip(q.iter()) {
        if pi == 0 {
            if qi < 0 {
                return None;
            }
            continue;
        }
        let t = qi as f64 / pi as f64;
        if pi < 0 {
            if t > u2 {
                return None;
            }
            if t > u1 {
                u1 = t;
            }
        } else {
            if t < u1 {
                return None;
            }
            if t < u2 {
                u2 = t;
            }
        }
    }
    let at = |origin: i64, delta: i64, u: f64| (origin as f64 + u * delta as f64).round_ties_even() as i32;
    Some((at(x0, dx, u1), at(y0, dy, u1), at(x0, dx, u2), at(y0, dy, u2)))
}

/// Draw a clipped Bresenham line, both endpoints included.
pub fn draw_line(mask: &mut Mask, x0: i32, y0: i32, x1: i32, y1: i32) {
    let Some((cx0, cy0, cx1, cy1)) = clip_line(x0, y0, x1, y1, mask.width, mask.height) else {
        return;
    };
    let (mut x, mut y) = (cx0 as i64, cy0 as i64);
    let (x1, y1) = (cx1 as i64, cy1 as i64);
    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    loop {
        mask.set_pixel(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// X where a non-horizontal edge crosses scanline `y`, rounded half-to-even.
fn scanline_x(edge: (Point, Point), y: i64) -> i64 {
    let ((x0, y0), (x1, y1)) = edge;
    if x0 == x1 {
        return x0 as i64;
    }
    let t = (y - y0 as i64) as f64 / (y1 as i64 - y0 as i64) as f64;
    (x0 as f64 + t * (x1 as i64 - x0 as i64) as f64).round_ties_even() as i64
}

/// Even-odd scanline fill of the polygon through `points`.
///
/// Horizontal edges are drawn as lines and do not cross scanlines. An open
/// polygon gets an implicit closing edge, drawn and (unless horizontal)
/// intersected. Edge y-ranges are upper-exclusive so shared vertices count once.
pub fn fill_polygon(mask: &mut Mask, points: &[Point]) {
    if points.len() < 3 {
        return;
    }
    let mut edges: Vec<(Point, Point)> = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.1 == b.1 {
            draw_line(mask, a.0, a.1, b.0, b.1);
            continue;
        }
        edges.push((a, b));
    }
    let (first, last) = (points[0], points[points.len() - 1]);
    if first != last {
        if last.1 != first.1 {
            edges.push((last, first));
        }
        draw_line(mask, last.0, last.1, first.0, first.1);
    }
    if edges.is_empty() {
        return;
    }

    // rows outside every edge's range have no crossings
    let y_lo = edges.iter().map(|(a, b)| a.1.min(b.1) as i64).min().unwrap_or(0).max(0);
    let y_hi = edges.iter().map(|(a, b)| a.1.max(b.1) as i64).max().unwrap_or(0).min(mask.height as i64);
    let x_max = mask.width as i64 - 1;

    let mut xs: Vec<i64> = Vec::with_capacity(edges.len());
    for y in y_lo..y_hi {
        xs.clear();
        for &edge in &edges {
            let ((_, y0), (_, y1)) = edge;
            let (ymin, ymax) = (y0.min(y1) as i64, y0.max(y1) as i64);
            if y < ymin || y >= ymax {
                continue;
            }
            xs.push(scanline_x(edge, y));
        }
        xs.sort_unstable();
        for pair in xs.chunks_exact(2) {
            let x_start = pair[0].max(0);
            let x_end = pair[1].min(x_max);
            if x_end < x_start {
                continue;
            }
            mask.fill_span(y, x_start, x_end);
        }
    }
}

/// Draw consecutive segments of `points`, then fill if requested.
pub fn render_points(mask: &mut Mask, points: &[Point], fill: bool) {
    for pair in points.windows(2) {
        draw_line(mask, pair[0].0, pair[0].1, pair[1].0, pair[1].1);
    }
    if fill {
        fill_polygon(mask, points);
    }
}

/// Render a frame's records into a fresh mask.
#[tracing::instrument(level = "trace", skip(records))]
pub fn render_frame<'a, I>(records: I, width: u32, height: u32, fill: bool) -> Mask
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut mask = Mask::new(width, height);
    for record in records {
        let points = decode_polyline(record);
        render_points(&mut mask, &points, fill);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testlib::encode_polyline;
    use proptest::prelude::*;

    fn set_pixels(mask: &Mask) -> Vec<(u32, u32)> {
        let mut out = vec![];
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn row_span(mask: &Mask, y: u32) -> Vec<u32> {
        (0..mask.width()).filter(|&x| mask.get(x, y)).collect()
    }

    #[test]
    fn mask_sizing() {
        assert_eq!(mask_len(3, 3), 2);
        assert_eq!(mask_len(8, 1), 1);
        assert_eq!(mask_len(0, 100), 0);
        assert_eq!(Mask::new(1920, 1080).as_bytes().len(), 1920 * 1080 / 8);
    }

    #[test]
    fn set_pixel_bit_order() {
        let mut buf = vec![0u8; mask_len(3, 3)];
        set_pixel(&mut buf, 3, 3, 2, 2); // index 8
        set_pixel(&mut buf, 3, 3, 1, 0); // index 1
        assert_eq!(buf, vec![0b0000_0010, 0b0000_0001]);
        set_pixel(&mut buf, 3, 3, 3, 0);
        set_pixel(&mut buf, 3, 3, -1, 1);
        set_pixel(&mut buf, 3, 3, 0, 3);
        assert_eq!(buf, vec![0b0000_0010, 0b0000_0001]);
    }

    #[test]
    fn clip_outside_is_none() {
        assert_eq!(clip_line(-10, -10, -5, -5, 100, 100), None);
        assert_eq!(clip_line(150, 0, 150, 99, 100, 100), None);
        assert_eq!(clip_line(0, -1, 99, -1, 100, 100), None);
    }

    #[test]
    fn clip_partial_and_inside() {
        assert_eq!(clip_line(-5, 5, 5, 5, 10, 10), Some((0, 5, 5, 5)));
        assert_eq!(clip_line(2, 3, 7, 8, 10, 10), Some((2, 3, 7, 8)));
        assert_eq!(clip_line(-10, -10, 20, 20, 10, 10), Some((0, 0, 9, 9)));
        assert_eq!(clip_line(4, 4, 4, 4, 10, 10), Some((4, 4, 4, 4)));
    }

    #[test]
    fn diagonal_line_sets_exact_bits() {
        let mut mask = Mask::new(8, 8);
        draw_line(&mut mask, 0, 0, 3, 3);
        assert_eq!(set_pixels(&mask), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn lines_in_every_direction() {
        let mut mask = Mask::new(16, 16);
        draw_line(&mut mask, 10, 2, 2, 2);
        assert_eq!(row_span(&mask, 2), (2..=10).collect::<Vec<_>>());

        let mut steep = Mask::new(16, 16);
        draw_line(&mut steep, 1, 9, 3, 1);
        assert_eq!(steep.count_set(), 9);
        assert!(steep.get(1, 9) && steep.get(3, 1));
    }

    #[test]
    fn clipped_line_stays_inside() {
        let mut mask = Mask::new(4, 4);
        draw_line(&mut mask, -100, 1, 100, 1);
        assert_eq!(set_pixels(&mask), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn scanline_rounding_is_half_to_even() {
        assert_eq!(scanline_x(((0, 0), (1, 2)), 1), 0);
        assert_eq!(scanline_x(((0, 0), (3, 2)), 1), 2);
        assert_eq!(scanline_x(((5, 0), (5, 9)), 4), 5);
    }

    #[test]
    fn fill_right_triangle() {
        let mut mask = Mask::new(8, 8);
        fill_polygon(&mut mask, &[(0, 0), (4, 0), (0, 4)]);
        // inclusive spans between the two crossings of each row
        assert_eq!(row_span(&mask, 0), vec![0, 1, 2, 3, 4]);
        assert_eq!(row_span(&mask, 1), vec![0, 1, 2, 3]);
        assert_eq!(row_span(&mask, 2), vec![0, 1, 2]);
        assert_eq!(row_span(&mask, 3), vec![0, 1]);
        // the bottom vertex comes from the closing edge only
        assert_eq!(row_span(&mask, 4), vec![0]);
        assert_eq!(mask.count_set(), 15);
    }

    #[test]
    fn fill_needs_three_points() {
        let mut mask = Mask::new(8, 8);
        fill_polygon(&mut mask, &[(0, 0), (5, 5)]);
        assert_eq!(mask.count_set(), 0);
    }

    #[test]
    fn test_rasterize_square() {
        // (0,0) -> (10,0) -> (10,10) -> (0,10) -> (0,0)
        let record = encode_polyline(&[(0, 0), (10, 0), (10, 10), (0, 10), (0, 0)]);
        let mask = render_frame([record.as_slice()], 16, 16, true);
        assert!(mask.get(5, 5));
        assert!(!mask.get(15, 15));
        assert!(!mask.get(11, 5));
        assert_eq!(mask.count_set(), 121);
    }

    #[test]
    fn outline_only_without_fill() {
        let record = encode_polyline(&[(0, 0), (10, 0), (10, 10), (0, 10), (0, 0)]);
        let mask = render_frame([record.as_slice()], 16, 16, false);
        assert!(!mask.get(5, 5));
        assert_eq!(mask.count_set(), 40);
    }

    #[test]
    fn test_rasterize_triangle() {
        // (0,0) -> (15,0) -> (7,15) -> (0,0)
        let data = vec![0, 0, 0, 0, 15, 0, 248, 15, 249, 241];
        let mask = render_frame([data.as_slice()], 16, 16, true);
        assert_eq!(mask.as_bytes().len(), 32);
        assert!(mask.get(7, 7));
        assert!(!mask.get(0, 15));
    }

    #[test]
    fn polygon_partly_off_canvas() {
        let record = encode_polyline(&[(0, 0), (20, 0), (20, 20), (0, 20), (0, 0)]);
        let mut mask = Mask::new(8, 8);
        render_points(&mut mask, &crate::records::decode_polyline(&record), true);
        assert_eq!(mask.count_set(), 64);
    }

    #[test]
    fn filling_twice_changes_nothing() {
        let points = [(1, 1), (12, 3), (6, 13), (1, 1)];
        let mut once = Mask::new(16, 16);
        render_points(&mut once, &points, true);
        let mut twice = once.clone();
        render_points(&mut twice, &points, true);
        assert_eq!(once, twice);
    }

    #[test]
    fn gray8_expansion() {
        let mut mask = Mask::new(3, 2);
        mask.set_pixel(0, 0);
        mask.set_pixel(2, 1);
        assert_eq!(mask.to_gray8(), vec![255, 0, 0, 0, 0, 255]);
    }

    proptest! {
        #[test]
        fn fuzz_render_does_not_panic(data in proptest::collection::vec(any::<u8>(), 0..128), w in 0u32..32, h in 0u32..32, fill in any::<bool>()) {
            let mask = render_frame([data.as_slice()], w, h, fill);
            prop_assert_eq!(mask.as_bytes().len(), mask_len(w, h));
        }

        #[test]
        fn clipped_endpoints_are_inside(x0 in -200i32..200, y0 in -200i32..200, x1 in -200i32..200, y1 in -200i32..200) {
            if let Some((a, b, c, d)) = clip_line(x0, y0, x1, y1, 50, 40) {
                prop_assert!((0..50).contains(&a) && (0..50).contains(&c));
                prop_assert!((0..40).contains(&b) && (0..40).contains(&d));
            }
        }
    }
}
