//! Axis-aligned bounds of a vertex source.

use crate::basics::{is_stop, is_vertex, RectD, VertexSource};

#[derive(Default)]
struct Extent {
    rect: Option<RectD>,
}

impl Extent {
    fn add(&mut self, x: f64, y: f64) {
        match &mut self.rect {
            None => self.rect = Some(RectD::new(x, y, x, y)),
            Some(r) => {
                r.x1 = r.x1.min(x);
                r.y1 = r.y1.min(y);
                r.x2 = r.x2.max(x);
                r.y2 = r.y2.max(y);
            }
        }
    }

    fn scan(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let mut x = 0.0;
        let mut y = 0.0;
        vs.rewind(path_id);
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            if is_vertex(cmd) {
                self.add(x, y);
            }
        }
    }
}

/// Bounds of the path starting at `path_id`, or `None` if it has no
/// vertices. Non-finite coordinates are ignored by `min`/`max` unless every
/// coordinate is NaN.
pub fn bounding_rect_single(vs: &mut dyn VertexSource, path_id: u32) -> Option<RectD> {
    let mut extent = Extent::default();
    extent.scan(vs, path_id);
    extent.rect
}
