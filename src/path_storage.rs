//! Path storage for scene-graph geometry.
//!
//! A flat vertex container with path commands. Rectangles become closed
//! four-vertex polygons in winding order (not strip order), so a path of a
//! transformed rect reads as its outline.

use crate::basics::{
    is_closed, is_end_poly, is_vertex, RectD, VertexD, VertexSource, PATH_CMD_END_POLY,
    PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CLOSE,
};

/// An ordered sequence of vertices, each an (x, y) coordinate and a path
/// command. Implements [`VertexSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathStorage {
    vertices: Vec<VertexD>,
    iterator: usize,
}

impl PathStorage {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            iterator: 0,
        }
    }

    /// Closed outline of `rect`: top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn from_rect(rect: &RectD) -> Self {
        let mut path = Self::new();
        path.move_to(rect.x1, rect.y1);
        path.line_to(rect.x2, rect.y1);
        path.line_to(rect.x2, rect.y2);
        path.line_to(rect.x1, rect.y2);
        path.close_polygon();
        path
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push(VertexD::new(x, y, PATH_CMD_MOVE_TO));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push(VertexD::new(x, y, PATH_CMD_LINE_TO));
    }

    /// Close the current polygon. Does nothing unless the last command
    /// carries a vertex.
    pub fn close_polygon(&mut self) {
        if is_vertex(self.last_command()) {
            self.vertices
                .push(VertexD::new(0.0, 0.0, PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        }
    }

    /// Last command, or `PATH_CMD_STOP` if empty.
    pub fn last_command(&self) -> u32 {
        self.vertices.last().map_or(PATH_CMD_STOP, |v| v.cmd)
    }

    pub fn vertices(&self) -> &[VertexD] {
        &self.vertices
    }

    /// Map every coordinate-carrying vertex through `trans`.
    pub fn transform_all_paths<F: Fn(f64, f64) -> (f64, f64)>(&mut self, trans: &F) {
        for v in &mut self.vertices {
            if is_vertex(v.cmd) {
                let (nx, ny) = trans(v.x, v.y);
                v.x = nx;
                v.y = ny;
            }
        }
    }

    /// Coordinates of the first closed four-vertex polygon, if the whole
    /// path is exactly that.
    pub fn as_closed_quad(&self) -> Option<[(f64, f64); 4]> {
        match self.vertices.as_slice() {
            [a, b, c, d, end]
                if a.cmd == PATH_CMD_MOVE_TO
                    && [b, c, d].iter().all(|v| v.cmd == PATH_CMD_LINE_TO)
                    && is_end_poly(end.cmd)
                    && is_closed(end.cmd) =>
            {
                Some([(a.x, a.y), (b.x, b.y), (c.x, c.y), (d.x, d.y)])
            }
            _ => None,
        }
    }
}

impl VertexSource for PathStorage {
    fn rewind(&mut self, path_id: u32) {
        self.iterator = path_id as usize;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.iterator >= self.vertices.len() {
            return PATH_CMD_STOP;
        }
        let v = &self.vertices[self.iterator];
        *x = v.x;
        *y = v.y;
        self.iterator += 1;
        v.cmd
    }
}
