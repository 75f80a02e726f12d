//! Opaque per-cell storage for field and accumulator arrays.
//!
//! The exchange never interprets these buffers. They are threaded
//! through to custom boundary handlers, which may read or write them
//! under their own conventions.

/// A flat `f32` array with a fixed number of components per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellBuffer {
    data: Vec<f32>,
    stride: usize,
}

impl CellBuffer {
    /// Zero-initialised buffer for `cells` cells of `stride` components.
    pub fn zeroed(cells: usize, stride: usize) -> Self {
        Self {
            data: vec![0.0; cells * stride],
            stride,
        }
    }

    /// Components per cell.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.data.len() / self.stride
        }
    }

    /// Components of one cell, or `None` if `cell` is out of range.
    pub fn cell(&self, cell: usize) -> Option<&[f32]> {
        let start = cell.checked_mul(self.stride)?;
        self.data.get(start..start + self.stride)
    }

    /// Mutable components of one cell, or `None` if `cell` is out of range.
    pub fn cell_mut(&mut self, cell: usize) -> Option<&mut [f32]> {
        let start = cell.checked_mul(self.stride)?;
        self.data.get_mut(start..start + self.stride)
    }

    /// Entire backing array.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Entire backing array, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_views_are_strided() {
        let mut buf = CellBuffer::zeroed(3, 4);
        assert_eq!(buf.cell_count(), 3);
        buf.cell_mut(1).unwrap()[2] = 7.0;
        assert_eq!(buf.as_slice()[6], 7.0);
        assert_eq!(buf.cell(1).unwrap(), &[0.0, 0.0, 7.0, 0.0]);
        assert!(buf.cell(3).is_none());
    }

    #[test]
    fn zero_stride_has_no_cells() {
        let buf = CellBuffer::zeroed(5, 0);
        assert_eq!(buf.cell_count(), 0);
    }
}
