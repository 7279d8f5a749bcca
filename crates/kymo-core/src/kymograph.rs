use crate::Error;

/// 2D kymograph: one intensity profile per scan line.
///
/// `rows` is the spatial extent of a single scan line, `lines` is the number
/// of scan lines. Storage is line-major, so [`Kymograph::line`] returns a
/// contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Kymograph<T> {
    rows: usize,
    lines: usize,
    data: Vec<T>,
}

impl<T> Kymograph<T> {
    /// Builds a kymograph from a line-major buffer.
    pub fn from_vec(rows: usize, lines: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = rows.checked_mul(lines).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { rows, lines, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn line(&self, i: usize) -> &[T] {
        assert!(i < self.lines, "scan line index out of bounds");
        let start = i * self.rows;
        &self.data[start..start + self.rows]
    }

    pub fn line_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.lines, "scan line index out of bounds");
        let start = i * self.rows;
        &mut self.data[start..start + self.rows]
    }
}

impl<T: Clone> Kymograph<T> {
    pub fn new_fill(rows: usize, lines: usize, value: T) -> Self {
        let len = rows.checked_mul(lines).expect("kymograph size overflow");
        Self {
            rows,
            lines,
            data: vec![value; len],
        }
    }
}

impl<T: Copy> Kymograph<T> {
    /// Gathers a row-major image buffer (`height` rows of `width` pixels)
    /// into line-major storage. Image columns become scan lines: the result
    /// has `rows = height` and `lines = width`.
    pub fn from_row_major(width: usize, height: usize, data: &[T]) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let mut gathered = Vec::with_capacity(expected);
        for x in 0..width {
            for y in 0..height {
                gathered.push(data[y * width + x]);
            }
        }

        Ok(Self {
            rows: height,
            lines: width,
            data: gathered,
        })
    }
}
