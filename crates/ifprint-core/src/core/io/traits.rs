use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::borrow::Cow;
use std::ops::Range;
use thiserror::Error;

/// Per-side configuration handed to a [`StructureConverter`].
pub type ConverterOptions = toml::Table;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Frame index {index} is out of range for a trajectory of {n_frames} frames")]
    FrameOutOfRange { index: usize, n_frames: usize },

    #[error("Atom index {index} is out of range for a frame of {n_atoms} atoms")]
    AtomOutOfRange { index: usize, n_atoms: usize },

    #[error("Trajectory stride must be at least 1")]
    ZeroStride,

    #[error("Invalid converter options: {0}")]
    InvalidOptions(String),

    #[error("Structure conversion failed: {0}")]
    Other(String),
}

/// One snapshot of atomic positions.
///
/// `number` is the frame's position in its source trajectory. It survives slicing, so
/// frame 30 of a trajectory read with stride 10 is still frame 30.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    number: usize,
    positions: Vec<Point3<f64>>,
}

impl Frame {
    pub fn new(number: usize, positions: Vec<Point3<f64>>) -> Self {
        Self { number, positions }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<&Point3<f64>> {
        self.positions.get(index)
    }

    pub fn n_atoms(&self) -> usize {
        self.positions.len()
    }
}

/// A random-access source of frames.
///
/// Random access lets the engine hand each parallel worker its own contiguous range
/// of frame indices without reading ahead. Indices run over `0..n_frames()`; the
/// source frame number is carried by the returned [`Frame`].
pub trait Trajectory: Sync {
    fn n_frames(&self) -> usize;

    /// Reads the frame at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::FrameOutOfRange`] for an index past the end, or
    /// any error raised by the underlying source.
    fn read_frame(&self, index: usize) -> Result<Cow<'_, Frame>, ConversionError>;
}

impl Trajectory for [Frame] {
    fn n_frames(&self) -> usize {
        self.len()
    }

    fn read_frame(&self, index: usize) -> Result<Cow<'_, Frame>, ConversionError> {
        self.get(index)
            .map(Cow::Borrowed)
            .ok_or(ConversionError::FrameOutOfRange {
                index,
                n_frames: self.len(),
            })
    }
}

impl Trajectory for Vec<Frame> {
    fn n_frames(&self) -> usize {
        self.as_slice().n_frames()
    }

    fn read_frame(&self, index: usize) -> Result<Cow<'_, Frame>, ConversionError> {
        self.as_slice().read_frame(index)
    }
}

/// A `start..stop` view of another trajectory taking every `step`-th frame.
///
/// Frames keep the numbers the underlying trajectory gave them.
#[derive(Debug, Clone, Copy)]
pub struct Strided<'a, T: ?Sized> {
    inner: &'a T,
    start: usize,
    n_frames: usize,
    step: usize,
}

impl<'a, T: Trajectory + ?Sized> Strided<'a, T> {
    /// Selects frames `range.start, range.start + step, ...` below `range.end`. The end
    /// is clamped to the length of `inner`.
    pub fn new(inner: &'a T, range: Range<usize>, step: usize) -> Result<Self, ConversionError> {
        if step == 0 {
            return Err(ConversionError::ZeroStride);
        }
        let stop = range.end.min(inner.n_frames());
        let n_frames = stop.saturating_sub(range.start).div_ceil(step);
        Ok(Self {
            inner,
            start: range.start,
            n_frames,
            step,
        })
    }
}

impl<T: Trajectory + ?Sized> Trajectory for Strided<'_, T> {
    fn n_frames(&self) -> usize {
        self.n_frames
    }

    fn read_frame(&self, index: usize) -> Result<Cow<'_, Frame>, ConversionError> {
        if index >= self.n_frames {
            return Err(ConversionError::FrameOutOfRange {
                index,
                n_frames: self.n_frames,
            });
        }
        self.inner.read_frame(self.start + index * self.step)
    }
}

/// Turns a raw frame and an atom selection into a [`Molecule`].
pub trait StructureConverter: Sync {
    /// The description of which atoms (and how they group into residues) to extract.
    type Selection: Sync + ?Sized;

    /// Converts `selection` of `frame` into a structure.
    ///
    /// # Arguments
    ///
    /// * `frame` - The positions of the current snapshot.
    /// * `selection` - The atoms to extract.
    /// * `options` - Converter-specific configuration for this side.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the selection does not fit the frame or the
    /// options are not understood.
    fn convert(
        &self,
        frame: &Frame,
        selection: &Self::Selection,
        options: &ConverterOptions,
    ) -> Result<Molecule, ConversionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_trajectory_reads_frames_by_index() {
        let frames = vec![
            Frame::new(0, vec![Point3::new(0.0, 0.0, 0.0)]),
            Frame::new(1, vec![Point3::new(1.0, 0.0, 0.0)]),
        ];
        assert_eq!(frames.n_frames(), 2);
        let second = frames.read_frame(1).unwrap();
        assert_eq!(second.position(0), Some(&Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(second.number(), 1);
        assert!(matches!(second, Cow::Borrowed(_)));
    }

    #[test]
    fn reading_past_the_end_is_an_error() {
        let frames = vec![Frame::default()];
        let err = frames.read_frame(3).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::FrameOutOfRange {
                index: 3,
                n_frames: 1
            }
        ));
    }

    fn numbered(n: usize) -> Vec<Frame> {
        (0..n).map(|k| Frame::new(k, Vec::new())).collect()
    }

    #[test]
    fn strided_view_keeps_source_frame_numbers() {
        let frames = numbered(100);
        let view = Strided::new(&frames, 0..100, 10).unwrap();
        assert_eq!(view.n_frames(), 10);
        let numbers: Vec<usize> = (0..view.n_frames())
            .map(|i| view.read_frame(i).unwrap().number())
            .collect();
        assert_eq!(numbers, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn strided_view_clamps_and_bounds_checks() {
        let frames = numbered(5);
        let view = Strided::new(&frames, 1..50, 2).unwrap();
        assert_eq!(view.n_frames(), 2);
        assert_eq!(view.read_frame(1).unwrap().number(), 3);
        assert!(matches!(
            view.read_frame(2),
            Err(ConversionError::FrameOutOfRange { index: 2, n_frames: 2 })
        ));
        assert_eq!(Strided::new(&frames, 4..2, 1).unwrap().n_frames(), 0);
        assert!(matches!(
            Strided::new(&frames, 0..5, 0),
            Err(ConversionError::ZeroStride)
        ));
    }
}
