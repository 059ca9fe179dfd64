use objpose_image::{ImageError, Mask};

/// Axis-aligned bounding box of a mask in pixel coordinates.
///
/// The box follows the (y1, x1, y2, x2) convention where `y2` and `x2` are exclusive, i.e.
/// one past the last row and column covered by the mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Top row.
    pub y1: f32,
    /// Left column.
    pub x1: f32,
    /// Bottom row, exclusive.
    pub y2: f32,
    /// Right column, exclusive.
    pub x2: f32,
}

/// Integer pixel bounds used to slice images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    /// Top row.
    pub y1: usize,
    /// Left column.
    pub x1: usize,
    /// Bottom row, exclusive.
    pub y2: usize,
    /// Right column, exclusive.
    pub x2: usize,
}

impl BoundingBox {
    /// Round the box corners to integer pixel bounds.
    pub fn round(&self) -> PixelBox {
        PixelBox {
            y1: self.y1.round().max(0.0) as usize,
            x1: self.x1.round().max(0.0) as usize,
            y2: self.y2.round().max(0.0) as usize,
            x2: self.x2.round().max(0.0) as usize,
        }
    }
}

impl PixelBox {
    /// Width of the box in pixels.
    pub fn width(&self) -> usize {
        self.x2.saturating_sub(self.x1)
    }

    /// Height of the box in pixels.
    pub fn height(&self) -> usize {
        self.y2.saturating_sub(self.y1)
    }
}

/// Compute the minimal bounding box containing every pixel set in `mask`.
///
/// # Errors
///
/// Returns [`ImageError::EmptyMask`] when no pixel is set, since no extent exists.
///
/// # Examples
///
/// ```
/// use objpose_image::{ImageSize, Mask};
/// use objpose_imgproc::bbox::mask_to_bbox;
///
/// #[rustfmt::skip]
/// let mask = Mask::new(ImageSize { width: 4, height: 3 }, vec![
///     false, false, false, false,
///     false, true,  true,  false,
///     false, false, true,  false,
/// ]).unwrap();
///
/// let bbox = mask_to_bbox(&mask).unwrap().round();
/// assert_eq!((bbox.y1, bbox.x1, bbox.y2, bbox.x2), (1, 1, 3, 3));
/// ```
pub fn mask_to_bbox(mask: &Mask) -> Result<BoundingBox, ImageError> {
    let cols = mask.cols();
    let mut extent: Option<(usize, usize, usize, usize)> = None;

    for (i, _) in mask.as_slice().iter().enumerate().filter(|(_, &v)| v) {
        let (y, x) = (i / cols, i % cols);
        extent = Some(match extent {
            None => (y, x, y, x),
            Some((y1, x1, y2, x2)) => (y1.min(y), x1.min(x), y2.max(y), x2.max(x)),
        });
    }

    let (y1, x1, y2, x2) = extent.ok_or(ImageError::EmptyMask)?;

    Ok(BoundingBox {
        y1: y1 as f32,
        x1: x1 as f32,
        y2: (y2 + 1) as f32,
        x2: (x2 + 1) as f32,
    })
}

/// Compute the bounding boxes of a sequence of masks.
///
/// Fails on the first empty mask.
pub fn masks_to_bboxes(masks: &[Mask]) -> Result<Vec<BoundingBox>, ImageError> {
    masks.iter().map(mask_to_bbox).collect()
}
