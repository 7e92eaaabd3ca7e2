//! Page sizing: every page takes the aspect ratio of its image and is bounded
//! by a reference page.

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, 8.5 × 11 in.
    pub const LETTER: PageSize = PageSize { width: 612.0, height: 792.0 };

    pub fn aspect(&self) -> f64 {
        self.height / self.width
    }
}

/// Final size of one output page, in whole points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
}

impl PageGeometry {
    /// Fits an image of `image_width` × `image_height` pixels against `reference`.
    ///
    /// Images taller than the reference keep the reference height; all others
    /// keep the reference width. The free dimension follows the image's
    /// aspect ratio, rounded to the nearest point and never below 1.
    /// Returns `None` when either pixel dimension is zero.
    pub fn fit(image_width: u32, image_height: u32, reference: PageSize) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }

        let aspect = image_height as f64 / image_width as f64;

        let (width, height) = if aspect > reference.aspect() {
            (reference.height / aspect, reference.height)
        } else {
            (reference.width, reference.width * aspect)
        };

        Some(Self {
            width: to_points(width),
            height: to_points(height),
        })
    }
}

fn to_points(value: f64) -> u32 {
    (value.round() as u32).max(1)
}
