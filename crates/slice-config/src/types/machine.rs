//! Machine description seam.
//!
//! The full machine model lives with the printer driver; a build config
//! only ever needs its projector resolution and pixel density.

use serde::{Deserialize, Serialize};

/// Anything that can report a projector's resolution and pixel density.
pub trait MachineDescription {
    /// Projector pixels per millimetre along X.
    fn pix_per_mm_x(&self) -> f64;
    /// Projector pixels per millimetre along Y.
    fn pix_per_mm_y(&self) -> f64;
    /// Horizontal resolution in pixels.
    fn x_res(&self) -> u32;
    /// Vertical resolution in pixels.
    fn y_res(&self) -> u32;
}

/// Bare resolution values, for callers without a full machine model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineResolution {
    pub pix_per_mm_x: f64,
    pub pix_per_mm_y: f64,
    pub x_res: u32,
    pub y_res: u32,
}

impl MachineDescription for MachineResolution {
    fn pix_per_mm_x(&self) -> f64 {
        self.pix_per_mm_x
    }

    fn pix_per_mm_y(&self) -> f64 {
        self.pix_per_mm_y
    }

    fn x_res(&self) -> u32 {
        self.x_res
    }

    fn y_res(&self) -> u32 {
        self.y_res
    }
}
