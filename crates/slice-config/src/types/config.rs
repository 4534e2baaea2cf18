//! The build configuration record.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{BuildDirection, Fragment, MachineDescription};

/// Slicing and build parameters for one printer profile.
///
/// Scalar fields are persisted in the profile's XML document; the five
/// G-code fragments live as plain files in the profile's fragment
/// directory (see [`fragment_dir_for`](crate::fragment_dir_for)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Document this config was last loaded from or saved to.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,

    /// Projector pixels per millimetre along X.
    pub dots_per_mm_x: f64,
    /// Projector pixels per millimetre along Y.
    pub dots_per_mm_y: f64,
    /// Output image width in pixels.
    pub x_res: u32,
    /// Output image height in pixels.
    pub y_res: u32,
    /// Layer thickness in millimetres.
    pub slice_height: f64,
    /// Horizontal image offset in pixels.
    pub x_offset: i32,
    /// Vertical image offset in pixels.
    pub y_offset: i32,

    /// Exposure time per layer.
    pub layer_time_ms: u32,
    /// Exposure time for each of the first `num_first_layers` layers.
    pub first_layer_time_ms: u32,
    /// Blank (projector dark) time between layers.
    pub blank_time_ms: u32,
    /// How many bottom layers use `first_layer_time_ms`.
    pub num_first_layers: u32,

    /// Target platform temperature in degrees Celsius.
    pub platform_temp_c: i32,
    pub build_direction: BuildDirection,
    /// Distance to lift and retract between layers, in millimetres.
    pub lift_distance: f64,
    /// Machine-specific slide/tilt amount.
    pub slide_tilt_value: f64,

    /// Write the G-code script when slicing.
    pub export_gcode: bool,
    /// Write SVG slices when building.
    pub export_svg: bool,
    /// Write image slices when building.
    pub export_images: bool,

    /// Inserted at the start of the script (`start.gcode`).
    pub header_code: String,
    /// Inserted at the end of the script (`end.gcode`).
    pub footer_code: String,
    /// Inserted before each lift (`prelift.gcode`).
    pub pre_lift_code: String,
    /// Inserted after each lift (`postlift.gcode`).
    pub post_lift_code: String,
    /// Inserted before each slice (`preslice.gcode`).
    pub pre_slice_code: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            dots_per_mm_x: 102.4,
            dots_per_mm_y: 76.8,
            x_res: 1024,
            y_res: 768,
            slice_height: 0.05,
            x_offset: 0,
            y_offset: 0,
            layer_time_ms: 1000,
            first_layer_time_ms: 5000,
            blank_time_ms: 2000,
            num_first_layers: 3,
            platform_temp_c: 75,
            build_direction: BuildDirection::BottomUp,
            lift_distance: 5.0,
            slide_tilt_value: 0.0,
            export_gcode: true,
            export_svg: false,
            export_images: false,
            header_code: Fragment::Header.default_text().to_string(),
            footer_code: Fragment::Footer.default_text().to_string(),
            pre_lift_code: Fragment::PreLift.default_text().to_string(),
            post_lift_code: Fragment::PostLift.default_text().to_string(),
            pre_slice_code: Fragment::PreSlice.default_text().to_string(),
        }
    }
}

impl BuildConfig {
    /// Create a config with calibrated defaults and canned fragments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every setting and fragment from `source`.
    ///
    /// The copy is not bound to a file: `source_path` starts out `None`
    /// until the copy is loaded or saved.
    pub fn copy_from(source: &BuildConfig) -> Self {
        Self {
            source_path: None,
            ..source.clone()
        }
    }

    /// Restore every field except `source_path` to its default.
    pub fn reset_defaults(&mut self) {
        let source_path = self.source_path.take();
        *self = Self {
            source_path,
            ..Self::default()
        };
    }

    /// Restore the five fragments to their canned text.
    pub fn reset_fragments(&mut self) {
        for fragment in Fragment::ALL {
            *self.fragment_mut(fragment) = fragment.default_text().to_string();
        }
    }

    pub fn fragment(&self, fragment: Fragment) -> &str {
        match fragment {
            Fragment::Header => &self.header_code,
            Fragment::Footer => &self.footer_code,
            Fragment::PreLift => &self.pre_lift_code,
            Fragment::PostLift => &self.post_lift_code,
            Fragment::PreSlice => &self.pre_slice_code,
        }
    }

    pub fn fragment_mut(&mut self, fragment: Fragment) -> &mut String {
        match fragment {
            Fragment::Header => &mut self.header_code,
            Fragment::Footer => &mut self.footer_code,
            Fragment::PreLift => &mut self.pre_lift_code,
            Fragment::PostLift => &mut self.post_lift_code,
            Fragment::PreSlice => &mut self.pre_slice_code,
        }
    }

    /// Take projector resolution and pixel density from a machine.
    ///
    /// Only `dots_per_mm_x`, `dots_per_mm_y`, `x_res` and `y_res` change.
    pub fn adopt_machine_resolution(&mut self, machine: &impl MachineDescription) {
        self.dots_per_mm_x = machine.pix_per_mm_x();
        self.dots_per_mm_y = machine.pix_per_mm_y();
        self.x_res = machine.x_res();
        self.y_res = machine.y_res();
    }

    /// Render the parameter comment block embedded in generated G-code.
    pub fn summarize(&self) -> String {
        let mut out = String::with_capacity(640);
        // Writing to a String cannot fail.
        let _ = self.write_summary(&mut out);
        out
    }

    fn write_summary(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, "(****Build and Slicing Parameters****)\r\n")?;
        write!(out, "(pix per mm X           = {} px/mm )\r\n", self.dots_per_mm_x)?;
        write!(out, "(pix per mm Y           = {} px/mm )\r\n", self.dots_per_mm_y)?;
        write!(out, "(X resolution            = {} px )\r\n", self.x_res)?;
        write!(out, "(Y resolution            = {} px )\r\n", self.y_res)?;
        write!(out, "(X Pixel Offset          = {} px )\r\n", self.x_offset)?;
        write!(out, "(Y Pixel Offset          = {} px )\r\n", self.y_offset)?;
        write!(out, "(Layer thickness         = {} mm )\r\n", self.slice_height)?;
        write!(out, "(Layer Time              = {} ms )\r\n", self.layer_time_ms)?;
        write!(out, "(First Layer Time        = {} ms )\r\n", self.first_layer_time_ms)?;
        write!(out, "(Number of Bottom Layers = {} )\r\n", self.num_first_layers)?;
        write!(out, "(Blanking Layer Time     = {} ms )\r\n", self.blank_time_ms)?;
        write!(out, "(Build Direction         = {})\r\n", self.build_direction)?;
        write!(out, "(Lift Distance           = {} mm )\r\n", self.lift_distance)?;
        write!(out, "(Slide/Tilt Value        = {} mm )\r\n", self.slide_tilt_value)
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_summary(f)
    }
}
