//! G-code fragment slots and their canned defaults.

use std::fmt;

const DEFAULT_HEADER: &str = "(********** Header Start ********)\r\n\
(Generated by UV - DLP Slicer)\r\n\
G21 (Set units to be mm)\r\n\
G91 (Relative Positioning)\r\n\
M17 (Enable motors)\r\n\
(********** Header End **********)\r\n";

const DEFAULT_FOOTER: &str = "(********** Footer Start ********)\r\n\
\r\n\
(<Completed>)\r\n\
(********** Footer End ********)\r\n";

const DEFAULT_BLANK: &str = "\r\n";

/// One of the five G-code fragments injected into a build script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// Emitted once at the start of the script.
    Header,
    /// Emitted once at the end of the script.
    Footer,
    /// Emitted before every lift.
    PreLift,
    /// Emitted after every lift.
    PostLift,
    /// Emitted before every slice is exposed.
    PreSlice,
}

impl Fragment {
    /// All fragments, in the order their files are read and written.
    pub const ALL: [Fragment; 5] = [
        Fragment::Header,
        Fragment::Footer,
        Fragment::PreLift,
        Fragment::PostLift,
        Fragment::PreSlice,
    ];

    /// File name inside the profile's fragment directory.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Header => "start.gcode",
            Self::Footer => "end.gcode",
            Self::PreLift => "prelift.gcode",
            Self::PostLift => "postlift.gcode",
            Self::PreSlice => "preslice.gcode",
        }
    }

    /// Canned text used when the fragment has never been customised.
    pub const fn default_text(&self) -> &'static str {
        match self {
            Self::Header => DEFAULT_HEADER,
            Self::Footer => DEFAULT_FOOTER,
            Self::PreLift | Self::PostLift | Self::PreSlice => DEFAULT_BLANK,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
            Self::PreLift => "pre-lift",
            Self::PostLift => "post-lift",
            Self::PreSlice => "pre-slice",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
