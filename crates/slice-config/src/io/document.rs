//! Structured document (XML) reading and writing.
//!
//! The document holds every scalar setting in a fixed element order under
//! a `SliceBuildConfig` root. Reading is order-strict and all-or-nothing:
//! the whole document is parsed into [`DocumentFields`] before anything is
//! applied to a [`BuildConfig`].
//!
//! Floats are written with Rust's shortest round-trip `Display` and read
//! back with `f64::from_str`, so every value survives a save/load cycle
//! bit-for-bit.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::error::{ConfigError, Result};
use crate::types::{BuildConfig, BuildDirection, FILE_VERSION};

/// Root element name.
pub const ROOT_ELEMENT: &str = "SliceBuildConfig";

/// Scalar settings read from a document, not yet applied to a config.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFields {
    pub dots_per_mm_x: f64,
    pub dots_per_mm_y: f64,
    pub x_res: u32,
    pub y_res: u32,
    pub slice_height: f64,
    pub layer_time_ms: u32,
    pub first_layer_time_ms: u32,
    pub blank_time_ms: u32,
    pub platform_temp_c: i32,
    pub export_gcode: bool,
    pub export_svg: bool,
    pub export_images: bool,
    pub x_offset: i32,
    pub y_offset: i32,
    pub num_first_layers: u32,
    pub build_direction: BuildDirection,
    pub lift_distance: f64,
    pub slide_tilt_value: f64,
}

impl DocumentFields {
    /// Overwrite the scalar settings of `config`. Fragments and
    /// `source_path` are left alone.
    pub fn apply_to(self, config: &mut BuildConfig) {
        config.dots_per_mm_x = self.dots_per_mm_x;
        config.dots_per_mm_y = self.dots_per_mm_y;
        config.x_res = self.x_res;
        config.y_res = self.y_res;
        config.slice_height = self.slice_height;
        config.layer_time_ms = self.layer_time_ms;
        config.first_layer_time_ms = self.first_layer_time_ms;
        config.blank_time_ms = self.blank_time_ms;
        config.platform_temp_c = self.platform_temp_c;
        config.export_gcode = self.export_gcode;
        config.export_svg = self.export_svg;
        config.export_images = self.export_images;
        config.x_offset = self.x_offset;
        config.y_offset = self.y_offset;
        config.num_first_layers = self.num_first_layers;
        config.build_direction = self.build_direction;
        config.lift_distance = self.lift_distance;
        config.slide_tilt_value = self.slide_tilt_value;
    }
}

/// Element names and text values, in document order.
fn document_entries(config: &BuildConfig) -> [(&'static str, String); 19] {
    [
        ("FileVersion", FILE_VERSION.to_string()),
        ("DotsPermmX", config.dots_per_mm_x.to_string()),
        ("DotsPermmY", config.dots_per_mm_y.to_string()),
        ("XResolution", config.x_res.to_string()),
        ("YResolution", config.y_res.to_string()),
        ("SliceHeight", config.slice_height.to_string()),
        ("LayerTime", config.layer_time_ms.to_string()),
        ("FirstLayerTime", config.first_layer_time_ms.to_string()),
        ("BlankTime", config.blank_time_ms.to_string()),
        ("PlatformTemp", config.platform_temp_c.to_string()),
        ("ExportGCode", bool_text(config.export_gcode).to_string()),
        ("ExportSVG", bool_text(config.export_svg).to_string()),
        ("ExportImages", bool_text(config.export_images).to_string()),
        ("XOffset", config.x_offset.to_string()),
        ("YOffset", config.y_offset.to_string()),
        ("NumberofBottomLayers", config.num_first_layers.to_string()),
        ("Direction", config.build_direction.to_string()),
        ("LiftDistance", config.lift_distance.to_string()),
        ("SlideTiltValue", config.slide_tilt_value.to_string()),
    ]
}

fn bool_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Encode the scalar settings of `config` as an XML document.
pub fn encode_document(config: &BuildConfig) -> std::io::Result<Vec<u8>> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
    for (name, value) in document_entries(config) {
        xml.write_event(Event::Start(BytesStart::new(name)))?;
        xml.write_event(Event::Text(BytesText::new(&value)))?;
        xml.write_event(Event::End(BytesEnd::new(name)))?;
    }
    xml.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the document for `config` to `path`, replacing any existing file.
///
/// Uses atomic write (temp file + rename) so a failed save leaves the
/// previous document in place.
pub fn write_document(config: &BuildConfig, path: &Path) -> Result<()> {
    let bytes = encode_document(config).map_err(|e| ConfigError::io("encode", path, e))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);

    let mut file = File::create(&temp_path).map_err(|e| ConfigError::io("create", &temp_path, e))?;
    file.write_all(&bytes)
        .map_err(|e| ConfigError::io("write", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| ConfigError::io("sync", &temp_path, e))?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ConfigError::AtomicWriteFailed {
            temp_path,
            target_path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::debug!("Wrote build config document to {}", path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) => path.with_extension(format!("{}.tmp", ext.to_string_lossy())),
        None => path.with_extension("tmp"),
    }
}

/// Read and validate the document at `path`.
pub fn read_document(path: &Path) -> Result<DocumentFields> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::io("read", path, e))?;
    parse_document(&text, path)
}

/// Parse document text. `path` is only used for error reporting.
///
/// The version is checked before any other element is read.
pub fn parse_document(text: &str, path: &Path) -> Result<DocumentFields> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut cursor = ElementCursor::new(text, path);
    cursor.open_root()?;

    let version: u32 = cursor.value("FileVersion")?;
    if version != FILE_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: version,
            expected: FILE_VERSION,
            path: path.to_path_buf(),
        });
    }

    // Struct fields are evaluated in source order, which is document order.
    let fields = DocumentFields {
        dots_per_mm_x: cursor.value("DotsPermmX")?,
        dots_per_mm_y: cursor.value("DotsPermmY")?,
        x_res: cursor.value("XResolution")?,
        y_res: cursor.value("YResolution")?,
        slice_height: cursor.value("SliceHeight")?,
        layer_time_ms: cursor.value("LayerTime")?,
        first_layer_time_ms: cursor.value("FirstLayerTime")?,
        blank_time_ms: cursor.value("BlankTime")?,
        platform_temp_c: cursor.value("PlatformTemp")?,
        export_gcode: cursor.flag("ExportGCode")?,
        export_svg: cursor.flag("ExportSVG")?,
        export_images: cursor.flag("ExportImages")?,
        x_offset: cursor.value("XOffset")?,
        y_offset: cursor.value("YOffset")?,
        num_first_layers: cursor.value("NumberofBottomLayers")?,
        build_direction: cursor.value("Direction")?,
        lift_distance: cursor.value("LiftDistance")?,
        slide_tilt_value: cursor.value("SlideTiltValue")?,
    };

    cursor.close_root()?;
    Ok(fields)
}

/// Walks the children of the root element one at a time.
struct ElementCursor<'a> {
    reader: Reader<&'a [u8]>,
    path: &'a Path,
}

impl<'a> ElementCursor<'a> {
    fn new(text: &'a str, path: &'a Path) -> Self {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        Self { reader, path }
    }

    fn xml_error(&self, source: quick_xml::Error) -> ConfigError {
        ConfigError::Xml {
            path: self.path.to_path_buf(),
            source,
        }
    }

    /// Next opening tag as `(name, is_empty)`, or `None` at a closing tag
    /// or end of input. Declarations, comments and whitespace are skipped.
    fn next_start(&mut self) -> Result<Option<(String, bool)>> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| self.xml_error(e))?;
            match event {
                Event::Start(e) => {
                    return Ok(Some((
                        String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        false,
                    )));
                }
                Event::Empty(e) => {
                    return Ok(Some((
                        String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        true,
                    )));
                }
                Event::End(_) | Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    fn open_root(&mut self) -> Result<()> {
        match self.next_start()? {
            Some((name, false)) if name == ROOT_ELEMENT => Ok(()),
            Some((name, _)) => Err(ConfigError::UnexpectedElement {
                expected: ROOT_ELEMENT,
                found: name,
                path: self.path.to_path_buf(),
            }),
            None => Err(ConfigError::MissingElement {
                element: ROOT_ELEMENT,
                path: self.path.to_path_buf(),
            }),
        }
    }

    fn close_root(&mut self) -> Result<()> {
        match self.next_start()? {
            None => Ok(()),
            Some((name, _)) => Err(ConfigError::UnexpectedElement {
                expected: "/SliceBuildConfig",
                found: name,
                path: self.path.to_path_buf(),
            }),
        }
    }

    /// Trimmed text of the next element, which must be named `element`.
    fn text(&mut self, element: &'static str) -> Result<String> {
        let (name, empty) = match self.next_start()? {
            Some(found) => found,
            None => {
                return Err(ConfigError::MissingElement {
                    element,
                    path: self.path.to_path_buf(),
                });
            }
        };
        if name != element {
            return Err(ConfigError::UnexpectedElement {
                expected: element,
                found: name,
                path: self.path.to_path_buf(),
            });
        }
        if empty {
            return Ok(String::new());
        }

        let raw = self
            .reader
            .read_text(QName(element.as_bytes()))
            .map_err(|e| self.xml_error(e))?;
        let unescaped =
            quick_xml::escape::unescape(&raw).map_err(|e| ConfigError::InvalidValue {
                element,
                value: raw.to_string(),
                reason: e.to_string(),
                path: self.path.to_path_buf(),
            })?;
        Ok(unescaped.trim().to_string())
    }

    fn value<T>(&mut self, element: &'static str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let text = self.text(element)?;
        text.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            element,
            reason: e.to_string(),
            value: text,
            path: self.path.to_path_buf(),
        })
    }

    /// Booleans are written `True`/`False`; any casing is accepted back.
    fn flag(&mut self, element: &'static str) -> Result<bool> {
        let text = self.text(element)?;
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConfigError::InvalidValue {
                element,
                value: text,
                reason: "expected True or False".to_string(),
                path: self.path.to_path_buf(),
            })
        }
    }
}
