//! Command implementations.
//!
//! Each command returns what it would print so it can be exercised
//! without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tracing::info_span;

use slice_config::{
    BuildConfig, ConfigError, Fragment, FragmentReport, FragmentStatus, MachineResolution,
    ProfileStore, fragment_dir_for,
};

/// Output format for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFormat {
    #[default]
    Table,
    Json,
}

/// Write a default profile to `profile`.
pub fn run_init(profile: &Path, force: bool) -> Result<BuildConfig> {
    if profile.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            profile.display()
        );
    }
    let store = ProfileStore::new();
    let mut config = BuildConfig::new();
    store.try_save(&mut config, profile).map_err(describe)?;
    Ok(config)
}

pub fn run_show(profile: &Path, format: ShowFormat) -> Result<String> {
    let config = load_profile(&ProfileStore::new(), profile)?;
    match format {
        ShowFormat::Table => Ok(settings_table(&config).to_string()),
        ShowFormat::Json => serde_json::to_string_pretty(&config).context("serialize profile"),
    }
}

pub fn run_summary(profile: &Path) -> Result<String> {
    let config = load_profile(&ProfileStore::new(), profile)?;
    Ok(config.summarize())
}

/// Load `profile`, take resolution values from `machine`, save it back.
pub fn run_adopt(profile: &Path, machine: MachineResolution) -> Result<BuildConfig> {
    let store = ProfileStore::new();
    let mut config = load_profile(&store, profile)?;
    config.adopt_machine_resolution(&machine);
    store.try_save(&mut config, profile).map_err(describe)?;
    Ok(config)
}

/// List the fragment files of `profile`. Never creates the directory.
pub fn run_fragments(profile: &Path) -> Result<String> {
    ensure_profile_exists(profile)?;
    let dir = fragment_dir_for(profile);
    if !dir.is_dir() {
        bail!("no fragment directory at {}", dir.display());
    }
    let store = ProfileStore::new();
    let mut config = BuildConfig::new();
    config.source_path = Some(profile.to_path_buf());
    let mut report = store.load_fragments(&mut config);
    if let Some(error) = report.directory_error.take() {
        return Err(describe(error));
    }
    Ok(fragments_table(&config, &report).to_string())
}

fn ensure_profile_exists(profile: &Path) -> Result<()> {
    if !profile.is_file() {
        bail!("profile not found: {}", profile.display());
    }
    Ok(())
}

fn load_profile(store: &ProfileStore, profile: &Path) -> Result<BuildConfig> {
    let span = info_span!("profile", path = %profile.display());
    let _guard = span.enter();
    ensure_profile_exists(profile)?;
    let mut config = BuildConfig::new();
    store.try_load(&mut config, profile).map_err(describe)?;
    Ok(config)
}

/// Turn a persistence error into a message with an optional hint line.
fn describe(error: ConfigError) -> anyhow::Error {
    let mut message = error.user_message();
    if let Some(hint) = error.suggestion() {
        message.push_str("\n  hint: ");
        message.push_str(&hint);
    }
    anyhow::Error::new(error).context(message)
}

fn settings_table(config: &BuildConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Setting"),
        header_cell("Value"),
        header_cell("Element"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let rows: [(&str, String, &str); 18] = [
        ("Pixels per mm X", config.dots_per_mm_x.to_string(), "DotsPermmX"),
        ("Pixels per mm Y", config.dots_per_mm_y.to_string(), "DotsPermmY"),
        ("X resolution", config.x_res.to_string(), "XResolution"),
        ("Y resolution", config.y_res.to_string(), "YResolution"),
        ("Slice height (mm)", config.slice_height.to_string(), "SliceHeight"),
        ("Layer time (ms)", config.layer_time_ms.to_string(), "LayerTime"),
        (
            "First layer time (ms)",
            config.first_layer_time_ms.to_string(),
            "FirstLayerTime",
        ),
        ("Blank time (ms)", config.blank_time_ms.to_string(), "BlankTime"),
        ("Platform temp (C)", config.platform_temp_c.to_string(), "PlatformTemp"),
        ("Export G-code", config.export_gcode.to_string(), "ExportGCode"),
        ("Export SVG", config.export_svg.to_string(), "ExportSVG"),
        ("Export images", config.export_images.to_string(), "ExportImages"),
        ("X offset (px)", config.x_offset.to_string(), "XOffset"),
        ("Y offset (px)", config.y_offset.to_string(), "YOffset"),
        (
            "Bottom layers",
            config.num_first_layers.to_string(),
            "NumberofBottomLayers",
        ),
        ("Build direction", config.build_direction.to_string(), "Direction"),
        ("Lift distance (mm)", config.lift_distance.to_string(), "LiftDistance"),
        ("Slide/tilt value", config.slide_tilt_value.to_string(), "SlideTiltValue"),
    ];
    for (label, value, element) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value), dim_cell(element)]);
    }
    table
}

fn fragments_table(config: &BuildConfig, report: &FragmentReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Fragment"),
        header_cell("File"),
        header_cell("Bytes"),
        header_cell("Lines"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for fragment in Fragment::ALL {
        let text = config.fragment(fragment);
        let status = match report.status(fragment) {
            Some(FragmentStatus::Loaded) => Cell::new("loaded").fg(Color::Green),
            Some(FragmentStatus::Written) => Cell::new("created").fg(Color::Cyan),
            Some(FragmentStatus::Failed(_)) => Cell::new("unreadable").fg(Color::Red),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(fragment.label()),
            Cell::new(fragment.file_name()),
            Cell::new(text.len()),
            Cell::new(text.lines().count()),
            status,
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
