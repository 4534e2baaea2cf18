//! End-to-end profile persistence tests.

use std::fs;
use std::path::{Path, PathBuf};

use slice_config::{
    BuildConfig, BuildDirection, Fragment, FragmentStatus, MemoryLog, ProfileStore, Severity,
    fragment_dir_for,
};
use tempfile::{TempDir, tempdir};

fn profile_path(dir: &TempDir) -> PathBuf {
    dir.path().join("resin.slicing")
}

fn customised() -> BuildConfig {
    let mut config = BuildConfig::new();
    config.dots_per_mm_x = 17.333333333333332;
    config.dots_per_mm_y = 9.1;
    config.x_res = 1920;
    config.y_res = 1080;
    config.slice_height = 0.025;
    config.x_offset = -3;
    config.y_offset = 7;
    config.layer_time_ms = 8500;
    config.first_layer_time_ms = 60000;
    config.blank_time_ms = 1500;
    config.num_first_layers = 5;
    config.platform_temp_c = 30;
    config.build_direction = BuildDirection::TopDown;
    config.lift_distance = 6.25;
    config.slide_tilt_value = 0.3;
    config.export_gcode = false;
    config.export_svg = true;
    config.export_images = true;
    config.header_code = "G21\r\nG91\r\nM17\r\n".to_string();
    config.footer_code = "M18\n".to_string();
    config.pre_lift_code = "M106 S0\r\n".to_string();
    config.post_lift_code = String::new();
    config.pre_slice_code = "(slice <&>)\r\n".to_string();
    config
}

#[test]
fn save_then_load_round_trips_every_field() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    let mut original = customised();
    assert!(store.save(&mut original, &path));

    let mut loaded = BuildConfig::new();
    assert!(store.load(&mut loaded, &path));

    assert_eq!(loaded, original);
    assert!(store.log().is_empty(), "{:?}", store.log().entries());
}

#[test]
fn load_bootstraps_missing_fragment_directory() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    // Document only, no fragment directory yet.
    slice_config::write_document(&customised(), &path).unwrap();
    let fragments = fragment_dir_for(&path);
    assert!(!fragments.exists());

    let mut first = customised();
    assert!(store.load(&mut first, &path));
    assert!(fragments.is_dir());
    for fragment in Fragment::ALL {
        let on_disk = fs::read_to_string(fragments.join(fragment.file_name())).unwrap();
        assert_eq!(on_disk, fragment.default_text());
        assert_eq!(first.fragment(fragment), fragment.default_text());
    }

    let mut second = BuildConfig::new();
    second.header_code.clear();
    assert!(store.load(&mut second, &path));
    for fragment in Fragment::ALL {
        assert_eq!(second.fragment(fragment), fragment.default_text());
    }
}

#[test]
fn bootstrap_is_reported() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::with_log(MemoryLog::new());
    let mut config = BuildConfig::new();
    config.source_path = Some(profile_path(&dir));

    let report = store.load_fragments(&mut config);
    assert!(report.bootstrapped);
    assert!(report.is_complete());
    assert!(matches!(
        report.status(Fragment::Header),
        Some(FragmentStatus::Written)
    ));

    let report = store.load_fragments(&mut config);
    assert!(!report.bootstrapped);
    assert!(matches!(
        report.status(Fragment::Header),
        Some(FragmentStatus::Loaded)
    ));
}

#[test]
fn deleted_fragment_loads_as_empty_others_survive() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    let mut saved = customised();
    assert!(store.save(&mut saved, &path));
    fs::remove_file(fragment_dir_for(&path).join("prelift.gcode")).unwrap();

    let mut loaded = BuildConfig::new();
    loaded.source_path = Some(path.clone());
    let report = store.load_fragments(&mut loaded);

    assert_eq!(loaded.pre_lift_code, "");
    assert!(report.status(Fragment::PreLift).unwrap().is_failed());
    assert_eq!(report.failures().count(), 1);
    for fragment in [
        Fragment::Header,
        Fragment::Footer,
        Fragment::PostLift,
        Fragment::PreSlice,
    ] {
        assert_eq!(loaded.fragment(fragment), saved.fragment(fragment));
    }

    let entries = store.log().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Warning);
    assert!(entries[0].path.as_deref().unwrap().ends_with("prelift.gcode"));
}

#[test]
fn version_mismatch_rejects_without_touching_settings() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    let mut saved = customised();
    assert!(store.save(&mut saved, &path));
    let text = fs::read_to_string(&path).unwrap();
    fs::write(
        &path,
        text.replace("<FileVersion>1</FileVersion>", "<FileVersion>2</FileVersion>"),
    )
    .unwrap();

    let mut target = BuildConfig::new();
    let before = target.clone();
    assert!(!store.load(&mut target, &path));

    assert_eq!(target.source_path.as_deref(), Some(path.as_path()));
    // Fragments are path-derived and loaded before the version check.
    let settings_only = BuildConfig {
        source_path: None,
        header_code: before.header_code.clone(),
        footer_code: before.footer_code.clone(),
        pre_lift_code: before.pre_lift_code.clone(),
        post_lift_code: before.post_lift_code.clone(),
        pre_slice_code: before.pre_slice_code.clone(),
        ..target.clone()
    };
    assert_eq!(settings_only, before);

    let entries = store.log().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Error);
}

#[test]
fn malformed_document_fails_load_and_leaves_settings() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    let mut saved = customised();
    assert!(store.save(&mut saved, &path));
    let text = fs::read_to_string(&path).unwrap();
    fs::write(
        &path,
        text.replace("<Direction>Top_Down</Direction>", "<Direction>Sideways</Direction>"),
    )
    .unwrap();

    let mut target = BuildConfig::new();
    assert!(!store.load(&mut target, &path));
    assert_eq!(target.layer_time_ms, 1000);
    assert_eq!(target.x_res, 1024);
}

#[test]
fn save_overwrites_existing_profile() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    let mut config = customised();
    assert!(store.save(&mut config, &path));
    config.layer_time_ms = 42;
    config.footer_code = "M84\r\n".to_string();
    assert!(store.save(&mut config, &path));

    let mut loaded = BuildConfig::new();
    assert!(store.load(&mut loaded, &path));
    assert_eq!(loaded.layer_time_ms, 42);
    assert_eq!(loaded.footer_code, "M84\r\n");
    assert!(!Path::new(&format!("{}.tmp", path.display())).exists());
}

#[test]
fn copy_of_loaded_profile_is_unbound() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());

    let mut saved = customised();
    assert!(store.save(&mut saved, &path));

    let mut copy = BuildConfig::copy_from(&saved);
    assert!(copy.source_path.is_none());
    copy.pre_slice_code.push_str("G4 P100\r\n");
    assert_eq!(saved.pre_slice_code, "(slice <&>)\r\n");
}

#[test]
fn document_with_byte_order_mark_loads() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());
    let mut saved = customised();
    assert!(store.save(&mut saved, &path));

    let text = fs::read_to_string(&path).unwrap();
    let compact: String = text.lines().map(str::trim).collect();
    let legacy = format!(
        "\u{FEFF}{}",
        compact.replace("encoding=\"UTF-8\"", "encoding=\"utf-8\"")
    );
    fs::write(&path, legacy).unwrap();

    let mut loaded = BuildConfig::new();
    assert!(store.load(&mut loaded, &path), "{:?}", store.log().entries());
    assert_eq!(loaded, saved);
    assert!(store.log().is_empty());
}

#[test]
fn non_utf8_fragment_survives_load_and_save() {
    let dir = tempdir().unwrap();
    let path = profile_path(&dir);
    let store = ProfileStore::with_log(MemoryLog::new());
    assert!(store.save(&mut BuildConfig::new(), &path));

    let start = fragment_dir_for(&path).join("start.gcode");
    fs::write(&start, b"(Platform 75\xB0C)\r\nG21\r\n").unwrap();

    let mut config = BuildConfig::new();
    assert!(store.load(&mut config, &path));
    assert_eq!(config.header_code, "(Platform 75\u{FFFD}C)\r\nG21\r\n");
    assert!(store.save(&mut config, &path));

    let bytes = fs::read(&start).unwrap();
    assert!(bytes.ends_with(b"C)\r\nG21\r\n"));
    assert!(store.log().is_empty());
}
