use std::fs;
use tempfile::tempdir;
use usmap_rs::{MapError, MapPlotter, PlotConfig, PlotConfigUpdate, RawTable, ScaleType, Style};

fn plotter() -> MapPlotter {
    MapPlotter::from_table(&RawTable::from_pairs("state", "value", &[("CA", 1.0)])).unwrap()
}

#[test]
fn sequential_customizations_accumulate() {
    let mut p = plotter();
    p.customize(&PlotConfigUpdate::new().color_scheme("Viridis"))
        .unwrap();
    p.customize(&PlotConfigUpdate::new().title("X")).unwrap();
    assert_eq!(p.config().color_scheme, "Viridis");
    assert_eq!(p.config().title, "X");
    assert_eq!(p.config().width, 1200);
}

#[test]
fn invalid_values_are_rejected_per_key() {
    let c = PlotConfig::default();
    let cases = [
        (PlotConfigUpdate::new().size(50, 700), "width"),
        (PlotConfigUpdate::new().missing_color("greyish"), "missing_color"),
        (PlotConfigUpdate::new().custom_bins(vec![3.0, 1.0]), "custom_bins"),
        (PlotConfigUpdate::new().color_scheme("NoSuchScale"), "color_scheme"),
    ];
    for (update, expected) in cases {
        match c.merge(&update) {
            Err(MapError::InvalidConfig { key, .. }) => assert_eq!(key, expected),
            other => panic!("expected InvalidConfig for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn scheme_names_are_case_insensitive() {
    let c = PlotConfig::default()
        .merge(&PlotConfigUpdate::new().color_scheme("ylorrd"))
        .unwrap();
    assert_eq!(c.effective_scheme(), "ylorrd");
    assert!(usmap_rs::viz::palette::scheme(c.effective_scheme()).is_some());
}

#[test]
fn json_config_file_applies() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    fs::write(
        &path,
        r#"{"style": "dark", "scale_type": "log", "show_missing": true}"#,
    )
    .unwrap();
    let update = PlotConfigUpdate::from_json_file(&path).unwrap();
    let c = PlotConfig::default().merge(&update).unwrap();
    assert_eq!(c.style, Style::Dark);
    assert_eq!(c.scale_type, ScaleType::Log);
    assert!(c.show_missing);
    assert_eq!(c.effective_scheme(), "Viridis");
}
