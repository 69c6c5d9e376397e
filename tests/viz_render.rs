use std::fs;
use std::path::Path;
use tempfile::tempdir;
use usmap_rs::viz::{self, BackendRegistry, Figure, StaticBackend};
use usmap_rs::{ExportError, MapError, MapPlotter, PlotConfigUpdate, RawTable, ScaleType};

fn plotter() -> MapPlotter {
    let t = RawTable::from_pairs(
        "state",
        "value",
        &[("CA", 1500.0), ("TX", 2500.0), ("NY", 900.0), ("DC", 40.0)],
    );
    MapPlotter::from_table(&t).unwrap()
}

#[derive(Debug)]
struct FakePdf;

impl StaticBackend for FakePdf {
    fn name(&self) -> &str {
        "fake-pdf"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn render(&self, figure: &Figure, path: &Path) -> Result<(), ExportError> {
        fs::write(path, format!("%PDF {} tiles", figure.tiles.len())).map_err(|source| {
            ExportError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[test]
fn html_has_inline_svg_and_tooltips() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("map.html");
    let (_, written) = plotter().plot(Some(out.as_path())).unwrap();
    assert_eq!(written.as_deref(), Some(out.as_path()));
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<svg"));
    assert!(html.contains("<title>California\nValue: 1,500.00</title>"));
    assert!(html.contains("US States Data Visualization"));
}

#[test]
fn svg_export_writes_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("map.svg");
    plotter().plot(Some(out.as_path())).unwrap();
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
}

#[cfg(feature = "png")]
#[test]
fn png_export_writes_png_signature() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("map.png");
    let mut p = plotter();
    p.customize(&PlotConfigUpdate::new().size(400, 300)).unwrap();
    p.plot(Some(out.as_path())).unwrap();
    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn pdf_without_backend_fails_and_keeps_html() {
    let dir = tempdir().unwrap();
    let html = dir.path().join("map.html");
    let p = plotter();
    let (figure, _) = p.plot(Some(html.as_path())).unwrap();
    let before = fs::read(&html).unwrap();

    let pdf = dir.path().join("map.pdf");
    let err = p.save(&figure, &pdf).unwrap_err();
    match err {
        MapError::Export(ExportError::BackendUnavailable { format, hint }) => {
            assert_eq!(format, "pdf");
            assert!(hint.contains("register_backend"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!pdf.exists());
    assert_eq!(fs::read(&html).unwrap(), before);
}

#[test]
fn registered_backend_handles_its_format() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("map.pdf");
    let mut p = plotter();
    p.register_backend(Box::new(FakePdf));
    p.plot(Some(pdf.as_path())).unwrap();
    assert_eq!(fs::read_to_string(&pdf).unwrap(), "%PDF 4 tiles");
}

#[test]
fn empty_registry_has_no_svg() {
    let figure = plotter().figure().unwrap();
    let dir = tempdir().unwrap();
    let err = viz::save(&figure, &dir.path().join("m.svg"), &BackendRegistry::empty()).unwrap_err();
    assert!(matches!(err, ExportError::BackendUnavailable { .. }));
    assert!(BackendRegistry::default().extensions().contains(&"svg".to_string()));
}

#[test]
fn unknown_extension_falls_back_to_html() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("map.dat");
    let (_, written) = plotter().plot(Some(out.as_path())).unwrap();
    let written = written.unwrap();
    assert_eq!(written, dir.path().join("map.dat.html"));
    assert!(fs::read_to_string(written).unwrap().contains("<svg"));
    assert!(!out.exists());
}

#[test]
fn log_scale_and_reverse_change_colors() {
    let mut p = plotter();
    let linear = p.figure().unwrap();
    p.customize(
        &PlotConfigUpdate::new()
            .scale_type(ScaleType::Log)
            .reverse_scale(true),
    )
    .unwrap();
    let log = p.figure().unwrap();
    assert_ne!(linear.tile("CA").unwrap().fill, log.tile("CA").unwrap().fill);
    // DC is the minimum: first color of the ramp, or last when reversed.
    let blues = viz::palette::scheme("Blues").unwrap();
    assert_eq!(log.tile("DC").unwrap().fill, blues.color_at(1.0, false));
    assert_eq!(log.color_bar.ticks.first().map(|t| t.label.as_str()), Some("100"));
}

#[test]
fn rendering_does_not_consume_the_plotter() {
    let p = plotter();
    let a = p.figure().unwrap();
    let b = p.figure().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.tiles.len(), 4);
}
