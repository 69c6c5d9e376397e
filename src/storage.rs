use crate::error::ExportError;
use crate::models::ValidatedEntry;
use csv::WriterBuilder;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Run `write` against a temp file next to `path`, then rename it into place.
///
/// The temp file keeps the destination's extension so format-sniffing writers
/// (the bitmap backend) still pick the right encoder. If `write` fails the temp
/// file is removed and `path` is left as it was.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&Path) -> Result<(), ExportError>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let tmp = Builder::new()
        .prefix(".usmap-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(io_err(path))?;
    write(tmp.path())?;
    tmp.persist(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Atomically replace `path` with `contents`.
pub fn write_string(path: &Path, contents: &str) -> Result<(), ExportError> {
    write_atomically(path, |tmp| {
        std::fs::write(tmp, contents.as_bytes()).map_err(io_err(tmp))
    })
}

/// Save entries as CSV with header `code,name,value`.
pub fn save_csv<P: AsRef<Path>>(entries: &[ValidatedEntry], path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_atomically(path, |tmp| {
        let mut wtr = WriterBuilder::new().from_path(tmp).map_err(|e| csv_err(tmp, e))?;
        wtr.serialize(("code", "name", "value"))
            .map_err(|e| csv_err(tmp, e))?;
        for e in entries {
            wtr.serialize((&e.code, &e.name, e.value))
                .map_err(|err| csv_err(tmp, err))?;
        }
        wtr.flush().map_err(io_err(tmp))
    })?;
    info!("wrote {} rows to {}", entries.len(), path.display());
    Ok(())
}

/// Save entries as a pretty JSON array of `{code, name, value}` objects.
pub fn save_json<P: AsRef<Path>>(entries: &[ValidatedEntry], path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let s = serde_json::to_string_pretty(entries).map_err(|e| ExportError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_atomically(path, |tmp| {
        let mut f = File::create(tmp).map_err(io_err(tmp))?;
        f.write_all(s.as_bytes()).map_err(io_err(tmp))
    })?;
    info!("wrote {} rows to {}", entries.len(), path.display());
    Ok(())
}

/// Export the cleaned table; the format follows the extension (`.json`, else CSV).
/// Spreadsheet targets have no writer.
pub fn save_entries<P: AsRef<Path>>(entries: &[ValidatedEntry], path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => save_json(entries, path),
        Some(fmt @ ("xlsx" | "xls" | "xlsm" | "ods")) => Err(ExportError::BackendUnavailable {
            format: fmt.to_string(),
            hint: "spreadsheet export is not supported; use a .csv or .json path".to_string(),
        }),
        _ => save_csv(entries, path),
    }
}

fn csv_err(path: &Path, e: csv::Error) -> ExportError {
    ExportError::Io {
        path: path.to_path_buf(),
        source: e.into(),
    }
}
