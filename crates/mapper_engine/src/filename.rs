use mapper_core::Options;

/// Derives the filename the artifact is saved under.
///
/// Precedence: an explicit `options.filename` wins absolutely; otherwise the
/// server-suggested name from the disposition header is used, with
/// `options.extension` (when set) replacing its extension. A missing or
/// filename-less header degrades to a generated `concept-map-<stamp>` base
/// instead of failing; the caller supplies the stamp so this stays pure.
pub fn derive_filename(disposition: Option<&str>, options: &Options, fallback_stamp: &str) -> String {
    if !options.filename.is_empty() {
        return options.filename.clone();
    }

    let base = disposition
        .and_then(server_suggested_name)
        .unwrap_or_else(|| format!("concept-map-{fallback_stamp}"));

    if options.extension.is_empty() {
        return base;
    }
    replace_extension(&base, &options.extension)
}

/// Extracts the `filename=` token from a `Content-Disposition`-style value,
/// e.g. `attachment; filename="out.pdf"` -> `out.pdf`.
fn server_suggested_name(disposition: &str) -> Option<String> {
    let name = disposition
        .split(';')
        .map(str::trim)
        .find_map(|segment| segment.strip_prefix("filename="))?
        .replace('"', "");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Replaces the final `.ext` segment of `base` (if any) with the requested
/// extension, normalized to exactly one leading dot. A leading dot alone
/// (hidden-file style names) does not count as an extension.
fn replace_extension(base: &str, extension: &str) -> String {
    let ext = format!(".{}", extension.trim_start_matches('.'));
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    format!("{stem}{ext}")
}
