//! Static file extension to MIME type table.

/// Content type used when the extension is not in the table.
pub const FALLBACK: &str = "plain/text";

// Sorted by extension. Extensions with several registered types list all of
// them; they are joined with `,` on lookup.
static TABLE: &[(&str, &[&str])] = &[
    (".aac", &["audio/aac"]),
    (".avi", &["video/x-msvideo"]),
    (".bin", &["application/octet-stream"]),
    (".bmp", &["image/bmp"]),
    (".css", &["text/css"]),
    (".csv", &["text/csv"]),
    (".gif", &["image/gif"]),
    (".gz", &["application/gzip"]),
    (".htm", &["text/html"]),
    (".html", &["text/html"]),
    (".ico", &["image/vnd.microsoft.icon"]),
    (".jpeg", &["image/jpeg"]),
    (".jpg", &["image/jpeg"]),
    (".js", &["text/javascript"]),
    (".json", &["application/json"]),
    (".md", &["text/markdown"]),
    (".mjs", &["text/javascript"]),
    (".mp3", &["audio/mpeg"]),
    (".mp4", &["video/mp4"]),
    (".mpeg", &["video/mpeg"]),
    (".oga", &["audio/ogg"]),
    (".ogv", &["video/ogg"]),
    (".otf", &["font/otf"]),
    (".pdf", &["application/pdf"]),
    (".png", &["image/png", "image/x-citrix-png", "image/x-png"]),
    (".svg", &["image/svg+xml"]),
    (".tar", &["application/x-tar"]),
    (".tif", &["image/tiff"]),
    (".tiff", &["image/tiff"]),
    (".ttf", &["font/ttf"]),
    (".txt", &["text/plain"]),
    (".wasm", &["application/wasm"]),
    (".wav", &["audio/wav"]),
    (".weba", &["audio/webm"]),
    (".webm", &["video/webm"]),
    (".webp", &["image/webp"]),
    (".woff", &["font/woff"]),
    (".woff2", &["font/woff2"]),
    (".xml", &["application/xml"]),
    (".zip", &["application/zip"]),
];

/// Looks up the MIME types for an extension such as `.png` (case-insensitive).
pub fn lookup(extension: &str) -> Option<String> {
    let extension = extension.to_ascii_lowercase();
    TABLE
        .binary_search_by(|(ext, _)| (*ext).cmp(extension.as_str()))
        .ok()
        .map(|i| TABLE[i].1.join(","))
}

/// Content type for a file name, based on its last extension.
pub fn content_type_for(file_name: &str) -> String {
    file_name
        .rfind('.')
        .and_then(|i| lookup(&file_name[i..]))
        .unwrap_or_else(|| FALLBACK.to_string())
}
