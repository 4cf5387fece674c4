//! Embedded class reference.
//!
//! Editor and debug builds embed the extension's class reference so the
//! editor can show documentation for the registered classes. The XML files
//! under `doc_classes/` are concatenated, compressed and emitted as a C++
//! source that registers the blob at load time.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::util::fs::{glob_files, write_string};
use crate::util::hash::sha256_bytes;

/// Targets that embed the class reference.
pub const DOC_TARGETS: &[&str] = &["editor", "template_debug"];

/// Class reference sources, relative to the project root.
pub const DOC_CLASSES_GLOB: &str = "doc_classes/*.xml";

/// Generated source, relative to the project root.
pub const DOC_DATA_OUTPUT: &str = "src/gen/doc_data.gen.cpp";

/// Whether `target` embeds the class reference.
pub fn wants_doc_data(target: &str) -> bool {
    DOC_TARGETS.contains(&target)
}

/// Compress `xml` and render the registration source.
pub fn render_doc_source(xml: &[u8]) -> Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(xml)
        .context("failed to compress class reference")?;
    let compressed = encoder.finish().context("failed to compress class reference")?;

    let mut out = String::new();
    out.push_str("/* THIS FILE IS GENERATED DO NOT EDIT */\n\n");
    out.push_str("#include <godot_cpp/godot.hpp>\n\n");
    out.push_str(&format!(
        "static const char *_doc_data_hash = \"{}\";\n",
        sha256_bytes(&compressed)
    ));
    out.push_str(&format!(
        "static const int _doc_data_uncompressed_size = {};\n",
        xml.len()
    ));
    out.push_str(&format!(
        "static const int _doc_data_compressed_size = {};\n",
        compressed.len()
    ));
    out.push_str("static const unsigned char _doc_data_compressed[] = {\n");
    for byte in &compressed {
        out.push_str(&format!("\t{},\n", byte));
    }
    out.push_str("};\n\n");
    out.push_str(
        "static godot::internal::DocDataRegistration _doc_data_registration(\
         _doc_data_hash, _doc_data_uncompressed_size, _doc_data_compressed_size, \
         _doc_data_compressed);\n",
    );
    Ok(out)
}

/// Generate the class reference source for `target` and append it to
/// `sources`.
///
/// Returns `None` when the target does not embed documentation or there are
/// no class reference files.
pub fn generate_doc_data(
    project_root: &Path,
    target: &str,
    sources: &mut Vec<PathBuf>,
) -> Result<Option<PathBuf>> {
    if !wants_doc_data(target) {
        return Ok(None);
    }

    let xml_files = glob_files(project_root, &[DOC_CLASSES_GLOB])?;
    if xml_files.is_empty() {
        tracing::info!("no class reference found under doc_classes/, not embedding documentation");
        return Ok(None);
    }

    let mut xml = Vec::new();
    for file in &xml_files {
        let path = project_root.join(file);
        let contents = std::fs::read(&path)
            .with_context(|| format!("failed to read class reference: {}", path.display()))?;
        xml.extend_from_slice(&contents);
    }

    let output = project_root.join(DOC_DATA_OUTPUT);
    write_string(&output, &render_doc_source(&xml)?)?;
    tracing::info!(
        "embedded {} class reference files into {}",
        xml_files.len(),
        output.display()
    );

    sources.push(output.clone());
    Ok(Some(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn compressed_bytes(source: &str) -> Vec<u8> {
        let start = source.find("_doc_data_compressed[] = {\n").unwrap();
        let body = &source[start..];
        let end = body.find("};").unwrap();
        body[..end]
            .lines()
            .skip(1)
            .map(|l| l.trim().trim_end_matches(',').parse::<u8>().unwrap())
            .collect()
    }

    #[test]
    fn test_wants_doc_data() {
        assert!(wants_doc_data("editor"));
        assert!(wants_doc_data("template_debug"));
        assert!(!wants_doc_data("template_release"));
    }

    #[test]
    fn test_render_round_trips_through_zlib() {
        let xml = b"<class name=\"KafkaMultiplayerPeer\"></class>";
        let source = render_doc_source(xml).unwrap();

        assert!(source.starts_with("/* THIS FILE IS GENERATED DO NOT EDIT */"));
        assert!(source.contains(&format!(
            "_doc_data_uncompressed_size = {};",
            xml.len()
        )));

        let compressed = compressed_bytes(&source);
        assert!(source.contains(&format!(
            "_doc_data_compressed_size = {};",
            compressed.len()
        )));

        let mut decoded = Vec::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, xml);
    }

    #[test]
    fn test_generate_appends_source() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("doc_classes")).unwrap();
        std::fs::write(tmp.path().join("doc_classes/A.xml"), "<class name=\"A\"/>").unwrap();
        std::fs::write(tmp.path().join("doc_classes/B.xml"), "<class name=\"B\"/>").unwrap();

        let mut sources = vec![PathBuf::from("src/gen/scu.cpp")];
        let output = generate_doc_data(tmp.path(), "editor", &mut sources)
            .unwrap()
            .unwrap();

        assert_eq!(output, tmp.path().join(DOC_DATA_OUTPUT));
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1], output);
        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("_doc_data_uncompressed_size = 34;"));
    }

    #[test]
    fn test_release_target_skips() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("doc_classes")).unwrap();
        std::fs::write(tmp.path().join("doc_classes/A.xml"), "<class/>").unwrap();

        let mut sources = Vec::new();
        assert!(generate_doc_data(tmp.path(), "template_release", &mut sources)
            .unwrap()
            .is_none());
        assert!(sources.is_empty());
    }

    #[test]
    fn test_no_xml_skips() {
        let tmp = TempDir::new().unwrap();
        let mut sources = Vec::new();
        assert!(generate_doc_data(tmp.path(), "editor", &mut sources)
            .unwrap()
            .is_none());
        assert!(!tmp.path().join(DOC_DATA_OUTPUT).exists());
    }
}
