//! Identity from `META-INF/MANIFEST.MF`.

use bundlerepo_api::{ArtifactIdentity, ContentInspector, InspectError, InspectResult, Version};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const SYMBOLIC_NAME_HEADER: &str = "Bundle-SymbolicName";
pub const VERSION_HEADER: &str = "Bundle-Version";

/// Main section of a jar manifest.
#[derive(Debug, Default, Clone)]
pub struct Manifest {
    headers: Vec<(String, String)>,
}

impl Manifest {
    /// Parse the main section. Header names keep their case; lookups ignore it.
    /// Continuation lines start with a single space and extend the previous value.
    pub fn parse(text: &str) -> Self {
        let mut headers: Vec<(String, String)> = Vec::new();

        for line in text.lines() {
            if line.is_empty() {
                // End of the main section
                break;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some((_, value)) = headers.last_mut() {
                    value.push_str(rest);
                }
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                let value = value.strip_prefix(' ').unwrap_or(value);
                headers.push((name.trim().to_string(), value.to_string()));
            }
        }

        Self { headers }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Build an identity from the bundle headers.
    ///
    /// A missing `Bundle-Version` means `0.0.0`.
    pub fn identity(&self, archive: &Path) -> InspectResult<ArtifactIdentity> {
        let symbolic_name = self
            .get(SYMBOLIC_NAME_HEADER)
            .map(|v| v.split(';').next().unwrap_or("").trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| InspectError::MissingHeader {
                path: archive.to_path_buf(),
                header: SYMBOLIC_NAME_HEADER,
            })?;

        let version = match self.get(VERSION_HEADER).map(str::trim) {
            Some(text) if !text.is_empty() => {
                Version::parse(text).map_err(|source| InspectError::InvalidVersion {
                    path: archive.to_path_buf(),
                    source,
                })?
            }
            _ => Version::default(),
        };

        Ok(ArtifactIdentity::from_version(symbolic_name, version))
    }
}

/// Reads the bundle headers out of a zip/jar archive.
///
/// The archive is opened per call and closed before returning.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestInspector;

impl ManifestInspector {
    pub fn new() -> Self {
        Self
    }

    pub fn read_manifest(&self, archive: &Path) -> InspectResult<Manifest> {
        let file = File::open(archive).map_err(|source| InspectError::Io {
            path: archive.to_path_buf(),
            source,
        })?;
        let mut zip = ZipArchive::new(file).map_err(|e| InspectError::Archive {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut entry = match zip.by_name(MANIFEST_PATH) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(InspectError::MissingManifest {
                    path: archive.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(InspectError::Archive {
                    path: archive.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| InspectError::Io {
                path: archive.to_path_buf(),
                source,
            })?;

        Ok(Manifest::parse(&String::from_utf8_lossy(&bytes)))
    }
}

impl ContentInspector for ManifestInspector {
    fn inspect(&self, archive: &Path) -> InspectResult<ArtifactIdentity> {
        self.read_manifest(archive)?.identity(archive)
    }

    fn name(&self) -> &str {
        "Manifest Inspector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_jar(path: &Path, manifest: Option<&str>) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        if let Some(manifest) = manifest {
            zip.start_file(MANIFEST_PATH, options).unwrap();
            zip.write_all(manifest.as_bytes()).unwrap();
        }
        zip.start_file("com/example/Test.class", options).unwrap();
        // CAFEBABE header
        zip.write_all(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34])
            .unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_manifest_parse_handles_continuations() {
        let text = "Manifest-Version: 1.0\r\n\
                    Bundle-SymbolicName: com.example.a.very.long.symbolic.name.that.wraps.o\r\n \
                    ver.the.line;singleton:=true\r\n\
                    Bundle-Version: 1.0.2\r\n\
                    \r\n\
                    Name: com/example/\r\n\
                    Bundle-Version: 9.9.9\r\n";
        let manifest = Manifest::parse(text);
        assert_eq!(
            manifest.get("bundle-symbolicname"),
            Some("com.example.a.very.long.symbolic.name.that.wraps.over.the.line;singleton:=true")
        );
        // Per-entry sections are not part of the main section
        assert_eq!(manifest.get(VERSION_HEADER), Some("1.0.2"));
    }

    #[test]
    fn test_identity_drops_directives() {
        let manifest =
            Manifest::parse("Bundle-SymbolicName: a.b; singleton:=true\nBundle-Version: 1.0.2.v3\n");
        let id = manifest.identity(Path::new("x.jar")).unwrap();
        assert_eq!(id.symbolic_name, "a.b");
        assert_eq!(id.base_version, Version::new(1, 0, 2));
        assert_eq!(id.qualifier.as_deref(), Some("v3"));
    }

    #[test]
    fn test_identity_defaults_missing_version() {
        let manifest = Manifest::parse("Bundle-SymbolicName: a.b\n");
        let id = manifest.identity(Path::new("x.jar")).unwrap();
        assert_eq!(id.base_version, Version::new(0, 0, 0));
    }

    #[test]
    fn test_identity_errors() {
        let missing = Manifest::parse("Bundle-Version: 1.0\n");
        assert!(matches!(
            missing.identity(Path::new("x.jar")),
            Err(InspectError::MissingHeader { .. })
        ));

        let invalid = Manifest::parse("Bundle-SymbolicName: a.b\nBundle-Version: one\n");
        assert!(matches!(
            invalid.identity(Path::new("x.jar")),
            Err(InspectError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_inspect_reads_archive() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("bad.jar");
        create_test_jar(
            &jar,
            Some("Manifest-Version: 1.0\nBundle-SymbolicName: a.b\nBundle-Version: 1.0.2\n"),
        );

        let id = ManifestInspector::new().inspect(&jar).unwrap();
        assert_eq!(id.symbolic_name, "a.b");
        assert_eq!(id.version().to_string(), "1.0.2");
    }

    #[test]
    fn test_inspect_failures() {
        let dir = tempdir().unwrap();
        let inspector = ManifestInspector::new();

        let no_manifest = dir.path().join("empty.jar");
        create_test_jar(&no_manifest, None);
        assert!(matches!(
            inspector.inspect(&no_manifest),
            Err(InspectError::MissingManifest { .. })
        ));

        let corrupt = dir.path().join("corrupt.jar");
        std::fs::write(&corrupt, b"not a zip file").unwrap();
        assert!(matches!(
            inspector.inspect(&corrupt),
            Err(InspectError::Archive { .. })
        ));

        assert!(matches!(
            inspector.inspect(&dir.path().join("missing.jar")),
            Err(InspectError::Io { .. })
        ));
    }
}
