#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway install directory populated with real jar files
pub struct TestInstall {
    pub temp: TempDir,
}

impl TestInstall {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn base(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// A jar whose manifest declares `symbolic_name` / `version`
    pub fn bundle(&self, relative: &str, symbolic_name: &str, version: &str) -> PathBuf {
        let manifest = format!(
            "Manifest-Version: 1.0\r\nBundle-ManifestVersion: 2\r\nBundle-SymbolicName: {};singleton:=true\r\nBundle-Version: {}\r\n\r\n",
            symbolic_name, version
        );
        self.jar(relative, Some(&manifest))
    }

    /// A jar with no manifest at all
    pub fn plain(&self, relative: &str) -> PathBuf {
        self.jar(relative, None)
    }

    pub fn jar(&self, relative: &str, manifest: Option<&str>) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        create_test_jar(&path, manifest);
        path
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.path(".cache")
    }
}

pub fn create_test_jar(path: &Path, manifest: Option<&str>) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    if let Some(manifest) = manifest {
        zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
        zip.write_all(manifest.as_bytes()).unwrap();
    }
    zip.start_file("com/example/Test.class", options).unwrap();
    // CAFEBABE header
    zip.write_all(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34])
        .unwrap();
    zip.finish().unwrap();
}
