use bundlerepo_api::ContentInspector;
use bundlerepo_core::inspect::ManifestInspector;
use bundlerepo_core::naming::{NameConventionParser, NameParse};
use std::path::Path;

pub fn run(archive: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Archive: {}", archive.display());

    match NameConventionParser::default().parse_path(archive) {
        NameParse::Convention(identity) => println!("  By name:     {}", identity),
        NameParse::NeedsInspection => println!("  By name:     (not conventional)"),
        NameParse::Unparseable => println!("  By name:     (not an archive)"),
    }

    let inspector = ManifestInspector::new();
    let identity = inspector.inspect(archive)?;
    println!("  By manifest: {}", identity);
    if identity.is_ifix() {
        println!(
            "  iFix of:     {}",
            identity.base_identity().conventional_file_name("jar").display()
        );
    }

    Ok(())
}
