//! CLI Doctor Command
//!
//! Verifies the bot could start: credentials resolvable, staging
//! directory writable.

use anyhow::Result;
use archivist_config::{ArchivistConfig, Settings};
use std::path::Path;

/// Executes the full doctor diagnosis.
pub fn run(config: &ArchivistConfig) -> Result<()> {
    println!("\n🔍 Running Archivist Doctor...\n");

    let settings = match Settings::resolve(config) {
        Ok(s) => s,
        Err(e) => {
            println!("  🔴 {e}");
            println!("\n❌ Some checks failed! Please fix the errors above.");
            anyhow::bail!("configuration is incomplete");
        }
    };
    println!("  🟢 Discord token resolved");
    println!("  🟢 archive.org credentials resolved");

    match probe_staging_dir(&settings.staging_dir) {
        Ok(()) => println!(
            "  🟢 staging dir writable: {}",
            settings.staging_dir.display()
        ),
        Err(e) => {
            println!(
                "  🔴 staging dir {} is not usable: {e}",
                settings.staging_dir.display()
            );
            println!("\n❌ Some checks failed! Please fix the errors above.");
            anyhow::bail!("staging directory is not usable");
        }
    }

    println!("\n✅ All checks passed! Archivist is healthy.");
    Ok(())
}

fn probe_staging_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(".archivist-doctor");
    std::fs::write(&probe, b"ok")?;
    std::fs::remove_file(&probe)
}
