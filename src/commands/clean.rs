//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Spacetraveling;

/// Remove everything the generator wrote
pub fn run(app: &Spacetraveling) -> Result<()> {
    if app.public_dir.exists() {
        fs::remove_dir_all(&app.public_dir)?;
        tracing::info!("Deleted: {:?}", app.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        let dir = tempfile::tempdir().unwrap();
        let app = Spacetraveling::new(dir.path()).unwrap();
        fs::create_dir_all(app.public_dir.join("post/a")).unwrap();
        fs::write(app.public_dir.join("index.html"), "x").unwrap();

        run(&app).unwrap();
        assert!(!app.public_dir.exists());
        // Nothing to clean is fine too
        run(&app).unwrap();
    }
}
