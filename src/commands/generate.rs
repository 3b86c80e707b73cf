//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Spacetraveling;

/// Generate the static site from the configured source
pub async fn run(app: &Spacetraveling) -> Result<()> {
    let start = std::time::Instant::now();

    let source = app.source()?;
    let generator = Generator::new(app, source)?;
    generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
