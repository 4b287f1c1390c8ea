//! Export the temp pages as static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Export every temp page into the public directory
pub async fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let registry = folio.discover()?;
    let report = Generator::new(folio)?.generate(&registry).await?;

    tracing::info!(
        "Generated {} file(s) in {:.2}s",
        report.written.len(),
        start.elapsed().as_secs_f64()
    );

    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} temp page(s) failed to load: {}",
            report.failed.len(),
            report.failed.join(", ")
        );
    }

    Ok(())
}
