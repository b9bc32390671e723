use anyhow::Context;
use tracing::{error, info};
use undox_liquid::{Liquid, config::RootConfig, pipeline::ProcessingDocument};

use crate::CheckArgs;

pub async fn run(args: &CheckArgs) -> Result<(), anyhow::Error> {
    let config = RootConfig::load_from_arg(args.config_file.as_deref()).await?;
    let liquid = Liquid::new(config.liquid);

    let mut failures = 0;
    for input in &args.inputs {
        let doc = ProcessingDocument::load(input)
            .await
            .with_context(|| format!("failed to read {}", input.display()))?;

        // Keep going so every broken document is reported in one run.
        match liquid.parse(&doc.content, &doc.origin()) {
            Ok(_) => info!(document = %input.display(), "ok"),
            Err(err) => {
                error!(document = %input.display(), "{err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} documents have errors", args.inputs.len());
    }

    println!("Checked {} documents", args.inputs.len());
    Ok(())
}
