use anyhow::Context;
use undox_liquid::{
    Liquid,
    config::RootConfig,
    pipeline::{Pipeline, PipelineContext, ProcessingDocument},
    variables,
};

use crate::RenderArgs;

pub async fn run(args: &RenderArgs) -> Result<(), anyhow::Error> {
    if args.output.is_none() && args.inputs.len() > 1 {
        anyhow::bail!(
            "rendering {} documents requires an output directory (-o)",
            args.inputs.len()
        );
    }

    let mut config = RootConfig::load_from_arg(args.config_file.as_deref()).await?;
    if args.conditions_in_code {
        config.liquid.conditions_in_code = true;
    }
    config.vars.extend(args.vars.iter().cloned());

    let variables = variables::load_all(&config.vars).await?;
    let liquid = Liquid::new(config.liquid);

    let mut docs = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let doc = ProcessingDocument::load(input)
            .await
            .with_context(|| format!("failed to read {}", input.display()))?;
        docs.push(doc);
    }

    let ctx = PipelineContext::new(&liquid, &variables, args.output.as_deref());
    Pipeline::default_pipeline().run(&mut docs, &ctx)?;

    match &args.output {
        Some(dir) => println!("Rendered {} documents to {}", docs.len(), dir.display()),
        None => {
            for doc in &docs {
                print!("{}", doc.content);
            }
        }
    }

    Ok(())
}
