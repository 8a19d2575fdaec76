use falloff_gradient::{GradientSynthesizer, OUTPUT_PATH, SOURCE_PATH};

fn main() -> anyhow::Result<()> {
    falloff_gradient::init_logger!();

    GradientSynthesizer::new().run(SOURCE_PATH, OUTPUT_PATH)?;
    Ok(())
}
