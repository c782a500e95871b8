use shadow_rs::{ShadowBuilder, ShadowError};

fn main() -> Result<(), ShadowError> {
    // Build metadata for `--version`
    ShadowBuilder::builder().build()?;
    Ok(())
}
