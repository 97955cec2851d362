//! `scriptbind inspect`: dump the extracted descriptor of one trait.

use std::path::Path;

use anyhow::Context;
use scriptbind_codegen::Generator;

pub fn execute(config: &Path, interface: &str) -> anyhow::Result<bool> {
    let config = super::load_config(config)?;
    let descriptor = Generator::new(config)
        .inspect(interface)
        .with_context(|| format!("failed to inspect {}", interface))?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(true)
}
