use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("grofer version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
