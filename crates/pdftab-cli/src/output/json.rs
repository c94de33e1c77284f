use pdftab_core::error::PdftabError;
use pdftab_core::NormalizedTable;

pub fn print(table: &NormalizedTable) -> Result<(), PdftabError> {
    let json = serde_json::to_string_pretty(table)?;
    println!("{json}");
    Ok(())
}
