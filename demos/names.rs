//! Example: a character-name table on top of a packed DAWG.
//!
//! Maps names to code points and back, the way a Unicode database would.
//! With a path argument the table is loaded from a `name<TAB>value` file;
//! otherwise a small built-in table is used.
//!
//! Run with: cargo run --example names [-- names.tsv]

use packed_dawg::dawg::{build, build_from_file, PackedDawg, Result};

/// Name lookups in both directions.
struct NameTable {
    dawg: PackedDawg,
}

impl NameTable {
    fn load(path: Option<String>) -> Result<Self> {
        let dawg = match path {
            Some(path) => build_from_file(path)?,
            None => build([
                ("LATIN CAPITAL LETTER A", 0x41),
                ("LATIN CAPITAL LETTER B", 0x42),
                ("LATIN SMALL LETTER A", 0x61),
                ("LATIN SMALL LETTER B", 0x62),
                ("SPACE", 0x20),
            ])?,
        };
        Ok(NameTable { dawg })
    }

    fn code_point(&self, name: &str) -> Result<Option<i64>> {
        self.dawg.lookup(name)
    }

    fn name(&self, code_point: i64) -> Result<Option<String>> {
        Ok(self
            .dawg
            .inverse_lookup(code_point)?
            .map(|key| String::from_utf8_lossy(&key).into_owned()))
    }
}

fn main() -> Result<()> {
    let table = NameTable::load(std::env::args().nth(1))?;
    println!(
        "{} names packed into {} bytes",
        table.dawg.len(),
        table.dawg.as_bytes().len()
    );

    println!("\nName to code point:");
    for name in ["LATIN SMALL LETTER A", "SPACE", "LATIN SMALL LETTER Z"] {
        match table.code_point(name)? {
            Some(cp) => println!("  {name}: U+{cp:04X}"),
            None => println!("  {name}: not found"),
        }
    }

    println!("\nCode point to name:");
    for cp in [0x42, 0x20, 0x7A] {
        match table.name(cp)? {
            Some(name) => println!("  U+{cp:04X}: {name}"),
            None => println!("  U+{cp:04X}: not found"),
        }
    }

    println!("\nAll names:");
    for entry in table.dawg.iter() {
        let (key, value) = entry?;
        println!("  {value:>6}  {}", String::from_utf8_lossy(&key));
    }
    Ok(())
}
