use anyhow::{Context, Result};
use open_bin_pipeline::processor::{CanonicalField, DelimitedTokenizer, IngestPipeline, SchemaNormalizer};
use std::env;

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/Open Bin.csv".to_string());

    println!("=== DEBUGGING HEADER MAPPING: {} ===\n", path);

    let text = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;

    // Step 1: tokenize
    let tokenizer = DelimitedTokenizer::new()?;
    let table = tokenizer.parse_table(&text);
    println!("1. Tokenizer:");
    println!("   Delimiter: {:?}", table.delimiter);
    println!("   Header repaired: {}", table.header_repaired);
    println!("   Header: {:?}", table.header);
    println!("   Data rows: {}", table.rows.len());
    println!("   Overflowing rows folded into last column: {}", table.overflow_rows);
    println!("   Short rows padded: {}", table.padded_rows);

    // Step 2: header mapping
    let normalizer = SchemaNormalizer::new();
    let mapping = normalizer.resolve(&table.header);
    println!("\n2. Header mapping:");
    for field in CanonicalField::ALL {
        match mapping.column_for(field) {
            Some(i) => println!("   ✅ {:<12} <- column {} ({:?})", field.name(), i, table.header[i]),
            None => println!("   ❌ {:<12} <- (unmapped, defaults to \"\")", field.name()),
        }
    }

    // Step 3: full pipeline
    let pipeline = IngestPipeline::new()?;
    let (records, report) = pipeline.run(&text);
    println!("\n3. Expansion:");
    println!("   Expanded records: {}", records.len());
    println!("   Without a recognized site: {}", report.unresolved_sites);
    println!("   With an unclassified status: {}", report.unclassified_statuses);

    if let Some(first) = records.first() {
        println!("\n   First record: {:?}", first);
    }

    Ok(())
}
