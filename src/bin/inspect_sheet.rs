use calamine::{open_workbook_auto, Reader};
use momentum_board::{load::cell_from_data, Cell};
use std::{env, path::Path, process::exit};

fn main() {
    // Expect a workbook path and an optional sheet name.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <WORKBOOK> [SHEET]", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_sheet(Path::new(&args[1]), args.get(2).map(String::as_str)) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

/// List sheet names, then show the used area and first row of one sheet
/// (the named one, else the first).
fn inspect_sheet(path: &Path, sheet: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();

    println!("=== Workbook: {} ===", path.display());
    for (i, name) in names.iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    println!();

    let Some(target) = sheet.map(str::to_string).or_else(|| names.first().cloned()) else {
        println!("(no sheets)");
        return Ok(());
    };

    let range = workbook.worksheet_range(&target)?;
    println!("=== Sheet: {} ===", target);
    match (range.start(), range.end()) {
        (Some((r0, c0)), Some((r1, c1))) => {
            println!("Used area:  rows {}..={}, cols {}..={}", r0, r1, c0, c1);
            println!("Dimensions: {} x {}", range.height(), range.width());
        }
        _ => {
            println!("(empty)");
            return Ok(());
        }
    }
    println!();

    println!("=== First row ===");
    if let Some(row) = range.rows().next() {
        for (i, value) in row.iter().enumerate() {
            let tag = match cell_from_data(value) {
                Cell::Number(_) => "number",
                Cell::Text(_) => "text",
                Cell::Missing => "missing",
            };
            println!("- {:<3} {:<30} ({})", i, value.to_string(), tag);
        }
    }

    Ok(())
}
