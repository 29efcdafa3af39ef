use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use dockaff_molecules::{AffinityOutcome, PipelineReport};

pub fn print_summary(report: &PipelineReport) {
    println!("{}", results_table(report));
    println!(
        "{} poses: {} scored, {} failed",
        report.records.len(),
        report.succeeded(),
        report.failed()
    );
    println!("Results saved to {}", report.report_path.display());
}

pub fn results_table(report: &PipelineReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            header_cell("Pose"),
            header_cell("File"),
            header_cell("ΔG (kcal/mol)"),
            header_cell("Kd (M)"),
            header_cell("Error"),
        ]);

    for record in &report.records {
        let row = match &record.outcome {
            AffinityOutcome::Estimated(a) => vec![
                Cell::new(record.pose_index).set_alignment(CellAlignment::Right),
                Cell::new(record.pose_file.display()),
                Cell::new(format!("{:.3}", a.delta_g)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3e}", a.kd)).set_alignment(CellAlignment::Right),
                Cell::new("-").add_attribute(Attribute::Dim),
            ],
            AffinityOutcome::Failed(e) => vec![
                Cell::new(record.pose_index).set_alignment(CellAlignment::Right),
                Cell::new(record.pose_file.display()),
                Cell::new("-").add_attribute(Attribute::Dim),
                Cell::new("-").add_attribute(Attribute::Dim),
                Cell::new(e).fg(Color::Red),
            ],
        };
        table.add_row(row);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}
