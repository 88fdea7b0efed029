use super::loader::load_csv_bytes;
use super::model::DataFrame;

/// The illustrative file shown before any file is loaded.
pub const SAMPLE_CSV: &str = "\
Date,Category,Sales,Quantity,Profit
2025-01-01,A,100,5,20
2025-01-02,B,120,6,24
2025-01-03,A,90,4,18
2025-01-04,C,140,7,28
2025-01-05,B,110,5,22
";

/// [`SAMPLE_CSV`] parsed by the regular loader, so its column types match what
/// an upload of the same file reports.
pub fn sample_frame() -> DataFrame {
    load_csv_bytes(SAMPLE_CSV.as_bytes()).unwrap_or_else(|e| {
        log::error!("Sample table failed to parse: {e:#}");
        DataFrame::default()
    })
}

/// Libraries the dashboard is built on, shown as onboarding text.
pub const REQUIREMENTS: &str = "\
# Cargo.toml
[dependencies]
eframe = \"0.31\"     # dashboard
csv = \"1\"           # tabular parsing
egui_plot = \"0.31\"  # charts
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DType;

    #[test]
    fn sample_types_match_an_upload() {
        let df = sample_frame();
        assert_eq!(df.shape(), (5, 5));
        assert_eq!(df.column("Date").unwrap().dtype, DType::DateTime);
        assert_eq!(df.dtypes(), load_csv_bytes(SAMPLE_CSV.as_bytes()).unwrap().dtypes());
    }
}
