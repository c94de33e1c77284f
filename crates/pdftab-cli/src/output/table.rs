use pdftab_core::NormalizedTable;

pub fn print(table: &NormalizedTable) {
    println!("{}", format_table(table));
}

/// Aligned text rendering of every row, followed by a row count.
pub fn format_table(table: &NormalizedTable) -> String {
    let mut out = table.preview(table.len());
    out.push_str(&format!("\n\n{} row(s)", table.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_rows_with_count() {
        let table = NormalizedTable::new(
            vec!["Date".into(), "Details".into()],
            vec![
                vec!["01/01".into(), "Deposit".into()],
                vec!["02/01".into(), "Fee".into()],
            ],
        )
        .unwrap();
        assert_eq!(
            format_table(&table),
            " Date  Details\n01/01  Deposit\n02/01      Fee\n\n2 row(s)"
        );
    }
}
