use tracing::debug;

use crate::error::PdftabError;
use crate::model::{Field, NormalizedTable, RawGrid};
use crate::normalize::{clean_cell, is_blank, positional_label, prune, TableOutcome};

/// Keywords counted when scoring a candidate header row.
pub const HEADER_KEYWORDS: [&str; 8] = [
    "date",
    "detail",
    "description",
    "credit",
    "debit",
    "balance",
    "amount",
    "transaction",
];

/// Only the first few rows are considered as header candidates.
pub const HEADER_SCAN_ROWS: usize = 3;

/// Minimum number of distinct keywords a header row must contain.
pub const MIN_HEADER_SCORE: usize = 2;

/// Label given to the combined amount column of a four-column statement.
pub const AMOUNT_LABEL: &str = "Amount";

struct ColumnRule {
    /// Matched anywhere in the lowercased cell.
    needles: &'static [&'static str],
    /// Matched only as a whole alphabetic word.
    words: &'static [&'static str],
    field: Field,
}

impl ColumnRule {
    fn matches(&self, lower: &str) -> bool {
        self.needles.iter().any(|n| lower.contains(n))
            || lower
                .split(|c: char| !c.is_alphabetic())
                .any(|w| self.words.contains(&w))
    }
}

/// Header cell classification, first match wins.
const COLUMN_RULES: &[ColumnRule] = &[
    ColumnRule {
        needles: &["date"],
        words: &[],
        field: Field::Date,
    },
    ColumnRule {
        needles: &["detail", "description", "particular"],
        words: &[],
        field: Field::Details,
    },
    ColumnRule {
        needles: &["credit"],
        words: &[],
        field: Field::Credits,
    },
    ColumnRule {
        needles: &["debit"],
        words: &[],
        field: Field::Debits,
    },
    ColumnRule {
        needles: &["balance"],
        words: &["bal"],
        field: Field::Balance,
    },
];

/// Normalize a raw grid into the canonical `Date, Details, Credits, Debits, Balance` table.
///
/// The header row is found by keyword scoring; without one, columns are
/// assigned by position. Rows without a date are dropped.
pub fn normalize(grid: &RawGrid) -> TableOutcome {
    TableOutcome::from(try_normalize(grid))
}

fn try_normalize(grid: &RawGrid) -> Result<Option<NormalizedTable>, PdftabError> {
    let rows = prune(grid);
    if rows.is_empty() {
        return Ok(None);
    }
    let width = rows[0].len();

    let (labels, data) = match detect_header(&rows) {
        Some(idx) => {
            let labels = header_labels(&rows[idx]);
            debug!(header_row = idx, ?labels, "statement header detected");
            (labels, &rows[idx + 1..])
        }
        None => {
            let labels = positional_labels(width);
            debug!(columns = width, ?labels, "no statement header, using positions");
            (labels, &rows[..])
        }
    };

    // Leftmost occurrence wins when a canonical name repeats.
    let selected: Vec<Option<usize>> = Field::ALL
        .iter()
        .map(|f| labels.iter().position(|l| l == f.name()))
        .collect();

    let mut records = Vec::new();
    for row in data {
        let record: Vec<String> = selected
            .iter()
            .map(|pos| {
                pos.map(|i| clean_cell(row.get(i).and_then(|c| c.as_deref())))
                    .unwrap_or_default()
            })
            .collect();

        // Rows without a date token are not transactions.
        if record.iter().all(String::is_empty) || record[0].is_empty() {
            continue;
        }
        records.push(record);
    }

    let columns = Field::ALL.iter().map(|f| f.name().to_string()).collect();
    NormalizedTable::new(columns, records).map(Some)
}

/// Number of header keywords contained in the row's joined, lower-cased text.
pub fn header_score(row: &[Option<String>]) -> usize {
    let text = row
        .iter()
        .map(|c| c.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    HEADER_KEYWORDS
        .iter()
        .filter(|kw| text.contains(*kw))
        .count()
}

/// Index of the first of the leading rows that scores as a header.
///
/// The earliest qualifying row wins, not the highest scoring one.
pub fn detect_header(rows: &[Vec<Option<String>>]) -> Option<usize> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| header_score(row) >= MIN_HEADER_SCORE)
}

/// Canonical field for a header cell, if any rule matches.
pub fn classify_header_cell(text: &str) -> Option<Field> {
    let lower = text.trim().to_lowercase();
    COLUMN_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.field)
}

fn header_labels(header: &[Option<String>]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(j, cell)| {
            let field = match cell.as_deref() {
                text if is_blank(text) => None,
                text => text.and_then(classify_header_cell),
            };
            match field {
                Some(field) => field.name().to_string(),
                None => positional_label(j),
            }
        })
        .collect()
}

/// Column labels inferred from the column count alone.
///
/// A four-column table is read as `Date, Details, Amount, Balance`. The
/// combined amount is not split into credits and debits, so both stay empty.
pub fn positional_labels(width: usize) -> Vec<String> {
    match width {
        n if n >= 5 => (0..n)
            .map(|j| match Field::ALL.get(j) {
                Some(field) => field.name().to_string(),
                None => positional_label(j),
            })
            .collect(),
        4 => vec![
            Field::Date.name().to_string(),
            Field::Details.name().to_string(),
            AMOUNT_LABEL.to_string(),
            Field::Balance.name().to_string(),
        ],
        n => (0..n).map(positional_label).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: [&str; 5] = ["Date", "Details", "Credits", "Debits", "Balance"];

    fn data(outcome: TableOutcome) -> NormalizedTable {
        match outcome {
            TableOutcome::Data(t) => t,
            other => panic!("expected data, got {other:?}"),
        }
    }

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    #[test]
    fn column_rules_in_precedence_order() {
        assert_eq!(classify_header_cell("Txn Date"), Some(Field::Date));
        assert_eq!(classify_header_cell("Particulars"), Some(Field::Details));
        assert_eq!(classify_header_cell("DESCRIPTION"), Some(Field::Details));
        assert_eq!(classify_header_cell("Credit Amt"), Some(Field::Credits));
        assert_eq!(classify_header_cell("Debit Amt"), Some(Field::Debits));
        assert_eq!(classify_header_cell(" Balance "), Some(Field::Balance));
        assert_eq!(classify_header_cell("Bal"), Some(Field::Balance));
        assert_eq!(classify_header_cell("Bal."), Some(Field::Balance));
        assert_eq!(classify_header_cell("Closing Bal (INR)"), Some(Field::Balance));
        assert_eq!(classify_header_cell("Value Date Credit"), Some(Field::Date));
        assert_eq!(classify_header_cell("Cheque No"), None);
    }

    #[test]
    fn bal_only_matches_as_a_word() {
        assert_eq!(classify_header_cell("Global Ref"), None);
        assert_eq!(classify_header_cell("Verbal note"), None);
        assert_eq!(classify_header_cell("Balboa Branch"), None);
    }

    #[test]
    fn header_score_counts_distinct_keywords() {
        assert_eq!(header_score(&row(&["Date", "Description", "Amount"])), 3);
        assert_eq!(header_score(&row(&["Opening balance", "", "1,000.00"])), 1);
        assert_eq!(header_score(&[None, None]), 0);
    }

    #[test]
    fn earliest_qualifying_row_wins() {
        let rows = vec![
            row(&["Account statement", "", ""]),
            row(&["Date", "Details", ""]),
            row(&["Date", "Details", "Credit Debit Balance"]),
        ];
        assert_eq!(detect_header(&rows), Some(1));
    }

    #[test]
    fn header_beyond_third_row_is_ignored() {
        let rows = vec![
            row(&["Bank of Somewhere"]),
            row(&["Branch 12"]),
            row(&["Account 0001"]),
            row(&["Date Details Balance"]),
        ];
        assert_eq!(detect_header(&rows), None);
    }

    #[test]
    fn header_precedence_mapping() {
        let labels = header_labels(&row(&[
            "Txn Date",
            "Particulars",
            "Debit Amt",
            "Credit Amt",
            "Bal",
        ]));
        assert_eq!(labels, ["Date", "Details", "Debits", "Credits", "Balance"]);
    }

    #[test]
    fn header_mapping_reorders_to_canonical() {
        let grid = RawGrid::from_text(vec![
            vec!["Txn Date", "Particulars", "Debit Amt", "Credit Amt", "Bal"],
            vec!["01/03", "Rent", "900.00", "", "1,100.00"],
            vec!["02/03", "Salary", "", "2,000.00", "3,100.00"],
        ]);
        let t = data(normalize(&grid));
        assert_eq!(t.columns(), CANONICAL);
        assert_eq!(t.rows()[0], ["01/03", "Rent", "", "900.00", "1,100.00"]);
        assert_eq!(t.rows()[1], ["02/03", "Salary", "2,000.00", "", "3,100.00"]);
    }

    #[test]
    fn rows_above_header_are_dropped() {
        let grid = RawGrid::from_text(vec![
            vec!["Statement period 01/03 - 31/03", "", "", ""],
            vec!["Date", "Description", "Credit", "Balance"],
            vec!["05/03", "Refund", "10.00", "110.00"],
        ]);
        let t = data(normalize(&grid));
        assert_eq!(t.len(), 1);
        assert_eq!(t.value(0, "Date"), Some("05/03"));
        assert_eq!(t.value(0, "Debits"), Some(""));
        assert_eq!(t.value(0, "Balance"), Some("110.00"));
    }

    #[test]
    fn duplicate_canonical_columns_keep_leftmost() {
        let grid = RawGrid::from_text(vec![
            vec!["Posting Date", "Value Date", "Details", "Balance"],
            vec!["01/01", "03/01", "Fee", "5.00"],
        ]);
        let t = data(normalize(&grid));
        assert_eq!(t.value(0, "Date"), Some("01/01"));
        assert_eq!(t.columns(), CANONICAL);
    }

    #[test]
    fn four_column_fallback_leaves_credits_and_debits_empty() {
        let grid = RawGrid::from_text(vec![vec!["01/01", "Deposit", "100", "100"]]);
        let t = data(normalize(&grid));
        assert_eq!(t.columns(), CANONICAL);
        assert_eq!(t.rows(), [vec!["01/01", "Deposit", "", "", "100"]]);
    }

    #[test]
    fn five_plus_column_fallback_drops_extras() {
        let grid = RawGrid::from_text(vec![
            vec!["01/01", "ATM", "", "40", "60", "ref-1"],
            vec!["02/01", "Refund", "5", "", "65", "ref-2"],
        ]);
        let t = data(normalize(&grid));
        assert_eq!(
            t.rows(),
            [
                vec!["01/01", "ATM", "", "40", "60"],
                vec!["02/01", "Refund", "5", "", "65"],
            ]
        );
    }

    #[test]
    fn narrow_table_without_header_has_no_dates() {
        let grid = RawGrid::from_text(vec![vec!["01/01", "Deposit", "100"]]);
        assert_eq!(normalize(&grid), TableOutcome::Empty);
    }

    #[test]
    fn positional_fallback_is_idempotent() {
        let rows = vec![
            vec!["01/02", "Coffee", "", "3.50", "96.50"],
            vec!["02/02", "Payroll", "1,000.00", "", "1,096.50"],
        ];
        let padded: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|c| format!("  {c} ")).collect())
            .collect();
        let t = data(normalize(&RawGrid::from_text(padded)));
        assert_eq!(t.columns(), CANONICAL);
        assert_eq!(t.rows(), rows.as_slice());
    }

    #[test]
    fn rows_without_date_are_filtered() {
        let grid = RawGrid::from_text(vec![
            vec!["Date", "Details", "Credits", "Debits", "Balance"],
            vec!["01/04", "Card payment", "", "12.00", "88.00"],
            vec!["", "continued description", "", "", ""],
            vec!["nan", "Closing balance", "", "", "88.00"],
        ]);
        let t = data(normalize(&grid));
        assert_eq!(t.len(), 1);
        assert!(t.rows().iter().all(|r| !r[0].is_empty()));
    }

    #[test]
    fn missing_marker_is_blanked() {
        let grid = RawGrid::from_text(vec![
            vec!["01/01", "Deposit", "100.00", "nan", "nan"],
            vec!["02/01", "Fee", "nan", "1.00", "99.00"],
        ]);
        let t = data(normalize(&grid));
        assert_eq!(t.rows()[0], ["01/01", "Deposit", "100.00", "", ""]);
        assert!(t.rows().iter().flatten().all(|v| v != "nan"));
    }

    #[test]
    fn header_only_table_is_empty() {
        let grid = RawGrid::from_text(vec![vec!["Date", "Details", "Balance"]]);
        assert_eq!(normalize(&grid), TableOutcome::Empty);
    }
}
