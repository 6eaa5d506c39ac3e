//! The built-in dataset pipelines.

use crate::config::{Inputs, PipelineConfig, Step};
use clap::ValueEnum;
use rollup_io::CsvOptions;
use rollup_sql::{FilterOp, JoinKind, Value};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Equipment rentals per marketplace, bucketed by units per customer site.
    Marketplace,
    /// Hospital bills per province, bucketed by amount and split by age range.
    Hospital,
}

impl Preset {
    pub fn config(self) -> PipelineConfig {
        match self {
            Preset::Marketplace => marketplace(),
            Preset::Hospital => hospital(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn marketplace() -> PipelineConfig {
    PipelineConfig {
        name: "marketplace".to_string(),
        inputs: Inputs {
            primary: PathBuf::from("raw_data.csv"),
            reference: Some(PathBuf::from("segments.csv")),
            csv: CsvOptions::default(),
        },
        steps: vec![
            Step::CoerceNumeric {
                column: "Equipment_Rental_Payment_Month".to_string(),
            },
            Step::Join {
                keys: strings(&["Product_Code"]),
                kind: JoinKind::Inner,
            },
            Step::Filter {
                column: "Equipment_Rental_Payment_Month".to_string(),
                operator: FilterOp::GreaterEquals,
                value: Value::Int(25),
            },
            Step::Select {
                columns: strings(&["MARKET_PLACE", "Product_Code", "Segment", "Customer_Site_ID"]),
            },
            Step::GroupCount {
                keys: strings(&["MARKET_PLACE", "Customer_Site_ID", "Segment"]),
                counter: "UnitCount".to_string(),
            },
            Step::Classify {
                keep_columns: strings(&["MARKET_PLACE", "Segment", "UnitCount"]),
                value_column: "UnitCount".to_string(),
                ranges: vec![(1.0, 2.0), (3.0, 5.0)],
                labels: strings(&["1-2", "3-5"]),
                default_label: "6 or more".to_string(),
                new_column: "Category".to_string(),
            },
            Step::Pivot {
                group_col_1: "MARKET_PLACE".to_string(),
                group_col_2: "Category".to_string(),
                value_column: "Segment".to_string(),
                values: vec![Value::from("Seg 1-3"), Value::from("Seg 4-6")],
            },
            Step::Rollup {
                group_col_1: "MARKET_PLACE".to_string(),
                group_col_2: "Category".to_string(),
                total_label: None,
                grand_label: None,
            },
        ],
    }
}

pub fn hospital() -> PipelineConfig {
    PipelineConfig {
        name: "hospital".to_string(),
        inputs: Inputs {
            primary: PathBuf::from("hospital_billing_data.csv"),
            reference: Some(PathBuf::from("age_ranges.csv")),
            csv: CsvOptions::default(),
        },
        steps: vec![
            Step::CoerceNumeric {
                column: "BillAmount".to_string(),
            },
            Step::Join {
                keys: strings(&["AgeRangeID"]),
                kind: JoinKind::Inner,
            },
            Step::Filter {
                column: "BillAmount".to_string(),
                operator: FilterOp::GreaterEquals,
                value: Value::Int(1000),
            },
            Step::Select {
                columns: strings(&["Province", "PatientID", "AgeRangeLabel", "Hospital", "BillAmount"]),
            },
            Step::Classify {
                keep_columns: strings(&["Province", "AgeRangeLabel", "PatientID", "BillAmount"]),
                value_column: "BillAmount".to_string(),
                ranges: vec![(1000.0, 5000.0), (5001.0, 9999.0)],
                labels: strings(&["<5000", "<10000"]),
                default_label: ">10000".to_string(),
                new_column: "Category".to_string(),
            },
            Step::Pivot {
                group_col_1: "Province".to_string(),
                group_col_2: "Category".to_string(),
                value_column: "AgeRangeLabel".to_string(),
                values: vec![
                    Value::from("Child"),
                    Value::from("Adult"),
                    Value::from("Elderly"),
                ],
            },
            Step::Rollup {
                group_col_1: "Province".to_string(),
                group_col_2: "Category".to_string(),
                total_label: None,
                grand_label: None,
            },
        ],
    }
}
