//! Tests for keyword dispatch of free-text instructions.

use sheetops_model::{CountTarget, FilterTarget, Instruction, PreviewEnd, SUGGESTED_INSTRUCTIONS};

fn parse(text: &str) -> Instruction {
    Instruction::parse(text, 10)
}

#[test]
fn test_preview_head_and_tail() {
    assert_eq!(
        parse("show first 5 rows"),
        Instruction::Preview {
            end: PreviewEnd::Head,
            rows: 5
        }
    );
    assert_eq!(
        parse("Display LAST 3"),
        Instruction::Preview {
            end: PreviewEnd::Tail,
            rows: 3
        }
    );
    assert_eq!(
        parse("show the data"),
        Instruction::Preview {
            end: PreviewEnd::Head,
            rows: 10
        }
    );
}

#[test]
fn test_preview_uses_default_rows() {
    assert_eq!(
        Instruction::parse("show last rows", 7),
        Instruction::Preview {
            end: PreviewEnd::Tail,
            rows: 7
        }
    );
}

#[test]
fn test_show_takes_priority_over_other_keywords() {
    // "show" is checked before "info"
    assert!(matches!(
        parse("show data info"),
        Instruction::Preview { .. }
    ));
    assert_eq!(parse("describe the sheet"), Instruction::Describe);
}

#[test]
fn test_copy_column() {
    assert_eq!(
        parse("copy Insurance column to Insurance New"),
        Instruction::CopyInsuranceColumn
    );
    assert_eq!(
        parse("copy Insurance to Insurance New"),
        Instruction::CopyInsuranceColumn
    );
    assert_eq!(parse("copy column"), Instruction::ListColumns);
}

#[test]
fn test_reformat_insurance() {
    assert_eq!(
        parse("Reformat Insurance column"),
        Instruction::ReformatInsurance
    );
    // reformat without insurance is not a known operation
    assert!(matches!(
        parse("reformat dates"),
        Instruction::Unrecognized(_)
    ));
}

#[test]
fn test_count_targets() {
    assert_eq!(
        parse("count insurance types"),
        Instruction::Count(CountTarget::Insurance)
    );
    assert_eq!(
        parse("count by office"),
        Instruction::Count(CountTarget::Office)
    );
    assert_eq!(
        parse("count providers"),
        Instruction::Count(CountTarget::Provider)
    );
    assert_eq!(parse("count"), Instruction::Count(CountTarget::Records));
}

#[test]
fn test_filter_targets() {
    assert_eq!(
        parse("filter patients with no insurance"),
        Instruction::Filter(FilterTarget::NoInsurance)
    );
    assert_eq!(
        parse("filter by insurance"),
        Instruction::Filter(FilterTarget::Insurance)
    );
    assert_eq!(
        parse("filter by date"),
        Instruction::Filter(FilterTarget::DateRange)
    );
    assert_eq!(
        parse("filter by office name"),
        Instruction::Filter(FilterTarget::Office)
    );
    assert_eq!(
        parse("filter something"),
        Instruction::Filter(FilterTarget::Columns)
    );
}

#[test]
fn test_summary_and_export() {
    assert_eq!(parse("generate summary report"), Instruction::Summary);
    assert_eq!(parse("report"), Instruction::Summary);
    assert_eq!(parse("save my work"), Instruction::Export);
    assert_eq!(parse("export"), Instruction::Export);
}

#[test]
fn test_unrecognized_keeps_original_text() {
    assert_eq!(
        parse("  Pivot by Provider  "),
        Instruction::Unrecognized("Pivot by Provider".to_string())
    );
}

#[test]
fn test_display_round_trips_through_parse() {
    let instructions = [
        Instruction::Preview {
            end: PreviewEnd::Tail,
            rows: 4,
        },
        Instruction::Describe,
        Instruction::ReformatInsurance,
        Instruction::Count(CountTarget::Provider),
        Instruction::Filter(FilterTarget::NoInsurance),
        Instruction::Summary,
        Instruction::Export,
    ];
    for instruction in instructions {
        assert_eq!(parse(&instruction.to_string()), instruction);
    }
}

#[test]
fn test_instruction_json_snapshot() {
    let json = serde_json::to_string(&parse("show last 3 rows")).expect("serialize");
    insta::assert_snapshot!(json, @r#"{"Preview":{"end":"Tail","rows":3}}"#);
}

#[test]
fn test_suggestions_parse_to_the_instruction_they_describe() {
    let expected = [
        Instruction::ReformatInsurance,
        Instruction::Preview {
            end: PreviewEnd::Head,
            rows: 10,
        },
        Instruction::Count(CountTarget::Insurance),
        Instruction::CopyInsuranceColumn,
        Instruction::Describe,
        Instruction::Filter(FilterTarget::NoInsurance),
        Instruction::Summary,
        Instruction::Export,
    ];
    assert_eq!(SUGGESTED_INSTRUCTIONS.len(), expected.len());
    for ((text, description), want) in SUGGESTED_INSTRUCTIONS.iter().zip(expected) {
        assert_eq!(parse(text), want, "'{text}' should {description}");
    }
}
