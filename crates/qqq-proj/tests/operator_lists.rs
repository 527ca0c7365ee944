use qqq_core::{OperatorType, QqqError};
use qqq_proj::{Channel, OperatorLists, OperatorSelection};

const LISTS: &str = "\
<G1>
 SS  0  1  2
 SD  0 11 17 20 22
 DDI 0  4  5  9 12
 DDL 1  4 10 15 21
 TDT 3  5  9 11 25
<G2>
 SS
 SD   0  1  2  6  7
<H>
 # comment
 SS   0
";

#[test]
fn parses_selections_per_irrep() {
    let lists = OperatorLists::parse(LISTS, "mem").unwrap();
    let g1g = Channel::new("G1g").unwrap();
    let g1 = lists.for_channel(&g1g).unwrap();
    assert_eq!(g1.indices(OperatorType::SingleSite), &[0, 1, 2]);
    assert_eq!(g1.indices(OperatorType::TriplyDisplacedT), &[3, 5, 9, 11, 25]);

    let g2u = Channel::new("G2u").unwrap();
    let g2 = lists.for_channel(&g2u).unwrap();
    assert!(g2.indices(OperatorType::SingleSite).is_empty());
    assert!(g2.indices(OperatorType::DoublyDisplacedI).is_empty());

    let irreps: Vec<&str> = lists.iter().map(|(irrep, _)| irrep).collect();
    assert_eq!(irreps, vec!["G1", "G2", "H"]);
}

#[test]
fn expected_count_scales_displaced_types_only() {
    let lists = OperatorLists::parse(LISTS, "mem").unwrap();
    let g1 = lists.for_channel(&Channel::new("G1u").unwrap()).unwrap();
    assert_eq!(g1.expected_operator_count(1), 3 + 20);
    assert_eq!(g1.expected_operator_count(2), 3 + 40);
}

#[test]
fn rejects_unknown_tags_and_headerless_lines() {
    let err = OperatorLists::parse("<G1>\nXX 1 2\n", "mem").unwrap_err();
    assert!(matches!(err, QqqError::Format(ref info) if info.code == "operator-type"));
    let err = OperatorLists::parse("SS 1 2\n", "mem").unwrap_err();
    assert!(matches!(err, QqqError::Format(ref info) if info.code == "irrep-header"));
    let err = OperatorLists::parse("<G1>\nSS 1\nSS 2\n", "mem").unwrap_err();
    assert!(matches!(err, QqqError::Format(ref info) if info.code == "duplicate-type"));
}

#[test]
fn repeated_index_on_a_type_line_is_rejected() {
    let err = OperatorLists::parse("<G1>\nSD 4 7\nSS 0 0\n", "mem").unwrap_err();
    match err {
        QqqError::Format(info) => {
            assert_eq!(info.code, "duplicate-index");
            assert_eq!(info.context["line"], "3");
            assert_eq!(info.context["type"], "SS");
            assert_eq!(info.context["index"], "0");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(OperatorLists::parse("<G1>\nSS 0\n<G2>\nSS 0\n", "mem").is_ok());
}

#[test]
fn selections_deserialize_from_yaml() {
    let yaml = "G1:\n  SS: [0, 1]\n  SD: [4]\n";
    let lists: OperatorLists = serde_yaml::from_str(yaml).unwrap();
    let mut expected = OperatorSelection::new();
    expected.set(OperatorType::SingleSite, vec![0, 1]);
    expected.set(OperatorType::SinglyDisplaced, vec![4]);
    let g1 = lists.for_channel(&Channel::new("G1g").unwrap()).unwrap();
    assert_eq!(g1, &expected);
}

#[test]
fn channel_labels_need_parity() {
    assert_eq!(Channel::new("Hu").unwrap().irrep(), "H");
    assert_eq!(Channel::new("G2g").unwrap().irrep(), "G2");
    assert!(matches!(Channel::new("G1"), Err(QqqError::Config(_))));
    assert!(matches!(Channel::new("g"), Err(QqqError::Config(_))));
}
