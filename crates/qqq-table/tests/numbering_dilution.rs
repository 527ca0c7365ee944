use proptest::prelude::*;
use qqq_core::{Coefficient, OperatorType, QqqError};
use qqq_proj::Channel;
use qqq_table::{
    Contribution, DilutionScheme, OperatorNumbering, OperatorOrigin, QuarkOrdering, SolutionFiles,
};

fn origin(channel: &str, length: i32, op_type: OperatorType, index: usize) -> OperatorOrigin {
    OperatorOrigin {
        channel: Channel::new(channel).unwrap(),
        length,
        op_type,
        index,
    }
}

fn contribution(name: &str, origin: OperatorOrigin) -> Contribution {
    Contribution {
        name: name.to_string(),
        origin,
        coefficient: Coefficient::new(1.0, 0.0),
    }
}

#[test]
fn operator_names_follow_channel_length_type_index() {
    assert_eq!(origin("G1g", 0, OperatorType::SingleSite, 0).name(), "G1g_L0_SS_0");
    assert_eq!(origin("G1g", 3, OperatorType::SinglyDisplaced, 11).name(), "G1g_L3_SD_11");
    assert_eq!(origin("Hu", 2, OperatorType::TriplyDisplacedT, 4).name(), "Hu_L2_TDT_4");
}

#[test]
fn numbering_is_sorted_and_dense() {
    let a = origin("G1g", 1, OperatorType::SinglyDisplaced, 2);
    let b = origin("G1g", 0, OperatorType::SingleSite, 0);
    let contributions = vec![
        contribution(&a.name(), a.clone()),
        contribution(&b.name(), b.clone()),
        contribution(&a.name(), a.clone()),
    ];
    let numbering = OperatorNumbering::from_contributions(&contributions).unwrap();
    assert_eq!(numbering.len(), 2);
    assert_eq!(numbering.id("G1g_L0_SS_0"), Some(0));
    assert_eq!(numbering.id("G1g_L1_SD_2"), Some(1));
    assert_eq!(numbering.name(1), Some("G1g_L1_SD_2"));
    assert_eq!(numbering.id("G1g_L1_SD_3"), None);
}

#[test]
fn two_origins_with_one_name_collide() {
    let first = origin("G1g", 1, OperatorType::SinglyDisplaced, 2);
    let second = origin("G1g", 1, OperatorType::DoublyDisplacedI, 2);
    let contributions = vec![
        contribution("G1g_L1_SD_2", first),
        contribution("G1g_L1_SD_2", second),
    ];
    let err = OperatorNumbering::from_contributions(&contributions).unwrap_err();
    match err {
        QqqError::Naming(info) => {
            assert_eq!(info.code, "name-collision");
            assert_eq!(info.context["name"], "G1g_L1_SD_2");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn time_dilution_alone_enumerates_time_suffixes() {
    let scheme = DilutionScheme::new(2, 1, 1, 1);
    assert_eq!(scheme.size(), 2);
    assert_eq!(
        scheme.solution_names("quark1", ".lime"),
        vec!["quark1_t0.lime", "quark1_t1.lime"]
    );
}

#[test]
fn dilution_suffixes_nest_time_color_spin_space() {
    let scheme = DilutionScheme::new(1, 2, 1, 2);
    assert_eq!(
        scheme.solution_names("q", ".lime"),
        vec![
            "q_t0_c0_x0.lime",
            "q_t0_c0_x1.lime",
            "q_t0_c1_x0.lime",
            "q_t0_c1_x1.lime",
        ]
    );
}

#[test]
fn solution_files_cover_every_leg() {
    let files = SolutionFiles {
        stub: "sol".to_string(),
        extension: ".lime".to_string(),
        legs: [
            DilutionScheme::new(2, 1, 1, 1),
            DilutionScheme::default(),
            DilutionScheme::new(1, 1, 2, 1),
        ],
    };
    assert_eq!(files.sizes(), [2, 1, 2]);
    assert_eq!(
        files.names(),
        vec![
            "sol1_t0.lime",
            "sol1_t1.lime",
            "sol2_t0.lime",
            "sol3_t0_s0.lime",
            "sol3_t0_s1.lime",
        ]
    );
    assert!(files.validate().is_ok());
}

#[test]
fn zero_dilution_count_is_rejected() {
    let mut files = SolutionFiles::default();
    files.legs[1].spin = 0;
    match files.validate().unwrap_err() {
        QqqError::Config(info) => {
            assert_eq!(info.code, "dilution");
            assert_eq!(info.context["leg"], "2");
            assert_eq!(info.context["field"], "spin");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn source_orderings_are_the_six_permutations() {
    let mut legs: Vec<[usize; 3]> = QuarkOrdering::SOURCE.iter().map(QuarkOrdering::legs).collect();
    assert_eq!(legs[0], [0, 1, 2]);
    assert_eq!(legs[1], [2, 1, 0]);
    legs.sort();
    legs.dedup();
    assert_eq!(legs.len(), 6);
    assert_eq!(QuarkOrdering::default(), QuarkOrdering::IDENTITY);
}

#[test]
fn orderings_must_be_permutations() {
    assert!(QuarkOrdering::new([1, 2, 0]).is_ok());
    assert!(QuarkOrdering::new([0, 0, 1]).is_err());
    assert!(QuarkOrdering::new([0, 1, 3]).is_err());
    let parsed: Result<Vec<QuarkOrdering>, _> = serde_yaml::from_str("- [0, 1, 2]\n- [1, 1, 2]\n");
    assert!(parsed.is_err());
}

proptest! {
    #[test]
    fn ids_match_sorted_positions(names in proptest::collection::vec("[A-Z][0-9a-z_]{0,8}", 0..24)) {
        let numbering = OperatorNumbering::from_names(names.clone());
        let mut expected = names;
        expected.sort();
        expected.dedup();
        prop_assert_eq!(numbering.names(), expected.as_slice());
        for (id, name) in expected.iter().enumerate() {
            prop_assert_eq!(numbering.id(name), Some(id));
        }
    }

    #[test]
    fn solution_name_count_matches_scheme_size(t in 1usize..4, c in 1usize..4, s in 1usize..4, x in 1usize..4) {
        let scheme = DilutionScheme::new(t, c, s, x);
        let names = scheme.solution_names("q", ".lime");
        prop_assert_eq!(names.len(), scheme.size());
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), names.len());
    }
}
