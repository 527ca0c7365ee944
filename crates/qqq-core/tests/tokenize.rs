use qqq_core::{parse_numbers, tokenize};
use proptest::prelude::*;

fn values(line: &str) -> Vec<f64> {
    parse_numbers(line).iter().map(|n| n.value()).collect()
}

#[test]
fn splits_on_all_separators() {
    assert_eq!(values("1,2;3:4 5\t6"), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn handles_signs_and_exponents() {
    let numbers = parse_numbers("-3 +2 1.5e2 2.5D-1 -0.25d0 7E+1");
    let texts: Vec<&str> = numbers.iter().map(|n| n.text()).collect();
    assert_eq!(texts, vec!["-3", "+2", "1.5E2", "2.5E-1", "-0.25E0", "7E+1"]);
    let parsed: Vec<f64> = numbers.iter().map(|n| n.value()).collect();
    assert_eq!(parsed, vec![-3.0, 2.0, 150.0, 0.25, -0.25, 70.0]);
}

#[test]
fn strips_trailing_garbage_and_skips_empty_tokens() {
    assert_eq!(values("12abc 1.5E , - ; + :"), vec![12.0, 1.5]);
    assert!(values("SS DDL TDT").is_empty());
    assert_eq!(values("SD 0 11 17"), vec![0.0, 11.0, 17.0]);
}

#[test]
fn integer_detection() {
    let numbers = parse_numbers("4 -2 2.0 0.5");
    let ints: Vec<Option<i64>> = numbers.iter().map(|n| n.as_int()).collect();
    assert_eq!(ints, vec![Some(4), Some(-2), Some(2), None]);
}

#[test]
fn token_stream_is_restartable() {
    let mut stream = tokenize("1 2 3");
    stream.next();
    let restart = stream.clone();
    let rest: Vec<f64> = stream.map(|n| n.value()).collect();
    let again: Vec<f64> = restart.map(|n| n.value()).collect();
    assert_eq!(rest, again);
    assert_eq!(rest, vec![2.0, 3.0]);
}

proptest! {
    #[test]
    fn integers_survive_any_separator(ints in prop::collection::vec(-1000i64..1000, 0..20), sep in prop::sample::select(vec![" ", ",", ";", ":", "\t", " , "])) {
        let line = ints.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(sep);
        let parsed: Vec<i64> = parse_numbers(&line).iter().filter_map(|n| n.as_int()).collect();
        prop_assert_eq!(parsed, ints);
    }

    #[test]
    fn floats_round_trip_through_display(value in -1.0e6f64..1.0e6) {
        let parsed = parse_numbers(&format!("{value}"));
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(parsed[0].value(), value);
    }
}
