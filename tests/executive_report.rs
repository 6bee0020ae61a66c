use std::collections::HashMap;

use fx_cuckoo::{group_key, ExecutiveReportFilter};

#[test]
fn e1_fresh_insert_marks_the_entry_new() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    assert_eq!(f.add("alice", 1, 2, 1, 3, false).unwrap(), true);
    assert!(f.query("alice"));
}

#[test]
fn e2_merge_ors_the_day_of_week_bitmap() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    f.add("alice", 1, 2, 1, 3, false).unwrap();
    f.add("alice", 1, 2, 1, 5, false).unwrap();

    let mut sink: HashMap<(u8, u8, u8), [u64; 9]> = HashMap::new();
    sink.insert((1, 2, 1), [0; 9]);
    f.report(&mut sink);

    let row = sink[&(1, 2, 1)];
    assert_eq!(row[1], 1); // active (non-empty dow)
    assert_eq!(row[4], 1); // new
    assert_eq!(row[6], 1); // total
}

#[test]
fn e3_merge_overwrites_classification_fields() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    f.add("alice", 1, 2, 1, 0, false).unwrap();
    f.add("alice", 9, 5, 2, 1, true).unwrap();

    let mut sink: HashMap<(u8, u8, u8), [u64; 9]> = HashMap::new();
    sink.insert((9, 5, 2), [0; 9]);
    f.report(&mut sink);
    let row = sink[&(9, 5, 2)];
    assert_eq!(row[6], 1);
    assert_eq!(row[8], 1); // default flag carried through
}

#[test]
fn e4_out_of_range_arguments_are_rejected_before_touching_the_filter() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    assert!(f.add("alice", 1, 8, 0, 0, false).is_err());
    assert!(f.add("alice", 1, 0, 4, 0, false).is_err());
    assert!(f.add("alice", 1, 0, 0, 7, false).is_err());
    assert!(!f.query("alice"));
}

#[test]
fn e5_report_skips_entries_whose_group_is_absent_from_the_sink() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    f.add("alice", 1, 2, 1, 3, false).unwrap();

    let mut sink: HashMap<(u8, u8, u8), [u64; 9]> = HashMap::new();
    // Sink has no row for (1, 2, 1): report must skip it entirely, leaving
    // the stored entry's dow/dflt untouched for a later report pass.
    f.report(&mut sink);

    sink.insert((1, 2, 1), [0; 9]);
    f.report(&mut sink);
    let row = sink[&(1, 2, 1)];
    assert_eq!(row[6], 1);
}

#[test]
fn five_of_seven_active_days_counts_toward_the_five_of_seven_column() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    for day in 0..5u8 {
        f.add("alice", 1, 2, 1, day, false).unwrap();
    }

    let mut sink: HashMap<(u8, u8, u8), [u64; 9]> = HashMap::new();
    sink.insert((1, 2, 1), [0; 9]);
    f.report(&mut sink);
    let row = sink[&(1, 2, 1)];
    assert_eq!(row[5], 1);
}

#[test]
fn report_clears_dow_and_dflt_for_reported_entries() {
    let mut f = ExecutiveReportFilter::new(64).unwrap();
    f.add("alice", 1, 2, 1, 3, true).unwrap();

    let mut sink: HashMap<(u8, u8, u8), [u64; 9]> = HashMap::new();
    sink.insert((1, 2, 1), [0; 9]);
    f.report(&mut sink);

    // A second report pass with no new activity sees an inactive, non-new,
    // non-default entry.
    sink.insert((1, 2, 1), [0; 9]);
    f.report(&mut sink);
    let row = sink[&(1, 2, 1)];
    assert_eq!(row[1], 0); // not active
    assert_eq!(row[3], 1); // inactive
    assert_eq!(row[4], 0); // not new
    assert_eq!(row[8], 0); // default cleared
}

#[test]
fn group_key_formats_as_comma_separated_triple() {
    assert_eq!(group_key(9, 5, 2), "9,5,2");
}
