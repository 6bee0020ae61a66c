#![cfg(feature = "serde_support")]

use fx_cuckoo::{BsPayload, ErPayload};

#[test]
fn bs_payload_round_trips_through_json() {
    let payload = BsPayload {
        last_consecutive: 42,
        missing: 0b0010_1001,
    };
    let json = serde_json::to_string(&payload).unwrap();
    let restored: BsPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, payload);
}

#[test]
fn er_payload_round_trips_through_json() {
    let payload = ErPayload {
        country: 9,
        dow: 0b1000_0101,
        ..ErPayload::default()
    };
    let json = serde_json::to_string(&payload).unwrap();
    let restored: ErPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, payload);
}
