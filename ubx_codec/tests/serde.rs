#![cfg(feature = "serde")]

use ubx_codec::{MgaGpsEph, RxmRawx, RxmRawxMeas, UbxMessage, MAX_NUM_SATS};

#[test]
fn test_serde_rawx_round_trip() {
    let msg = UbxMessage::from(
        RxmRawx::new(1.5, 2015, 0, 0, 0)
            .with_measurements([RxmRawxMeas {
                sv_id: 12,
                freq_id: -3,
                ..Default::default()
            }])
            .unwrap(),
    );
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["RxmRawx"]["week"], 2015);
    assert_eq!(json["RxmRawx"]["measurements"][0]["freq_id"], -3);
    assert!(json["RxmRawx"]["measurements"][0].get("reserved2").is_none());

    let back: UbxMessage = serde_json::from_value(json).unwrap();
    assert_eq!(back, msg);
}

#[test]
fn test_serde_eph_round_trip() {
    let msg = UbxMessage::from(MgaGpsEph {
        sv_id: 3,
        af0: -300,
        ..Default::default()
    });
    let json = serde_json::to_string(&msg).unwrap();
    assert!(!json.contains("reserved1"));
    let back: UbxMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

#[test]
fn test_serde_rejects_too_many_measurements() {
    let meas = serde_json::to_value(RxmRawxMeas::default()).unwrap();
    let json = serde_json::json!({
        "rcv_tow": 0.0,
        "week": 0,
        "leap_s": 0,
        "rec_stat": 0,
        "version": 0,
        "measurements": vec![meas; MAX_NUM_SATS + 1],
    });
    assert!(serde_json::from_value::<RxmRawx>(json).is_err());
}
