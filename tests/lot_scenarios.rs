//! Lot scenario and invariant tests
//!
//! Exercise the public engine API end to end:
//! - construction and layout distribution
//! - park / unpark / search lifecycles
//! - directory ↔ spot consistency after every step

use parklot::parking::{
    normalize_vehicle_number, ErrorKind, Layout, LotConfig, ParkingError, ParkingLot, SpotId,
    SpotType, VehicleType,
};

/// Every directory entry points at a spot occupied by that vehicle, and
/// the occupied count equals the parked count.
fn assert_consistent(lot: &ParkingLot) {
    let parked = lot.all_parked_vehicles();
    assert_eq!(lot.occupied_spot_count().unwrap(), parked.len());
    assert_eq!(lot.parked_vehicle_count(), parked.len());

    for (number, spot_id) in &parked {
        let spot = lot.spot_by_id(&spot_id.to_string()).unwrap();
        assert!(spot.is_occupied().unwrap());
        assert_eq!(spot.vehicle_number().unwrap().as_deref(), Some(number.as_str()));
    }
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn scenario_a_counts_for_2x3x4() {
    let lot = ParkingLot::create("T", 2, 3, 4).unwrap();
    assert_eq!(lot.total_spot_count(), 24);

    let counts = lot.spot_count_by_type().unwrap();
    assert_eq!(counts.values().sum::<usize>(), 24);
    for t in SpotType::ACTIVE {
        assert!(counts[&t] > 0, "{t:?} missing");
    }
}

#[test]
fn dimensions_are_validated_never_clamped() {
    for (f, r, c) in [(0, 1, 1), (9, 1, 1), (1, 0, 1), (1, 1001, 1), (1, 1, 0), (1, 1, 1001)] {
        let err = ParkingLot::create("T", f, r, c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimensions, "{f}x{r}x{c}");
    }
    assert!(ParkingLot::create("T", 8, 1, 1).is_ok());
}

#[test]
fn layout_matches_lot_floors() {
    let layout = Layout::generate(3, 8, 9).unwrap();
    let lot = ParkingLot::create("T", 3, 8, 9).unwrap();

    for f in 0..3 {
        assert_eq!(lot.floor(f).unwrap().layout().unwrap(), layout.floor(f).unwrap());
    }
    assert_eq!(lot.spot_count_by_type().unwrap(), layout.count_by_type());
}

#[test]
fn spot_ids_round_trip_for_every_spot() {
    let lot = ParkingLot::create("T", 2, 8, 9).unwrap();
    for floor in lot.floors() {
        for snapshot in floor.snapshot().unwrap() {
            let text = snapshot.id.to_string();
            let parsed: SpotId = text.parse().unwrap();
            assert_eq!(parsed, snapshot.id);
            assert_eq!(lot.spot_by_id(&text).unwrap().id(), snapshot.id);
        }
    }
}

// =============================================================================
// Park / unpark lifecycle
// =============================================================================

#[test]
fn scenario_b_park_automobile() {
    let lot = ParkingLot::create("T", 2, 3, 4).unwrap();
    let spot_id = lot.park(VehicleType::Automobile, "KA-01-HH-1234").unwrap();

    let text = spot_id.to_string();
    assert_eq!(text.split('-').count(), 3);
    assert!(text.split('-').all(|p| p.parse::<usize>().is_ok()));

    assert!(lot.is_vehicle_parked("KA-01-HH-1234"));
    assert_eq!(lot.occupied_spot_count().unwrap(), 1);
    assert_consistent(&lot);
}

#[test]
fn scenario_c_double_park_rejected() {
    let lot = ParkingLot::create("T", 2, 3, 4).unwrap();
    let first = lot.park(VehicleType::Automobile, "KA-01").unwrap();

    let err = lot.park(VehicleType::Automobile, "ka-01").unwrap_err();
    assert_eq!(
        err,
        ParkingError::VehicleAlreadyParked {
            vehicle_number: "KA-01".into(),
            spot_id: first.to_string(),
        }
    );
    assert_eq!(lot.search_vehicle("KA-01").unwrap(), (first, true));
    assert_eq!(lot.occupied_spot_count().unwrap(), 1);
    assert_consistent(&lot);
}

#[test]
fn scenario_d_bicycle_spots_exhausted() {
    let lot = ParkingLot::create("T", 1, 2, 2).unwrap();
    let bicycle_spots = lot.spot_count_by_type().unwrap()[&SpotType::Bicycle];
    assert!(bicycle_spots > 0);

    for i in 0..bicycle_spots {
        lot.park(VehicleType::Bicycle, &format!("BIKE-{i}")).unwrap();
    }

    let err = lot.park(VehicleType::Bicycle, "BIKE-EXTRA").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSpaceAvailable);
    assert!(err.is_capacity());
    assert!(!lot.is_vehicle_parked("BIKE-EXTRA"));

    let occupied_bicycle = lot
        .floors()
        .iter()
        .flat_map(|f| f.snapshot().unwrap())
        .filter(|s| s.spot_type == SpotType::Bicycle && s.is_occupied())
        .count();
    assert_eq!(occupied_bicycle, bicycle_spots);
    assert_consistent(&lot);
}

#[test]
fn scenario_e_park_then_unpark() {
    let lot = ParkingLot::create("T", 2, 3, 4).unwrap();
    let spot_id = lot.park(VehicleType::Motorcycle, "MH-12 AB 9").unwrap();

    lot.unpark(&spot_id.to_string(), "mh-12  ab 9").unwrap();
    assert!(!lot.is_vehicle_parked("MH-12 AB 9"));
    assert_eq!(lot.search_vehicle("MH-12 AB 9").unwrap(), (spot_id, false));

    let err = lot.unpark(&spot_id.to_string(), "MH-12 AB 9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::VehicleNotFound);
    assert_consistent(&lot);
}

#[test]
fn unpark_checks_spot_then_vacates() {
    let lot = ParkingLot::create("T", 1, 3, 4).unwrap();
    let spot_id = lot.park(VehicleType::Automobile, "A1").unwrap();

    let err = lot.unpark("0-2-3", "A1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    assert!(lot.is_vehicle_parked("A1"));

    lot.unpark(&spot_id.to_string(), "A1").unwrap();
    assert_eq!(lot.occupied_spot_count().unwrap(), 0);
}

#[test]
fn history_accumulates_across_visits() {
    let lot = ParkingLot::create("T", 2, 3, 4).unwrap();

    let first = lot.park(VehicleType::Automobile, "A1").unwrap();
    lot.park(VehicleType::Automobile, "A2").unwrap();
    lot.unpark(&first.to_string(), "A1").unwrap();
    let second = lot.park(VehicleType::Automobile, "A1").unwrap();

    let history = lot.vehicle_history("A1").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.records[0].spot_id, first);
    assert!(history.records[0].is_complete());
    assert_eq!(history.current_spot_id(), Some(second));
    assert_consistent(&lot);
}

#[test]
fn normalization_is_stable() {
    for raw in ["ka 01", "  A\t\tb  c ", "X-1-y", "already NORMAL"] {
        let once = normalize_vehicle_number(raw);
        assert_eq!(normalize_vehicle_number(&once), once);
    }
}

#[test]
fn errors_are_distinguishable_by_kind() {
    let lot = ParkingLot::create("T", 1, 1, 1).unwrap();

    let not_found = lot.search_vehicle("GHOST").unwrap_err();
    assert!(not_found.is_not_found());
    assert!(!not_found.is_capacity());

    let malformed = lot.park(VehicleType::Bicycle, "??").unwrap_err();
    assert!(malformed.is_caller_error());

    lot.park(VehicleType::Bicycle, "B1").unwrap();
    let full = lot.park(VehicleType::Bicycle, "B2").unwrap_err();
    assert!(full.is_capacity());
    assert!(!full.is_caller_error());
}

#[test]
fn reset_restores_fresh_state() {
    let lot = ParkingLot::create("T", 2, 3, 4).unwrap();
    let before = lot.available_spot(VehicleType::Automobile).unwrap();

    for i in 0..5 {
        lot.park(VehicleType::Automobile, &format!("CAR-{i}")).unwrap();
    }
    lot.reset().unwrap();

    assert_eq!(lot.available_spot(VehicleType::Automobile).unwrap(), before);
    assert!(lot.all_parked_vehicles().is_empty());
    assert!(lot.vehicle_history("CAR-0").unwrap_err().is_not_found());
    assert_consistent(&lot);
}

// =============================================================================
// Matching policy
// =============================================================================

#[test]
fn hierarchical_policy_falls_back_after_exhausting_preferred_type() {
    let config = LotConfig {
        strict_matching: false,
        ..LotConfig::with_dimensions("H", 2, 3, 4)
    };
    let lot = ParkingLot::with_config(&config).unwrap();

    // Four bicycle spots across both floors come first
    let mut assigned = Vec::new();
    for i in 0..4 {
        assigned.push(lot.park(VehicleType::Bicycle, &format!("B{i}")).unwrap());
    }
    assert!(assigned
        .iter()
        .all(|id| lot.spot_by_id(&id.to_string()).unwrap().spot_type().unwrap() == SpotType::Bicycle));

    let fallback = lot.park(VehicleType::Bicycle, "B4").unwrap();
    assert_eq!(
        lot.spot_by_id(&fallback.to_string()).unwrap().spot_type().unwrap(),
        SpotType::Motorcycle
    );
    assert_consistent(&lot);
}

#[test]
fn strict_policy_never_crosses_types() {
    let lot = ParkingLot::create("S", 1, 3, 4).unwrap();
    lot.park(VehicleType::Motorcycle, "M1").unwrap();
    lot.park(VehicleType::Motorcycle, "M2").unwrap();

    let err = lot.park(VehicleType::Motorcycle, "M3").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSpaceAvailable);
    assert_eq!(lot.available_spot(VehicleType::Automobile).unwrap().len(), 6);
}
