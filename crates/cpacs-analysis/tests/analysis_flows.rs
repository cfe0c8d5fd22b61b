//! Derived analyses over aeromaps loaded from CPACS documents.

use std::fs;
use std::path::PathBuf;

use cpacs_aeromap::{
    AeroMap, AeroMapError, Coefficients, Column, Cpacs, DerivedForce, FlightPoint, RowFilter,
};
use cpacs_analysis::{
    AtmosphereModel, IsaAtmosphere, StabilityAxis, calculate_forces, check_stability,
    drag_polar_fit,
};
use proptest::prelude::*;
use tempfile::TempDir;

// cd follows cd0 + k * cl^2 with cd0 = 0.021 and k = 0.045
const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cpacs>
  <header>
    <name>D150</name>
  </header>
  <vehicles>
    <aircraft>
      <model uID="D150_VAMP">
        <reference>
          <length>4.19</length>
          <area>122.4</area>
          <point>
            <x>0</x>
            <y>0</y>
            <z>0</z>
          </point>
        </reference>
        <analyses>
          <aeroPerformance>
            <aeroMap uID="sweep">
              <name>sweep</name>
              <description>Angle of attack sweep at cruise</description>
              <boundaryConditions>
                <atmosphericModel>ISA</atmosphericModel>
              </boundaryConditions>
              <aeroPerformanceMap>
                <altitude mapType="vector">11000;11000;11000;11000</altitude>
                <machNumber mapType="vector">0.78;0.78;0.78;0.78</machNumber>
                <angleOfSideslip mapType="vector">0;0;0;0</angleOfSideslip>
                <angleOfAttack mapType="vector">0;2;4;6</angleOfAttack>
                <cd mapType="vector">0.021;0.0282;0.0498;0.0858</cd>
                <cl mapType="vector">0;0.4;0.8;1.2</cl>
                <cms mapType="vector">0.05;0.02;-0.01;-0.04</cms>
              </aeroPerformanceMap>
            </aeroMap>
          </aeroPerformance>
        </analyses>
      </model>
    </aircraft>
  </vehicles>
</cpacs>
"#;

fn open_fixture() -> (TempDir, PathBuf, Cpacs) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("D150_sweep.xml");
    fs::write(&path, FIXTURE).unwrap();
    let cpacs = Cpacs::open(&path).unwrap();
    (dir, path, cpacs)
}

#[test]
fn polar_fit_over_a_loaded_aeromap() {
    let (_dir, _path, cpacs) = open_fixture();
    let aeromap = cpacs.aeromap_by_uid("sweep").unwrap();
    let polar = drag_polar_fit(aeromap, 9.4, &RowFilter::new()).unwrap();
    assert!((polar.cd0 - 0.021).abs() < 1e-9);
    let expected = 1.0 / (0.045 * 9.4 * std::f64::consts::PI);
    assert!((polar.oswald_efficiency - expected).abs() < 1e-9);
}

#[test]
fn stability_over_a_loaded_aeromap() {
    let (_dir, _path, cpacs) = open_fixture();
    let aeromap = cpacs.aeromap_by_uid("sweep").unwrap();
    let result = check_stability(aeromap, StabilityAxis::Longitudinal, &RowFilter::new()).unwrap();
    assert_eq!(result.stability, Some(true));
    assert_eq!(result.note, None);
}

#[test]
fn forces_fill_the_derived_columns() {
    let (_dir, _path, mut cpacs) = open_fixture();
    let aircraft = cpacs.aircraft.clone();
    let aeromap = cpacs.aeromap_by_uid_mut("sweep").unwrap();
    calculate_forces(aeromap, &aircraft, &IsaAtmosphere).unwrap();

    let sample = IsaAtmosphere.sample(11000.0).unwrap();
    let velocity = 0.78 * sample.speed_of_sound;
    let pressure_term = 0.5 * sample.density * aircraft.ref_area * velocity * velocity;

    let everything = RowFilter::new();
    let lift = aeromap.get(Column::Derived(DerivedForce::Lift), &everything).unwrap();
    assert_eq!(lift[0], 0.0);
    assert!((lift[3] - pressure_term * 1.2).abs() < 1e-6);
    let pitch = aeromap
        .get(Column::Derived(DerivedForce::MomentS), &everything)
        .unwrap();
    assert!((pitch[0] - pressure_term * 0.05 * aircraft.ref_length).abs() < 1e-6);

    // cs was stored nowhere, the side force stays unset per row
    let side = aeromap.get(Column::Derived(DerivedForce::Side), &everything).unwrap();
    assert!(side.iter().all(|v| v.is_nan()));
}

#[test]
fn forces_skip_columns_missing_from_a_csv_import() {
    let (dir, _path, mut cpacs) = open_fixture();
    let csv_in = dir.path().join("partial.csv");
    fs::write(
        &csv_in,
        "altitude,machNumber,angleOfSideslip,angleOfAttack,cd,cl\n\
         0,0.2,0,0,0.02,0.1\n\
         0,0.2,0,2,0.025,0.5\n",
    )
    .unwrap();
    let aircraft = cpacs.aircraft.clone();
    let aeromap = cpacs.create_aeromap_from_csv(&csv_in, None).unwrap();
    calculate_forces(aeromap, &aircraft, &IsaAtmosphere).unwrap();

    let everything = RowFilter::new();
    let lift = aeromap.get(Column::Derived(DerivedForce::Lift), &everything).unwrap();
    assert_eq!(lift.len(), 2);
    assert!(lift[1] > lift[0]);

    // No cs column imported, so no side force column exists at all
    let err = aeromap
        .get(Column::Derived(DerivedForce::Side), &everything)
        .unwrap_err();
    assert!(matches!(err, AeroMapError::ColumnNotPresent { .. }));
}

proptest! {
    /// A polar generated from known parameters is recovered by the fit.
    #[test]
    fn fitted_polars_recover_their_parameters(
        cd0 in 0.005f64..0.05,
        k in 0.01f64..0.2,
        aspect_ratio in 6.0f64..12.0,
    ) {
        let mut aeromap = AeroMap::new("generated_polar").unwrap();
        for step in 0..6 {
            let cl = 0.2 * step as f64;
            aeromap
                .add_row(
                    FlightPoint::new(0.0, 0.3, 0.0, step as f64),
                    Coefficients {
                        cd: Some(cd0 + k * cl * cl),
                        cl: Some(cl),
                        ..Coefficients::default()
                    },
                )
                .unwrap();
        }
        let polar = drag_polar_fit(&aeromap, aspect_ratio, &RowFilter::new()).unwrap();
        prop_assert!((polar.cd0 - cd0).abs() < 1e-9);
        let expected = 1.0 / (k * aspect_ratio * std::f64::consts::PI);
        prop_assert!((polar.oswald_efficiency - expected).abs() < 1e-6);
    }

    /// The sign of an exactly linear moment decides the verdict.
    #[test]
    fn stability_follows_the_slope_sign(
        slope in -0.1f64..0.1,
        intercept in -0.5f64..0.5,
    ) {
        prop_assume!(slope.abs() > 1e-6);
        let mut aeromap = AeroMap::new("generated_moment").unwrap();
        for step in 0..4 {
            let aoa = f64::from(step);
            aeromap
                .add_row(
                    FlightPoint::new(0.0, 0.3, 0.0, aoa),
                    Coefficients {
                        cms: Some(intercept + slope * aoa),
                        ..Coefficients::default()
                    },
                )
                .unwrap();
        }
        let result =
            check_stability(&aeromap, StabilityAxis::Longitudinal, &RowFilter::new()).unwrap();
        prop_assert_eq!(result.stability, Some(slope < 0.0));
        prop_assert_eq!(result.note, None);
    }
}
