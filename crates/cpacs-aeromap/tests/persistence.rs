//! Aeromap load, edit and save flows against a CPACS document on disk.

use std::path::PathBuf;

use cpacs_aeromap::{
    AeroMap, AeroMapError, Coefficient, Coefficients, Column, Cpacs, FlightPoint, Parameter,
    RotationAxis, RowFilter,
};
use cpacs_document::Document;
use proptest::option;
use proptest::prelude::*;
use tempfile::TempDir;

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
            <aeroMap uID="aeromap_test1">
              <name>aeromap_test1</name>
              <description>Common default aeroMap</description>
              <boundaryConditions>
                <atmosphericModel>ISA</atmosphericModel>
              </boundaryConditions>
              <aeroPerformanceMap>
                <altitude mapType="vector">0</altitude>
                <machNumber mapType="vector">0.3</machNumber>
                <angleOfSideslip mapType="vector">0</angleOfSideslip>
                <angleOfAttack mapType="vector">0</angleOfAttack>
                <cd mapType="vector">0.12</cd>
                <cl mapType="vector">1.111</cl>
                <cs mapType="vector">0.22</cs>
                <cmd mapType="vector">0.001</cmd>
                <cml mapType="vector">0.002</cml>
                <cms mapType="vector">0.003</cms>
              </aeroPerformanceMap>
            </aeroMap>
            <aeroMap uID="aeromap_test2">
              <name>aeromap_test2</name>
              <description>Second test aeroMap</description>
              <boundaryConditions>
                <atmosphericModel>ISA</atmosphericModel>
              </boundaryConditions>
              <aeroPerformanceMap>
                <altitude mapType="vector">0;5000;11000;5000;5000</altitude>
                <machNumber mapType="vector">0.2;0.3;0.4;0.3;0.3</machNumber>
                <angleOfSideslip mapType="vector">0;0;2;2;2</angleOfSideslip>
                <angleOfAttack mapType="vector">0;2;2;4;6</angleOfAttack>
                <cd mapType="vector">0.1;0.13;0.14;0.15;0.17</cd>
                <cl mapType="vector">0.5;0.9;1.111;1.4;1.8</cl>
              </aeroPerformanceMap>
            </aeroMap>
            <aeroMap uID="aeromap_test_dampder">
              <name>aeromap_test_dampder</name>
              <description>AeroMap with damping derivatives</description>
              <boundaryConditions>
                <atmosphericModel>ISA</atmosphericModel>
              </boundaryConditions>
              <aeroPerformanceMap>
                <altitude mapType="vector">15000;15000</altitude>
                <machNumber mapType="vector">0.555;0.555</machNumber>
                <angleOfSideslip mapType="vector">0;0</angleOfSideslip>
                <angleOfAttack mapType="vector">0;7</angleOfAttack>
                <cl mapType="vector">0.5;0.7</cl>
                <dampingDerivatives>
                  <negativeRates>
                    <dcddpStar mapType="vector">0.00111;0.00117</dcddpStar>
                    <dcldpStar mapType="vector">0.00112;0.00118</dcldpStar>
                    <dcsdqStar mapType="vector">0.001;nan</dcsdqStar>
                    <dcsdrStar mapType="vector">nan;nan</dcsdrStar>
                  </negativeRates>
                  <positiveRates>
                    <dcldpStar mapType="vector">0.00112;0.00119</dcldpStar>
                  </positiveRates>
                </dampingDerivatives>
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
    let path = dir.path().join("D150_simple.xml");
    std::fs::write(&path, FIXTURE).unwrap();
    let cpacs = Cpacs::open(&path).unwrap();
    (dir, path, cpacs)
}

fn everything() -> RowFilter {
    RowFilter::new()
}

#[test]
fn loads_all_aeromaps_with_metadata() {
    let (_dir, _path, cpacs) = open_fixture();
    assert_eq!(
        cpacs.aeromap_uids().unwrap(),
        ["aeromap_test1", "aeromap_test2", "aeromap_test_dampder"]
    );
    assert_eq!(cpacs.aircraft_name(), Some("D150"));
    assert_eq!(cpacs.aircraft.ref_length, 4.19);
    assert_eq!(cpacs.aircraft.ref_area, 122.4);

    let aeromap = cpacs.aeromap_by_uid("aeromap_test1").unwrap();
    assert_eq!(aeromap.name, "aeromap_test1");
    assert_eq!(aeromap.description, "Common default aeroMap");
    assert_eq!(aeromap.atmospheric_model, "ISA");
    assert_eq!(aeromap.table().len(), 1);
    // Coefficient columns are always addressable once loaded
    for coefficient in Coefficient::ALL {
        assert!(aeromap.table().is_active(Column::Coefficient(coefficient)));
    }
    assert!(aeromap.xpath().unwrap().ends_with("/aeroPerformanceMap"));
}

#[test]
fn loads_damping_derivative_columns_lazily() {
    let (_dir, _path, cpacs) = open_fixture();
    let aeromap = cpacs.aeromap_by_uid("aeromap_test_dampder").unwrap();

    let values = aeromap
        .get_damping_derivatives(Coefficient::Cd, RotationAxis::Roll, "neg", &everything())
        .unwrap();
    assert_eq!(values, [0.00111, 0.00117]);

    // A stored column holding only NaN is still addressable
    let only_nan = aeromap
        .get_damping_derivatives(Coefficient::Cs, RotationAxis::Yaw, "neg", &everything())
        .unwrap();
    assert_eq!(only_nan.len(), 2);
    assert!(only_nan.iter().all(|v| v.is_nan()));

    let partial = aeromap
        .get_damping_derivatives(Coefficient::Cs, RotationAxis::Pitch, "neg", &everything())
        .unwrap();
    assert_eq!(partial[0], 0.001);
    assert!(partial[1].is_nan());

    // Never stored, never touched: not addressable
    let err = aeromap
        .get_damping_derivatives(Coefficient::Cs, RotationAxis::Yaw, "pos", &everything())
        .unwrap_err();
    assert!(matches!(err, AeroMapError::ColumnNotPresent { .. }));
}

#[test]
fn rate_keywords_resolve_to_the_same_column() {
    let (_dir, _path, cpacs) = open_fixture();
    let aeromap = cpacs.aeromap_by_uid("aeromap_test_dampder").unwrap();

    for rates in ["positive", "pos", "p", "negative", "neg", "n"] {
        let values = aeromap
            .get_damping_derivatives(Coefficient::Cl, RotationAxis::Roll, rates, &everything())
            .unwrap();
        assert_eq!(values[0], 0.00112);
    }

    let single = aeromap
        .get_damping_derivatives(
            Coefficient::Cl,
            RotationAxis::Roll,
            "neg",
            &RowFilter::new()
                .with_altitudes(&[15000.0])
                .with_mach_numbers(&[0.555])
                .with_sideslip_angles(&[0.0])
                .with_attack_angles(&[7.0]),
        )
        .unwrap();
    assert_eq!(single, [0.00118]);

    let none = aeromap
        .get_damping_derivatives(
            Coefficient::Cl,
            RotationAxis::Roll,
            "neg",
            &RowFilter::new().with_altitudes(&[11111.0]),
        )
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn filters_select_rows_by_parameter_values() {
    let (_dir, _path, cpacs) = open_fixture();
    let aeromap = cpacs.aeromap_by_uid("aeromap_test2").unwrap();

    let cl = aeromap
        .get(
            Column::Coefficient(Coefficient::Cl),
            &RowFilter::new().with_altitudes(&[11000.0]).with_mach_numbers(&[0.4]),
        )
        .unwrap();
    assert_eq!(cl, [1.111]);

    let cd = aeromap
        .get(
            Column::Coefficient(Coefficient::Cd),
            &RowFilter::new().with_attack_angles(&[2.0]).with_sideslip_angles(&[0.0]),
        )
        .unwrap();
    assert_eq!(cd, [0.13]);

    // Omitting a parameter never narrows the result
    let all_cd = aeromap.get(Column::Coefficient(Coefficient::Cd), &everything()).unwrap();
    assert_eq!(all_cd.len(), 5);
}

#[test]
fn new_aeromap_saves_and_reloads() {
    let (dir, _path, mut cpacs) = open_fixture();
    {
        let aeromap = cpacs.create_aeromap("aeromap_test3").unwrap();
        aeromap
            .add_row(
                FlightPoint::new(10000.0, 0.3, 0.0, 2.0),
                Coefficients {
                    cl: Some(0.5),
                    cs: Some(0.5),
                    cmd: Some(0.5),
                    cml: Some(0.5),
                    cms: Some(0.555),
                    ..Coefficients::default()
                },
            )
            .unwrap();
        aeromap
            .add_row(
                FlightPoint::new(10000.0, 0.3, 0.0, 3.0),
                Coefficients {
                    cl: Some(0.6),
                    cs: Some(0.6),
                    cmd: Some(0.6),
                    cml: Some(0.6),
                    cms: Some(0.666),
                    ..Coefficients::default()
                },
            )
            .unwrap();
        aeromap
            .add_row(FlightPoint::new(10000.0, 0.3, 0.0, 4.0), Coefficients::default())
            .unwrap();
        aeromap
            .add_coefficients(
                FlightPoint::new(10000.0, 0.3, 0.0, 4.0),
                Coefficients {
                    cl: Some(0.7),
                    ..Coefficients::default()
                },
            )
            .unwrap();
        aeromap.name = "aeromap_new_name".to_string();
        aeromap.description = "This is a new description".to_string();

        let filter = RowFilter::new().with_altitudes(&[10000.0]).with_mach_numbers(&[0.3]);
        assert_eq!(
            aeromap.get(Column::Coefficient(Coefficient::Cl), &filter).unwrap(),
            [0.5, 0.6, 0.7]
        );
        let cms = aeromap.get(Column::Coefficient(Coefficient::Cms), &filter).unwrap();
        assert_eq!(cms[0], 0.555);
        assert_eq!(cms[1], 0.666);
        assert!(cms[2].is_nan());
    }
    cpacs.save_aeromap("aeromap_test3").unwrap();
    let out = dir.path().join("D150_simple_out.xml");
    cpacs.save_cpacs(&out, true).unwrap();

    let reopened = Cpacs::open(&out).unwrap();
    let aeromap = reopened.aeromap_by_uid("aeromap_test3").unwrap();
    let filter = RowFilter::new().with_altitudes(&[10000.0]).with_mach_numbers(&[0.3]);
    assert_eq!(
        aeromap.get(Column::Coefficient(Coefficient::Cl), &filter).unwrap(),
        [0.5, 0.6, 0.7]
    );
    let cms = aeromap.get(Column::Coefficient(Coefficient::Cms), &filter).unwrap();
    assert_eq!(cms[0], 0.555);
    assert_eq!(cms[1], 0.666);
    assert!(cms[2].is_nan());
    assert_eq!(aeromap.name, "aeromap_new_name");
    assert_eq!(aeromap.description, "This is a new description");

    // cd never held a value, so no element was written
    let aeromap_xpath = reopened.document().uid_xpath("aeromap_test3").unwrap();
    assert!(
        !reopened
            .document()
            .element_exists(&format!("{aeromap_xpath}/aeroPerformanceMap/cd"))
    );
}

#[test]
fn save_keeps_full_float_precision() {
    let (dir, _path, mut cpacs) = open_fixture();
    let precise = 0.123_456_789_123_456_78;
    {
        let aeromap = cpacs.create_aeromap("precision").unwrap();
        aeromap
            .add_row(
                FlightPoint::new(0.0, 0.3, 0.0, 0.0),
                Coefficients {
                    cl: Some(precise),
                    ..Coefficients::default()
                },
            )
            .unwrap();
    }
    cpacs.save_aeromap("precision").unwrap();
    let out = dir.path().join("precision.xml");
    cpacs.save_cpacs(&out, true).unwrap();

    let reopened = Cpacs::open(&out).unwrap();
    let cl = reopened
        .aeromap_by_uid("precision")
        .unwrap()
        .get(Column::Coefficient(Coefficient::Cl), &everything())
        .unwrap();
    assert_eq!(cl, [precise]);
}

#[test]
fn added_damping_derivatives_survive_a_roundtrip() {
    let (dir, _path, mut cpacs) = open_fixture();
    {
        let aeromap = cpacs.aeromap_by_uid_mut("aeromap_test_dampder").unwrap();

        let err = aeromap
            .add_damping_derivatives(
                FlightPoint::new(15000.0, 0.555, 0.0, 1.0),
                Coefficient::Cs,
                RotationAxis::Yaw,
                0.0,
                0.0555,
            )
            .unwrap_err();
        assert!(matches!(err, AeroMapError::ZeroRotationRate));

        let err = aeromap
            .add_damping_derivatives(
                FlightPoint::new(15000.0, 0.555, 0.0, 22.0),
                Coefficient::Cs,
                RotationAxis::Yaw,
                1.0,
                0.0555,
            )
            .unwrap_err();
        assert!(matches!(err, AeroMapError::RowNotFound { .. }));

        aeromap
            .add_damping_derivatives(
                FlightPoint::new(15000.0, 0.555, 0.0, 0.0),
                Coefficient::Cs,
                RotationAxis::Yaw,
                1.0,
                0.0555,
            )
            .unwrap();
    }
    cpacs.save_aeromap("aeromap_test_dampder").unwrap();
    let out = dir.path().join("D150_dampder_out.xml");
    cpacs.save_cpacs(&out, true).unwrap();

    let reopened = Cpacs::open(&out).unwrap();
    let aeromap = reopened.aeromap_by_uid("aeromap_test_dampder").unwrap();
    let added = aeromap
        .get_damping_derivatives(Coefficient::Cs, RotationAxis::Yaw, "pos", &everything())
        .unwrap();
    assert_eq!(added[0], 0.0555);
    assert!(added[1].is_nan());
    // Previously stored columns are untouched
    let kept = aeromap
        .get_damping_derivatives(Coefficient::Cd, RotationAxis::Roll, "neg", &everything())
        .unwrap();
    assert_eq!(kept, [0.00111, 0.00117]);
}

#[test]
fn removed_rows_shrink_the_stored_vectors() {
    let (dir, _path, mut cpacs) = open_fixture();
    {
        let aeromap = cpacs.aeromap_by_uid_mut("aeromap_test2").unwrap();
        let err = aeromap
            .remove_row(FlightPoint::new(1111.0, 0.2, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, AeroMapError::RowNotFound { .. }));

        aeromap.remove_row(FlightPoint::new(0.0, 0.2, 0.0, 0.0)).unwrap();
        aeromap.remove_row(FlightPoint::new(11000.0, 0.4, 2.0, 2.0)).unwrap();
    }
    cpacs.save_aeromap("aeromap_test2").unwrap();
    let out = dir.path().join("D150_removed.xml");
    cpacs.save_cpacs(&out, true).unwrap();

    let reopened = Cpacs::open(&out).unwrap();
    let aeromap = reopened.aeromap_by_uid("aeromap_test2").unwrap();
    assert_eq!(aeromap.table().len(), 3);
    assert_eq!(
        aeromap.get(Column::Parameter(Parameter::AngleOfAttack), &everything()).unwrap(),
        [2.0, 4.0, 6.0]
    );
    assert_eq!(
        aeromap.get(Column::Coefficient(Coefficient::Cd), &everything()).unwrap(),
        [0.13, 0.15, 0.17]
    );
}

#[test]
fn deleting_an_aeromap_keeps_the_survivors_consistent() {
    let (dir, _path, mut cpacs) = open_fixture();
    cpacs.delete_aeromap("aeromap_test1").unwrap();
    assert_eq!(
        cpacs.aeromap_uids().unwrap(),
        ["aeromap_test2", "aeromap_test_dampder"]
    );
    assert!(matches!(
        cpacs.delete_aeromap("aeromap_test1").unwrap_err(),
        AeroMapError::UnknownUid { .. }
    ));

    // Sibling indices shifted, saving a survivor must hit its own slot
    {
        let aeromap = cpacs.aeromap_by_uid_mut("aeromap_test2").unwrap();
        aeromap
            .add_coefficients(
                FlightPoint::new(0.0, 0.2, 0.0, 0.0),
                Coefficients {
                    cd: Some(0.42),
                    ..Coefficients::default()
                },
            )
            .unwrap();
    }
    cpacs.save_aeromap("aeromap_test2").unwrap();
    let out = dir.path().join("after_delete.xml");
    cpacs.save_cpacs(&out, true).unwrap();

    let reopened = Cpacs::open(&out).unwrap();
    assert_eq!(reopened.aeromaps().len(), 2);
    let cd = reopened
        .aeromap_by_uid("aeromap_test2")
        .unwrap()
        .get(
            Column::Coefficient(Coefficient::Cd),
            &RowFilter::new().with_attack_angles(&[0.0]),
        )
        .unwrap();
    assert_eq!(cd, [0.42]);
    let dampder = reopened.aeromap_by_uid("aeromap_test_dampder").unwrap();
    assert_eq!(
        dampder
            .get_damping_derivatives(Coefficient::Cd, RotationAxis::Roll, "neg", &everything())
            .unwrap(),
        [0.00111, 0.00117]
    );
}

#[test]
fn duplicated_aeromap_is_saved_under_its_own_uid() {
    let (dir, _path, mut cpacs) = open_fixture();
    cpacs.duplicate_aeromap("aeromap_test1", "aeromap_copy").unwrap();
    cpacs.save_aeromap("aeromap_copy").unwrap();
    let out = dir.path().join("with_copy.xml");
    cpacs.save_cpacs(&out, true).unwrap();

    let reopened = Cpacs::open(&out).unwrap();
    assert!(reopened.aeromap_uids().unwrap().contains(&"aeromap_copy".to_string()));
    let copy = reopened.aeromap_by_uid("aeromap_copy").unwrap();
    assert_eq!(copy.name, "aeromap_copy");
    assert_eq!(
        copy.description,
        "Common default aeroMap (duplicate from \"aeromap_test1\")"
    );
    assert_eq!(copy.atmospheric_model, "ISA");
    assert_eq!(
        copy.get(Column::Coefficient(Coefficient::Cl), &everything()).unwrap(),
        [1.111]
    );
    // The original is untouched
    assert_eq!(
        reopened.aeromap_by_uid("aeromap_test1").unwrap().description,
        "Common default aeroMap"
    );
}

proptest! {
    /// Any table of rows with distinct keys survives a document
    /// round trip cell for cell.
    #[test]
    fn saved_tables_reload_exactly(
        rows in proptest::collection::vec(
            (option::of(-10.0f64..10.0), option::of(-10.0f64..10.0)),
            1..12,
        )
    ) {
        let mut aeromap = AeroMap::new("generated").unwrap();
        for (state, (cd, cl)) in rows.iter().enumerate() {
            aeromap
                .add_row(
                    FlightPoint::new(1000.0 * state as f64, 0.3, 0.0, 2.0),
                    Coefficients { cd: *cd, cl: *cl, ..Coefficients::default() },
                )
                .unwrap();
        }

        let mut document: Document = "<cpacs/>".parse().unwrap();
        aeromap.save(&mut document).unwrap();
        let reparsed: Document = document.to_xml_string().unwrap().parse().unwrap();
        let reloaded = AeroMap::from_document(&reparsed, "generated").unwrap();

        prop_assert_eq!(reloaded.table().len(), rows.len());
        for (state, (cd, cl)) in rows.iter().enumerate() {
            let row = &reloaded.table().rows()[state];
            prop_assert_eq!(row.get(Column::Coefficient(Coefficient::Cd)), *cd);
            prop_assert_eq!(row.get(Column::Coefficient(Coefficient::Cl)), *cl);
            prop_assert_eq!(
                row.get(Column::Parameter(Parameter::Altitude)),
                Some(1000.0 * state as f64)
            );
        }
    }
}
