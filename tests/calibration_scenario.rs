use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use envision_calibration::calibration::{
    Axis, CalibrationEvent, CalibrationStore, CalibrationWizard, LengthUnit, PixelPoint,
    WizardField, WizardStep,
};
use envision_calibration::config::CalibrationConfig;
use envision_calibration::log::activity::ActivityLog;

/// Drive the wizard to the final step with a 100 px reference segment
fn wizard_with_reference(real_length: f64) -> CalibrationWizard {
    let mut wizard = CalibrationWizard::new(LengthUnit::Micrometer);
    wizard.add_images([(
        "stage_micrometer.png".to_string(),
        PathBuf::from("stage_micrometer.png"),
        Some((1024, 768)),
    )]);
    assert!(wizard.advance());
    wizard.set_field(WizardField::Magnification("100".into()));
    assert!(wizard.advance());
    assert!(wizard.click(PixelPoint::new(10.0, 10.0)));
    assert!(wizard.click(PixelPoint::new(110.0, 10.0)));
    assert!(wizard.advance());
    assert_eq!(wizard.step(), WizardStep::EnterLength);
    wizard.set_field(WizardField::RealLength(Some(real_length)));
    wizard
}

#[test]
fn test_reference_scenario_end_to_end() {
    let mut store = CalibrationStore::new();
    assert_eq!(store.pixels_to_units(100.0, Axis::X), None);

    let mut wizard = wizard_with_reference(400.0);
    assert_eq!(wizard.pixel_distance(), 100.0);
    assert_eq!(format!("{:.4}", wizard.ratio()), "4.0000");

    let profile = wizard.save(&mut store).unwrap();
    assert_eq!(profile.unit, "µm/pixel");
    assert!(!store.is_active());

    store.activate(profile.id).unwrap();
    assert_eq!(store.pixels_to_units(50.0, Axis::X), Some(200.0));
    assert_eq!(store.units_to_pixels(200.0, Axis::Y), Some(50.0));
    assert_eq!(
        store.measure(PixelPoint::new(0.0, 0.0), PixelPoint::new(30.0, 40.0)),
        Some(200.0)
    );

    store.remove(profile.id).unwrap();
    assert!(store.get_active().is_none());
    assert_eq!(store.pixels_to_units(50.0, Axis::X), None);
}

#[test]
fn test_seeded_session_with_activity_log() {
    let mut store = CalibrationStore::with_config(&CalibrationConfig::default());
    let log = Rc::new(RefCell::new(ActivityLog::new()));
    let sink = Rc::clone(&log);
    store.subscribe(move |event: &CalibrationEvent| sink.borrow_mut().record(event));

    let labels: Vec<_> = store
        .list()
        .iter()
        .map(|p| p.magnification_label.as_str())
        .collect();
    assert_eq!(labels, vec!["100X", "200X"]);

    let mut wizard = wizard_with_reference(50.0);
    let added = wizard.save(&mut store).unwrap();
    store.activate(added.id).unwrap();

    // Third profile evicts the oldest one
    assert_eq!(store.len(), 2);
    assert_eq!(store.list()[0].id, added.id);
    assert_eq!(store.list()[1].magnification_label, "100X");

    let operations: Vec<_> = log
        .borrow()
        .entries
        .iter()
        .map(|e| e.operation.clone())
        .collect();
    assert_eq!(
        operations,
        vec!["Add Calibration", "Evict Calibration", "Activate Calibration"]
    );
    assert_eq!(store.list().iter().filter(|p| p.is_active).count(), 1);
}
