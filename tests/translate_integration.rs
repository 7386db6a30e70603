use gcode_makerbot::machine::{AxisState, MachineState, Offset};
use gcode_makerbot::parser::Slicer;
use gcode_makerbot::progress::NoProgress;
use gcode_makerbot::validation::finalize;
use gcode_makerbot::{
    translate, Command, MoveTag, TranslateError, TranslateOptions, Translator, ValidationError,
};

const SQUARE: &str = include_str!("fixtures/square.gcode");

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn move_tags(commands: &[Command]) -> Vec<String> {
    commands
        .iter()
        .filter(|c| c.is_move())
        .map(|c| c.tags[0].clone())
        .collect()
}

#[test]
fn square_print_metrics() {
    let translation = translate(SQUARE, &TranslateOptions::default()).unwrap();
    let metrics = &translation.metrics;

    assert_eq!(translation.slicer, Some(Slicer::PrusaSlicer));
    assert_eq!(metrics.extruder_temperature, 215);
    assert_eq!(metrics.bed_temp, 60);
    assert!(metrics.heatbed_enabled);
    assert_eq!(metrics.z_transitions, 2);
    assert_eq!(metrics.num_z_layers(), 3);
    assert!(approx(metrics.extrusion_distance_mm, 5.0));

    let bbox = metrics.bounding_box;
    assert!(approx(bbox.x_min, -10.0) && approx(bbox.x_max, 10.0));
    assert!(approx(bbox.y_min, -10.0) && approx(bbox.y_max, 10.0));
    assert!(approx(bbox.z_min, 0.25));
    assert!(approx(bbox.z_max, 0.55));

    assert_eq!(metrics.command_count, translation.toolpath.commands().len());
    assert!(approx(metrics.commanded_duration_s(), metrics.time_s / 2.0));
    assert!(translation.conflicts.is_empty());
}

#[test]
fn square_print_move_tags() {
    let translation = translate(SQUARE, &TranslateOptions::default()).unwrap();
    assert_eq!(
        move_tags(translation.toolpath.body()),
        vec![
            "Travel Move",
            "Infill",
            "Infill",
            "Infill",
            "Infill",
            "Retract",
            "Travel Move",
            "Infill",
            "Infill",
            "Travel Move",
        ]
    );
}

#[test]
fn written_toolpath_frames_body() {
    let translation = translate(SQUARE, &TranslateOptions::default()).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&translation.toolpath_json).unwrap();

    assert_eq!(parsed.len(), translation.metrics.command_count);
    assert_eq!(
        parsed[0]["command"]["parameters"]["comment"],
        "Layer Section 0 (0)"
    );
    assert_eq!(parsed[6]["command"]["function"], "move");
    assert_eq!(
        parsed.last().unwrap()["command"]["parameters"]["comment"],
        "End of print"
    );
    assert!(translation.toolpath_json.starts_with("[\n{\"command\":"));
    assert!(translation.toolpath_json.ends_with("}\n]"));
}

#[test]
fn translation_is_deterministic() {
    let first = translate(SQUARE, &TranslateOptions::default()).unwrap();
    let second = translate(SQUARE, &TranslateOptions::default()).unwrap();

    assert_eq!(first.toolpath_json, second.toolpath_json);
    assert_eq!(first.metrics, second.metrics);
}

#[test]
fn revalidation_is_idempotent() {
    let translation = translate(SQUARE, &TranslateOptions::default()).unwrap();
    let again = finalize(&translation.toolpath, &(&translation.metrics).into()).unwrap();
    assert_eq!(again, translation.metrics);
}

#[test]
fn extrusion_delta_governs_stationary_moves() {
    let state = MachineState {
        axis: AxisState {
            a: 0.0,
            feedrate: 15.0,
            x: 10.0,
            y: 0.0,
            z: 0.3,
        },
        offset: Offset {
            a: 0.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        ..MachineState::default()
    };
    let mut translator = Translator::with_state(TranslateOptions::default(), state);

    translator
        .interpret_line(1, "G1 X10 Y0 Z0.3 E1 F900", &mut NoProgress)
        .unwrap();
    assert!(approx(translator.aggregator().aggregate().time_s, 1.0 / 15.0));

    translator
        .interpret_line(2, "G1 X10 Y0 Z0.3 E0.5 F900", &mut NoProgress)
        .unwrap();
    assert!(approx(
        translator.aggregator().aggregate().time_s,
        1.0 / 15.0 + 0.5 / 15.0
    ));

    let body = translator.toolpath().body();
    assert!(body[0].has_tag(MoveTag::Infill));
    assert!(body[1].has_tag(MoveTag::Retract));
}

#[test]
fn bed_temperature_reaches_metrics() {
    let gcode = SQUARE.replace("M140 S60", "M140 S85");
    let translation = translate(&gcode, &TranslateOptions::default()).unwrap();
    assert!(translation.metrics.heatbed_enabled);
    assert_eq!(translation.metrics.bed_temp, 85);
}

#[test]
fn second_extruder_temperature_is_a_conflict() {
    let gcode = SQUARE.replace("M109 S215", "M104 S210");
    let translation = translate(&gcode, &TranslateOptions::default()).unwrap();

    assert_eq!(translation.metrics.extruder_temperature, 215);
    assert_eq!(translation.conflicts.len(), 1);
    assert_eq!(translation.conflicts[0].kept, 215);
    assert_eq!(translation.conflicts[0].ignored, 210);
    assert_eq!(translation.conflicts[0].line, 4);
}

#[test]
fn off_center_print_fails_validation() {
    let gcode = SQUARE.replace("X-10", "X2");
    let err = translate(&gcode, &TranslateOptions::default()).unwrap_err();
    match err {
        TranslateError::Validation(ValidationError::CenterOffset { axis, ratio }) => {
            assert_eq!(axis, 'X');
            assert!(ratio > 0.15);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn travel_and_retract_do_not_widen_bounds() {
    let gcode = format!("{SQUARE}G0 X90 Y90\nG1 X-90 Y-90 E1\n");
    let translation = translate(&gcode, &TranslateOptions::default()).unwrap();

    let bbox = translation.metrics.bounding_box;
    assert!(approx(bbox.x_max, 10.0));
    assert!(approx(bbox.y_min, -10.0));
}

#[test]
fn missing_extruder_temperature_fails() {
    let gcode = SQUARE
        .replace("M104 S215", "M104 S0")
        .replace("M109 S215", "");
    let err = translate(&gcode, &TranslateOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Validation(ValidationError::ZeroExtruderTemperature)
    ));
}

#[test]
fn malformed_literal_is_fatal() {
    let gcode = SQUARE.replace("G1 X10 Y10 E2", "G1 X10 Y1O E2");
    let err = translate(&gcode, &TranslateOptions::default()).unwrap_err();
    match err {
        TranslateError::MalformedInstruction { line, opcode, .. } => {
            assert_eq!(line, 11);
            assert_eq!(opcode, "G1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_finite_literals_are_fatal() {
    for (from, to) in [
        ("G1 X10 Y10 E2", "G1 Xnan Y10 E2"),
        ("G1 X10 Y-10 E1 F1200", "G1 X10 Y-10 E1 Finf"),
    ] {
        let err = translate(&SQUARE.replace(from, to), &TranslateOptions::default()).unwrap_err();
        assert!(
            matches!(err, TranslateError::MalformedInstruction { .. }),
            "{to}: {err}"
        );
    }
}

#[test]
fn unrecognized_opcodes_do_not_change_output() {
    let plain = translate(SQUARE, &TranslateOptions::default()).unwrap();
    let noisy = translate(
        &SQUARE.replace("G28 ; home", "G28 ; home\nM220 S100\nM900 K0.04"),
        &TranslateOptions::default(),
    )
    .unwrap();

    assert_eq!(plain.toolpath_json, noisy.toolpath_json);
}

#[test]
fn lowercase_input_matches_uppercase() {
    let plain = translate(SQUARE, &TranslateOptions::default()).unwrap();
    let lowered: String = SQUARE
        .lines()
        .map(|line| {
            if line.starts_with(";LAYER:") {
                format!("{line}\n")
            } else {
                format!("{}\n", line.to_lowercase())
            }
        })
        .collect();
    let lower = translate(&lowered, &TranslateOptions::default()).unwrap();

    assert_eq!(plain.toolpath_json, lower.toolpath_json);
}

#[test]
fn annotate_adds_source_comments() {
    let translation = translate(SQUARE, &TranslateOptions { annotate: true }).unwrap();
    let body = translation.toolpath.body();

    let idx = body
        .iter()
        .position(|c| c.has_tag(MoveTag::Retract))
        .unwrap();
    assert_eq!(body[idx + 1], Command::comment("G1 E3 F2400"));
}
