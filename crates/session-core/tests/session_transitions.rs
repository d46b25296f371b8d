//! End-to-end transition coverage for the reference session layout:
//! base `0x0000007da8c3bbe0`, 4-byte instructions, start index 1286.

use std::time::Instant;

use proptest as _;
use rstest as _;
use thiserror as _;

use session_core::{
    hex64, interpret, InstructionStream, MemoryImage, RegisterId, SessionConfig,
    SessionController, SessionPhase, StepOutcome, Transition, DEFAULT_BASE_ADDRESS,
    DEFAULT_INSTRUCTION_COUNT, DEFAULT_START_INDEX, INSTRUCTION_WIDTH_BYTES,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn reference_session(seed: u64) -> SessionController {
    let mut rng = StdRng::seed_from_u64(seed);
    let stream = InstructionStream::generate(DEFAULT_BASE_ADDRESS, DEFAULT_INSTRUCTION_COUNT, &mut rng);
    let memory = MemoryImage::generate(256, &mut rng);
    SessionController::new(stream, memory, SessionConfig::default(), rng)
        .expect("reference layout is valid")
}

fn pc_register(session: &SessionController) -> u64 {
    session
        .register_value(RegisterId::Pc)
        .expect("pc is always present")
}

#[test]
fn session_starts_at_the_reference_index() {
    let session = reference_session(1);

    assert_eq!(session.pc_index(), DEFAULT_START_INDEX);
    assert_eq!(
        pc_register(&session),
        DEFAULT_BASE_ADDRESS + INSTRUCTION_WIDTH_BYTES * DEFAULT_START_INDEX as u64
    );
    assert_eq!(
        hex64(session.stream().address_at(0).expect("index 0 exists")),
        "0x0000007da8c3bbe0"
    );
}

#[test]
fn one_step_moves_pc_and_highlights_two_registers() {
    let mut session = reference_session(2);
    let now = Instant::now();

    let outcome = session.step(now).expect("step succeeds");

    assert!(matches!(outcome, StepOutcome::Stepped { index, .. } if index == 1287));
    assert_eq!(session.pc_index(), 1287);
    assert_eq!(
        pc_register(&session),
        session.stream().address_at(1287).expect("index in range")
    );
    assert_eq!(session.changed_registers().len(), 2);
    assert!(session.changed_registers().contains(&RegisterId::Pc));
    assert_eq!(session.history().count(), 1);
}

#[test]
fn stepping_past_the_last_instruction_halts_and_preserves_state() {
    let mut session = reference_session(3);
    let now = Instant::now();

    while session.pc_index() < DEFAULT_INSTRUCTION_COUNT - 1 {
        let _ = session.step(now).expect("step succeeds");
    }
    let registers_at_end = session.register_snapshot();
    let history_len = session.history().count();

    let outcome = session.step(now).expect("halt path is not an error");

    assert_eq!(outcome, StepOutcome::EndOfProgram);
    assert_eq!(session.phase(), SessionPhase::Halted);
    assert_eq!(session.pc_index(), DEFAULT_INSTRUCTION_COUNT - 1);
    assert_eq!(session.register_snapshot(), registers_at_end);
    assert_eq!(session.history().count(), history_len + 1);
    assert_eq!(
        session.history().last(),
        Some("step: end of program reached")
    );
}

#[test]
fn reset_after_five_steps_restores_the_initial_snapshot() {
    let mut session = reference_session(4);
    let now = Instant::now();
    let initial = session.register_snapshot();

    for _ in 0..5 {
        let _ = session.step(now).expect("step succeeds");
    }
    assert_eq!(session.pc_index(), 1291);

    let transition = session
        .apply(interpret("reset"), now)
        .expect("reset cannot fail");

    assert_eq!(transition, Transition::ResetApplied);
    assert_eq!(session.pc_index(), DEFAULT_START_INDEX);
    assert_eq!(session.register_snapshot(), initial);
    assert_eq!(session.history().count(), 0);
    assert!(session.changed_registers().is_empty());
}

#[test]
fn reset_aliases_produce_identical_states() {
    let now = Instant::now();
    let mut with_short = reference_session(5);
    let mut with_long = reference_session(5);

    for session in [&mut with_short, &mut with_long] {
        for _ in 0..3 {
            let _ = session.step(now).expect("step succeeds");
        }
    }

    let _ = with_short.apply(interpret("r"), now).expect("reset");
    let _ = with_long.apply(interpret("reset"), now).expect("reset");

    assert_eq!(with_short.pc_index(), with_long.pc_index());
    assert_eq!(with_short.phase(), with_long.phase());
    assert_eq!(with_short.register_snapshot(), with_long.register_snapshot());
    assert_eq!(
        with_short.history().collect::<Vec<_>>(),
        with_long.history().collect::<Vec<_>>()
    );
}

#[test]
fn unknown_command_text_is_a_silent_no_op() {
    let mut session = reference_session(6);
    let now = Instant::now();
    let before = session.register_snapshot();

    let transition = session
        .apply(interpret("xyz"), now)
        .expect("no-op cannot fail");

    assert_eq!(transition, Transition::Ignored);
    assert_eq!(session.pc_index(), DEFAULT_START_INDEX);
    assert_eq!(session.register_snapshot(), before);
    assert!(session.changed_registers().is_empty());
    assert_eq!(session.history().count(), 0);
}

#[test]
fn step_aliases_are_equivalent() {
    let now = Instant::now();
    let mut sessions: Vec<SessionController> =
        (0..3).map(|_| reference_session(7)).collect();

    for (session, alias) in sessions.iter_mut().zip(["n", "next", "s"]) {
        let _ = session.apply(interpret(alias), now).expect("step succeeds");
    }

    let first = sessions.remove(0);
    for other in &sessions {
        assert_eq!(first.pc_index(), other.pc_index());
        assert_eq!(first.register_snapshot(), other.register_snapshot());
    }
}
