//! Integration tests: session lifecycle driven by a clock (QA: timing).

use std::cell::Cell;

use rigfw::adapters::log_sink::{LogEventSink, Tee};
use rigfw::clock::Tick;
use rigfw::config::RigConfig;
use rigfw::events::LogEntry;
use rigfw::session::SessionPhase;

use crate::mock_hw::{MockBench, ScriptedClock, bench_config, lines};

#[test]
fn run_session_stops_at_termination() {
    let bench = MockBench::new();
    let mut rig = bench.build(RigConfig { run_time: 100, ..bench_config() }, Tick(0));
    let mut clock = ScriptedClock::counting_from(0, 1);
    let mut sink: Vec<LogEntry> = Vec::new();
    let feeds = Cell::new(0u32);

    let end = rig.run_session(&mut clock, &mut sink, || feeds.set(feeds.get() + 1));

    assert_eq!(end, Tick(110));
    assert_eq!(lines(&sink), ["S10", "E110"]);
    // Fed after every tick except the terminating one.
    assert_eq!(feeds.get(), 110);
    assert_eq!(clock.reads, 111);
    assert_eq!(bench.led_runtime.history(), [false, true, false]);
}

#[test]
fn stable_reads_skip_clock_glitches() {
    let bench = MockBench::new();
    let config = RigConfig {
        stable_read_tolerance: Some(50),
        ..bench_config()
    };
    let mut rig = bench.build(config, Tick(0));
    // A spurious jump ahead, then a step backwards.
    let mut clock = ScriptedClock::scripted(&[5, 2_000_000, 6, 3, 7], 1);
    let mut sink: Vec<LogEntry> = Vec::new();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let now = rig.read_clock(&mut clock);
        rig.tick(now, &mut sink).unwrap();
        seen.push(now.raw());
    }

    assert_eq!(seen, [5, 6, 7]);
    assert_eq!(clock.reads, 5);
    assert_eq!(rig.last_tick(), Tick(7));
}

#[test]
fn raw_reads_when_no_tolerance_configured() {
    let bench = MockBench::new();
    let rig = bench.build(bench_config(), Tick(0));
    let mut clock = ScriptedClock::scripted(&[5, 2_000_000], 1);

    assert_eq!(rig.read_clock(&mut clock), Tick(5));
    assert_eq!(rig.read_clock(&mut clock), Tick(2_000_000));
}

#[test]
fn session_spans_counter_wrap() {
    let bench = MockBench::new();
    let power_on = Tick(u32::MAX - 20);
    let mut rig = bench.build(RigConfig { run_time: 100, ..bench_config() }, power_on);
    let mut sink: Vec<LogEntry> = Vec::new();

    for n in 0..=110u32 {
        bench.touch[0].set(n == 40);
        rig.tick(power_on.wrapping_add(n), &mut sink).unwrap();
    }

    assert!(rig.is_terminated());
    assert_eq!(
        lines(&sink),
        ["S4294967285", "01130", "02130", "01031", "02035", "E89"]
    );
}

#[test]
fn nothing_is_observable_after_termination() {
    let bench = MockBench::new();
    let mut rig = bench.build(RigConfig { run_time: 50, ..bench_config() }, Tick(0));
    let mut sink: Vec<LogEntry> = Vec::new();

    for t in 0..=60 {
        rig.tick(Tick(t), &mut sink).unwrap();
    }
    assert_eq!(rig.phase(), SessionPhase::Terminated);

    let logged = sink.len();
    let writes: Vec<usize> = bench.valve.iter().map(|v| v.writes()).collect();
    let blink_writes = bench.led_blink.writes();

    for t in 61..2_000 {
        bench.touch[0].set(t % 7 == 0);
        bench.ir[1].set(t % 11 < 5);
        assert_eq!(rig.tick(Tick(t), &mut sink).unwrap(), SessionPhase::Terminated);
    }

    assert_eq!(sink.len(), logged);
    assert_eq!(bench.valve.iter().map(|v| v.writes()).collect::<Vec<_>>(), writes);
    assert_eq!(bench.led_blink.writes(), blink_writes);
}

#[test]
fn records_can_be_mirrored_to_the_log() {
    let bench = MockBench::new();
    let mut rig = bench.build(RigConfig { run_time: 30, ..bench_config() }, Tick(0));
    let mut clock = ScriptedClock::counting_from(0, 1);
    let mut tee = Tee {
        first: Vec::<LogEntry>::new(),
        second: LogEventSink::new(),
    };

    rig.run_session(&mut clock, &mut tee, || {});

    assert_eq!(lines(&tee.first), ["S10", "E40"]);
}
