//! Integration tests driving the chain controller against mock pins.

use a6281::mock::{Event, MockChain, MockDelay, MockPin, PinRole};
use a6281::{A6281, CLOCK_PULSE_US, ClockMode, Error, LATCH_PULSE_US, NoEnable, Packet};

type MockDriver = A6281<MockPin, MockPin, MockPin, NoEnable, MockDelay>;

fn fresh(length: u16, auto_update: bool) -> (MockChain, MockDriver) {
    let chain = MockChain::new();
    let driver = A6281::new(
        chain.data(),
        chain.clock(),
        chain.latch(),
        chain.delay(),
        length,
        auto_update,
    )
    .unwrap();
    (chain, driver)
}

#[test]
fn construction_drives_clock_and_latch_low() {
    let (chain, _driver) = fresh(1, false);
    assert_eq!(chain.writes_to(PinRole::Clock), [false]);
    assert_eq!(chain.writes_to(PinRole::Latch), [false]);
    assert!(chain.writes_to(PinRole::Enable).is_empty());
}

#[test]
fn construction_with_enable_activates_outputs() {
    let chain = MockChain::new();
    let _driver = A6281::with_enable(
        chain.data(),
        chain.clock(),
        chain.latch(),
        chain.enable(),
        chain.delay(),
        1,
        false,
    )
    .unwrap();
    assert_eq!(chain.writes_to(PinRole::Enable), [false]);
}

#[test]
fn packet_goes_out_msb_first() {
    let (chain, mut driver) = fresh(1, false);
    // Asymmetric value: reversed or offset bit order would yield a
    // different word.
    let packet = Packet::pwm(0b10_1100_0111, 0, 1023);

    driver.begin_update();
    driver.send_packet(packet).unwrap();

    assert_eq!(chain.clocked_words(), [packet.raw()]);
    // Initial low plus 32 high/low pulse pairs.
    assert_eq!(chain.writes_to(PinRole::Clock).len(), 65);
}

#[test]
fn manual_cycle_latches_once_at_end() {
    let (chain, mut driver) = fresh(2, false);

    driver.begin_update();
    driver.send_packet(Packet::pwm(1, 0, 0)).unwrap();
    driver.send_packet(Packet::pwm(2, 0, 0)).unwrap();
    assert_eq!(chain.latch_pulses(), 0);

    assert_eq!(driver.end_update().unwrap(), 2);
    assert_eq!(chain.latch_pulses(), 1);
}

#[test]
fn empty_cycle_skips_the_latch() {
    let (chain, mut driver) = fresh(2, false);
    driver.begin_update();
    assert_eq!(driver.end_update().unwrap(), 0);
    assert_eq!(chain.latch_pulses(), 0);
}

#[test]
fn sent_count_survives_until_next_begin() {
    let (_chain, mut driver) = fresh(4, false);
    driver.begin_update();
    driver.send_packet(Packet::pwm(1, 1, 1)).unwrap();
    driver.send_packet(Packet::pwm(2, 2, 2)).unwrap();
    assert_eq!(driver.end_update().unwrap(), 2);
    assert_eq!(driver.end_update().unwrap(), 2);

    driver.begin_update();
    assert_eq!(driver.end_update().unwrap(), 0);
}

#[test]
fn auto_update_latches_every_send() {
    let (chain, mut driver) = fresh(2, true);
    driver.send_packet(Packet::pwm(1, 0, 0)).unwrap();
    driver.send_packet(Packet::pwm(2, 0, 0)).unwrap();
    assert_eq!(chain.latch_pulses(), 2);
}

#[test]
fn batch_send_latches_exactly_once() {
    let (chain, mut driver) = fresh(3, true);
    let packets = [
        Packet::pwm(1, 0, 0),
        Packet::pwm(2, 0, 0),
        Packet::pwm(3, 0, 0),
    ];

    driver.send_packets(&packets).unwrap();

    assert_eq!(chain.latch_pulses(), 1);
    assert_eq!(
        chain.clocked_words(),
        packets.iter().map(|p| p.raw()).collect::<Vec<_>>()
    );
    // Auto-update was only suspended, not lost.
    assert!(driver.auto_update());
}

#[test]
fn batch_send_joins_an_open_cycle() {
    let (chain, mut driver) = fresh(3, false);
    driver.begin_update();
    driver
        .send_packets(&[Packet::pwm(1, 0, 0), Packet::pwm(2, 0, 0)])
        .unwrap();
    assert_eq!(chain.latch_pulses(), 0);

    assert_eq!(driver.end_update().unwrap(), 2);
    assert_eq!(chain.latch_pulses(), 1);
}

#[test]
fn repeated_send_is_one_cycle() {
    let (chain, mut driver) = fresh(3, true);
    let packet = Packet::pwm(7, 8, 9);

    driver.send_packet_repeated(packet, 3).unwrap();

    assert_eq!(chain.clocked_words(), [packet.raw(); 3]);
    assert_eq!(chain.latch_pulses(), 1);
}

#[test]
fn broadcast_matches_individual_sends() {
    let packet = Packet::pwm(500, 600, 700);

    let (_chain_a, mut broadcast) = fresh(4, true);
    assert!(broadcast.set_state_tracking(true));
    broadcast.send_packet_to_all(packet).unwrap();

    let (_chain_b, mut one_by_one) = fresh(4, true);
    assert!(one_by_one.set_state_tracking(true));
    for _ in 0..4 {
        one_by_one.send_packet(packet).unwrap();
    }

    assert_eq!(broadcast.save_state(), one_by_one.save_state());
}

#[test]
fn convenience_sends_encode_like_the_builders() {
    let (chain, mut driver) = fresh(1, true);
    driver.send_pwm_values(10, 20, 30).unwrap();
    driver
        .send_correction(40, 50, 60, ClockMode::Internal400kHz)
        .unwrap();

    assert_eq!(
        chain.clocked_words(),
        [
            Packet::pwm(10, 20, 30).raw(),
            Packet::correction(40, 50, 60, ClockMode::Internal400kHz).raw(),
        ]
    );
}

#[test]
fn pulse_widths_are_respected() {
    let (chain, mut driver) = fresh(1, true);
    driver.send_packet(Packet::pwm(0, 0, 0)).unwrap();

    let delays: Vec<u32> = chain
        .events()
        .iter()
        .filter_map(|event| match *event {
            Event::Delay { ns } => Some(ns),
            _ => None,
        })
        .collect();
    // Two settle delays per bit, then the latch hold.
    assert_eq!(delays.len(), 65);
    assert!(delays[..64].iter().all(|&ns| ns == CLOCK_PULSE_US * 1000));
    assert_eq!(delays[64], LATCH_PULSE_US * 1000);
}

#[test]
fn enable_line_is_active_low() {
    let chain = MockChain::new();
    let mut driver = A6281::with_enable(
        chain.data(),
        chain.clock(),
        chain.latch(),
        chain.enable(),
        chain.delay(),
        1,
        false,
    )
    .unwrap();

    driver.set_enabled(false).unwrap();
    driver.set_enabled(true).unwrap();
    assert_eq!(chain.writes_to(PinRole::Enable), [false, true, false]);
}

#[test]
fn set_enabled_without_line_is_a_noop() {
    let (chain, mut driver) = fresh(1, false);
    driver.set_enabled(false).unwrap();
    assert!(chain.writes_to(PinRole::Enable).is_empty());
}

#[test]
fn tracking_is_off_by_default() {
    let (_chain, mut driver) = fresh(3, true);
    driver.send_packet(Packet::pwm(1, 2, 3)).unwrap();
    assert!(!driver.state_tracking());
    assert_eq!(driver.get_state(0), None);
    assert!(driver.save_state().is_empty());
}

#[test]
fn tracking_reports_allocation_of_a_zero_length_chain() {
    let (_chain, mut driver) = fresh(0, true);
    assert!(!driver.set_state_tracking(true));
    assert!(!driver.state_tracking());
}

#[test]
fn get_state_bounds() {
    let (_chain, mut driver) = fresh(3, true);
    assert!(driver.set_state_tracking(true));

    assert_eq!(driver.get_state(3), None);
    assert_eq!(driver.get_state(u16::MAX), None);
    // In-bounds slots exist but are zeroed until something is sent.
    assert_eq!(driver.get_state(0), Some(Packet::default()));
}

#[test]
fn ring_buffer_matches_chain_order() {
    let (_chain, mut driver) = fresh(3, true);
    assert!(driver.set_state_tracking(true));

    let (a, b, c) = (
        Packet::pwm(1, 0, 0),
        Packet::pwm(2, 0, 0),
        Packet::pwm(3, 0, 0),
    );
    driver.send_packet(a).unwrap();
    driver.send_packet(b).unwrap();
    driver.send_packet(c).unwrap();

    assert_eq!(driver.save_state(), [c, b, a]);
    assert_eq!(driver.get_state(0), Some(c));
    assert_eq!(driver.get_state(1), Some(b));
    assert_eq!(driver.get_state(2), Some(a));

    // One more send pushes the oldest packet off the far end.
    let d = Packet::pwm(4, 0, 0);
    driver.send_packet(d).unwrap();
    assert_eq!(driver.save_state(), [d, c, b]);
}

#[test]
fn save_state_is_empty_before_the_first_send() {
    let (_chain, mut driver) = fresh(3, true);
    assert!(driver.set_state_tracking(true));
    assert!(driver.save_state().is_empty());
}

#[test]
fn disabling_tracking_pauses_without_forgetting() {
    let (_chain, mut driver) = fresh(2, true);
    assert!(driver.set_state_tracking(true));

    let packet = Packet::pwm(9, 9, 9);
    driver.send_packet(packet).unwrap();

    assert!(!driver.set_state_tracking(false));
    assert_eq!(driver.get_state(0), None);

    // Sends while paused are not mirrored.
    driver.send_packet(Packet::pwm(1, 1, 1)).unwrap();

    assert!(driver.set_state_tracking(true));
    assert_eq!(driver.get_state(0), Some(packet));
}

#[test]
fn restore_transmits_far_end_first() {
    let (chain, mut driver) = fresh(3, true);
    assert!(driver.set_state_tracking(true));

    let (a, b, c) = (
        Packet::pwm(1, 0, 0),
        Packet::pwm(2, 0, 0),
        Packet::pwm(3, 0, 0),
    );
    driver.send_packet(a).unwrap();
    driver.send_packet(b).unwrap();
    driver.send_packet(c).unwrap();

    let saved = driver.save_state();
    assert_eq!(saved, [c, b, a]);

    chain.clear();
    driver.restore_state(&saved).unwrap();

    // Far-end value goes out first so it ends up furthest down the chain.
    assert_eq!(chain.clocked_words(), [a.raw(), b.raw(), c.raw()]);
    assert_eq!(chain.latch_pulses(), 1);
    assert!(driver.auto_update());
}

#[test]
fn restore_then_save_is_idempotent() {
    let (_chain, mut driver) = fresh(3, true);
    assert!(driver.set_state_tracking(true));

    for n in 1..=3 {
        driver.send_packet(Packet::pwm(n, n, n)).unwrap();
    }
    let saved = driver.save_state();

    driver.restore_state(&saved).unwrap();
    assert_eq!(driver.save_state(), saved);
}

#[test]
fn restore_rejects_a_mis_sized_sequence() {
    let (chain, mut driver) = fresh(3, true);
    chain.clear();

    let short = [Packet::pwm(1, 1, 1), Packet::pwm(2, 2, 2)];
    assert_eq!(
        driver.restore_state(&short),
        Err(Error::StateLengthMismatch {
            expected: 3,
            provided: 2,
        })
    );
    // Nothing was sent.
    assert!(chain.clocked_words().is_empty());
    assert_eq!(chain.latch_pulses(), 0);
}

#[test]
fn release_returns_the_hardware() {
    let (_chain, driver) = fresh(1, false);
    let (_data, _clock, _latch, enable, _delay) = driver.release();
    assert!(enable.is_none());
}
