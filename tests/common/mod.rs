//! Reference flight line shared by the integration tests
//!
//! Four pulses of a clipped airborne survey line. Every pulse has an
//! outgoing sampling; the second and fourth also have a returning one.

#![allow(dead_code)]

use fullwave::waveform::{Pulse, Sampling, WaveClass};

/// Segment length the reference line is buffered with
pub const MAX_COUNT: usize = 61;

/// Outgoing wave of the four reference pulses, 61 samples each
pub const OUTGOING_WAVE: [i32; 244] = [
    0, 2, 2, 2, 3, 2, 2, 8, 28, 70, 128, 177, 192, 167, 118, 68, 31, 12, 5, 4, 5, 5, 3, 2, 1, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 1, 1, 2, 1, 2, 2, 3, 8, 24, 63, 121, 173, 194, 173, 126, 74, 35, 14, 5, 3, 4, 5,
    4, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 2, 6, 5, 5, 5, 3, 2, 6, 21, 59, 116, 168, 192, 175, 128, 75, 36, 15,
    5, 3, 4, 5, 5, 3, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 2, 2, 2, 3, 6, 21, 59, 115, 168, 192, 176, 130,
    79, 39, 16, 7, 6, 6, 7, 6, 3, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Returning wave of the two reference pulses that have one
pub const RETURNING_WAVE: [i32; 122] = [
    1, 2, 2, 2, 1, 1, 1, 1, 1, 1, 0, 0, 1, 9, 35, 88, 155, 212, 240, 237, 200, 145, 87, 42, 18,
    12, 13, 14, 15, 15, 14, 13, 10, 8, 8, 8, 8, 7, 6, 6, 4, 4, 4, 3, 4, 5, 6, 4, 4, 3, 2, 2, 1,
    1, 0, 1, 2, 3, 4, 4, 2, 2, 1, 2, 2, 3, 2, 2, 1, 1, 3, 2, 2, 3, 5, 19, 58, 121, 186, 228,
    238, 214, 164, 106, 58, 26, 13, 10, 12, 15, 17, 17, 16, 13, 10, 7, 6, 7, 6, 6, 4, 6, 6, 6,
    5, 6, 6, 6, 6, 5, 4, 4, 2, 2, 1, 2, 2, 1, 2, 2, 2, 2,
];

pub const OUTGOING_FIRST_DIFFERENCE: [i32; 236] = [
    0, 0, 1, -1, 0, 6, 20, 42, 58, 49, 15, -25, -49, -50, -37, -19, -7, -1, 1, 0, -2, -1, -1,
    -1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 1, -1, 1, 0, 1, 5, 16, 39, 58, 52, 21, -21, -47, -52, -39, -21, -9, -2, 1,
    1, -1, -2, -1, -1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -1, 0, 0, -2, -1, 4, 15, 38, 57, 52, 24, -17, -47, -53,
    -39, -21, -10, -2, 1, 1, 0, -2, -2, -1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -1, 0, 0, 1, 3, 15, 38, 56, 53, 24,
    -16, -46, -51, -40, -23, -9, -1, 0, 1, -1, -3, -2, -1, 0, 0, 1, -1, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

pub const RETURNING_FIRST_DIFFERENCE: [i32; 118] = [
    0, 0, -1, 0, 0, 0, 0, 0, -1, 0, 1, 8, 26, 53, 67, 57, 28, -3, -37, -55, -58, -45, -24, -6,
    1, 1, 1, 0, -1, -1, -3, -2, 0, 0, 0, -1, -1, 0, -2, 0, 0, -1, 1, 1, 1, -2, 0, -1, -1, 0, -1,
    0, -1, 1, 1, 1, 1, 0, -2, 1, 0, 1, -1, 0, -1, 0, 2, -1, 0, 1, 2, 14, 39, 63, 65, 42, 10,
    -24, -50, -58, -48, -32, -13, -3, 2, 3, 2, 0, -1, -3, -3, -3, -1, 1, -1, 0, -2, 2, 0, 0, -1,
    1, 0, 0, 0, -1, -1, 0, -2, 0, -1, 1, 0, -1, 1, 0, 0, 0,
];

pub const OUTGOING_SECOND_DIFFERENCE: [i32; 232] = [
    0, 1, 2, 1, 6, 14, 22, 16, 9, 34, 40, 24, 1, 13, 18, 12, 6, 2, 1, 2, 1, 0, 0, 1, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2,
    2, 1, 1, 4, 11, 23, 19, 6, 31, 42, 26, 5, 13, 18, 12, 7, 3, 0, 2, 1, 1, 0, 1, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0,
    2, 1, 5, 11, 23, 19, 5, 28, 41, 30, 6, 14, 18, 11, 8, 3, 0, 1, 2, 0, 1, 1, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0,
    1, 2, 12, 23, 18, 3, 29, 40, 30, 5, 11, 17, 14, 8, 1, 1, 2, 2, 1, 1, 1, 0, 1, 2, 1, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

pub const RETURNING_SECOND_DIFFERENCE: [i32; 116] = [
    0, 1, 1, 0, 0, 0, 0, 1, 1, 1, 7, 18, 27, 14, 10, 29, 31, 34, 18, 3, 13, 21, 18, 7, 0, 0, 1,
    1, 0, 2, 1, 2, 0, 0, 1, 0, 1, 2, 2, 0, 1, 2, 0, 0, 3, 2, 1, 0, 1, 1, 1, 1, 2, 0, 0, 0, 1, 2,
    1, 1, 2, 1, 1, 1, 2, 3, 1, 1, 1, 12, 25, 24, 2, 23, 32, 34, 26, 8, 10, 16, 19, 10, 5, 1, 1,
    2, 1, 2, 0, 0, 2, 2, 2, 1, 2, 4, 2, 0, 1, 2, 1, 0, 0, 1, 0, 1, 2, 2, 1, 2, 1, 1, 2, 1, 0, 0,
];

/// Median-smoothed returning second difference
pub const RETURNING_SMOOTH_SECOND_DIFFERENCE: [i32; 116] = [
    0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 7, 14, 14, 18, 27, 29, 29, 29, 18, 18, 18, 13, 13, 7, 1, 1, 0,
    1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 2, 1, 0, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 2,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 12, 12, 23, 24, 24, 26, 26, 26, 16, 16, 10, 10, 10, 5, 2,
    1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 0, 0, 1, 1, 1, 2, 2, 1, 1, 1, 1, 1, 0,
    0,
];

/// Returning-wave peaks found on the first difference at noise level 5
pub const RETURNING_PEAK_AMPLITUDES: [i32; 8] = [240, 15, 6, 238, 17, 7, 6, 6];
pub const RETURNING_PEAK_LOCATIONS: [usize; 8] = [18, 28, 46, 80, 90, 97, 101, 105];

/// Indices of the pulses carrying a returning sampling
pub const RETURNING_PULSES: [u64; 2] = [1, 3];

/// The reference line as pulses, outgoing sampling first
pub fn reference_pulses() -> Vec<Pulse> {
    let mut returning = RETURNING_WAVE.chunks(MAX_COUNT);

    OUTGOING_WAVE
        .chunks(MAX_COUNT)
        .zip(0u64..)
        .map(|(outgoing, index)| {
            let mut samplings = vec![Sampling::new(WaveClass::Outgoing, outgoing.to_vec())];
            if RETURNING_PULSES.contains(&index) {
                if let Some(wave) = returning.next() {
                    samplings.push(Sampling::new(WaveClass::Returning, wave.to_vec()));
                }
            }
            Pulse::new(index, samplings)
        })
        .collect()
}
