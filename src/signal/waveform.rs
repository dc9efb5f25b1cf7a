use super::Sample;

pub const WAVEFORM_LEN: usize = 32;

pub type WaveformTable = [Sample; WAVEFORM_LEN];

/// Normal sinus rhythm, one cardiac cycle per sweep.
pub static SINUS: WaveformTable = [
    65, 65, 65, 65, 70, 76, 74, 70, 65, 63, 65, 65, 65, 65, 48, 230, 40, 65, 65, 65, 74, 90, 100,
    102, 100, 95, 80, 70, 65, 65, 65, 65,
];

/// Arrhythmia pattern with an irregular depolarization dip.
pub static ARRHYTHMIA: WaveformTable = [
    65, 70, 67, 61, 70, 72, 74, 76, 70, 68, 67, 65, 63, 55, 48, 10, 15, 65, 67, 70, 74, 80, 100,
    102, 100, 95, 80, 70, 65, 65, 65, 65,
];

/// Baseline with no cardiac activity.
pub static FLATLINE: WaveformTable = [65; WAVEFORM_LEN];

/// Selects the table the producer should read from. A non-alive patient is
/// always a flatline, regardless of the rhythm selection.
pub fn active_table(alive: bool, alternate_rhythm: bool) -> &'static WaveformTable {
    if !alive {
        &FLATLINE
    } else if alternate_rhythm {
        &ARRHYTHMIA
    } else {
        &SINUS
    }
}
