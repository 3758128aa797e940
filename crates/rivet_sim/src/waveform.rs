//! Sampled waveform traces and VCD export.
//!
//! [`WaveformData`] holds one boolean sample per signal per time point.
//! [`WaveformData::write_vcd`] serialises it in the IEEE 1364 Value Change Dump
//! format so it can be opened in GTKWave, Surfer, or other waveform viewers.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Sample history of one signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalTrace {
    /// One 0/1 sample per entry of [`WaveformData::time`].
    pub values: Vec<u8>,
    /// Times at which the sample differs from the previous one, ascending.
    pub transitions: Vec<u64>,
}

/// A sampled trace of every known signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveformData {
    /// Sample times, strictly ascending, starting at 0.
    pub time: Vec<u64>,
    /// Per-signal sample histories keyed by name.
    pub signals: BTreeMap<String, SignalTrace>,
}

impl WaveformData {
    /// Starts a waveform with one `t = 0` sample per signal.
    pub fn seeded<'a>(initial: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let signals = initial
            .into_iter()
            .map(|(name, value)| {
                let trace = SignalTrace {
                    values: vec![u8::from(value != 0)],
                    transitions: Vec::new(),
                };
                (name.to_string(), trace)
            })
            .collect();
        Self {
            time: vec![0],
            signals,
        }
    }

    /// Appends a sample at `time` for every signal, using `value_of` to read
    /// the current value. Signals `value_of` cannot resolve sample as 0.
    pub fn sample(&mut self, time: u64, value_of: impl Fn(&str) -> Option<i64>) {
        self.time.push(time);
        for (name, trace) in &mut self.signals {
            let bit = u8::from(value_of(name).unwrap_or(0) != 0);
            if trace.values.last().is_some_and(|prev| *prev != bit) {
                trace.transitions.push(time);
            }
            trace.values.push(bit);
        }
    }

    /// Returns the trace of `name`.
    pub fn signal(&self, name: &str) -> Option<&SignalTrace> {
        self.signals.get(name)
    }

    /// Returns the sampled value of `name` at the last time point.
    pub fn final_value(&self, name: &str) -> Option<u8> {
        self.signal(name).and_then(|t| t.values.last().copied())
    }

    /// Keeps only the named signals. Unknown names are an error.
    pub fn retain_signals(&mut self, names: &[String]) -> Result<(), SimError> {
        if let Some(missing) = names.iter().find(|n| !self.signals.contains_key(*n)) {
            return Err(SimError::UnknownSignal {
                name: missing.clone(),
            });
        }
        self.signals.retain(|name, _| names.contains(name));
        Ok(())
    }

    /// Writes the waveform as VCD, all signals as 1-bit wires under `scope`.
    pub fn write_vcd(&self, writer: &mut impl Write, scope: &str) -> Result<(), SimError> {
        writeln!(writer, "$date")?;
        writeln!(writer, "  Simulation date")?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$version")?;
        writeln!(writer, "  Rivet simulator")?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$timescale")?;
        writeln!(writer, "  1ns")?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$scope module {scope} $end")?;

        let mut codes = Vec::with_capacity(self.signals.len());
        for (index, (name, trace)) in self.signals.iter().enumerate() {
            let code = make_id_code(index as u32);
            writeln!(writer, "$var wire 1 {code} {name} $end")?;
            codes.push((code, trace));
        }
        writeln!(writer, "$upscope $end")?;
        writeln!(writer, "$enddefinitions $end")?;

        for (index, time) in self.time.iter().enumerate() {
            let changed: Vec<_> = codes
                .iter()
                .filter(|(_, trace)| {
                    index == 0 || trace.values.get(index) != trace.values.get(index - 1)
                })
                .collect();
            if changed.is_empty() {
                continue;
            }
            writeln!(writer, "#{time}")?;
            if index == 0 {
                writeln!(writer, "$dumpvars")?;
            }
            for (code, trace) in changed {
                let bit = trace.values.get(index).copied().unwrap_or(0);
                writeln!(writer, "{bit}{code}")?;
            }
            if index == 0 {
                writeln!(writer, "$end")?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// VCD identifier code for a sequential index: printable ASCII from `!`,
/// multi-character past 94 signals.
fn make_id_code(index: u32) -> String {
    let mut result = String::new();
    let mut idx = index;
    loop {
        let c = (b'!' + (idx % 94) as u8) as char;
        result.push(c);
        idx /= 94;
        if idx == 0 {
            break;
        }
        idx -= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_signal_wave() -> WaveformData {
        let mut wave = WaveformData::seeded([("clk", 0), ("q", 0)]);
        let steps = [(1, 0), (0, 1), (1, 1)];
        for (t, (clk, q)) in steps.iter().enumerate() {
            wave.sample(t as u64 + 1, |name| match name {
                "clk" => Some(*clk),
                "q" => Some(*q),
                _ => None,
            });
        }
        wave
    }

    #[test]
    fn seeded_has_one_sample() {
        let wave = WaveformData::seeded([("a", 3), ("b", 0)]);
        assert_eq!(wave.time, vec![0]);
        assert_eq!(wave.signal("a").unwrap().values, vec![1]);
        assert_eq!(wave.signal("b").unwrap().values, vec![0]);
    }

    #[test]
    fn sample_tracks_transitions() {
        let wave = two_signal_wave();
        assert_eq!(wave.time, vec![0, 1, 2, 3]);
        let clk = wave.signal("clk").unwrap();
        assert_eq!(clk.values, vec![0, 1, 0, 1]);
        assert_eq!(clk.transitions, vec![1, 2, 3]);
        let q = wave.signal("q").unwrap();
        assert_eq!(q.transitions, vec![2]);
        assert_eq!(wave.final_value("q"), Some(1));
        for trace in wave.signals.values() {
            assert_eq!(trace.values.len(), wave.time.len());
        }
    }

    #[test]
    fn retain_filters_and_rejects_unknown() {
        let mut wave = two_signal_wave();
        wave.retain_signals(&["q".to_string()]).unwrap();
        assert_eq!(wave.signals.len(), 1);
        let err = wave.retain_signals(&["nope".to_string()]).unwrap_err();
        assert!(matches!(err, SimError::UnknownSignal { .. }));
    }

    #[test]
    fn id_codes() {
        assert_eq!(make_id_code(0), "!");
        assert_eq!(make_id_code(1), "\"");
        assert_eq!(make_id_code(93), "~");
        assert_eq!(make_id_code(94), "!!");
    }

    #[test]
    fn vcd_output() {
        let wave = two_signal_wave();
        let mut out = Vec::new();
        wave.write_vcd(&mut out, "top").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("$scope module top $end"));
        assert!(text.contains("$var wire 1 ! clk $end"));
        assert!(text.contains("$var wire 1 \" q $end"));
        assert!(text.contains("$enddefinitions $end"));
        assert!(text.contains("#0\n$dumpvars\n0!\n0\"\n$end\n"));
        assert!(text.contains("#2\n0!\n1\"\n"));
    }

    #[test]
    fn vcd_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wave.vcd");
        let mut file = std::fs::File::create(&path).unwrap();
        two_signal_wave().write_vcd(&mut file, "t").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("$date"));
        assert!(text.contains("#3"));
    }
}
