//! Output sinks for the OUTPUT instruction.

/// Receives accumulator values emitted by the `OUTPUT` instruction, in
/// execution order.
///
/// This is the machine's only observable output stream besides the final
/// status and the data memory snapshot.
pub trait OutputSink {
    /// Called once per executed `OUTPUT` with the accumulator's value.
    fn emit(&mut self, value: i64);
}

/// Sink that prints each value on its own line to stdout.
#[derive(Debug, Default)]
pub struct Console;

impl OutputSink for Console {
    fn emit(&mut self, value: i64) {
        println!("{value}");
    }
}

/// Capture sink for tests and embedders.
impl OutputSink for Vec<i64> {
    fn emit(&mut self, value: i64) {
        self.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_captures_in_order() {
        let mut sink: Vec<i64> = Vec::new();
        sink.emit(3);
        sink.emit(-1);
        sink.emit(3);
        assert_eq!(sink, vec![3, -1, 3]);
    }
}
