//! Embedded YAML block handling
//!
//! TAP 13 allows a test point to be followed by a YAML block bracketed by
//! `---` and `...` lines. The block's raw lines are buffered verbatim and
//! decoded in one shot when the terminator arrives; the decoder is a
//! black box and its failure belongs to the block, not to the stream.

use serde_yaml::Value;
use std::mem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum BlockState {
    #[default]
    Normal,
    InBlock,
}

/// Accumulator for the raw content of one YAML block
#[derive(Debug, Default)]
pub(crate) struct YamlBlock {
    state: BlockState,
    buffer: String,
}

impl YamlBlock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether a block is currently open
    pub(crate) fn is_active(&self) -> bool {
        self.state == BlockState::InBlock
    }

    /// Open a block, dropping any stale content
    pub(crate) fn begin(&mut self) {
        self.state = BlockState::InBlock;
        self.buffer.clear();
    }

    /// Append one raw content line to the open block
    pub(crate) fn push_line(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    /// Close the block and decode its buffered content
    ///
    /// An empty block decodes to [`Value::Null`].
    pub(crate) fn finish(&mut self) -> Result<Value, serde_yaml::Error> {
        self.state = BlockState::Normal;
        let raw = mem::take(&mut self.buffer);
        serde_yaml::from_str(&raw)
    }

    /// Close the block and drop its content undecoded
    pub(crate) fn discard(&mut self) {
        self.state = BlockState::Normal;
        self.buffer.clear();
    }
}
