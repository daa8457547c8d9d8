use std::{
    fmt,
    io::{Read, Seek},
};

use anyhow::Context;

use crate::foundation::error::{FilekitError, FilekitResult};

/// Readable, seekable byte source threaded through a processor chain.
pub trait ByteStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> ByteStream for T {}

/// Owned stream handed from one processor to the next.
pub type Stream = Box<dyn ByteStream>;

/// Wrap an in-memory buffer as a [`Stream`].
pub fn stream_from_bytes(bytes: Vec<u8>) -> Stream {
    Box::new(std::io::Cursor::new(bytes))
}

/// One stateless transformation step of a field's chain.
///
/// Implementors provide [`Processor::process`]; callers go through [`Processor::apply`], which
/// rewinds the produced stream so the next step (or the storage write) always reads from the
/// start.
pub trait Processor: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Canonical extension of the produced bytes, if this processor fixes the output format.
    fn extension(&self) -> Option<&str> {
        None
    }

    /// Reject invalid parameters. Called once when the owning kit is defined.
    fn validate(&self) -> FilekitResult<()> {
        Ok(())
    }

    /// Transform `input` (positioned at its start) into a new stream.
    fn process(&self, input: Stream) -> FilekitResult<Stream>;

    /// Run [`Processor::process`] and rewind its output.
    fn apply(&self, input: Stream) -> FilekitResult<Stream> {
        let mut out = self.process(input)?;
        out.rewind()
            .with_context(|| format!("rewind output of processor '{}'", self.name()))?;
        Ok(out)
    }
}

/// Thread `input` through `chain` in declared order.
pub fn run_chain(chain: &[std::sync::Arc<dyn Processor>], input: Stream) -> FilekitResult<Stream> {
    let mut current = input;
    for processor in chain {
        current = processor.apply(current).map_err(|e| match e {
            FilekitError::Processor(_) => e,
            other => FilekitError::processor(format!("{}: {other}", processor.name())),
        })?;
    }
    Ok(current)
}

#[cfg(test)]
#[path = "../../tests/unit/processing/processor.rs"]
mod tests;
