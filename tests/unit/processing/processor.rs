use std::{
    io::{Cursor, Read, Seek, SeekFrom, Write},
    sync::Arc,
};

use super::*;

/// Appends a tag and leaves the cursor at the end on purpose.
#[derive(Debug)]
struct Append(&'static str);

impl Processor for Append {
    fn name(&self) -> &str {
        "append"
    }

    fn process(&self, mut input: Stream) -> FilekitResult<Stream> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf).map_err(anyhow::Error::from)?;
        let mut out = Cursor::new(buf);
        out.seek(SeekFrom::End(0)).map_err(anyhow::Error::from)?;
        out.write_all(self.0.as_bytes()).map_err(anyhow::Error::from)?;
        Ok(Box::new(out))
    }
}

#[derive(Debug)]
struct Fails;

impl Processor for Fails {
    fn name(&self) -> &str {
        "fails"
    }

    fn process(&self, _input: Stream) -> FilekitResult<Stream> {
        Err(FilekitError::Other(anyhow::anyhow!("corrupt input")))
    }
}

fn read_all(mut s: Stream) -> String {
    let mut out = String::new();
    s.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn apply_rewinds_output() {
    let out = Append("b").apply(stream_from_bytes(b"a".to_vec())).unwrap();
    assert_eq!(read_all(out), "ab");
}

#[test]
fn chain_runs_in_declared_order() {
    let chain: Vec<Arc<dyn Processor>> =
        vec![Arc::new(Append("1")), Arc::new(Append("2")), Arc::new(Append("3"))];
    let out = run_chain(&chain, stream_from_bytes(b"x".to_vec())).unwrap();
    assert_eq!(read_all(out), "x123");
}

#[test]
fn chain_failure_surfaces_as_processor_error() {
    let chain: Vec<Arc<dyn Processor>> = vec![Arc::new(Append("1")), Arc::new(Fails)];
    let err = run_chain(&chain, stream_from_bytes(Vec::new())).err().unwrap();
    assert!(matches!(err, FilekitError::Processor(_)));
    assert!(err.to_string().contains("fails"));
    assert!(err.to_string().contains("corrupt input"));
}

#[test]
fn default_extension_is_none() {
    assert_eq!(Append("x").extension(), None);
}
