//! JSON codec backed by serde_json.

use std::io;

use tracing::debug;

use crate::element::ConfigElement;

use super::{Codec, CodecError, is_cyclic};

/// The JSON codec.
///
/// Integral numbers decode to `Int`, everything else numeric to `Float`;
/// integers outside the `i64` range are a parse error rather than a
/// silent precision loss.
#[derive(Debug)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn decode(&self, input: &mut dyn io::Read) -> Result<ConfigElement, CodecError> {
        let element: ConfigElement =
            serde_json::from_reader(input).map_err(|err| classify_json(err, "parsing"))?;
        debug!(root = element.type_name(), "decoded JSON document");
        Ok(element)
    }

    fn encode(
        &self,
        element: &ConfigElement,
        output: &mut dyn io::Write,
    ) -> Result<(), CodecError> {
        if is_cyclic(element) {
            return Err(CodecError::CyclicElement);
        }
        serde_json::to_writer_pretty(output, element)
            .map_err(|err| classify_json(err, "encoding"))?;
        Ok(())
    }
}

fn classify_json(err: serde_json::Error, phase: &str) -> CodecError {
    if err.is_io() {
        return CodecError::Io(io::Error::other(err));
    }
    if phase == "parsing" {
        CodecError::Parse {
            format: "JSON",
            reason: err.to_string(),
        }
    } else {
        CodecError::Emit {
            format: "JSON",
            reason: err.to_string(),
        }
    }
}
