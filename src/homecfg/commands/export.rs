use crate::codec;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::load_document;

/// The document exactly as it would be written: hidden entries and disabled
/// fields commented, sequence-shaped.
pub fn run<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let document = load_document(store)?;
    let text = codec::encode(&document)?;
    Ok(CmdResult::default().with_text(text))
}
