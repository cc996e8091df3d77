use crate::codec;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::load_document;

/// What a consumer of the file acts on: hidden entries removed, no comments.
pub fn run<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let document = load_document(store)?;
    let text = codec::encode_active(&document)?;
    Ok(CmdResult::default()
        .with_categories(document.category_names())
        .with_text(text))
}
